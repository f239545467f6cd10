/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    /// Precipitation touched some number of sites during a step.
    Precipitation {
        /// How many sites received water.
        sites: usize,
    },
    /// Water left the grid through the virtual boundary rows during a
    /// step's flow sweeps.
    BoundaryLoss {
        /// Total water discarded at the boundary.
        amount: f64,
    },
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates diagnostic events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its
    /// capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain_event(tick: u64) -> SimEvent {
        SimEvent::new(tick, SimEventKind::Precipitation { sites: 3 }, "test")
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(rain_event(1));
        log.push(SimEvent::new(
            1,
            SimEventKind::BoundaryLoss { amount: 0.5 },
            "test",
        ));
        log.push(rain_event(2));
        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_at_tick(2).len(), 1);
        assert_eq!(log.events_at_tick(3).len(), 0);
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(rain_event(i));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_log_unlimited_capacity() {
        let mut log = EventLog::new(0);
        for i in 0..1000 {
            log.push(rain_event(i));
        }
        assert_eq!(log.len(), 1000);
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(rain_event(1));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
