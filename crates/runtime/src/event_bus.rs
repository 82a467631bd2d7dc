/// What a recorded session event was about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The active index moved.
    Transition,
    /// An update was left out because its data was missing.
    Skip,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Transition => "transition",
            EventKind::Skip => "skip",
        }
    }
}

/// One entry in the session trace, keyed by the transition counter so two
/// runs over the same input can be compared step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub step: u64,
    pub kind: EventKind,
    pub message: String,
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}: {}", self.step, self.kind.as_str(), self.message)
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, step: u64, kind: EventKind, message: impl Into<String>) {
        self.events.push(Event {
            step,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Events recorded for one transition.
    pub fn at_step(&self, step: u64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.step == step)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};

    #[test]
    fn records_events_with_step() {
        let mut bus = EventBus::new();
        bus.emit(2, EventKind::Transition, "forward -> 2");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].step, 2);
        assert_eq!(bus.last().map(|e| e.kind), Some(EventKind::Transition));
        assert_eq!(bus.events()[0].to_string(), "#2 transition: forward -> 2");
    }

    #[test]
    fn counts_by_kind_and_step() {
        let mut bus = EventBus::new();
        bus.emit(0, EventKind::Transition, "a");
        bus.emit(0, EventKind::Skip, "b");
        bus.emit(1, EventKind::Transition, "c");
        assert_eq!(bus.count(EventKind::Transition), 2);
        assert_eq!(bus.count(EventKind::Skip), 1);
        assert_eq!(bus.at_step(0).count(), 2);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(0, EventKind::Skip, "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
