//! Engine output events and observers

use std::sync::mpsc::Sender;

use super::estimator::PulseReading;
use super::session::SessionResult;

/// Something the engine reports to its host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseEvent {
    /// Fresh estimate after an incremental recompute
    PulseUpdated(PulseReading),
    /// Fired exactly once per session, at stop or deadline
    SessionCompleted(SessionResult),
}

/// What a single `push` produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PushOutcome {
    pub update: Option<PulseReading>,
    pub completed: Option<SessionResult>,
}

impl PushOutcome {
    pub fn is_empty(&self) -> bool {
        self.update.is_none() && self.completed.is_none()
    }

    /// Events in emission order
    pub fn events(&self) -> impl Iterator<Item = PulseEvent> {
        self.update
            .map(PulseEvent::PulseUpdated)
            .into_iter()
            .chain(self.completed.map(PulseEvent::SessionCompleted))
    }
}

/// Receives engine events as they happen
pub trait PulseObserver: Send {
    fn on_event(&mut self, event: &PulseEvent);
}

impl<F> PulseObserver for F
where
    F: FnMut(&PulseEvent) + Send,
{
    fn on_event(&mut self, event: &PulseEvent) {
        self(event)
    }
}

/// Forward events over a channel; a dropped receiver is ignored.
pub struct ChannelObserver {
    tx: Sender<PulseEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<PulseEvent>) -> Self {
        Self { tx }
    }
}

impl PulseObserver for ChannelObserver {
    fn on_event(&mut self, event: &PulseEvent) {
        if self.tx.send(*event).is_err() {
            log::debug!("pulse event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_outcome_event_order() {
        let reading = PulseReading { bpm: 72.0, confidence: 0.8 };
        let result = SessionResult { final_bpm: 71.0, final_confidence: 0.7 };
        let outcome = PushOutcome { update: Some(reading), completed: Some(result) };

        let events: Vec<_> = outcome.events().collect();
        assert_eq!(
            events,
            vec![PulseEvent::PulseUpdated(reading), PulseEvent::SessionCompleted(result)]
        );
        assert!(PushOutcome::default().is_empty());
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = mpsc::channel();
        let mut observer = ChannelObserver::new(tx);
        let event = PulseEvent::SessionCompleted(SessionResult::INSUFFICIENT);

        observer.on_event(&event);
        assert_eq!(rx.try_recv().unwrap(), event);

        drop(rx);
        observer.on_event(&event);
    }
}
