//! Measurement session state

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Final result of one measurement session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionResult {
    pub final_bpm: f32,
    pub final_confidence: f32,
}

impl SessionResult {
    /// Result for a session that never buffered enough samples
    pub const INSUFFICIENT: SessionResult = SessionResult { final_bpm: 0.0, final_confidence: 0.0 };
}

/// Session lifecycle: `Waiting -> Measuring -> Completed`.
///
/// Only an explicit reset returns a completed session to `Waiting`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Waiting,
    Measuring {
        /// Clock reading at start (ms)
        started_at_ms: u64,
        /// `None` runs until explicitly stopped
        deadline: Option<Duration>,
    },
    Completed {
        result: SessionResult,
    },
}

impl SessionState {
    pub fn is_waiting(&self) -> bool {
        matches!(self, SessionState::Waiting)
    }

    pub fn is_measuring(&self) -> bool {
        matches!(self, SessionState::Measuring { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionState::Completed { .. })
    }

    pub fn result(&self) -> Option<SessionResult> {
        match self {
            SessionState::Completed { result } => Some(*result),
            _ => None,
        }
    }

    /// Elapsed time at `now_ms` for a measuring session
    pub fn elapsed(&self, now_ms: u64) -> Option<Duration> {
        match self {
            SessionState::Measuring { started_at_ms, .. } => {
                Some(Duration::from_millis(now_ms.saturating_sub(*started_at_ms)))
            }
            _ => None,
        }
    }

    /// True when a timed session has reached its deadline at `now_ms`
    pub fn deadline_reached(&self, now_ms: u64) -> bool {
        match self {
            SessionState::Measuring { deadline: Some(limit), .. } => {
                self.elapsed(now_ms).map_or(false, |e| e >= *limit)
            }
            _ => false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(SessionState::default().is_waiting());

        let measuring = SessionState::Measuring { started_at_ms: 100, deadline: None };
        assert!(measuring.is_measuring());
        assert_eq!(measuring.result(), None);

        let done = SessionState::Completed { result: SessionResult::INSUFFICIENT };
        assert!(done.is_completed());
        assert_eq!(done.result(), Some(SessionResult::default()));
    }

    #[test]
    fn test_deadline() {
        let timed = SessionState::Measuring {
            started_at_ms: 1_000,
            deadline: Some(Duration::from_millis(500)),
        };
        assert!(!timed.deadline_reached(1_499));
        assert!(timed.deadline_reached(1_500));
        assert_eq!(timed.elapsed(1_250), Some(Duration::from_millis(250)));

        let untimed = SessionState::Measuring { started_at_ms: 0, deadline: None };
        assert!(!untimed.deadline_reached(u64::MAX));

        // Clock going backwards never expires a session
        assert!(!timed.deadline_reached(10));
    }
}
