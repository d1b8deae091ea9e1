//! Property-based checks for the pulse engine invariants

use inpulse_signals::pulse::{ManualClock, PulseEvent};
use inpulse_signals::{PulseConfig, PulseEngine, PulseEstimator};
use ndarray::Array1;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

/// Small buffer keeps per-case cost low
fn small_config() -> PulseConfig {
    PulseConfig {
        buffer_capacity: 40,
        min_frames: 20,
        ..Default::default()
    }
}

fn recording_engine(config: PulseConfig) -> (PulseEngine, Arc<Mutex<Vec<PulseEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let engine = PulseEngine::with_config(config)
        .unwrap()
        .with_clock(Box::new(ManualClock::new(0)))
        .with_observer(Box::new(move |e: &PulseEvent| sink.lock().unwrap().push(*e)));
    (engine, events)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn buffer_never_exceeds_capacity(samples in prop::collection::vec(0.0f32..255.0, 0..200)) {
        let config = small_config();
        let capacity = config.buffer_capacity;
        let mut engine = PulseEngine::with_config(config).unwrap();

        for s in &samples {
            engine.push(*s);
            prop_assert!(engine.buffer_len() <= capacity);
        }
        prop_assert_eq!(engine.buffer_len(), samples.len().min(capacity));
    }

    #[test]
    fn retains_most_recent_samples(samples in prop::collection::vec(0.0f32..255.0, 40..200)) {
        let config = small_config();
        let capacity = config.buffer_capacity;
        let mut engine = PulseEngine::with_config(config).unwrap();

        for s in &samples {
            engine.push(*s);
        }
        let expected = samples[samples.len() - capacity..].to_vec();
        prop_assert_eq!(engine.samples(), expected);
    }

    #[test]
    fn no_update_below_min_frames(samples in prop::collection::vec(0.0f32..255.0, 0..20)) {
        let (mut engine, events) = recording_engine(small_config());
        for s in &samples {
            prop_assert!(engine.push(*s).update.is_none());
        }
        prop_assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn rate_always_in_band(samples in prop::collection::vec(-1.0e4f32..1.0e4, 100..300)) {
        let est = PulseEstimator::default();
        let reading = est.estimate(&Array1::from(samples)).unwrap().reading;

        prop_assert!(reading.bpm >= 50.0 && reading.bpm <= 180.0, "bpm {}", reading.bpm);
        prop_assert!(reading.confidence >= 0.0 && reading.confidence <= 1.0);
    }

    #[test]
    fn stop_session_completes_exactly_once(
        pushes in 0usize..60,
        stops in 1usize..5,
    ) {
        let (mut engine, events) = recording_engine(small_config());
        engine.start_session(None);
        for i in 0..pushes {
            engine.push(100.0 + (i % 7) as f32);
        }

        let returned = (0..stops).filter_map(|_| engine.stop_session()).count();
        let observed = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, PulseEvent::SessionCompleted(_)))
            .count();

        prop_assert_eq!(returned, 1);
        prop_assert_eq!(observed, 1);
    }

    #[test]
    fn start_after_completed_is_noop(restarts in 1usize..4) {
        let mut engine = PulseEngine::with_config(small_config()).unwrap();
        engine.start_session(None);
        engine.stop_session();
        let before = engine.session().clone();

        for _ in 0..restarts {
            engine.start_session(None);
            engine.start_timed_session();
        }
        prop_assert_eq!(engine.session(), &before);
        prop_assert!(engine.session().is_completed());
    }
}
