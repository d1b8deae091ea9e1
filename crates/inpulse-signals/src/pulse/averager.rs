//! Running average of intermediate readings within a session

use serde::{Deserialize, Serialize};

use super::estimator::PulseReading;

/// Averaged view of the readings collected so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingSummary {
    /// Mean of whole-number heart rates, truncated
    pub bpm: u32,
    pub confidence: f32,
    pub readings: usize,
}

/// Accumulates `PulseUpdated` readings into a session average.
///
/// Heart rates are truncated to whole beats on entry, so the summary
/// matches what a display showing integer BPM would have averaged.
#[derive(Debug, Clone, Default)]
pub struct ReadingAverager {
    bpms: Vec<u32>,
    confidences: Vec<f32>,
}

impl ReadingAverager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reading: PulseReading) {
        self.bpms.push(reading.bpm.max(0.0) as u32);
        self.confidences.push(reading.confidence);
    }

    pub fn len(&self) -> usize {
        self.bpms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bpms.is_empty()
    }

    /// Current average; `None` before the first reading
    pub fn current(&self) -> Option<ReadingSummary> {
        if self.bpms.is_empty() {
            return None;
        }
        let n = self.bpms.len();
        let bpm_sum: u64 = self.bpms.iter().map(|&b| b as u64).sum();
        let conf_sum: f64 = self.confidences.iter().map(|&c| c as f64).sum();
        Some(ReadingSummary {
            bpm: (bpm_sum as f64 / n as f64) as u32,
            confidence: (conf_sum / n as f64) as f32,
            readings: n,
        })
    }

    /// Take the final summary and start over
    pub fn finalize(&mut self) -> Option<ReadingSummary> {
        let summary = self.current();
        self.clear();
        summary
    }

    pub fn clear(&mut self) {
        self.bpms.clear();
        self.confidences.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty() {
        let mut avg = ReadingAverager::new();
        assert!(avg.current().is_none());
        assert!(avg.finalize().is_none());
    }

    #[test]
    fn test_truncating_average() {
        let mut avg = ReadingAverager::new();
        avg.add(PulseReading { bpm: 72.9, confidence: 0.5 });
        avg.add(PulseReading { bpm: 75.2, confidence: 1.0 });

        // 72 and 75 -> 73.5 -> 73
        let summary = avg.current().unwrap();
        assert_eq!(summary.bpm, 73);
        assert_relative_eq!(summary.confidence, 0.75);
        assert_eq!(summary.readings, 2);
    }

    #[test]
    fn test_finalize_clears() {
        let mut avg = ReadingAverager::new();
        avg.add(PulseReading { bpm: 60.0, confidence: 0.9 });

        assert_eq!(avg.finalize().map(|s| s.bpm), Some(60));
        assert!(avg.is_empty());
    }
}
