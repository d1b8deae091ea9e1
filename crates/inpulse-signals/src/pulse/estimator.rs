//! Fingertip pulse estimation
//!
//! Turns a buffer snapshot of red-channel luminance into a heart rate and a
//! heuristic confidence:
//!
//! 1. centred moving average (sensor noise)
//! 2. DC-blocking high-pass (ambient drift, finger pressure)
//! 3. z-score normalisation
//! 4. local-maximum peaks above a one-sigma floor
//! 5. peak-to-peak intervals inside the plausible band
//! 6. rate from the mean interval, or a fallback constant
//! 7. confidence from interval count and dispersion

use ndarray::Array1;

use crate::config::PulseConfig;
use crate::dsp::{
    coefficient_of_variation, detect_peaks, moving_average, normalize, remove_dc, valid_intervals,
    variance,
};
use crate::error::PulseError;

/// Heart rate and confidence derived from the signal
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PulseReading {
    /// Beats per minute, clamped to the configured physiological band
    pub bpm: f32,
    /// Heuristic score in [0, 1]; not a probability
    pub confidence: f32,
}

/// Which branch produced the rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBasis {
    /// Mean of plausible peak-to-peak intervals
    Intervals,
    /// Three or more peaks, none spaced plausibly
    NoValidIntervals,
    /// Two or fewer peaks
    TooFewPeaks,
}

/// Reading plus the diagnostics behind it
#[derive(Debug, Clone, PartialEq)]
pub struct PulseEstimate {
    pub reading: PulseReading,
    pub basis: RateBasis,
    pub peak_count: usize,
    /// Intervals that survived the plausibility band
    pub intervals: Vec<usize>,
}

/// Stateless estimator over buffer snapshots
#[derive(Debug, Clone)]
pub struct PulseEstimator {
    config: PulseConfig,
}

impl PulseEstimator {
    pub fn new(config: PulseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Smoothing followed by DC removal
    pub fn condition(&self, signal: &Array1<f32>) -> Array1<f32> {
        let smoothed = moving_average(signal, self.config.smoothing_half_window);
        remove_dc(&smoothed, self.config.dc_alpha)
    }

    /// Full pipeline over a buffer snapshot (oldest sample first).
    ///
    /// Fails only on non-finite input; degenerate signals resolve to the
    /// fallback constants.
    pub fn estimate(&self, samples: &Array1<f32>) -> Result<PulseEstimate, PulseError> {
        if let Some(index) = samples.iter().position(|v| !v.is_finite()) {
            return Err(PulseError::NonFiniteSample { index });
        }

        let filtered = self.condition(samples);
        Ok(self.estimate_conditioned(&filtered))
    }

    /// Steps 3-7 on an already conditioned signal
    pub fn estimate_conditioned(&self, filtered: &Array1<f32>) -> PulseEstimate {
        let cfg = &self.config;

        let normalized = normalize(filtered);
        let threshold = variance(&normalized).sqrt();
        let peaks = detect_peaks(&normalized, threshold, cfg.peak_reach);

        let (bpm, confidence, basis, intervals) = if peaks.len() > 2 {
            let intervals = valid_intervals(&peaks, cfg.min_interval, cfg.max_interval);
            if intervals.is_empty() {
                (cfg.fallback_bpm, cfg.no_interval_confidence, RateBasis::NoValidIntervals, intervals)
            } else {
                let lengths: Vec<f32> = intervals.iter().map(|&i| i as f32).collect();
                let mean = lengths.iter().sum::<f32>() / lengths.len() as f32;
                let bpm = cfg.sample_rate / mean * 60.0;
                let confidence = self.interval_confidence(&lengths);
                (bpm, confidence, RateBasis::Intervals, intervals)
            }
        } else {
            (cfg.fallback_bpm, cfg.few_peaks_confidence, RateBasis::TooFewPeaks, Vec::new())
        };

        log::trace!(
            "estimate: peaks={} intervals={} basis={:?} raw_bpm={:.1}",
            peaks.len(),
            intervals.len(),
            basis,
            bpm
        );

        PulseEstimate {
            reading: PulseReading {
                bpm: bpm.clamp(cfg.min_bpm, cfg.max_bpm),
                confidence,
            },
            basis,
            peak_count: peaks.len(),
            intervals,
        }
    }

    /// `min(1, k / target) * (1 - clamp(cv, 0, max_cv) / max_cv)`
    fn interval_confidence(&self, lengths: &[f32]) -> f32 {
        let cfg = &self.config;
        let quantity = (lengths.len() as f32 / cfg.target_intervals as f32).min(1.0);
        let cv = coefficient_of_variation(lengths).clamp(0.0, cfg.max_variation);
        quantity * (1.0 - cv / cfg.max_variation)
    }
}

impl Default for PulseEstimator {
    fn default() -> Self {
        Self::new(PulseConfig::default())
    }
}
