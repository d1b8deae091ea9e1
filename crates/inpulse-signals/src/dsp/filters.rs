//! Pulse-signal conditioning
//!
//! Smoothing, DC removal and normalisation applied to a buffer snapshot
//! before peak detection, plus the small statistics helpers they share.

use ndarray::{s, Array1};

/// Centred moving average.
///
/// Each output is the mean of the input over `[i - half_window, i + half_window]`
/// clipped to the signal bounds, so the window shrinks at both edges.
pub fn moving_average(signal: &Array1<f32>, half_window: usize) -> Array1<f32> {
    let n = signal.len();
    let mut out = Array1::zeros(n);

    for i in 0..n {
        let lo = i.saturating_sub(half_window);
        let hi = i.saturating_add(half_window).saturating_add(1).min(n);
        out[i] = signal.slice(s![lo..hi]).mean().unwrap_or(0.0);
    }

    out
}

/// First-order DC-blocking high-pass: `y[i] = alpha * (y[i-1] + x[i] - x[i-1])`.
///
/// The state starts at `y = 0` with `x[-1] = x[0]`, so a constant input maps
/// to an all-zero output.
pub fn remove_dc(signal: &Array1<f32>, alpha: f32) -> Array1<f32> {
    let n = signal.len();
    if n == 0 {
        return Array1::zeros(0);
    }

    let mut out = Array1::zeros(n);
    let mut y_prev = 0.0f32;
    let mut x_prev = signal[0];

    for i in 0..n {
        let y = alpha * (y_prev + signal[i] - x_prev);
        x_prev = signal[i];
        y_prev = y;
        out[i] = y;
    }

    out
}

/// Z-score the signal.
///
/// A flat signal (zero standard deviation) is returned unmodified.
pub fn normalize(signal: &Array1<f32>) -> Array1<f32> {
    let mean = signal.mean().unwrap_or(0.0);
    let std = std_dev(signal);

    if std > 0.0 {
        signal.mapv(|x| (x - mean) / std)
    } else {
        signal.clone()
    }
}

/// Population variance. Zero for an empty signal.
pub fn variance(signal: &Array1<f32>) -> f32 {
    let mean = signal.mean().unwrap_or(0.0);
    signal.mapv(|x| (x - mean).powi(2)).mean().unwrap_or(0.0)
}

/// Population standard deviation.
pub fn std_dev(signal: &Array1<f32>) -> f32 {
    variance(signal).sqrt()
}

/// Standard deviation over mean; zero when the mean is zero or there are no values.
pub fn coefficient_of_variation(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let arr = Array1::from(values.to_vec());
    let mean = arr.mean().unwrap_or(0.0);
    if mean == 0.0 {
        return 0.0;
    }
    std_dev(&arr) / mean
}
