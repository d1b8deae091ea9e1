//! Local-maximum peak detection and beat-interval filtering

use ndarray::Array1;

/// Indices of strict local maxima above `threshold`.
///
/// A sample qualifies when it is strictly greater than its `reach` nearest
/// neighbours on each side. The first and last `reach` samples can never
/// be peaks.
pub fn detect_peaks(signal: &Array1<f32>, threshold: f32, reach: usize) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if reach == 0 || n < 2 * reach + 1 {
        return peaks;
    }

    for i in reach..n - reach {
        let v = signal[i];
        if v <= threshold {
            continue;
        }
        let dominates = (1..=reach).all(|d| v > signal[i - d] && v > signal[i + d]);
        if dominates {
            peaks.push(i);
        }
    }

    peaks
}

/// Consecutive peak distances (in samples) that fall inside `[min, max]`.
///
/// Out-of-band distances are dropped, not clamped.
pub fn valid_intervals(peaks: &[usize], min: usize, max: usize) -> Vec<usize> {
    peaks
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| (min..=max).contains(d))
        .collect()
}
