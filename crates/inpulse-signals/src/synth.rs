//! Deterministic test signals
//!
//! Stand-ins for fingertip luminance traces, used by the test suites and
//! the CLI's `synth` command.

use ndarray::Array1;
use std::f32::consts::PI;

/// Cosine pulse train at `bpm` on a DC `baseline`.
///
/// Sample `i` sits at `i / sample_rate` seconds; the first sample is a crest.
pub fn synthetic_ppg(bpm: f32, sample_rate: f32, len: usize, amplitude: f32, baseline: f32) -> Array1<f32> {
    let freq = bpm / 60.0;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            baseline + amplitude * (2.0 * PI * freq * t).cos()
        })
        .collect()
}

/// Single-sample spikes every `period` samples: a pattern far faster than
/// any heartbeat.
pub fn dither(len: usize, period: usize, amplitude: f32, baseline: f32) -> Array1<f32> {
    let period = period.max(1);
    (0..len)
        .map(|i| if i % period == 0 { baseline + amplitude } else { baseline })
        .collect()
}
