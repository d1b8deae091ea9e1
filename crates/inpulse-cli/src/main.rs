use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use inpulse_signals::pulse::{ManualClock, ReadingAverager};
use inpulse_signals::synth::synthetic_ppg;
use inpulse_signals::{PulseConfig, PulseEngine, PulseEvent};

#[derive(Parser)]
#[command(name = "inpulse", about = "Run luminance traces through the fingertip pulse engine")]
struct Cli {
    /// TOML engine configuration (INPULSE_* variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session length in milliseconds; omit for an untimed session
    #[arg(long, global = true)]
    duration_ms: Option<u64>,

    /// Print every intermediate reading
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded trace: one red-channel mean per line, `#` comments
    Replay { trace: PathBuf },
    /// Generate a clean cosine pulse and measure it
    Synth {
        #[arg(long, default_value_t = 72.0)]
        bpm: f32,
        #[arg(long, default_value_t = 20.0)]
        seconds: f32,
        #[arg(long, default_value_t = 10.0)]
        amplitude: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PulseConfig::from_file_with_env(path)?,
        None => {
            let mut config = PulseConfig::default();
            config.apply_env_overrides()?;
            config.validate()?;
            config
        }
    };

    let samples: Vec<f32> = match &cli.cmd {
        Commands::Replay { trace } => parse_trace(&fs::read_to_string(trace)?)?,
        Commands::Synth { bpm, seconds, amplitude } => {
            let len = (seconds * config.sample_rate).max(0.0) as usize;
            synthetic_ppg(*bpm, config.sample_rate, len, *amplitude, 150.0).to_vec()
        }
    };

    run_session(config, &samples, cli.duration_ms.map(Duration::from_millis), cli.verbose)?;
    Ok(())
}

fn parse_trace(text: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: f32 = line
            .parse()
            .map_err(|e| format!("line {}: {:?}: {}", lineno + 1, line, e))?;
        samples.push(value);
    }
    Ok(samples)
}

/// Feed `samples` at the configured frame cadence on a simulated clock
fn run_session(
    config: PulseConfig,
    samples: &[f32],
    duration: Option<Duration>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame_ms = (1000.0 / config.sample_rate).round().max(1.0) as u64;
    let clock = ManualClock::new(0);
    let mut engine = PulseEngine::with_config(config)?.with_clock(Box::new(clock.clone()));
    let mut averager = ReadingAverager::new();

    engine.start_session(duration);
    let mut final_result = None;

    for (i, &sample) in samples.iter().enumerate() {
        clock.advance_ms(frame_ms);
        for event in engine.push(sample).events() {
            match event {
                PulseEvent::PulseUpdated(r) => {
                    averager.add(r);
                    if verbose {
                        println!("#{:<5} {:6.1} bpm  confidence {:.2}", i, r.bpm, r.confidence);
                    }
                }
                PulseEvent::SessionCompleted(r) => final_result = Some(r),
            }
        }
        if final_result.is_some() {
            break;
        }
    }

    let result = match final_result {
        Some(r) => r,
        None => engine.stop_session().unwrap_or_default(),
    };

    println!(
        "final: {:.1} bpm, confidence {:.2} ({} samples buffered)",
        result.final_bpm,
        result.final_confidence,
        engine.buffer_len()
    );
    if let Some(summary) = averager.finalize() {
        println!(
            "session average: {} bpm, confidence {:.2} over {} readings",
            summary.bpm, summary.confidence, summary.readings
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace() {
        let samples = parse_trace("# red means\n120.5\n\n  121\n").unwrap();
        assert_eq!(samples, vec![120.5, 121.0]);
        assert!(parse_trace("12\nabc\n").is_err());
    }
}
