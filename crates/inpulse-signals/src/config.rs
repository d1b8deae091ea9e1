use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pulse engine configuration.
///
/// Every constant of the fingertip algorithm lives here so tests and
/// calibration runs can move them. Defaults reproduce the reference
/// behaviour at an assumed 30 samples per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Default timed-session length (milliseconds)
    pub session_duration_ms: u64,
    /// Ring buffer capacity (samples)
    pub buffer_capacity: usize,
    /// Samples required before any estimate is attempted
    pub min_frames: usize,
    /// Assumed sample rate (Hz); not measured
    pub sample_rate: f32,
    /// Moving-average half window (samples)
    pub smoothing_half_window: usize,
    /// DC-blocking high-pass coefficient
    pub dc_alpha: f32,
    /// Neighbours on each side a peak must strictly exceed
    pub peak_reach: usize,
    /// Shortest plausible beat interval (samples)
    pub min_interval: usize,
    /// Longest plausible beat interval (samples)
    pub max_interval: usize,
    pub min_bpm: f32,
    pub max_bpm: f32,
    /// Rate reported when no usable intervals exist
    pub fallback_bpm: f32,
    /// Confidence when peaks exist but no interval is plausible
    pub no_interval_confidence: f32,
    /// Confidence when two or fewer peaks were found
    pub few_peaks_confidence: f32,
    /// Interval count at which the quantity factor saturates
    pub target_intervals: usize,
    /// Coefficient of variation at which confidence reaches zero
    pub max_variation: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            session_duration_ms: 20_000,
            buffer_capacity: 300,
            min_frames: 100,
            sample_rate: 30.0,
            smoothing_half_window: 5,
            dc_alpha: 0.95,
            peak_reach: 2,
            min_interval: 10,
            max_interval: 60,
            min_bpm: 50.0,
            max_bpm: 180.0,
            fallback_bpm: 70.0,
            no_interval_confidence: 0.2,
            few_peaks_confidence: 0.1,
            target_intervals: 8,
            max_variation: 0.5,
        }
    }
}

impl PulseConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: PulseConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    /// Environment variables should be prefixed with INPULSE_
    /// Example: INPULSE_SESSION_DURATION_MS=30000
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first existing file, then apply environment overrides.
    ///
    /// An existing user file replaces the default file entirely; files are
    /// not merged field by field. With neither file present the built-in
    /// defaults are used.
    pub fn load_layered(
        default_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut config = PulseConfig::default();

        if let Some(path) = default_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        }

        // Fields omitted from the user file fall back to built-in defaults,
        // not to the default file.
        if let Some(path) = user_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        override_from_env("INPULSE_SESSION_DURATION_MS", &mut self.session_duration_ms)?;
        override_from_env("INPULSE_BUFFER_CAPACITY", &mut self.buffer_capacity)?;
        override_from_env("INPULSE_MIN_FRAMES", &mut self.min_frames)?;
        override_from_env("INPULSE_SAMPLE_RATE", &mut self.sample_rate)?;
        override_from_env("INPULSE_DC_ALPHA", &mut self.dc_alpha)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Validation("buffer_capacity must be > 0".to_string()));
        }
        if self.min_frames == 0 || self.min_frames > self.buffer_capacity {
            return Err(ConfigError::Validation(format!(
                "min_frames must be in 1..={}, got {}",
                self.buffer_capacity, self.min_frames
            )));
        }
        if self.smoothing_half_window >= self.buffer_capacity {
            return Err(ConfigError::Validation(format!(
                "smoothing_half_window must be < buffer_capacity ({}), got {}",
                self.buffer_capacity, self.smoothing_half_window
            )));
        }
        if !(self.sample_rate > 0.0) {
            return Err(ConfigError::Validation("sample_rate must be > 0".to_string()));
        }
        if !(self.dc_alpha > 0.0 && self.dc_alpha < 1.0) {
            return Err(ConfigError::Validation("dc_alpha must be in (0, 1)".to_string()));
        }
        if self.peak_reach == 0 {
            return Err(ConfigError::Validation("peak_reach must be > 0".to_string()));
        }
        if self.min_interval == 0 || self.min_interval > self.max_interval {
            return Err(ConfigError::Validation(format!(
                "interval band [{}, {}] is empty",
                self.min_interval, self.max_interval
            )));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm) {
            return Err(ConfigError::Validation("min_bpm must be in (0, max_bpm)".to_string()));
        }
        if self.target_intervals == 0 {
            return Err(ConfigError::Validation("target_intervals must be > 0".to_string()));
        }
        if !(self.max_variation > 0.0) {
            return Err(ConfigError::Validation("max_variation must be > 0".to_string()));
        }
        for (name, c) in [
            ("no_interval_confidence", self.no_interval_confidence),
            ("few_peaks_confidence", self.few_peaks_confidence),
        ] {
            if !(0.0..=1.0).contains(&c) {
                return Err(ConfigError::Validation(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(())
    }

    /// Default timed-session length
    pub fn session_duration(&self) -> Duration {
        Duration::from_millis(self.session_duration_ms)
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var(key) {
        *slot = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::Validation(format!("Invalid {key}: {val}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("inpulse-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = PulseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_capacity, 300);
        assert_eq!(config.min_frames, 100);
        assert_eq!(config.session_duration(), Duration::from_secs(20));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PulseConfig = toml::from_str("buffer_capacity = 450\nmin_frames = 150\n").unwrap();
        assert_eq!(config.buffer_capacity, 450);
        assert_eq!(config.min_frames, 150);
        assert_eq!(config.max_interval, 60);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PulseConfig { min_frames: 400, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config = PulseConfig { dc_alpha: 1.0, ..Default::default() };
        assert!(config.validate().is_err());

        config = PulseConfig { min_interval: 70, ..Default::default() };
        assert!(config.validate().is_err());

        config = PulseConfig { min_bpm: 200.0, ..Default::default() };
        assert!(config.validate().is_err());

        config = PulseConfig { sample_rate: f32::NAN, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_smoothing_window() {
        let huge = PulseConfig { smoothing_half_window: usize::MAX, ..Default::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Validation(_))));

        let at_capacity = PulseConfig { smoothing_half_window: 300, ..Default::default() };
        assert!(at_capacity.validate().is_err());

        let widest = PulseConfig { smoothing_half_window: 299, ..Default::default() };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = temp_path("roundtrip");
        let original = PulseConfig { session_duration_ms: 15_000, ..Default::default() };
        {
            let mut f = fs::File::create(&path).unwrap();
            f.write_all(toml::to_string(&original).unwrap().as_bytes()).unwrap();
        }

        let loaded = PulseConfig::from_file(&path).unwrap();
        assert_eq!(loaded, original);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            PulseConfig::from_file("/nonexistent/inpulse.toml"),
            Err(ConfigError::Io(_))
        ));

        let path = temp_path("garbage");
        fs::write(&path, "buffer_capacity = \"lots\"").unwrap();
        assert!(matches!(PulseConfig::from_file(&path), Err(ConfigError::TomlParse(_))));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_layered_missing_files_fall_back_to_defaults() {
        let config = PulseConfig::load_layered(
            Some(Path::new("/nonexistent/default.toml")),
            Some(Path::new("/nonexistent/user.toml")),
        )
        .unwrap();
        assert_eq!(config.buffer_capacity, PulseConfig::default().buffer_capacity);
    }

    #[test]
    fn test_layered_user_file_replaces_default_file() {
        let default_path = temp_path("layered_default");
        let user_path = temp_path("layered_user");
        fs::write(&default_path, "session_duration_ms = 30000\nmin_frames = 120\n").unwrap();
        fs::write(&user_path, "session_duration_ms = 10000\n").unwrap();

        let config = PulseConfig::load_layered(Some(default_path.as_path()), Some(user_path.as_path())).unwrap();
        assert_eq!(config.session_duration_ms, 10_000);
        // Not merged with the default file
        assert_eq!(config.min_frames, PulseConfig::default().min_frames);

        let config = PulseConfig::load_layered(Some(default_path.as_path()), None).unwrap();
        assert_eq!(config.min_frames, 120);

        fs::remove_file(&default_path).ok();
        fs::remove_file(&user_path).ok();
    }
}
