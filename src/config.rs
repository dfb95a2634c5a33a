//! Configuration parameters for note detection.

use crate::common::{is_supported_fft_size, validate_sizes, WINDOW_CAPACITY};
use crate::error::ConfigurationError;
use crate::estimator::{Algorithm, Thresholds};

/// Note detection configuration.
///
/// Can be changed between calls to [`NoteDetector::process`](crate::NoteDetector::process)
/// using [`NoteDetector::set_config`](crate::NoteDetector::set_config).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// The analysis window holds `2^window_size_power2` samples (default: 11, i.e 2048).
    pub window_size_power2: u32,
    /// The number of samples the window advances between analyses (default: 1024).
    /// Must be in `1..=window_size`.
    pub hop_size: usize,
    /// An autocorrelation peak must exceed this fraction of the zero lag
    /// autocorrelation (default: 0.6).
    pub correlation_threshold: f32,
    /// Minimum accepted autocorrelation threshold or spectral peak magnitude (default: 0.1).
    pub noise_threshold: f32,
    /// A note is turned off when it has not been detected for more than
    /// this many samples (default: 3000).
    pub sustain_timeout: usize,
    /// The period estimation strategy (default: Direct).
    pub algorithm: Algorithm,
    /// The FFT size used by [`Algorithm::SpectralMagnitude`] (default: 2048).
    /// Independent of the window size.
    pub transform_size: usize,
    /// The MIDI channel of emitted events, 0 to 15 (default: 0).
    pub channel: u8,
    /// The velocity of note on events, 1 to 127 (default: 100).
    pub velocity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size_power2: 11,
            hop_size: 1024,
            correlation_threshold: 0.6,
            noise_threshold: 0.1,
            sustain_timeout: 3000,
            algorithm: Algorithm::Direct,
            transform_size: 2048,
            channel: 0,
            velocity: 100,
        }
    }
}

impl Config {
    /// The analysis window size in samples. Only meaningful for a valid config.
    pub fn window_size(&self) -> usize {
        1_usize
            .checked_shl(self.window_size_power2)
            .unwrap_or(usize::MAX)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            correlation: self.correlation_threshold,
            noise: self.noise_threshold,
        }
    }

    /// Checks that the window fits in [`WINDOW_CAPACITY`] samples and all other
    /// values are in range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_sizes(self.window_size_power2, self.hop_size, WINDOW_CAPACITY)?;
        if !self.correlation_threshold.is_finite() {
            return Err(ConfigurationError::NonFiniteThreshold {
                name: "correlation_threshold",
                value: self.correlation_threshold,
            });
        }
        if !self.noise_threshold.is_finite() {
            return Err(ConfigurationError::NonFiniteThreshold {
                name: "noise_threshold",
                value: self.noise_threshold,
            });
        }
        if !is_supported_fft_size(self.transform_size) {
            return Err(ConfigurationError::UnsupportedTransformSize {
                transform_size: self.transform_size,
            });
        }
        if self.channel > 15 {
            return Err(ConfigurationError::InvalidChannel {
                channel: self.channel,
            });
        }
        if self.velocity == 0 || self.velocity > 127 {
            return Err(ConfigurationError::InvalidVelocity {
                velocity: self.velocity,
            });
        }
        Ok(())
    }
}
