//! Configuration errors.

use core::fmt;

/// An error returned when a [`Config`](crate::Config) or the arguments to
/// [`NoteDetector::prepare`](crate::NoteDetector::prepare) are invalid.
///
/// Configuration is validated eagerly, before any audio is processed, so
/// none of these can occur inside [`NoteDetector::process`](crate::NoteDetector::process).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// `2^window_size_power2` exceeds the window buffer capacity.
    WindowTooLarge {
        window_size_power2: u32,
        capacity: usize,
    },
    /// The hop size must be greater than zero.
    ZeroHopSize,
    /// The hop size must not exceed the window size.
    HopSizeExceedsWindow { hop_size: usize, window_size: usize },
    /// A threshold was NaN or infinite.
    NonFiniteThreshold { name: &'static str, value: f32 },
    /// The spectral transform size is not one of the supported FFT sizes.
    UnsupportedTransformSize { transform_size: usize },
    /// MIDI channels are numbered 0 to 15.
    InvalidChannel { channel: u8 },
    /// Note on velocity must be in 1..=127. A velocity of 0 means note off.
    InvalidVelocity { velocity: u8 },
    /// The sample rate must be positive and finite.
    InvalidSampleRate { sample_rate: f32 },
    /// The block size must be greater than zero.
    ZeroBlockSize,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::WindowTooLarge {
                window_size_power2,
                capacity,
            } => write!(
                f,
                "window size 2^{} exceeds the buffer capacity of {} samples",
                window_size_power2, capacity
            ),
            ConfigurationError::ZeroHopSize => write!(f, "hop size must be greater than 0"),
            ConfigurationError::HopSizeExceedsWindow {
                hop_size,
                window_size,
            } => write!(
                f,
                "hop size {} must not be greater than the window size {}",
                hop_size, window_size
            ),
            ConfigurationError::NonFiniteThreshold { name, value } => {
                write!(f, "{} must be finite, got {}", name, value)
            }
            ConfigurationError::UnsupportedTransformSize { transform_size } => write!(
                f,
                "unsupported spectral transform size {}, expected a power of two in 8..=4096",
                transform_size
            ),
            ConfigurationError::InvalidChannel { channel } => {
                write!(f, "MIDI channel {} is out of range 0..=15", channel)
            }
            ConfigurationError::InvalidVelocity { velocity } => {
                write!(f, "note on velocity {} is out of range 1..=127", velocity)
            }
            ConfigurationError::InvalidSampleRate { sample_rate } => {
                write!(f, "sample rate must be positive, got {}", sample_rate)
            }
            ConfigurationError::ZeroBlockSize => write!(f, "block size must be greater than 0"),
        }
    }
}

impl core::error::Error for ConfigurationError {}
