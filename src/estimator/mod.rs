//! Periodicity estimation for a single analysis window.
//!
//! Three interchangeable strategies implement [`PeriodEstimator`]:
//! * [`DirectAutocorrelation`] computes the autocorrelation one lag at a time and stops
//!   at the first peak above the correlation threshold.
//! * [`VectorizedAutocorrelation`] computes the autocorrelation for every lag in one
//!   multiply-add sweep, then picks the peak the same way. For the same window both
//!   autocorrelation strategies give the same period.
//! * [`SpectralMagnitude`] picks the strongest bin of the magnitude spectrum.
//!
//! Each strategy is a pure function of the window and its thresholds. Strategies
//! know nothing about the sample rate; [`PeriodEstimate::frequency`] and
//! [`PeriodEstimate::midi_note`] do the conversion.
//!
//! # Example
//! ```
//! use micronote::estimator::{DirectAutocorrelation, PeriodEstimator, Thresholds};
//!
//! let sample_rate = 48000.0;
//! let window: Vec<f32> = (0..2048)
//!     .map(|i| 0.5 * (2.0 * core::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//!
//! let mut estimator = DirectAutocorrelation::new(Thresholds::default());
//! let estimate = estimator.estimate(&window);
//! assert_eq!(estimate.midi_note(sample_rate), Some(69));
//! ```

mod direct;
mod peak_picker;
mod spectral;
mod vectorized;

use crate::common::nearest_midi_note;
use crate::config::Config;
use crate::error::ConfigurationError;

pub use direct::DirectAutocorrelation;
pub use peak_picker::Peak;
pub use spectral::SpectralMagnitude;
pub use vectorized::VectorizedAutocorrelation;

/// Selects the [`PeriodEstimator`] strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    Direct,
    Vectorized,
    SpectralMagnitude,
}

impl Algorithm {
    /// Maps an integer algorithm selector, as exposed by hosts, to an algorithm:
    /// 0 is [`Direct`](Algorithm::Direct), 1 is [`Vectorized`](Algorithm::Vectorized)
    /// and anything else is [`SpectralMagnitude`](Algorithm::SpectralMagnitude).
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Algorithm::Direct,
            1 => Algorithm::Vectorized,
            _ => Algorithm::SpectralMagnitude,
        }
    }

    /// The inverse of [`from_index`](Algorithm::from_index).
    pub fn index(self) -> u32 {
        match self {
            Algorithm::Direct => 0,
            Algorithm::Vectorized => 1,
            Algorithm::SpectralMagnitude => 2,
        }
    }
}

/// The outcome of analyzing one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeriodEstimate {
    /// No periodicity strong enough to pass the thresholds.
    NoPeriod,
    /// A period found by autocorrelation.
    Lag {
        /// The period in samples.
        period: usize,
        /// The autocorrelation at `period`.
        peak: f32,
        /// The acceptance threshold, `correlation_threshold` times the zero lag autocorrelation.
        threshold: f32,
    },
    /// The strongest bin of a magnitude spectrum.
    Bin {
        /// The bin index. 0 is DC, `transform_size / 2` is Nyquist.
        bin: usize,
        transform_size: usize,
        /// The magnitude of `bin`.
        magnitude: f32,
    },
}

impl PeriodEstimate {
    /// The estimated frequency in Hz, or `None` if there is no periodicity or
    /// the estimate is degenerate (a zero period or the DC bin).
    pub fn frequency(&self, sample_rate: f32) -> Option<f32> {
        let frequency = match *self {
            PeriodEstimate::NoPeriod => return None,
            PeriodEstimate::Lag { period, .. } => {
                if period == 0 {
                    return None;
                }
                sample_rate / (period as f32)
            }
            PeriodEstimate::Bin {
                bin,
                transform_size,
                ..
            } => (bin as f32) / (transform_size as f32) * sample_rate,
        };
        if frequency > 0.0 {
            Some(frequency)
        } else {
            None
        }
    }

    /// The nearest MIDI note to the estimated frequency, or `None` if there is no
    /// valid frequency or it maps outside `0..=127`.
    pub fn midi_note(&self, sample_rate: f32) -> Option<u8> {
        self.frequency(sample_rate).and_then(nearest_midi_note)
    }

    pub fn is_period(&self) -> bool {
        !matches!(self, PeriodEstimate::NoPeriod)
    }
}

/// Acceptance thresholds shared by all strategies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// The fraction of the zero lag autocorrelation an autocorrelation
    /// peak must exceed. Typically in (0, 1].
    pub correlation: f32,
    /// Estimates are rejected unless the autocorrelation threshold (or, for
    /// the spectral strategy, the peak magnitude) is above this value.
    pub noise: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            correlation: 0.6,
            noise: 0.1,
        }
    }
}

/// Maps a window of samples to a [`PeriodEstimate`].
pub trait PeriodEstimator {
    fn estimate(&mut self, window: &[f32]) -> PeriodEstimate;
}

/// Owns the storage of all three strategies and dispatches to the one
/// selected by an [`Algorithm`], so the algorithm can be switched between
/// windows without allocating.
pub struct Estimator {
    algorithm: Algorithm,
    direct: DirectAutocorrelation,
    vectorized: VectorizedAutocorrelation,
    spectral: SpectralMagnitude,
}

impl Estimator {
    /// Creates an estimator for windows of up to `max_window_size` samples.
    pub fn new(config: &Config, max_window_size: usize) -> Result<Self, ConfigurationError> {
        let thresholds = config.thresholds();
        Ok(Estimator {
            algorithm: config.algorithm,
            direct: DirectAutocorrelation::new(thresholds),
            vectorized: VectorizedAutocorrelation::new(thresholds, max_window_size),
            spectral: SpectralMagnitude::new(thresholds.noise, config.transform_size)?,
        })
    }

    /// Applies the algorithm, thresholds and transform size of `config`.
    pub fn configure(&mut self, config: &Config) -> Result<(), ConfigurationError> {
        self.spectral.set_transform_size(config.transform_size)?;
        let thresholds = config.thresholds();
        self.spectral.set_noise_threshold(thresholds.noise);
        self.direct.set_thresholds(thresholds);
        self.vectorized.set_thresholds(thresholds);
        self.algorithm = config.algorithm;
        Ok(())
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl PeriodEstimator for Estimator {
    fn estimate(&mut self, window: &[f32]) -> PeriodEstimate {
        match self.algorithm {
            Algorithm::Direct => self.direct.estimate(window),
            Algorithm::Vectorized => self.vectorized.estimate(window),
            Algorithm::SpectralMagnitude => self.spectral.estimate(window),
        }
    }
}
