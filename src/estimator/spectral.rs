use alloc::{boxed::Box, vec};
use micromath::F32Ext;

use crate::common::{is_supported_fft_size, real_fft};
use crate::error::ConfigurationError;
use crate::estimator::{PeriodEstimate, PeriodEstimator};

/// The largest supported spectral transform size.
pub const MAX_TRANSFORM_SIZE: usize = 4096;

/// Picks the bin with the largest magnitude in the spectrum of the window.
///
/// The transform size is independent of the window size. Shorter windows are
/// zero padded and longer windows are truncated to the first `transform_size`
/// samples. No window function is applied. The frequency resolution is
/// `sample_rate / transform_size`, about 23 Hz for 2048 bins at 48 kHz, so
/// low notes are only approximately resolved.
pub struct SpectralMagnitude {
    noise_threshold: f32,
    transform_size: usize,
    buffer: Box<[f32]>,
}

impl SpectralMagnitude {
    pub fn new(noise_threshold: f32, transform_size: usize) -> Result<Self, ConfigurationError> {
        let mut estimator = SpectralMagnitude {
            noise_threshold,
            transform_size: MAX_TRANSFORM_SIZE,
            buffer: vec![0.0; MAX_TRANSFORM_SIZE].into_boxed_slice(),
        };
        estimator.set_transform_size(transform_size)?;
        Ok(estimator)
    }

    pub fn set_transform_size(&mut self, transform_size: usize) -> Result<(), ConfigurationError> {
        if !is_supported_fft_size(transform_size) || transform_size > self.buffer.len() {
            return Err(ConfigurationError::UnsupportedTransformSize { transform_size });
        }
        self.transform_size = transform_size;
        Ok(())
    }

    pub fn set_noise_threshold(&mut self, noise_threshold: f32) {
        self.noise_threshold = noise_threshold;
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }
}

impl PeriodEstimator for SpectralMagnitude {
    fn estimate(&mut self, window: &[f32]) -> PeriodEstimate {
        let transform_size = self.transform_size;
        let buffer = &mut self.buffer[..transform_size];
        let copy_count = window.len().min(transform_size);
        buffer[..copy_count].copy_from_slice(&window[..copy_count]);
        for value in buffer.iter_mut().skip(copy_count) {
            *value = 0.0;
        }

        let spectrum = match real_fft(buffer) {
            Some(spectrum) => spectrum,
            None => return PeriodEstimate::NoPeriod,
        };

        // DC and Nyquist are packed into bin 0. Bins are compared by squared
        // magnitude, ties keep the lower bin.
        let mut bin = 0;
        let mut magnitude_sqr = spectrum[0].re * spectrum[0].re;
        for (index, value) in spectrum.iter().enumerate().skip(1) {
            let value_magnitude_sqr = value.norm_sqr();
            if value_magnitude_sqr > magnitude_sqr {
                bin = index;
                magnitude_sqr = value_magnitude_sqr;
            }
        }
        let nyquist_magnitude_sqr = spectrum[0].im * spectrum[0].im;
        if nyquist_magnitude_sqr > magnitude_sqr {
            bin = transform_size / 2;
            magnitude_sqr = nyquist_magnitude_sqr;
        }
        let magnitude = refined_sqrt(magnitude_sqr);

        if magnitude <= self.noise_threshold {
            return PeriodEstimate::NoPeriod;
        }
        PeriodEstimate::Bin {
            bin,
            transform_size,
            magnitude,
        }
    }
}

/// `micromath`'s square root estimate refined with Newton steps to full
/// `f32` precision. Exact for zero.
fn refined_sqrt(value: f32) -> f32 {
    if !(value > 0.0) {
        return 0.0;
    }
    if value.is_infinite() {
        return value;
    }
    let mut root = F32Ext::sqrt(value);
    for _ in 0..3 {
        root = 0.5 * (root + value / root);
    }
    root
}
