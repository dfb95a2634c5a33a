use alloc::{boxed::Box, vec};

use crate::common::autocorr_sweep;
use crate::estimator::peak_picker::PeakPicker;
use crate::estimator::{PeriodEstimate, PeriodEstimator, Thresholds};

/// Time domain autocorrelation for all lags at once, computed with one
/// multiply-add sweep per sample, followed by the same peak picking as
/// [`DirectAutocorrelation`](super::DirectAutocorrelation).
///
/// The inner loop is a plain slice multiply-add, which the compiler vectorizes.
pub struct VectorizedAutocorrelation {
    thresholds: Thresholds,
    sums: Box<[f32]>,
}

impl VectorizedAutocorrelation {
    /// Creates an estimator for windows of up to `max_window_size` samples.
    pub fn new(thresholds: Thresholds, max_window_size: usize) -> Self {
        VectorizedAutocorrelation {
            thresholds,
            sums: vec![0.0; max_window_size].into_boxed_slice(),
        }
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    /// The autocorrelation computed for the most recent window.
    pub fn sums(&self) -> &[f32] {
        &self.sums
    }
}

impl PeriodEstimator for VectorizedAutocorrelation {
    fn estimate(&mut self, window: &[f32]) -> PeriodEstimate {
        let window_size = window.len();
        if window_size == 0 || window_size > self.sums.len() {
            return PeriodEstimate::NoPeriod;
        }

        let sums = &mut self.sums[..window_size];
        autocorr_sweep(window, sums);

        let threshold = self.thresholds.correlation * sums[0];
        if threshold <= self.thresholds.noise {
            return PeriodEstimate::NoPeriod;
        }

        let mut picker = PeakPicker::new(sums[0], threshold);
        let peak = sums
            .iter()
            .enumerate()
            .skip(1)
            .find_map(|(lag, value)| picker.step(lag, *value))
            .unwrap_or_else(|| picker.fallback());

        PeriodEstimate::Lag {
            period: peak.lag,
            peak: peak.value,
            threshold,
        }
    }
}
