use crate::common::autocorr_at_lag;
use crate::estimator::peak_picker::PeakPicker;
use crate::estimator::{PeriodEstimate, PeriodEstimator, Thresholds};

/// Time domain autocorrelation, evaluated lag by lag until the peak is found.
///
/// Needs no storage of its own. The cost is `O(window_size * period)`.
pub struct DirectAutocorrelation {
    thresholds: Thresholds,
}

impl DirectAutocorrelation {
    pub fn new(thresholds: Thresholds) -> Self {
        DirectAutocorrelation { thresholds }
    }

    pub fn set_thresholds(&mut self, thresholds: Thresholds) {
        self.thresholds = thresholds;
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}

impl PeriodEstimator for DirectAutocorrelation {
    fn estimate(&mut self, window: &[f32]) -> PeriodEstimate {
        let energy = autocorr_at_lag(window, 0);
        let threshold = energy * self.thresholds.correlation;
        if threshold <= self.thresholds.noise {
            return PeriodEstimate::NoPeriod;
        }

        let mut picker = PeakPicker::new(energy, threshold);
        let mut peak = None;
        for lag in 1..window.len() {
            peak = picker.step(lag, autocorr_at_lag(window, lag));
            if peak.is_some() {
                break;
            }
        }
        let peak = peak.unwrap_or_else(|| picker.fallback());

        PeriodEstimate::Lag {
            period: peak.lag,
            peak: peak.value,
            threshold,
        }
    }
}
