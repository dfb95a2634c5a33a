/// An autocorrelation maximum assumed to correspond to the pitch period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Peak {
    /// The lag, in samples, of this maximum.
    pub lag: usize,
    /// The autocorrelation value at `lag`.
    pub value: f32,
}

/// Finds the second local maximum of an autocorrelation function, fed one lag at a time.
///
/// The autocorrelation falls away from its zero lag maximum, then rises towards the
/// maximum at the fundamental period. Once a lag is seen where the function is rising
/// and above the threshold, the first lag where it stops rising ends the search and
/// the lag before it is the peak.
pub(crate) struct PeakPicker {
    threshold: f32,
    previous: f32,
    // The value at lag 1, reported if no peak is found.
    first: f32,
    rising: bool,
}

impl PeakPicker {
    /// `autocorr_at_lag_0` is the value of the autocorrelation at lag zero.
    pub(crate) fn new(autocorr_at_lag_0: f32, threshold: f32) -> Self {
        PeakPicker {
            threshold,
            previous: autocorr_at_lag_0,
            first: 0.0,
            rising: false,
        }
    }

    /// Consumes the autocorrelation value at `lag`, which must be one greater
    /// than the lag passed to the previous call, starting at 1.
    /// Returns the peak once it has been passed.
    pub(crate) fn step(&mut self, lag: usize, value: f32) -> Option<Peak> {
        let previous = core::mem::replace(&mut self.previous, value);
        if lag == 1 {
            self.first = value;
        }
        if self.rising && value <= previous {
            return Some(Peak {
                lag: lag - 1,
                value: previous,
            });
        }
        if value > previous && value > self.threshold {
            self.rising = true;
        }
        None
    }

    /// The result when the search ran out of lags without finding a peak.
    /// This is lag 1, which maps to a frequency equal to the sample rate and
    /// is almost always rejected as out of range.
    pub(crate) fn fallback(&self) -> Peak {
        Peak {
            lag: 1,
            value: self.first,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(acf: &[f32], threshold: f32) -> Peak {
        let mut picker = PeakPicker::new(acf[0], threshold);
        for (lag, value) in acf.iter().enumerate().skip(1) {
            if let Some(peak) = picker.step(lag, *value) {
                return peak;
            }
        }
        picker.fallback()
    }

    #[test]
    fn test_second_maximum() {
        let acf = [10.0, 6.0, 1.0, 4.0, 8.0, 9.0, 7.0, 2.0];
        assert_eq!(pick(&acf, 5.0), Peak { lag: 5, value: 9.0 });
    }

    #[test]
    fn test_maxima_below_threshold_are_skipped() {
        let acf = [10.0, 2.0, 4.0, 3.0, 1.0, 6.0, 8.0, 7.0];
        assert_eq!(pick(&acf, 5.0), Peak { lag: 6, value: 8.0 });
    }

    #[test]
    fn test_plateau_ends_the_peak() {
        let acf = [10.0, 2.0, 7.0, 7.0, 1.0];
        assert_eq!(pick(&acf, 5.0), Peak { lag: 2, value: 7.0 });
    }

    #[test]
    fn test_no_peak_falls_back_to_lag_one() {
        // Monotonically decreasing
        let acf = [10.0, 9.0, 8.0, 7.0];
        assert_eq!(pick(&acf, 5.0), Peak { lag: 1, value: 9.0 });

        // Still rising at the last lag
        let acf = [10.0, 1.0, 6.0, 8.0];
        assert_eq!(pick(&acf, 5.0), Peak { lag: 1, value: 1.0 });
    }
}
