/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a window at a single lag using time domain summation.
pub fn autocorr_at_lag(window: &[f32], lag: usize) -> f32 {
    let mut sum: f32 = 0.0;
    if lag >= window.len() {
        return sum;
    }
    for (x, x_lagged) in window.iter().zip(&window[lag..]) {
        sum += x * x_lagged;
    }
    sum
}

/// Computes the autocorrelation of a window for all lags `0..result.len()`
/// by sweeping over the window once per sample instead of once per lag.
///
/// For each sample `window[k]`, the products `window[k] * window[k + i]` are
/// accumulated into `result[i]` in a single multiply-add pass over the
/// tail of the window. The terms of each lag are summed in the same order as
/// [`autocorr_at_lag`], so both give identical results.
///
/// # Arguments
///
/// * `window` - Input window
/// * `result` - Receives the autocorrelation. Must not be longer than the window.
pub fn autocorr_sweep(window: &[f32], result: &mut [f32]) {
    let lag_count = result.len();
    debug_assert!(lag_count <= window.len());

    for value in result.iter_mut() {
        *value = 0.0;
    }

    for (k, scale) in window.iter().enumerate() {
        // Lags that still overlap the window from sample k onwards
        let count = (window.len() - k).min(lag_count);
        add_with_multiply(&mut result[..count], &window[k..k + count], *scale);
    }
}

/// `dest[i] += src[i] * scale`
#[inline]
fn add_with_multiply(dest: &mut [f32], src: &[f32], scale: f32) {
    for (d, s) in dest.iter_mut().zip(src) {
        *d += s * scale;
    }
}
