use core::convert::TryInto;

use microfft::real::{
    rfft_1024, rfft_128, rfft_16, rfft_2048, rfft_256, rfft_32, rfft_4096, rfft_512, rfft_64,
    rfft_8,
};
use microfft::Complex32;

/// Returns true if [`real_fft`] supports buffers of length `fft_size`.
pub fn is_supported_fft_size(fft_size: usize) -> bool {
    matches!(
        fft_size,
        8 | 16 | 32 | 64 | 128 | 256 | 512 | 1024 | 2048 | 4096
    )
}

/// Computes the FFT of a real valued buffer in place.
///
/// Returns `fft_size / 2` complex bins, where the real part of the
/// Nyquist bin is packed into the imaginary part of bin 0,
/// or `None` if the buffer length is not a supported FFT size.
pub fn real_fft(buffer: &mut [f32]) -> Option<&mut [Complex32]> {
    let spectrum: &mut [Complex32] = match buffer.len() {
        8 => rfft_8(buffer.try_into().ok()?),
        16 => rfft_16(buffer.try_into().ok()?),
        32 => rfft_32(buffer.try_into().ok()?),
        64 => rfft_64(buffer.try_into().ok()?),
        128 => rfft_128(buffer.try_into().ok()?),
        256 => rfft_256(buffer.try_into().ok()?),
        512 => rfft_512(buffer.try_into().ok()?),
        1024 => rfft_1024(buffer.try_into().ok()?),
        2048 => rfft_2048(buffer.try_into().ok()?),
        4096 => rfft_4096(buffer.try_into().ok()?),
        _ => return None,
    };
    Some(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_size() {
        let mut buffer = [0.0_f32; 100];
        assert!(real_fft(&mut buffer).is_none());
        assert!(!is_supported_fft_size(100));
        assert!(!is_supported_fft_size(8192));
    }

    #[test]
    fn test_dc_and_nyquist_packing() {
        // 1, -1, 1, -1, ... has all its energy in the Nyquist bin
        let mut buffer = [0.0_f32; 16];
        for (i, value) in buffer.iter_mut().enumerate() {
            *value = if i % 2 == 0 { 1.0 } else { -1.0 };
        }
        let spectrum = real_fft(&mut buffer).unwrap();
        assert_eq!(spectrum.len(), 8);
        assert!(spectrum[0].re.abs() < 1e-5);
        assert!((spectrum[0].im - 16.0).abs() < 1e-4);
        for bin in spectrum.iter().skip(1) {
            assert!(bin.norm_sqr() < 1e-6);
        }
    }
}
