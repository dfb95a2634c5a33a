//! Common algorithms and utilities.

mod autocorr;
mod fft;
mod midi;
mod window_buffer;

pub use autocorr::{autocorr_at_lag, autocorr_sweep};
pub use fft::{is_supported_fft_size, real_fft};
pub use midi::{freq_to_midi_note, nearest_midi_note, MAX_MIDI_NOTE};
pub(crate) use window_buffer::validate_sizes;
pub use window_buffer::{WindowBuffer, WINDOW_CAPACITY};
