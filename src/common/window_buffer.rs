use alloc::{boxed::Box, vec};

use crate::error::ConfigurationError;

/// The largest supported analysis window, in samples.
pub const WINDOW_CAPACITY: usize = 8192;

/// Accumulates a stream of samples into fixed size, possibly
/// overlapping analysis windows.
///
/// Samples are written one at a time with [`push`](WindowBuffer::push). Once
/// [`is_full`](WindowBuffer::is_full) returns true, the caller analyzes
/// [`window`](WindowBuffer::window) and calls [`hop`](WindowBuffer::hop), which
/// keeps the trailing `window_size - hop_size` samples at the front of the
/// buffer so the next window overlaps the previous one.
pub struct WindowBuffer {
    samples: Box<[f32]>,
    window_size: usize,
    hop_size: usize,
    // The index of the next slot to fill.
    write_index: usize,
}

/// Checks `0 < hop_size <= window_size <= capacity`.
pub(crate) fn validate_sizes(
    window_size_power2: u32,
    hop_size: usize,
    capacity: usize,
) -> Result<usize, ConfigurationError> {
    let window_size = match 1_usize.checked_shl(window_size_power2) {
        Some(window_size) if window_size <= capacity => window_size,
        _ => {
            return Err(ConfigurationError::WindowTooLarge {
                window_size_power2,
                capacity,
            })
        }
    };
    if hop_size == 0 {
        return Err(ConfigurationError::ZeroHopSize);
    }
    if hop_size > window_size {
        return Err(ConfigurationError::HopSizeExceedsWindow {
            hop_size,
            window_size,
        });
    }
    Ok(window_size)
}

impl WindowBuffer {
    /// Creates a window buffer able to hold windows of up to `capacity` samples.
    pub fn new(
        window_size_power2: u32,
        hop_size: usize,
        capacity: usize,
    ) -> Result<Self, ConfigurationError> {
        let window_size = validate_sizes(window_size_power2, hop_size, capacity)?;
        Ok(WindowBuffer {
            samples: vec![0.0; capacity].into_boxed_slice(),
            window_size,
            hop_size,
            write_index: 0,
        })
    }

    /// Changes the window and hop sizes without reallocating. If either size
    /// changes, filling starts over from an empty window.
    pub fn set_sizes(
        &mut self,
        window_size_power2: u32,
        hop_size: usize,
    ) -> Result<(), ConfigurationError> {
        let window_size = validate_sizes(window_size_power2, hop_size, self.capacity())?;
        if window_size != self.window_size || hop_size != self.hop_size {
            self.window_size = window_size;
            self.hop_size = hop_size;
            self.reset();
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.write_index = 0;
    }

    /// Returns true if a complete window is waiting to be analyzed.
    pub fn is_full(&self) -> bool {
        self.write_index >= self.window_size
    }

    /// Writes a sample to the next open slot. Must not be called when the window is full.
    pub fn push(&mut self, sample: f32) {
        debug_assert!(!self.is_full());
        self.samples[self.write_index] = sample;
        self.write_index += 1;
    }

    /// The current window. Only meaningful when [`is_full`](WindowBuffer::is_full) is true.
    pub fn window(&self) -> &[f32] {
        &self.samples[..self.window_size]
    }

    /// Advances the window by the hop size, moving the trailing
    /// `window_size - hop_size` samples to the front.
    pub fn hop(&mut self) {
        self.samples.copy_within(self.hop_size..self.window_size, 0);
        self.write_index = self.write_index.saturating_sub(self.hop_size);
    }

    /// The number of samples currently in the window.
    pub fn len(&self) -> usize {
        self.write_index
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(buffer: &mut WindowBuffer, values: core::ops::Range<usize>) {
        for value in values {
            buffer.push(value as f32);
        }
    }

    #[test]
    fn test_hop_keeps_overlap() {
        // 8 sample window, hop 3
        let mut buffer = WindowBuffer::new(3, 3, 16).unwrap();
        fill(&mut buffer, 0..8);
        assert!(buffer.is_full());
        assert_eq!(buffer.window(), &[0., 1., 2., 3., 4., 5., 6., 7.]);

        buffer.hop();
        assert_eq!(buffer.len(), 5);
        assert!(!buffer.is_full());
        assert_eq!(&buffer.window()[..5], &[3., 4., 5., 6., 7.]);

        fill(&mut buffer, 8..11);
        assert!(buffer.is_full());
        assert_eq!(buffer.window(), &[3., 4., 5., 6., 7., 8., 9., 10.]);
    }

    #[test]
    fn test_hop_without_overlap() {
        let mut buffer = WindowBuffer::new(2, 4, 8).unwrap();
        fill(&mut buffer, 0..4);
        assert!(buffer.is_full());
        buffer.hop();
        assert!(buffer.is_empty());
        fill(&mut buffer, 4..8);
        assert_eq!(buffer.window(), &[4., 5., 6., 7.]);
    }

    #[test]
    fn test_window_larger_than_capacity() {
        assert_eq!(
            WindowBuffer::new(14, 1024, WINDOW_CAPACITY).err(),
            Some(ConfigurationError::WindowTooLarge {
                window_size_power2: 14,
                capacity: WINDOW_CAPACITY
            })
        );
        assert!(WindowBuffer::new(64, 1024, WINDOW_CAPACITY).is_err());
        assert!(WindowBuffer::new(13, 1024, WINDOW_CAPACITY).is_ok());
    }

    #[test]
    fn test_invalid_hop_size() {
        assert_eq!(
            WindowBuffer::new(4, 0, 16).err(),
            Some(ConfigurationError::ZeroHopSize)
        );
        assert_eq!(
            WindowBuffer::new(4, 17, 16).err(),
            Some(ConfigurationError::HopSizeExceedsWindow {
                hop_size: 17,
                window_size: 16
            })
        );
    }

    #[test]
    fn test_set_sizes_restarts_filling() {
        let mut buffer = WindowBuffer::new(3, 4, 16).unwrap();
        fill(&mut buffer, 0..5);

        // Same sizes, fill state is kept
        buffer.set_sizes(3, 4).unwrap();
        assert_eq!(buffer.len(), 5);

        buffer.set_sizes(4, 4).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.window_size(), 16);

        // A rejected change leaves the buffer as it was
        assert!(buffer.set_sizes(5, 4).is_err());
        assert_eq!(buffer.window_size(), 16);
    }
}
