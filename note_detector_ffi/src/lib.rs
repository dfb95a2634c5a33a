//! C ABI for embedding a [`NoteDetector`] in a plugin host.
//!
//! Each detector is an opaque handle created with [`note_detector_new`] and
//! released with [`note_detector_free`]. Handles share no state, so a host can
//! run one detector per channel or voice.

use std::ptr;
use std::slice;

use log::warn;
use micronote::{Algorithm, Config, NoteDetector};

/// Mirrors [`micronote::Config`] with C compatible field types.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteDetectorConfig {
    pub window_size_power2: u32,
    pub hop_size: u32,
    pub correlation_threshold: f32,
    pub noise_threshold: f32,
    pub sustain_timeout: u32,
    /// 0: direct autocorrelation, 1: vectorized autocorrelation, other: spectral magnitude
    pub algorithm: u32,
    pub transform_size: u32,
    pub channel: u8,
    pub velocity: u8,
}

impl From<NoteDetectorConfig> for Config {
    fn from(config: NoteDetectorConfig) -> Self {
        Config {
            window_size_power2: config.window_size_power2,
            hop_size: config.hop_size as usize,
            correlation_threshold: config.correlation_threshold,
            noise_threshold: config.noise_threshold,
            sustain_timeout: config.sustain_timeout as usize,
            algorithm: Algorithm::from_index(config.algorithm),
            transform_size: config.transform_size as usize,
            channel: config.channel,
            velocity: config.velocity,
        }
    }
}

impl From<&Config> for NoteDetectorConfig {
    fn from(config: &Config) -> Self {
        NoteDetectorConfig {
            window_size_power2: config.window_size_power2,
            hop_size: saturating_u32(config.hop_size),
            correlation_threshold: config.correlation_threshold,
            noise_threshold: config.noise_threshold,
            sustain_timeout: saturating_u32(config.sustain_timeout),
            algorithm: config.algorithm.index(),
            transform_size: saturating_u32(config.transform_size),
            channel: config.channel,
            velocity: config.velocity,
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// A raw MIDI message at a sample offset into the processed block.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MidiEvent {
    pub timestamp: u32,
    pub data: [u8; 3],
}

#[no_mangle]
pub extern "C" fn note_detector_default_config() -> NoteDetectorConfig {
    NoteDetectorConfig::from(&Config::default())
}

/// Returns a new detector, or null if the config is invalid.
#[no_mangle]
pub extern "C" fn note_detector_new(config: NoteDetectorConfig) -> *mut NoteDetector {
    match NoteDetector::new(config.into()) {
        Ok(detector) => Box::into_raw(Box::new(detector)),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `detector` must be null or a handle returned by [`note_detector_new`]
/// that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn note_detector_free(detector: *mut NoteDetector) {
    if !detector.is_null() {
        drop(Box::from_raw(detector));
    }
}

/// Returns false and leaves the detector unchanged if the config is invalid.
///
/// # Safety
/// `detector` must be null or a live handle, not used concurrently.
#[no_mangle]
pub unsafe extern "C" fn note_detector_set_config(
    detector: *mut NoteDetector,
    config: NoteDetectorConfig,
) -> bool {
    match detector.as_mut() {
        Some(detector) => detector.set_config(config.into()).is_ok(),
        None => false,
    }
}

/// # Safety
/// `detector` must be null or a live handle, not used concurrently.
#[no_mangle]
pub unsafe extern "C" fn note_detector_prepare(
    detector: *mut NoteDetector,
    sample_rate: f64,
    block_size: u32,
) -> bool {
    match detector.as_mut() {
        Some(detector) => detector.prepare(sample_rate as f32, block_size as usize).is_ok(),
        None => {
            warn!("note_detector_prepare called with a null detector");
            false
        }
    }
}

/// Processes `sample_count` mono samples and writes up to `max_events` events
/// to `events`. Returns the number of events written. Events beyond `max_events`
/// are dropped.
///
/// # Safety
/// `detector` must be null or a live handle, not used concurrently. `samples`
/// must point to `sample_count` readable floats and `events` to `max_events`
/// writable events. Either may be null if the corresponding count is zero.
#[no_mangle]
pub unsafe extern "C" fn note_detector_process(
    detector: *mut NoteDetector,
    samples: *const f32,
    sample_count: usize,
    events: *mut MidiEvent,
    max_events: usize,
) -> usize {
    let detector = match detector.as_mut() {
        Some(detector) => detector,
        None => return 0,
    };
    let samples: &[f32] = if samples.is_null() || sample_count == 0 {
        &[]
    } else {
        slice::from_raw_parts(samples, sample_count)
    };
    let events: &mut [MidiEvent] = if events.is_null() || max_events == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(events, max_events)
    };

    let mut event_count = 0;
    detector.process(samples, |timed| {
        if let Some(slot) = events.get_mut(event_count) {
            *slot = MidiEvent {
                timestamp: timed.timestamp as u32,
                data: timed.event.to_midi_bytes(),
            };
            event_count += 1;
        }
    });
    event_count
}

/// Returns the sustaining MIDI note, or -1 if no note is sustaining.
///
/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn note_detector_sustained_note(detector: *const NoteDetector) -> i32 {
    detector
        .as_ref()
        .and_then(|detector| detector.sustained_note())
        .map_or(-1, i32::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine(sample_rate: f32, frequency: f32, sample_count: usize) -> Vec<f32> {
        (0..sample_count)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * frequency * (i as f32) / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_process_tone() {
        let config = note_detector_default_config();
        assert_eq!(Config::from(config), Config::default());

        let detector = note_detector_new(config);
        assert!(!detector.is_null());
        unsafe {
            assert!(note_detector_prepare(detector, 48000.0, 512));
            assert_eq!(note_detector_sustained_note(detector), -1);

            let signal = generate_sine(48000.0, 440.0, 4096);
            let mut events = [MidiEvent::default(); 4];
            let mut received = Vec::new();
            for block in signal.chunks(512) {
                let count = note_detector_process(
                    detector,
                    block.as_ptr(),
                    block.len(),
                    events.as_mut_ptr(),
                    events.len(),
                );
                received.extend_from_slice(&events[..count]);
            }
            assert_eq!(
                received,
                vec![MidiEvent {
                    timestamp: 0,
                    data: [0x90, 69, 100]
                }]
            );
            assert_eq!(note_detector_sustained_note(detector), 69);
            note_detector_free(detector);
        }
    }

    #[test]
    fn test_events_beyond_capacity_are_dropped() {
        // A zero timeout turns every detected note off right after it starts
        let config = NoteDetectorConfig {
            sustain_timeout: 0,
            ..note_detector_default_config()
        };
        let detector = note_detector_new(config);
        let unwritten = MidiEvent {
            timestamp: u32::MAX,
            data: [0xff; 3],
        };
        let mut events = [unwritten; 2];
        unsafe {
            assert!(note_detector_prepare(detector, 48000.0, 8192));
            let signal = generate_sine(48000.0, 440.0, 8192);
            let count = note_detector_process(
                detector,
                signal.as_ptr(),
                signal.len(),
                events.as_mut_ptr(),
                1,
            );
            assert_eq!(count, 1);
            assert_eq!(
                events[0],
                MidiEvent {
                    timestamp: 2047,
                    data: [0x90, 69, 100]
                }
            );
            assert_eq!(events[1], unwritten);
            // The note off that did not fit was still applied
            assert_eq!(note_detector_sustained_note(detector), -1);
            note_detector_free(detector);
        }
    }

    #[test]
    fn test_large_values_saturate() {
        let config = Config {
            sustain_timeout: usize::MAX,
            ..Config::default()
        };
        let ffi_config = NoteDetectorConfig::from(&config);
        assert_eq!(ffi_config.sustain_timeout, u32::MAX);
        assert_eq!(ffi_config.hop_size, 1024);
    }

    #[test]
    fn test_invalid_config() {
        let config = NoteDetectorConfig {
            hop_size: 4096,
            ..note_detector_default_config()
        };
        assert!(note_detector_new(config).is_null());

        let detector = note_detector_new(note_detector_default_config());
        unsafe {
            assert!(!note_detector_set_config(detector, config));
            assert!(!note_detector_prepare(detector, 0.0, 512));
            let spectral = NoteDetectorConfig {
                algorithm: 2,
                ..note_detector_default_config()
            };
            assert!(note_detector_set_config(detector, spectral));
            note_detector_free(detector);
        }
    }

    #[test]
    fn test_null_handle() {
        unsafe {
            assert!(!note_detector_prepare(ptr::null_mut(), 48000.0, 512));
            assert!(!note_detector_set_config(
                ptr::null_mut(),
                note_detector_default_config()
            ));
            assert_eq!(
                note_detector_process(ptr::null_mut(), ptr::null(), 0, ptr::null_mut(), 0),
                0
            );
            assert_eq!(note_detector_sustained_note(ptr::null()), -1);
            note_detector_free(ptr::null_mut());
        }
    }
}
