//! Streaming monophonic pitch to MIDI note detection.
//!
//! Mono audio is collected into overlapping analysis windows. The periodicity of each
//! window is estimated using one of three [algorithms](Algorithm), the estimated
//! frequency is mapped to the nearest MIDI note, and a note state machine turns the
//! detections into note on and note off events with sample accurate timestamps.
//!
//! Features
//! * Time domain autocorrelation, evaluated lag by lag or in a single vectorizable sweep
//! * Spectral peak picking using real-only FFT
//! * At most one sustained note, turned off after a configurable timeout
//! * No allocations after initialization, suitable for real time audio use
//! * `no_std` compatible
//!
//! # Example
//! ```
//! use micronote::{Config, NoteDetector, NoteEvent};
//!
//! // Create an input buffer containing a pure tone at 440 Hz.
//! let sample_rate = 48000.0;
//! let signal: Vec<f32> = (0..8192)
//!     .map(|i| 0.5 * (2.0 * core::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//!
//! // Create a detector with a 2048 sample window analyzed every 1024 samples.
//! let mut detector = NoteDetector::new(Config::default()).expect("the default config should be valid");
//! let block_size = 512;
//! detector.prepare(sample_rate, block_size).unwrap();
//!
//! // Feed the signal block by block, as an audio callback would.
//! let mut notes = Vec::new();
//! for block in signal.chunks(block_size) {
//!     detector.process(block, |timed| {
//!         if let NoteEvent::NoteOn { note, .. } = timed.event {
//!             notes.push(note);
//!         }
//!     });
//! }
//! // A4 is MIDI note 69
//! assert_eq!(notes, vec![69]);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod common;
mod config;
mod error;
pub mod estimator;
mod event;
mod note_detector;
mod note_tracker;

pub use config::Config;
pub use error::ConfigurationError;
pub use estimator::{Algorithm, PeriodEstimate, PeriodEstimator};
pub use event::{NoteEvent, TimedNoteEvent};
pub use note_detector::NoteDetector;
pub use note_tracker::{NoteState, NoteTracker};
