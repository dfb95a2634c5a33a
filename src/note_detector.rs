use log::{debug, warn};

use crate::common::{WindowBuffer, WINDOW_CAPACITY};
use crate::config::Config;
use crate::error::ConfigurationError;
use crate::estimator::{Estimator, PeriodEstimator};
use crate::event::TimedNoteEvent;
use crate::note_tracker::NoteTracker;

/// * Collects input samples into (possibly overlapping) windows
/// * Estimates the pitch of each newly filled window and maps it to a MIDI note
/// * Emits note on and note off events with sample accurate timestamps
///
/// All storage is allocated by [`new`](NoteDetector::new). [`process`](NoteDetector::process)
/// does not allocate, block, log or panic, and may be called from a real time audio thread.
pub struct NoteDetector {
    config: Config,
    /// The audio sample rate in Hz. Zero until [`prepare`](NoteDetector::prepare) is called.
    sample_rate: f32,
    block_size: usize,
    window: WindowBuffer,
    estimator: Estimator,
    tracker: NoteTracker,
    /// The length of the block passed to the previous `process` call.
    previous_block_len: usize,
}

impl NoteDetector {
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        if let Err(error) = config.validate() {
            warn!("Rejected note detector configuration: {}", error);
            return Err(error);
        }
        debug!("Creating note detector with {:?}", config);

        Ok(NoteDetector {
            config,
            sample_rate: 0.0,
            block_size: 0,
            window: WindowBuffer::new(config.window_size_power2, config.hop_size, WINDOW_CAPACITY)?,
            estimator: Estimator::new(&config, WINDOW_CAPACITY)?,
            tracker: NoteTracker::new(config.sustain_timeout, config.channel, config.velocity),
            previous_block_len: 0,
        })
    }

    /// Resets all processing state for a new stream with the given sample rate and
    /// maximum block size. Must be called before the first call to
    /// [`process`](NoteDetector::process). Nothing is reallocated.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) -> Result<(), ConfigurationError> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            warn!("Rejected sample rate {}", sample_rate);
            return Err(ConfigurationError::InvalidSampleRate { sample_rate });
        }
        if block_size == 0 {
            warn!("Rejected block size 0");
            return Err(ConfigurationError::ZeroBlockSize);
        }
        debug!(
            "Preparing note detector for {} Hz, blocks of {} samples",
            sample_rate, block_size
        );
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.reset();
        Ok(())
    }

    /// Clears the window and the note state without changing the sample rate.
    pub fn reset(&mut self) {
        self.window.reset();
        self.tracker.reset();
        self.previous_block_len = 0;
    }

    /// Applies a new configuration. On error, the detector is left unchanged.
    ///
    /// Changing the window size or hop size restarts window filling. A sustaining
    /// note keeps sustaining.
    pub fn set_config(&mut self, config: Config) -> Result<(), ConfigurationError> {
        if let Err(error) = config.validate() {
            warn!("Rejected note detector configuration: {}", error);
            return Err(error);
        }
        debug!("Reconfiguring note detector with {:?}", config);
        self.window.set_sizes(config.window_size_power2, config.hop_size)?;
        self.estimator.configure(&config)?;
        self.tracker.configure(config.sustain_timeout, config.channel, config.velocity);
        self.config = config;
        Ok(())
    }

    /// Processes a block of mono samples, passing each emitted event to `handler`
    /// in order of non-decreasing timestamp. Timestamps are sample offsets into `samples`.
    ///
    /// Does nothing until [`prepare`](NoteDetector::prepare) has been called.
    pub fn process<F>(&mut self, samples: &[f32], mut handler: F)
    where
        F: FnMut(TimedNoteEvent),
    {
        if !self.is_prepared() {
            return;
        }

        self.tracker.start_block(self.previous_block_len);

        let mut sample_index = 0;
        while sample_index < samples.len() {
            // The index of the most recently consumed sample
            let timestamp = sample_index.saturating_sub(1);

            if let Some(event) = self.tracker.check_timeout(timestamp) {
                handler(event);
            }

            if self.window.is_full() {
                let note = self
                    .estimator
                    .estimate(self.window.window())
                    .midi_note(self.sample_rate);
                if let Some(event) = self.tracker.update(note, timestamp) {
                    handler(event);
                }
                self.window.hop();
                // The window may still be full, check again before consuming a sample
                continue;
            }

            self.window.push(samples[sample_index]);
            sample_index += 1;
        }

        self.previous_block_len = samples.len();
    }

    /// The currently sustaining note, if any.
    pub fn sustained_note(&self) -> Option<u8> {
        self.tracker.sustained_note()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current sample rate in Hz, or 0 if not prepared.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns the block size passed to [`prepare`](NoteDetector::prepare).
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn is_prepared(&self) -> bool {
        self.sample_rate > 0.0
    }
}
