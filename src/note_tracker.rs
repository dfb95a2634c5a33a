use crate::event::{NoteEvent, TimedNoteEvent};

/// The state of a [`NoteTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteState {
    /// No note is sustaining.
    Idle,
    /// `note` is sustaining and was last confirmed at `last_seen_at`, a sample
    /// offset relative to the start of the current block. Negative offsets lie
    /// in earlier blocks.
    Sustaining { note: u8, last_seen_at: i64 },
}

/// Turns a stream of per-window note detections into note on and note off events.
///
/// At most one note sustains at a time. A detection of the sustaining note
/// refreshes it; detections of other notes are ignored while a note sustains.
/// A note is turned off once more than `sustain_timeout` samples have passed
/// since it was last detected.
pub struct NoteTracker {
    state: NoteState,
    sustain_timeout: usize,
    channel: u8,
    velocity: u8,
}

impl NoteTracker {
    pub fn new(sustain_timeout: usize, channel: u8, velocity: u8) -> Self {
        NoteTracker {
            state: NoteState::Idle,
            sustain_timeout,
            channel,
            velocity,
        }
    }

    /// Changes the timeout, channel and velocity. A sustaining note keeps sustaining.
    pub fn configure(&mut self, sustain_timeout: usize, channel: u8, velocity: u8) {
        self.sustain_timeout = sustain_timeout;
        self.channel = channel;
        self.velocity = velocity;
    }

    pub fn reset(&mut self) {
        self.state = NoteState::Idle;
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    /// The sustaining note, if any.
    pub fn sustained_note(&self) -> Option<u8> {
        match self.state {
            NoteState::Idle => None,
            NoteState::Sustaining { note, .. } => Some(note),
        }
    }

    /// Moves the time origin forward by `previous_block_len` samples. Called at the
    /// start of each block so timestamps stay relative to the current block.
    pub fn start_block(&mut self, previous_block_len: usize) {
        if let NoteState::Sustaining { last_seen_at, .. } = &mut self.state {
            *last_seen_at = last_seen_at.saturating_sub(previous_block_len as i64);
        }
    }

    /// Turns off the sustaining note if it has not been confirmed for more than
    /// `sustain_timeout` samples at `timestamp`.
    pub fn check_timeout(&mut self, timestamp: usize) -> Option<TimedNoteEvent> {
        match self.state {
            NoteState::Sustaining { note, last_seen_at }
                if (timestamp as i64).saturating_sub(last_seen_at) > self.sustain_timeout as i64 =>
            {
                self.state = NoteState::Idle;
                Some(TimedNoteEvent {
                    timestamp,
                    event: NoteEvent::NoteOff {
                        channel: self.channel,
                        note,
                    },
                })
            }
            _ => None,
        }
    }

    /// Feeds the note detected at `timestamp`, or `None` if nothing was detected.
    pub fn update(&mut self, detected: Option<u8>, timestamp: usize) -> Option<TimedNoteEvent> {
        let detected = detected?;
        match self.state {
            NoteState::Idle => {
                self.state = NoteState::Sustaining {
                    note: detected,
                    last_seen_at: timestamp as i64,
                };
                Some(TimedNoteEvent {
                    timestamp,
                    event: NoteEvent::NoteOn {
                        channel: self.channel,
                        note: detected,
                        velocity: self.velocity,
                    },
                })
            }
            NoteState::Sustaining { note, .. } if note == detected => {
                self.state = NoteState::Sustaining {
                    note,
                    last_seen_at: timestamp as i64,
                };
                None
            }
            // A different note while one sustains is dropped
            NoteState::Sustaining { .. } => None,
        }
    }
}
