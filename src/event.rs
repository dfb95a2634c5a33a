//! Note events emitted by the detector.

/// A MIDI note event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
}

impl NoteEvent {
    pub fn note(&self) -> u8 {
        match *self {
            NoteEvent::NoteOn { note, .. } | NoteEvent::NoteOff { note, .. } => note,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            NoteEvent::NoteOn { channel, .. } | NoteEvent::NoteOff { channel, .. } => channel,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, NoteEvent::NoteOn { .. })
    }

    /// Encodes the event as a three byte MIDI channel voice message.
    pub fn to_midi_bytes(&self) -> [u8; 3] {
        match *self {
            NoteEvent::NoteOn {
                channel,
                note,
                velocity,
            } => [0x90 | (channel & 0x0f), note & 0x7f, velocity & 0x7f],
            NoteEvent::NoteOff { channel, note } => [0x80 | (channel & 0x0f), note & 0x7f, 0],
        }
    }
}

/// A [`NoteEvent`] and the sample offset at which it occurs, relative
/// to the start of the block passed to [`NoteDetector::process`](crate::NoteDetector::process).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedNoteEvent {
    pub timestamp: usize,
    pub event: NoteEvent,
}
