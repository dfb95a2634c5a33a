use micromath::F32Ext;

/// The highest valid MIDI note number.
pub const MAX_MIDI_NOTE: u8 = 127;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// Converts a frequency in Hz to the nearest MIDI note number.
///
/// Returns `None` for frequencies that are not positive and finite, and
/// for frequencies whose nearest note is outside `0..=127`.
pub fn nearest_midi_note(freq: f32) -> Option<u8> {
    if !(freq > 0.0) || !freq.is_finite() {
        return None;
    }
    let note = F32Ext::round(freq_to_midi_note(freq));
    if (0.0..=MAX_MIDI_NOTE as f32).contains(&note) {
        Some(note as u8)
    } else {
        None
    }
}
