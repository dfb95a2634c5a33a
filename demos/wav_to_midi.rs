//! Detects notes in a WAV file and prints the resulting MIDI events.
//!
//! Usage: `cargo run --example wav_to_midi --features serde -- <input.wav> [config.json]`
//!
//! The optional config file is a JSON object with any of the fields of
//! `micronote::Config`, for example `{ "algorithm": "SpectralMagnitude", "hop_size": 512 }`.
//! Set `RUST_LOG=debug` to see detector configuration messages.

use std::env;
use std::fs;

use log::{error, info};
use micronote::{Config, NoteDetector, NoteEvent};

const BLOCK_SIZE: usize = 512;

fn note_number_to_string(note_number: u8) -> String {
    let note_names = [
        "C", "C#/D♭", "D", "D#/E♭", "E", "F", "F#/G♭", "G", "G#/A♭", "A", "A#/B♭", "B",
    ];
    let octave = (note_number / 12) as i32 - 1;
    format!("{}{}", note_names[(note_number % 12) as usize], octave)
}

/// Reads a WAV file and downmixes it to mono.
fn read_wav_mono(path: &str) -> Result<(u32, Vec<f32>), hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1. / ((1_i64 << (spec.bits_per_sample - 1)) as f32);
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };
    let channel_count = spec.channels.max(1) as usize;
    let mono = samples
        .chunks(channel_count)
        .map(|frame| frame.iter().sum::<f32>() / (channel_count as f32))
        .collect();
    Ok((spec.sample_rate, mono))
}

fn load_config(path: Option<&String>) -> Result<Config, String> {
    match path {
        None => Ok(Config::default()),
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            serde_json::from_str(&json).map_err(|e| format!("{}: {}", path, e))
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input.wav> [config.json]", args[0]);
        std::process::exit(1);
    }

    let config = match load_config(args.get(2)) {
        Ok(config) => config,
        Err(message) => {
            error!("Failed to load config {}", message);
            std::process::exit(1);
        }
    };
    let (sample_rate, samples) = match read_wav_mono(&args[1]) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };
    info!(
        "Read {} samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        args[1]
    );

    let mut detector = match NoteDetector::new(config) {
        Ok(detector) => detector,
        Err(e) => {
            error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = detector.prepare(sample_rate as f32, BLOCK_SIZE) {
        error!("Failed to prepare detector: {}", e);
        std::process::exit(1);
    }

    for (block_index, block) in samples.chunks(BLOCK_SIZE).enumerate() {
        detector.process(block, |timed| {
            let sample_index = block_index * BLOCK_SIZE + timed.timestamp;
            let time_s = sample_index as f32 / sample_rate as f32;
            let bytes = timed.event.to_midi_bytes();
            match timed.event {
                NoteEvent::NoteOn { note, velocity, .. } => println!(
                    "{:>9.3} s | note on  {:<8} | velocity {:3} | {:02x} {:02x} {:02x}",
                    time_s,
                    note_number_to_string(note),
                    velocity,
                    bytes[0],
                    bytes[1],
                    bytes[2]
                ),
                NoteEvent::NoteOff { note, .. } => println!(
                    "{:>9.3} s | note off {:<8} |              | {:02x} {:02x} {:02x}",
                    time_s,
                    note_number_to_string(note),
                    bytes[0],
                    bytes[1],
                    bytes[2]
                ),
            }
        });
    }

    if let Some(note) = detector.sustained_note() {
        info!(
            "{} still sustaining at end of input",
            note_number_to_string(note)
        );
    }
}
