//! MIDI note extraction
//!
//! Flattens a Standard MIDI File into the ordered list of sounding notes. The
//! collision cue then walks that list one note per contact.

use midly::{MidiMessage, Smf, TrackEventKind};

use crate::error::AssetError;

/// A note to sound: MIDI pitch and velocity (both 0-127)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub pitch: u8,
    pub velocity: u8,
}

impl Note {
    /// Equal-temperament frequency in Hz (A4 = pitch 69 = 440 Hz)
    pub fn frequency(&self) -> f32 {
        440.0 * 2f32.powf((self.pitch as f32 - 69.0) / 12.0)
    }

    /// Velocity mapped to 0-1 gain
    pub fn gain(&self) -> f32 {
        self.velocity as f32 / 127.0
    }
}

/// Cyclic cursor over the notes of a song
#[derive(Debug, Clone, Default)]
pub struct NoteSequence {
    notes: Vec<Note>,
    index: usize,
}

impl NoteSequence {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes, index: 0 }
    }

    /// Parse SMF bytes, keeping every note-on with non-zero velocity.
    ///
    /// Tracks are merged by absolute tick; simultaneous events keep track order.
    pub fn from_smf_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let smf = Smf::parse(bytes)?;

        let mut timed: Vec<(u64, Note)> = Vec::new();
        for track in &smf.tracks {
            let mut tick: u64 = 0;
            for event in track {
                tick += u64::from(event.delta.as_int());
                if let TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, vel },
                    ..
                } = event.kind
                {
                    if vel.as_int() > 0 {
                        timed.push((
                            tick,
                            Note {
                                pitch: key.as_int(),
                                velocity: vel.as_int(),
                            },
                        ));
                    }
                }
            }
        }
        // Stable: ties stay in track order
        timed.sort_by_key(|(tick, _)| *tick);

        Ok(Self::new(timed.into_iter().map(|(_, note)| note).collect()))
    }

    /// Read and parse a MIDI file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_smf_bytes(&bytes)
    }

    /// Parse, or fall back to a silent empty sequence with a warning
    pub fn from_smf_bytes_or_silent(bytes: &[u8], name: &str) -> Self {
        match Self::from_smf_bytes(bytes) {
            Ok(seq) => {
                log::info!("Loaded {} notes from {}", seq.len(), name);
                seq
            }
            Err(e) => {
                log::warn!("MIDI {} unusable, notes disabled: {}", name, e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Next note, wrapping to the start after the last one
    pub fn advance(&mut self) -> Option<Note> {
        let note = *self.notes.get(self.index)?;
        self.index = (self.index + 1) % self.notes.len();
        Some(note)
    }
}
