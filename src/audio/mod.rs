//! Collision cue playback
//!
//! The simulation only ever asks for "the next cue". What that means is fixed
//! once at startup by the `CueSource`: the bounce clip, or the next note of a
//! MIDI song. A `CueOutput` turns it into sound (Web Audio in the browser, a
//! log line in native headless runs).

pub mod midi;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use midi::{Note, NoteSequence};

use crate::settings::AudioMode;
use crate::sim::CueSink;

/// Something that can make the two kinds of cue audible
pub trait CueOutput {
    /// Play the fixed bounce clip
    fn play_clip(&mut self);
    /// Sound one note
    fn play_note(&mut self, note: Note);
}

/// The cue backend, chosen once at setup
#[derive(Debug, Clone)]
pub enum CueSource {
    EffectClip,
    MidiSequence(NoteSequence),
}

impl CueSource {
    /// Backend for `mode`; `load_notes` is only called for `MidiSequence`
    pub fn for_mode(mode: AudioMode, load_notes: impl FnOnce() -> NoteSequence) -> Self {
        match mode {
            AudioMode::EffectClip => CueSource::EffectClip,
            AudioMode::MidiSequence => CueSource::MidiSequence(load_notes()),
        }
    }
}

/// Plays cues from a fixed source through an output
pub struct CuePlayer<O> {
    source: CueSource,
    output: O,
    played: u64,
}

impl<O: CueOutput> CuePlayer<O> {
    pub fn new(source: CueSource, output: O) -> Self {
        Self {
            source,
            output,
            played: 0,
        }
    }

    /// Cues requested so far (including silent ones from an empty song)
    pub fn played(&self) -> u64 {
        self.played
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: CueOutput> CueSink for CuePlayer<O> {
    fn play_next(&mut self) {
        self.played += 1;
        match &mut self.source {
            CueSource::EffectClip => self.output.play_clip(),
            CueSource::MidiSequence(notes) => {
                if let Some(note) = notes.advance() {
                    self.output.play_note(note);
                }
            }
        }
    }
}

/// Output for headless runs: cues become trace log lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutput;

impl CueOutput for LogOutput {
    fn play_clip(&mut self) {
        log::trace!("cue: bounce clip");
    }

    fn play_note(&mut self, note: Note) {
        log::trace!("cue: note {} vel {}", note.pitch, note.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        clips: u32,
        notes: Vec<u8>,
    }

    impl CueOutput for Recorder {
        fn play_clip(&mut self) {
            self.clips += 1;
        }

        fn play_note(&mut self, note: Note) {
            self.notes.push(note.pitch);
        }
    }

    fn note(pitch: u8) -> Note {
        Note {
            pitch,
            velocity: 100,
        }
    }

    #[test]
    fn test_effect_clip_plays_every_cue() {
        let mut player = CuePlayer::new(CueSource::EffectClip, Recorder::default());
        for _ in 0..3 {
            player.play_next();
        }
        assert_eq!(player.output().clips, 3);
        assert_eq!(player.played(), 3);
    }

    #[test]
    fn test_midi_sequence_walks_and_wraps() {
        let source = CueSource::MidiSequence(NoteSequence::new(vec![note(60), note(62)]));
        let mut player = CuePlayer::new(source, Recorder::default());
        for _ in 0..3 {
            player.play_next();
        }
        assert_eq!(player.output().notes, vec![60, 62, 60]);
        assert_eq!(player.output().clips, 0);
    }

    #[test]
    fn test_empty_song_stays_silent() {
        let source = CueSource::MidiSequence(NoteSequence::default());
        let mut player = CuePlayer::new(source, Recorder::default());
        player.play_next();
        assert!(player.output().notes.is_empty());
        assert_eq!(player.played(), 1);
    }

    #[test]
    fn test_for_mode_only_loads_notes_for_midi() {
        let source = CueSource::for_mode(AudioMode::EffectClip, || panic!("should not load"));
        assert!(matches!(source, CueSource::EffectClip));

        let source = CueSource::for_mode(AudioMode::MidiSequence, || {
            NoteSequence::new(vec![note(70)])
        });
        assert!(matches!(source, CueSource::MidiSequence(ref s) if s.len() == 1));
    }
}
