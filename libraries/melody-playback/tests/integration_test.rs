//! Integration tests for the playback engine driving a PWM buzzer
//!
//! These tests walk through full playback scenarios and check what the
//! output pin would actually see.

use melody_playback::{
    Buzzer, PlaybackEngine, PlaybackError, PwmOutput, Song, Transport, Volume,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

// ===== Test Helpers =====

#[derive(Debug, Clone, Copy, PartialEq)]
enum PinWrite {
    Frequency(u32),
    Duty(u16),
}

/// PWM pin that records every register write
#[derive(Clone, Default)]
struct RecordingPin {
    writes: Arc<Mutex<Vec<PinWrite>>>,
}

impl RecordingPin {
    fn duty(&self) -> u16 {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|w| match w {
                PinWrite::Duty(d) => Some(*d),
                PinWrite::Frequency(_) => None,
            })
            .unwrap_or(0)
    }

    fn frequencies(&self) -> Vec<u32> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter_map(|w| match w {
                PinWrite::Frequency(f) => Some(*f),
                PinWrite::Duty(_) => None,
            })
            .collect()
    }
}

impl PwmOutput for RecordingPin {
    fn set_frequency(&mut self, hz: u32) {
        self.writes.lock().unwrap().push(PinWrite::Frequency(hz));
    }

    fn set_duty(&mut self, duty: u16) {
        self.writes.lock().unwrap().push(PinWrite::Duty(duty));
    }
}

fn engine_with_pin() -> (PlaybackEngine, RecordingPin) {
    let pin = RecordingPin::default();
    let engine = PlaybackEngine::new(Box::new(Buzzer::new(pin.clone())));
    (engine, pin)
}

fn play_to_end(engine: &mut PlaybackEngine) -> usize {
    let mut played = 0;
    while let Some(held) = engine.begin_note() {
        engine.complete_note(&held);
        played += 1;
    }
    played
}

// ===== Playback Scenarios =====

#[test]
fn full_song_reaches_pin_in_order() {
    let (mut engine, pin) = engine_with_pin();
    engine.load_if_changed(Song::new(vec![262, 294, 330], vec![0.1, 0.1, 0.2]).unwrap());
    engine.play();

    assert_eq!(play_to_end(&mut engine), 3);
    assert_eq!(pin.frequencies(), vec![262, 294, 330]);
    assert_eq!(pin.duty(), 0, "output must be silent after the song");
    assert_eq!(engine.transport(), Transport::Idle);
    assert_eq!(engine.index(), 0);
}

#[test]
fn rests_never_touch_frequency() {
    let (mut engine, pin) = engine_with_pin();
    engine.load_if_changed(Song::new(vec![440, 0, 440], vec![0.1, 0.3, 0.1]).unwrap());
    engine.play();

    let first = engine.begin_note().unwrap();
    engine.complete_note(&first);

    let rest = engine.begin_note().unwrap();
    assert!(rest.note.is_rest());
    assert!((rest.duration().as_secs_f64() - 0.3).abs() < 1e-9);
    assert_eq!(pin.duty(), 0);
    assert_eq!(pin.frequencies(), vec![440]);
}

#[test]
fn volume_applies_from_next_note() {
    let (mut engine, pin) = engine_with_pin();
    engine.load_if_changed(Song::new(vec![440, 494], vec![0.1, 0.1]).unwrap());
    engine.play();

    let held = engine.begin_note().unwrap();
    assert_eq!(pin.duty(), Volume::DEFAULT.duty());

    engine.set_volume(Volume::new(40_000));
    assert_eq!(pin.duty(), Volume::DEFAULT.duty());

    engine.complete_note(&held);
    engine.begin_note().unwrap();
    assert_eq!(pin.duty(), 40_000);
}

#[test]
fn pause_resume_and_repeat_workflow() {
    let (mut engine, pin) = engine_with_pin();
    engine.load_if_changed(Song::new(vec![262, 294, 330, 349], vec![0.1; 4]).unwrap());
    engine.play();

    // Two notes in, pause
    for _ in 0..2 {
        let held = engine.begin_note().unwrap();
        engine.complete_note(&held);
    }
    engine.begin_note().unwrap();
    engine.pause();
    assert_eq!(pin.duty(), 0);
    assert_eq!(engine.index(), 2);

    // Resume picks up at the interrupted note
    engine.play();
    assert_eq!(engine.begin_note().unwrap().index, 2);

    // Repeat rewinds while playing
    engine.repeat();
    engine.play();
    assert_eq!(play_to_end(&mut engine), 4);
    assert_eq!(engine.transport(), Transport::Idle);
}

#[test]
fn song_can_be_replayed_after_finishing() {
    let (mut engine, _) = engine_with_pin();
    engine.load_if_changed(Song::new(vec![440, 494], vec![0.1, 0.1]).unwrap());

    engine.play();
    assert_eq!(play_to_end(&mut engine), 2);

    engine.play();
    assert_eq!(play_to_end(&mut engine), 2);
}

// ===== Song Files =====

#[test]
fn load_song_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"frequencies": [659, 622, 659], "durations": [0.25, 0.25, 0.5]}}"#
    )
    .unwrap();

    let song = Song::from_json_file(file.path()).unwrap();
    assert_eq!(song.frequencies(), &[659, 622, 659]);
    assert_eq!(song.len(), 3);
}

#[test]
fn misaligned_song_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"frequencies": [659, 622], "durations": [0.25]}}"#).unwrap();

    let err = Song::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, PlaybackError::LengthMismatch { .. }));
}

#[test]
fn missing_song_file_is_io_error() {
    let err = Song::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PlaybackError::Io(_)));
}

#[test]
fn garbage_song_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let err = Song::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, PlaybackError::Parse(_)));
}
