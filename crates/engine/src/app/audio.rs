use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{MusicId, SoundId};

pub type VoiceId = i32;

/// Sound slot reserved for the streamed music track.
pub const MUSIC_SOUND_SLOT: SoundId = 1024;

pub trait Audio {
    fn load_sound(&mut self, sound: SoundId, path: &Path);
    fn create_voice(&mut self) -> VoiceId;
    fn play_voice(&mut self, voice: VoiceId, sound: SoundId, looped: bool);
    fn stop_voice(&mut self, voice: VoiceId);
    /// With `when_finished`, the voice is reclaimed once playback ends.
    fn release_voice(&mut self, voice: VoiceId, when_finished: bool);
}

/// Tracks the current music track so that requesting the same track again
/// keeps it playing instead of restarting it.
#[derive(Debug)]
pub struct MusicDeck {
    music_dir: PathBuf,
    current_track: Option<MusicId>,
    voice: Option<VoiceId>,
}

impl MusicDeck {
    pub fn new(music_dir: PathBuf) -> Self {
        Self {
            music_dir,
            current_track: None,
            voice: None,
        }
    }

    pub fn current_track(&self) -> Option<MusicId> {
        self.current_track
    }

    pub fn track_path(&self, track: MusicId) -> PathBuf {
        self.music_dir.join(format!("music-{track:02}.ogg"))
    }

    pub fn play_music(&mut self, audio: &mut dyn Audio, track: MusicId) {
        if self.current_track == Some(track) {
            return;
        }
        self.stop_music(audio);

        let path = self.track_path(track);
        audio.load_sound(MUSIC_SOUND_SLOT, &path);
        let voice = audio.create_voice();
        audio.play_voice(voice, MUSIC_SOUND_SLOT, true);
        self.voice = Some(voice);
        self.current_track = Some(track);
        debug!(track, path = %path.display(), "music_started");
    }

    pub fn stop_music(&mut self, audio: &mut dyn Audio) {
        if let Some(voice) = self.voice.take() {
            audio.stop_voice(voice);
            audio.release_voice(voice, false);
            debug!(track = ?self.current_track, "music_stopped");
        }
        self.current_track = None;
    }

    /// One-shot voice that releases itself when done.
    pub fn play_sound(&mut self, audio: &mut dyn Audio, sound: SoundId) {
        let voice = audio.create_voice();
        audio.play_voice(voice, sound, false);
        audio.release_voice(voice, true);
    }
}

/// Backend that accepts every request and produces no output.
#[derive(Debug, Default)]
pub struct SilentAudio {
    next_voice: VoiceId,
    loaded: BTreeMap<SoundId, PathBuf>,
    looping: BTreeMap<VoiceId, SoundId>,
}

impl SilentAudio {
    pub fn loaded_sounds(&self) -> usize {
        self.loaded.len()
    }

    pub fn looping_voices(&self) -> usize {
        self.looping.len()
    }
}

impl Audio for SilentAudio {
    fn load_sound(&mut self, sound: SoundId, path: &Path) {
        trace!(sound, path = %path.display(), "sound_loaded");
        self.loaded.insert(sound, path.to_path_buf());
    }

    fn create_voice(&mut self) -> VoiceId {
        self.next_voice += 1;
        self.next_voice
    }

    fn play_voice(&mut self, voice: VoiceId, sound: SoundId, looped: bool) {
        trace!(voice, sound, looped, "voice_play");
        if looped {
            self.looping.insert(voice, sound);
        }
    }

    fn stop_voice(&mut self, voice: VoiceId) {
        self.looping.remove(&voice);
    }

    fn release_voice(&mut self, voice: VoiceId, _when_finished: bool) {
        self.looping.remove(&voice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingAudio {
        next_voice: VoiceId,
        calls: Vec<String>,
    }

    impl Audio for RecordingAudio {
        fn load_sound(&mut self, sound: SoundId, path: &Path) {
            self.calls.push(format!("load {sound} {}", path.display()));
        }

        fn create_voice(&mut self) -> VoiceId {
            self.next_voice += 1;
            self.calls.push(format!("create {}", self.next_voice));
            self.next_voice
        }

        fn play_voice(&mut self, voice: VoiceId, sound: SoundId, looped: bool) {
            self.calls.push(format!("play {voice} {sound} {looped}"));
        }

        fn stop_voice(&mut self, voice: VoiceId) {
            self.calls.push(format!("stop {voice}"));
        }

        fn release_voice(&mut self, voice: VoiceId, when_finished: bool) {
            self.calls.push(format!("release {voice} {when_finished}"));
        }
    }

    #[test]
    fn same_track_does_not_restart() {
        let mut audio = RecordingAudio::default();
        let mut deck = MusicDeck::new(PathBuf::from("music"));

        deck.play_music(&mut audio, 3);
        let after_first = audio.calls.len();
        deck.play_music(&mut audio, 3);

        assert_eq!(audio.calls.len(), after_first);
        assert_eq!(deck.current_track(), Some(3));
    }

    #[test]
    fn switching_track_stops_previous_voice() {
        let mut audio = RecordingAudio::default();
        let mut deck = MusicDeck::new(PathBuf::from("music"));

        deck.play_music(&mut audio, 1);
        deck.play_music(&mut audio, 2);

        assert_eq!(
            audio.calls,
            vec![
                format!("load 1024 {}", PathBuf::from("music/music-01.ogg").display()),
                "create 1".to_string(),
                "play 1 1024 true".to_string(),
                "stop 1".to_string(),
                "release 1 false".to_string(),
                format!("load 1024 {}", PathBuf::from("music/music-02.ogg").display()),
                "create 2".to_string(),
                "play 2 1024 true".to_string(),
            ]
        );
    }

    #[test]
    fn stop_then_same_track_plays_again() {
        let mut audio = RecordingAudio::default();
        let mut deck = MusicDeck::new(PathBuf::from("music"));

        deck.play_music(&mut audio, 0);
        deck.stop_music(&mut audio);
        assert_eq!(deck.current_track(), None);
        deck.play_music(&mut audio, 0);
        assert_eq!(deck.current_track(), Some(0));
        assert_eq!(audio.calls.last().map(String::as_str), Some("play 2 1024 true"));
    }

    #[test]
    fn one_shot_sound_releases_when_finished() {
        let mut audio = RecordingAudio::default();
        let mut deck = MusicDeck::new(PathBuf::from("music"));
        deck.play_sound(&mut audio, 7);
        assert_eq!(
            audio.calls,
            vec!["create 1", "play 1 7 false", "release 1 true"]
        );
    }

    #[test]
    fn silent_audio_forgets_released_loops() {
        let mut audio = SilentAudio::default();
        let mut deck = MusicDeck::new(PathBuf::from("music"));
        deck.play_music(&mut audio, 5);
        assert_eq!(audio.looping_voices(), 1);
        assert_eq!(audio.loaded_sounds(), 1);
        deck.stop_music(&mut audio);
        assert_eq!(audio.looping_voices(), 0);
    }
}
