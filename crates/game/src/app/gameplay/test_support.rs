use engine::{Actor, MusicId, Resource, SoundId, Vec2, View};

/// View that records every call for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    pub(crate) title: Option<String>,
    pub(crate) preloaded: Vec<Resource>,
    pub(crate) text_boxes: Vec<String>,
    pub(crate) music: Vec<MusicId>,
    pub(crate) music_stops: usize,
    pub(crate) sounds: Vec<SoundId>,
    pub(crate) camera: Option<Vec2>,
    pub(crate) ambient: Vec<f32>,
    pub(crate) actors: Vec<Actor>,
    pub(crate) texts: Vec<String>,
}

impl View for RecordingView {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn preload(&mut self, resource: Resource) {
        self.preloaded.push(resource);
    }

    fn text_box(&mut self, message: &str) {
        self.text_boxes.push(message.to_string());
    }

    fn play_music(&mut self, track: MusicId) {
        self.music.push(track);
    }

    fn stop_music(&mut self) {
        self.music_stops += 1;
    }

    fn play_sound(&mut self, sound: SoundId) {
        self.sounds.push(sound);
    }

    fn set_camera_pos(&mut self, pos: Vec2) {
        self.camera = Some(pos);
    }

    fn set_ambient_light(&mut self, amount: f32) {
        self.ambient.push(amount);
    }

    fn send_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    fn draw_text(&mut self, _cell: Vec2, text: &str) {
        self.texts.push(text.to_string());
    }
}
