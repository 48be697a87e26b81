use engine::{Control, Scene, SceneError, SceneTransition, Vec2, View};

use super::super::resources::{Model, Sound};
use super::super::util::decrement;
use super::fullscreen_picture;

const FADE_TIME: i32 = 200;

/// Final picture, faded in from black. There is no way forward from here.
pub(crate) struct EndingScene {
    delay: i32,
    cue_played: bool,
}

impl EndingScene {
    pub(crate) fn new() -> Self {
        Self {
            delay: FADE_TIME,
            cue_played: false,
        }
    }
}

impl Scene for EndingScene {
    fn name(&self) -> &'static str {
        "ending"
    }

    fn tick(
        &mut self,
        _control: &Control,
        view: &mut dyn View,
    ) -> Result<SceneTransition, SceneError> {
        if !self.cue_played {
            view.play_sound(Sound::Victory.id());
            self.cue_played = true;
        }

        decrement(&mut self.delay);
        view.set_camera_pos(Vec2::ZERO);
        view.set_ambient_light(-(self.delay as f32) / FADE_TIME as f32);
        Ok(SceneTransition::Continue)
    }

    fn draw(&self, view: &mut dyn View) {
        view.send_actor(fullscreen_picture(Model::Ending));
    }
}
