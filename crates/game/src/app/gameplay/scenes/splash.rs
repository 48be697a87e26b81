use engine::{Control, Scene, SceneError, SceneTransition, Vec2, View};
use tracing::info;

use super::super::resources::{Model, Sound};
use super::super::util::decrement;
use super::super::GameSetup;
use super::{fullscreen_picture, PlayingScene};

const FADE_TIME: i32 = 200;
const TITLE_MUSIC: i32 = 0;

/// Title screen. Any activation button starts a fade-out into the game.
pub(crate) struct SplashScene {
    setup: GameSetup,
    activated: bool,
    delay: i32,
}

impl SplashScene {
    pub(crate) fn new(setup: GameSetup) -> Self {
        Self {
            setup,
            activated: false,
            delay: FADE_TIME,
        }
    }
}

impl Scene for SplashScene {
    fn name(&self) -> &'static str {
        "splash"
    }

    fn tick(
        &mut self,
        control: &Control,
        view: &mut dyn View,
    ) -> Result<SceneTransition, SceneError> {
        let mut faded_out = false;

        if !self.activated {
            view.play_music(TITLE_MUSIC);
            self.delay = FADE_TIME;

            if control.any_activation() {
                view.stop_music();
                view.play_sound(Sound::Pause.id());
                self.activated = true;
                info!(fade_ticks = FADE_TIME, "splash_activated");
            }
        } else {
            faded_out = decrement(&mut self.delay);
        }

        view.set_camera_pos(Vec2::ZERO);
        view.set_ambient_light(self.delay as f32 / FADE_TIME as f32 - 1.0);

        if faded_out {
            let level = self.setup.start_level;
            return Ok(SceneTransition::Switch(Box::new(PlayingScene::new(
                &self.setup,
                level,
            ))));
        }
        Ok(SceneTransition::Continue)
    }

    fn draw(&self, view: &mut dyn View) {
        view.send_actor(fullscreen_picture(Model::Splash));
    }
}
