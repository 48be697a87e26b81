use engine::{Control, EdgeTrigger, Scene, SceneError, SceneTransition, View};
use tracing::info;

use super::super::orchestrator::GameWorld;
use super::super::resources::Sound;
use super::super::GameSetup;
use super::{EndingScene, PausedScene};

const SCENE_NAME: &str = "playing";

/// The game proper, backed by a [`GameWorld`].
pub(crate) struct PlayingScene {
    world: GameWorld,
    start_button: EdgeTrigger,
}

impl PlayingScene {
    pub(crate) fn new(setup: &GameSetup, level: usize) -> Self {
        Self {
            world: GameWorld::new(setup.quest.clone(), setup.registry.clone(), level),
            start_button: EdgeTrigger::held(),
        }
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &GameWorld {
        &self.world
    }
}

impl Scene for PlayingScene {
    fn name(&self) -> &'static str {
        SCENE_NAME
    }

    fn tick(
        &mut self,
        control: &Control,
        view: &mut dyn View,
    ) -> Result<SceneTransition, SceneError> {
        if self.start_button.pressed(control.start) {
            view.play_sound(Sound::Pause.id());
            let paused = PausedScene::new(
                self.world.level(),
                self.world.room_count(),
                self.world.artifact_count(),
            );
            return Ok(SceneTransition::Push(Box::new(paused)));
        }

        self.world
            .tick(control, view)
            .map_err(|err| SceneError::new(SCENE_NAME, err))?;

        if self.world.is_finished() {
            return Ok(SceneTransition::Switch(Box::new(EndingScene::new())));
        }
        Ok(SceneTransition::Continue)
    }

    fn draw(&self, view: &mut dyn View) {
        self.world.draw(view);
    }

    fn leave(&mut self, _view: &mut dyn View) {
        info!(
            level = self.world.level(),
            digest = %self.world.state_digest(),
            "game_left"
        );
    }
}
