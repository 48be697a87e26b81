use engine::{Control, EdgeTrigger, Scene, SceneError, SceneTransition, Vec2, View};

use super::super::entities::REQUIRED_ARTIFACTS;
use super::super::resources::Model;
use super::fullscreen_picture;

const MENU: [&str; 2] = ["RESUME", "QUIT"];
const MENU_RESUME: usize = 0;
const MENU_TOP_ROW: f32 = 8.0;
const MENU_COLUMN: f32 = 10.0;

/// Pause menu. The game it interrupts stays below it, untouched.
pub(crate) struct PausedScene {
    level: usize,
    room_count: usize,
    artifacts: i32,
    selection: usize,
    start_button: EdgeTrigger,
    up_button: EdgeTrigger,
    down_button: EdgeTrigger,
    confirm_button: EdgeTrigger,
}

impl PausedScene {
    pub(crate) fn new(level: usize, room_count: usize, artifacts: i32) -> Self {
        Self {
            level,
            room_count,
            artifacts,
            selection: MENU_RESUME,
            start_button: EdgeTrigger::held(),
            up_button: EdgeTrigger::held(),
            down_button: EdgeTrigger::held(),
            confirm_button: EdgeTrigger::held(),
        }
    }
}

impl Scene for PausedScene {
    fn name(&self) -> &'static str {
        "paused"
    }

    fn tick(
        &mut self,
        control: &Control,
        _view: &mut dyn View,
    ) -> Result<SceneTransition, SceneError> {
        if self.start_button.pressed(control.start) {
            return Ok(SceneTransition::Pop);
        }

        if self.up_button.pressed(control.up) {
            self.selection = self.selection.saturating_sub(1);
        }
        if self.down_button.pressed(control.down) {
            self.selection = (self.selection + 1).min(MENU.len() - 1);
        }

        if self.confirm_button.pressed(control.fire || control.jump) {
            return Ok(if self.selection == MENU_RESUME {
                SceneTransition::Pop
            } else {
                SceneTransition::Quit
            });
        }

        Ok(SceneTransition::Continue)
    }

    fn draw(&self, view: &mut dyn View) {
        let mut panel = fullscreen_picture(Model::Paused);
        panel.screen_space = true;
        view.send_actor(panel);

        view.draw_text(Vec2::new(MENU_COLUMN, MENU_TOP_ROW - 4.0), "PAUSED");
        view.draw_text(
            Vec2::new(MENU_COLUMN, MENU_TOP_ROW - 2.0),
            &format!("ROOM {}/{}", self.level + 1, self.room_count),
        );
        view.draw_text(
            Vec2::new(MENU_COLUMN, MENU_TOP_ROW - 1.0),
            &format!("ARTIFACTS {}/{}", self.artifacts, REQUIRED_ARTIFACTS),
        );
        for (index, label) in MENU.iter().enumerate() {
            let marker = if index == self.selection { ">" } else { " " };
            view.draw_text(
                Vec2::new(MENU_COLUMN, MENU_TOP_ROW + 1.0 + index as f32),
                &format!("{marker} {label}"),
            );
        }
    }
}
