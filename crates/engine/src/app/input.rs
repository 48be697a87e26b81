/// Gameplay control snapshot handed to scenes once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub jump: bool,
    pub dash: bool,
    pub start: bool,
    pub restart: bool,
    pub debug: bool,
}

impl Control {
    /// Any of the buttons that confirm a menu or skip a title.
    pub fn any_activation(&self) -> bool {
        self.fire || self.jump || self.dash || self.start
    }
}

/// Application-level requests that never reach the gameplay scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAction {
    Quit,
    ConfirmYes,
    ConfirmNo,
    ToggleCapture,
    Screenshot,
    ToggleFullscreen,
    TogglePause,
    ToggleDebug,
    ToggleSlowMotion,
    ResetLevel,
}

/// Rising-edge detector for a held button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    was_down: bool,
}

impl EdgeTrigger {
    /// Starts as if the button were already held, so a press carried over
    /// from a previous screen does not fire.
    pub fn held() -> Self {
        Self { was_down: true }
    }

    pub fn pressed(&mut self, is_down: bool) -> bool {
        let edge = is_down && !self.was_down;
        self.was_down = is_down;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_fires_once_per_press() {
        let mut trigger = EdgeTrigger::default();
        assert!(trigger.pressed(true));
        assert!(!trigger.pressed(true));
        assert!(!trigger.pressed(false));
        assert!(trigger.pressed(true));
    }

    #[test]
    fn held_trigger_ignores_carried_over_press() {
        let mut trigger = EdgeTrigger::held();
        assert!(!trigger.pressed(true));
        assert!(!trigger.pressed(false));
        assert!(trigger.pressed(true));
    }

    #[test]
    fn activation_ignores_directions() {
        let control = Control {
            left: true,
            up: true,
            ..Control::default()
        };
        assert!(!control.any_activation());
        let control = Control {
            dash: true,
            ..Control::default()
        };
        assert!(control.any_activation());
    }
}
