use std::error::Error as StdError;

use thiserror::Error;
use tracing::info;

use super::{Control, View};

pub type SceneFactory = Box<dyn FnMut(&mut dyn View) -> Box<dyn Scene>>;

/// What the driver should do after a scene tick.
pub enum SceneTransition {
    Continue,
    /// Replace the active scene; the old one is left and dropped.
    Switch(Box<dyn Scene>),
    /// Suspend the active scene under a new one.
    Push(Box<dyn Scene>),
    /// Drop the active scene and resume the one below it.
    Pop,
    Quit,
}

impl std::fmt::Debug for SceneTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneTransition::Continue => f.write_str("Continue"),
            SceneTransition::Switch(next) => write!(f, "Switch({})", next.name()),
            SceneTransition::Push(next) => write!(f, "Push({})", next.name()),
            SceneTransition::Pop => f.write_str("Pop"),
            SceneTransition::Quit => f.write_str("Quit"),
        }
    }
}

#[derive(Debug, Error)]
#[error("scene '{scene}' failed: {source}")]
pub struct SceneError {
    pub scene: &'static str,
    #[source]
    pub source: Box<dyn StdError + Send + Sync + 'static>,
}

impl SceneError {
    pub fn new(
        scene: &'static str,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            scene,
            source: source.into(),
        }
    }
}

pub trait Scene {
    fn name(&self) -> &'static str;
    fn tick(
        &mut self,
        control: &Control,
        view: &mut dyn View,
    ) -> Result<SceneTransition, SceneError>;
    fn draw(&self, view: &mut dyn View);
    /// Last call before the scene is dropped.
    fn leave(&mut self, _view: &mut dyn View) {}
}

/// Stack of live scenes; only the top one ticks and draws.
#[derive(Default)]
pub struct SceneMachine {
    stack: Vec<Box<dyn Scene>>,
}

impl SceneMachine {
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.stack.last().map(|scene| scene.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.stack.is_empty()
    }

    /// Ticks the active scene and applies its transition. Returns `false`
    /// once no scene is left.
    pub fn tick(&mut self, control: &Control, view: &mut dyn View) -> Result<bool, SceneError> {
        let Some(active) = self.stack.last_mut() else {
            return Ok(false);
        };
        let transition = active.tick(control, view)?;
        self.apply(transition, view);
        Ok(!self.stack.is_empty())
    }

    pub fn draw(&self, view: &mut dyn View) {
        if let Some(active) = self.stack.last() {
            active.draw(view);
        }
    }

    /// Drops every scene and starts over from `scene`.
    pub fn replace_all(&mut self, scene: Box<dyn Scene>, view: &mut dyn View) {
        self.shutdown_all(view);
        info!(scene = scene.name(), "scene_reset");
        self.stack.push(scene);
    }

    pub fn shutdown_all(&mut self, view: &mut dyn View) {
        while let Some(mut scene) = self.stack.pop() {
            scene.leave(view);
        }
    }

    fn apply(&mut self, transition: SceneTransition, view: &mut dyn View) {
        match transition {
            SceneTransition::Continue => {}
            SceneTransition::Switch(next) => {
                let from = self.pop_and_leave(view);
                info!(from = ?from, to = next.name(), "scene_switched");
                self.stack.push(next);
            }
            SceneTransition::Push(next) => {
                info!(under = ?self.active_name(), scene = next.name(), "scene_pushed");
                self.stack.push(next);
            }
            SceneTransition::Pop => {
                let from = self.pop_and_leave(view);
                info!(from = ?from, resumed = ?self.active_name(), "scene_popped");
            }
            SceneTransition::Quit => {
                info!(scene = ?self.active_name(), "scene_quit");
                self.shutdown_all(view);
            }
        }
    }

    fn pop_and_leave(&mut self, view: &mut dyn View) -> Option<&'static str> {
        let mut scene = self.stack.pop()?;
        scene.leave(view);
        Some(scene.name())
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::test_support::NullView;
    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Scripted {
        name: &'static str,
        log: Log,
        script: Vec<SceneTransition>,
    }

    impl Scripted {
        fn boxed(name: &'static str, log: &Log, script: Vec<SceneTransition>) -> Box<dyn Scene> {
            Box::new(Self {
                name,
                log: Rc::clone(log),
                script,
            })
        }
    }

    impl Scene for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn tick(
            &mut self,
            _control: &Control,
            _view: &mut dyn View,
        ) -> Result<SceneTransition, SceneError> {
            self.log.borrow_mut().push(format!("tick {}", self.name));
            if self.script.is_empty() {
                Ok(SceneTransition::Continue)
            } else {
                Ok(self.script.remove(0))
            }
        }

        fn draw(&self, _view: &mut dyn View) {}

        fn leave(&mut self, _view: &mut dyn View) {
            self.log.borrow_mut().push(format!("leave {}", self.name));
        }
    }

    #[test]
    fn push_keeps_underlying_scene_until_pop() {
        let log: Log = Rc::default();
        let overlay = Scripted::boxed("overlay", &log, vec![SceneTransition::Pop]);
        let mut machine = SceneMachine::new(Scripted::boxed(
            "base",
            &log,
            vec![SceneTransition::Push(overlay)],
        ));
        let mut view = NullView::default();

        assert!(machine.tick(&Control::default(), &mut view).expect("tick"));
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.active_name(), Some("overlay"));

        assert!(machine.tick(&Control::default(), &mut view).expect("tick"));
        assert_eq!(machine.active_name(), Some("base"));
        assert!(machine.tick(&Control::default(), &mut view).expect("tick"));

        assert_eq!(
            *log.borrow(),
            vec!["tick base", "tick overlay", "leave overlay", "tick base"]
        );
    }

    #[test]
    fn switch_leaves_previous_scene_first() {
        let log: Log = Rc::default();
        let next = Scripted::boxed("next", &log, Vec::new());
        let mut machine =
            SceneMachine::new(Scripted::boxed("first", &log, vec![SceneTransition::Switch(next)]));
        let mut view = NullView::default();

        machine.tick(&Control::default(), &mut view).expect("tick");
        assert_eq!(machine.depth(), 1);
        assert_eq!(machine.active_name(), Some("next"));
        assert_eq!(*log.borrow(), vec!["tick first", "leave first"]);
    }

    #[test]
    fn quit_leaves_every_scene() {
        let log: Log = Rc::default();
        let top = Scripted::boxed("top", &log, vec![SceneTransition::Quit]);
        let mut machine =
            SceneMachine::new(Scripted::boxed("bottom", &log, vec![SceneTransition::Push(top)]));
        let mut view = NullView::default();

        assert!(machine.tick(&Control::default(), &mut view).expect("tick"));
        assert!(!machine.tick(&Control::default(), &mut view).expect("tick"));
        assert!(machine.is_stopped());
        assert_eq!(
            *log.borrow(),
            vec!["tick bottom", "tick top", "leave top", "leave bottom"]
        );
    }

    #[test]
    fn popping_last_scene_stops_machine() {
        let log: Log = Rc::default();
        let mut machine =
            SceneMachine::new(Scripted::boxed("only", &log, vec![SceneTransition::Pop]));
        let mut view = NullView::default();
        assert!(!machine.tick(&Control::default(), &mut view).expect("tick"));
        assert!(!machine.tick(&Control::default(), &mut view).expect("tick"));
    }
}
