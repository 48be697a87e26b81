use std::sync::Arc;
use std::time::Instant;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::WindowBuilder;

use crate::AppPaths;

use super::{Control, MetaAction, Renderer, SceneFactory, SilentAudio, Stage, StageError};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub timestep_ms: u64,
    pub slow_motion_factor: u64,
    pub capture_period_ms: u64,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Rustman".to_string(),
            window_width: 512,
            window_height: 512,
            resolution_width: 512,
            resolution_height: 512,
            timestep_ms: 10,
            slow_motion_factor: 10,
            capture_period_ms: 40,
            max_ticks_per_frame: 25,
            metrics_log_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

pub fn run_app(config: LoopConfig, paths: &AppPaths, factory: SceneFactory) -> Result<(), AppError> {
    info!(
        root = %paths.root.display(),
        asset_root = %paths.asset_root.display(),
        capture_dir = %paths.capture_dir.display(),
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = Renderer::new(
        Arc::clone(&window),
        config.resolution_width,
        config.resolution_height,
    )
    .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    info!(
        timestep_ms = config.timestep_ms,
        slow_motion_factor = config.slow_motion_factor,
        capture_period_ms = config.capture_period_ms,
        max_ticks_per_frame = config.max_ticks_per_frame,
        "loop_config"
    );

    let started = Instant::now();
    let mut stage = Stage::new(
        &config,
        Box::new(renderer),
        Box::new(SilentAudio::default()),
        factory,
        &paths.asset_root,
        &paths.capture_dir,
        0,
    );
    let mut input_collector = InputCollector::default();
    let mut failure: Option<StageError> = None;

    event_loop
        .run(|event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    stage.request_stop();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = stage.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                    }
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    input_collector.set_modifiers(modifiers.state());
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                }
                WindowEvent::RedrawRequested => {
                    let now_ms = started.elapsed().as_millis() as u64;
                    for action in input_collector.take_meta_actions() {
                        stage.handle_meta(action, now_ms);
                    }
                    stage.set_control(input_collector.control());

                    match stage.tick(now_ms) {
                        Ok(true) => {}
                        Ok(false) => window_target.exit(),
                        Err(err) => {
                            error!(error = %err, "stage_failed");
                            failure = Some(err);
                            window_target.exit();
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                stage.shutdown();
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    match failure {
        Some(err) => Err(AppError::Stage(err)),
        None => Ok(()),
    }
}

/// Keyboard state folded into gameplay controls plus edge-triggered meta
/// actions.
#[derive(Debug, Default)]
struct InputCollector {
    control: Control,
    modifiers: ModifiersState,
    held_meta_keys: Vec<KeyCode>,
    pending_meta: Vec<MetaAction>,
}

impl InputCollector {
    fn control(&self) -> Control {
        self.control
    }

    fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    fn take_meta_actions(&mut self) -> Vec<MetaAction> {
        std::mem::take(&mut self.pending_meta)
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return;
        };
        self.handle_key(code, key_event.state == ElementState::Pressed);
    }

    fn handle_key(&mut self, code: KeyCode, is_pressed: bool) {
        if !is_pressed {
            self.held_meta_keys.retain(|held| *held != code);
        }
        if let Some(action) = self.meta_action_for(code) {
            if is_pressed && !self.held_meta_keys.contains(&code) {
                self.held_meta_keys.push(code);
                self.pending_meta.push(action);
            }
            if action == MetaAction::ToggleFullscreen {
                return;
            }
        }
        self.update_control(code, is_pressed);
    }

    fn meta_action_for(&self, code: KeyCode) -> Option<MetaAction> {
        match code {
            KeyCode::Escape => Some(MetaAction::Quit),
            KeyCode::KeyY => Some(MetaAction::ConfirmYes),
            KeyCode::KeyN => Some(MetaAction::ConfirmNo),
            KeyCode::PrintScreen => Some(MetaAction::ToggleCapture),
            KeyCode::F12 => Some(MetaAction::Screenshot),
            KeyCode::Enter if self.modifiers.alt_key() => Some(MetaAction::ToggleFullscreen),
            KeyCode::Pause => Some(MetaAction::TogglePause),
            KeyCode::F3 => Some(MetaAction::ToggleDebug),
            KeyCode::Tab => Some(MetaAction::ToggleSlowMotion),
            KeyCode::F2 => Some(MetaAction::ResetLevel),
            _ => None,
        }
    }

    fn update_control(&mut self, code: KeyCode, is_pressed: bool) {
        let control = &mut self.control;
        match code {
            KeyCode::ArrowLeft => control.left = is_pressed,
            KeyCode::ArrowRight => control.right = is_pressed,
            KeyCode::ArrowUp => control.up = is_pressed,
            KeyCode::ArrowDown => control.down = is_pressed,
            KeyCode::KeyZ => control.fire = is_pressed,
            KeyCode::KeyX => control.jump = is_pressed,
            KeyCode::KeyC => control.dash = is_pressed,
            KeyCode::Enter => control.start = is_pressed,
            KeyCode::KeyR => control.restart = is_pressed,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_action_keys_map_to_control() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::ArrowLeft, true);
        input.handle_key(KeyCode::KeyX, true);

        let control = input.control();
        assert!(control.left);
        assert!(control.jump);
        assert!(!control.right);

        input.handle_key(KeyCode::KeyX, false);
        assert!(!input.control().jump);
    }

    #[test]
    fn meta_keys_are_edge_triggered() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::Tab, true);
        input.handle_key(KeyCode::Tab, true);
        assert_eq!(input.take_meta_actions(), vec![MetaAction::ToggleSlowMotion]);
        assert!(input.take_meta_actions().is_empty());

        input.handle_key(KeyCode::Tab, false);
        input.handle_key(KeyCode::Tab, true);
        assert_eq!(input.take_meta_actions(), vec![MetaAction::ToggleSlowMotion]);
    }

    #[test]
    fn alt_enter_toggles_fullscreen_without_start() {
        let mut input = InputCollector::default();
        input.set_modifiers(ModifiersState::ALT);
        input.handle_key(KeyCode::Enter, true);
        assert_eq!(input.take_meta_actions(), vec![MetaAction::ToggleFullscreen]);
        assert!(!input.control().start);

        input.set_modifiers(ModifiersState::empty());
        input.handle_key(KeyCode::Enter, false);
        input.handle_key(KeyCode::Enter, true);
        assert!(input.take_meta_actions().is_empty());
        assert!(input.control().start);
    }

    #[test]
    fn escape_requests_quit_confirmation() {
        let mut input = InputCollector::default();
        input.handle_key(KeyCode::Escape, true);
        input.handle_key(KeyCode::KeyY, true);
        assert_eq!(
            input.take_meta_actions(),
            vec![MetaAction::Quit, MetaAction::ConfirmYes]
        );
    }
}
