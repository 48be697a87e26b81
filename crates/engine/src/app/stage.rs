use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::geom::Vec2;

use super::metrics::MetricsAccumulator;
use super::{
    Actor, Audio, Control, Display, DisplayError, LoopConfig, LoopMetricsSnapshot, MetaAction,
    MusicDeck, MusicId, Resource, ResourceKind, SceneError, SceneFactory, SceneMachine, SoundId,
    View,
};

const TEXT_BOX_DELAY: i32 = 120;
const TEXT_BOX_SLIDE_FRAMES: i32 = 90;
const TEXT_BOX_ROW: f32 = 2.0;
const TEXT_BOX_SLIDE_ROWS: f32 = 4.0;
const STATUS_ROW: f32 = 0.0;

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Result of asking the clock how many gameplay ticks fit before an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    pub ticks: u32,
    pub dropped_ms: u64,
}

/// Fixed-timestep bookkeeping in integer milliseconds.
///
/// Gameplay instants advance in whole steps of `timestep_ms` (times the
/// slow-motion factor when enabled) and never pass the display instant.
/// While capturing, display instants themselves advance in whole
/// `capture_period_ms` steps so every captured frame covers the same span.
#[derive(Debug, Clone)]
pub struct FrameClock {
    timestep_ms: u64,
    slow_motion_factor: u64,
    capture_period_ms: u64,
    max_ticks_per_frame: u32,
    last_tick_ms: u64,
    last_display_ms: u64,
}

impl FrameClock {
    pub fn new(config: &LoopConfig, now_ms: u64) -> Self {
        Self {
            timestep_ms: config.timestep_ms.max(1),
            slow_motion_factor: config.slow_motion_factor.max(1),
            capture_period_ms: config.capture_period_ms.max(1),
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            last_tick_ms: now_ms,
            last_display_ms: now_ms,
        }
    }

    pub fn display_instants(&mut self, now_ms: u64, fixed_period: bool) -> Vec<u64> {
        if !fixed_period {
            self.last_display_ms = now_ms;
            return vec![now_ms];
        }
        let mut instants = Vec::new();
        while self.last_display_ms + self.capture_period_ms <= now_ms {
            self.last_display_ms += self.capture_period_ms;
            instants.push(self.last_display_ms);
        }
        instants
    }

    /// Re-anchors fixed-period display instants, e.g. when capture starts.
    pub fn restart_display(&mut self, now_ms: u64) {
        self.last_display_ms = now_ms;
    }

    pub fn plan_ticks(&mut self, display_ms: u64, slow_motion: bool) -> TickPlan {
        let step = if slow_motion {
            self.timestep_ms * self.slow_motion_factor
        } else {
            self.timestep_ms
        };

        let mut ticks = 0u32;
        while self.last_tick_ms + step < display_ms && ticks < self.max_ticks_per_frame {
            self.last_tick_ms += step;
            ticks += 1;
        }

        let mut dropped_ms = 0;
        if self.last_tick_ms + step < display_ms {
            dropped_ms = display_ms - self.last_tick_ms;
            self.last_tick_ms = display_ms;
        }
        TickPlan { ticks, dropped_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    ConfirmQuit,
    Stopped,
}

#[derive(Debug, Default)]
struct TextBox {
    message: String,
    delay: i32,
}

impl TextBox {
    fn show(&mut self, message: &str) {
        self.message.clear();
        self.message.push_str(message);
        self.delay = TEXT_BOX_DELAY;
    }

    /// Row for this frame, or `None` once expired. Counts down per drawn frame.
    fn next_row(&mut self) -> Option<f32> {
        if self.delay <= 0 {
            return None;
        }
        let mut row = TEXT_BOX_ROW;
        if self.delay < TEXT_BOX_SLIDE_FRAMES {
            let progress = (TEXT_BOX_SLIDE_FRAMES - self.delay) as f32 / TEXT_BOX_SLIDE_FRAMES as f32;
            row -= progress * TEXT_BOX_SLIDE_ROWS;
        }
        self.delay -= 1;
        Some(row)
    }
}

/// `View` implementation backed by a display and an audio backend.
struct Presenter {
    display: Box<dyn Display>,
    audio: Box<dyn Audio>,
    music: MusicDeck,
    asset_root: PathBuf,
    text_box: TextBox,
    actors: Vec<Actor>,
    texts: Vec<(Vec2, String)>,
}

impl View for Presenter {
    fn set_title(&mut self, title: &str) {
        self.display.set_caption(title);
    }

    fn preload(&mut self, resource: Resource) {
        let path = self.asset_root.join(&resource.path);
        match resource.kind {
            ResourceKind::Sound => self.audio.load_sound(resource.id, &path),
            ResourceKind::Model => self.display.load_model(resource.id, &path, false),
            ResourceKind::Tileset => self.display.load_model(resource.id, &path, true),
        }
    }

    fn text_box(&mut self, message: &str) {
        self.text_box.show(message);
    }

    fn play_music(&mut self, track: MusicId) {
        self.music.play_music(self.audio.as_mut(), track);
    }

    fn stop_music(&mut self) {
        self.music.stop_music(self.audio.as_mut());
    }

    fn play_sound(&mut self, sound: SoundId) {
        self.music.play_sound(self.audio.as_mut(), sound);
    }

    fn set_camera_pos(&mut self, pos: Vec2) {
        self.display.set_camera(pos);
    }

    fn set_ambient_light(&mut self, amount: f32) {
        self.display.set_ambient_light(amount);
    }

    fn send_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    fn draw_text(&mut self, cell: Vec2, text: &str) {
        self.texts.push((cell, text.to_string()));
    }
}

/// Owns the scene stack and drives it from wall-clock time.
pub struct Stage {
    clock: FrameClock,
    scenes: SceneMachine,
    factory: SceneFactory,
    presenter: Presenter,
    control: Control,
    run_state: RunState,
    paused: bool,
    slow_motion: bool,
    debug: bool,
    fullscreen: bool,
    capture: Option<BufWriter<File>>,
    screenshot_requested: bool,
    capture_dir: PathBuf,
    resolution: (u32, u32),
    pixel_buffer: Vec<u8>,
    metrics: MetricsAccumulator,
    last_metrics: LoopMetricsSnapshot,
    last_frame_ms: u64,
}

impl Stage {
    pub fn new(
        config: &LoopConfig,
        display: Box<dyn Display>,
        audio: Box<dyn Audio>,
        mut factory: SceneFactory,
        asset_root: &Path,
        capture_dir: &Path,
        now_ms: u64,
    ) -> Self {
        let mut presenter = Presenter {
            display,
            audio,
            music: MusicDeck::new(asset_root.join("music")),
            asset_root: asset_root.to_path_buf(),
            text_box: TextBox::default(),
            actors: Vec::new(),
            texts: Vec::new(),
        };
        presenter.set_title(&config.window_title);
        let initial = factory(&mut presenter);
        info!(scene = initial.name(), "scene_loaded");

        Self {
            clock: FrameClock::new(config, now_ms),
            scenes: SceneMachine::new(initial),
            factory,
            presenter,
            control: Control::default(),
            run_state: RunState::Running,
            paused: false,
            slow_motion: false,
            debug: false,
            fullscreen: false,
            capture: None,
            screenshot_requested: false,
            capture_dir: capture_dir.to_path_buf(),
            resolution: (config.resolution_width, config.resolution_height),
            pixel_buffer: Vec::new(),
            metrics: MetricsAccumulator::new(config.metrics_log_interval_ms, now_ms),
            last_metrics: LoopMetricsSnapshot::default(),
            last_frame_ms: now_ms,
        }
    }

    pub fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    pub fn is_running(&self) -> bool {
        self.run_state != RunState::Stopped
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn active_scene(&self) -> Option<&'static str> {
        self.scenes.active_name()
    }

    pub fn request_stop(&mut self) {
        self.run_state = RunState::Stopped;
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        self.presenter.display.resize(width, height)
    }

    pub fn handle_meta(&mut self, action: MetaAction, now_ms: u64) {
        match action {
            MetaAction::Quit => {
                if self.run_state == RunState::Running {
                    self.run_state = RunState::ConfirmQuit;
                    info!("quit_confirm_requested");
                }
            }
            MetaAction::ConfirmYes => {
                if self.run_state == RunState::ConfirmQuit {
                    self.run_state = RunState::Stopped;
                    info!(reason = "quit_confirmed", "shutdown_requested");
                }
            }
            MetaAction::ConfirmNo => {
                if self.run_state == RunState::ConfirmQuit {
                    self.run_state = RunState::Running;
                }
            }
            MetaAction::ToggleCapture => self.toggle_capture(now_ms),
            MetaAction::Screenshot => self.screenshot_requested = true,
            MetaAction::ToggleFullscreen => {
                if self.capture.is_some() {
                    warn!("fullscreen_refused_while_capturing");
                    return;
                }
                self.fullscreen = !self.fullscreen;
                self.presenter.display.set_fullscreen(self.fullscreen);
                info!(fullscreen = self.fullscreen, "fullscreen_toggled");
            }
            MetaAction::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause_toggled");
            }
            MetaAction::ToggleDebug => {
                self.debug = !self.debug;
                info!(debug = self.debug, "debug_toggled");
            }
            MetaAction::ToggleSlowMotion => {
                self.slow_motion = !self.slow_motion;
                info!(slow_motion = self.slow_motion, "slow_motion_toggled");
            }
            MetaAction::ResetLevel => {
                let scene = (self.factory)(&mut self.presenter);
                self.scenes.replace_all(scene, &mut self.presenter);
            }
        }
    }

    /// Runs every gameplay tick and display frame due at `now_ms`.
    /// Returns `false` once the application should exit.
    pub fn tick(&mut self, now_ms: u64) -> Result<bool, StageError> {
        let fixed_period = self.capture.is_some();
        for display_ms in self.clock.display_instants(now_ms, fixed_period) {
            let plan = self.clock.plan_ticks(display_ms, self.slow_motion);
            if plan.dropped_ms > 0 {
                warn!(dropped_backlog_ms = plan.dropped_ms, "sim_clamp_triggered");
            }
            for _ in 0..plan.ticks {
                if self.paused || self.run_state != RunState::Running {
                    continue;
                }
                self.tick_gameplay()?;
            }

            self.draw_frame()?;
            self.metrics
                .record_frame(display_ms.saturating_sub(self.last_frame_ms));
            self.last_frame_ms = display_ms;
            self.write_captures(display_ms);

            if self.run_state == RunState::Stopped {
                break;
            }
        }

        if let Some(snapshot) = self.metrics.maybe_snapshot(now_ms) {
            self.last_metrics = snapshot;
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                scene = ?self.scenes.active_name(),
                "loop_metrics"
            );
        }
        Ok(self.is_running())
    }

    pub fn shutdown(&mut self) {
        self.scenes.shutdown_all(&mut self.presenter);
        self.stop_capture();
        info!("shutdown");
    }

    fn tick_gameplay(&mut self) -> Result<(), StageError> {
        let control = Control {
            debug: self.debug,
            ..self.control
        };
        let alive = self.scenes.tick(&control, &mut self.presenter)?;
        self.metrics.record_tick();
        if !alive {
            self.run_state = RunState::Stopped;
            info!(reason = "scenes_finished", "shutdown_requested");
        }
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), StageError> {
        self.presenter.actors.clear();
        self.presenter.texts.clear();
        self.scenes.draw(&mut self.presenter);

        let status = self.status_text();
        let debug_lines = if self.debug {
            vec![
                format!("FPS: {:.0}", self.last_metrics.fps),
                format!("TPS: {:.0}", self.last_metrics.tps),
                format!("SCENE: {}", self.scenes.active_name().unwrap_or("-")),
            ]
        } else {
            Vec::new()
        };

        let presenter = &mut self.presenter;
        presenter.display.begin_draw();
        for actor in &presenter.actors {
            presenter.display.draw_actor(actor);
        }
        for (cell, text) in &presenter.texts {
            presenter.display.draw_text(*cell, text);
        }
        if let Some(row) = presenter.text_box.next_row() {
            presenter
                .display
                .draw_text(Vec2::new(1.0, row), &presenter.text_box.message);
        }
        if let Some(status) = status {
            presenter.display.draw_text(Vec2::new(0.0, STATUS_ROW), status);
        }
        for (index, line) in debug_lines.iter().enumerate() {
            presenter
                .display
                .draw_text(Vec2::new(0.0, 4.0 + index as f32), line);
        }
        presenter.display.end_draw()?;
        Ok(())
    }

    fn status_text(&self) -> Option<&'static str> {
        if self.run_state == RunState::ConfirmQuit {
            Some("QUIT? [Y/N]")
        } else if self.paused {
            Some("PAUSE")
        } else if self.slow_motion {
            Some("SLOW-MOTION MODE")
        } else {
            None
        }
    }

    fn toggle_capture(&mut self, now_ms: u64) {
        if self.capture.is_some() {
            self.stop_capture();
            return;
        }
        if self.fullscreen {
            warn!("capture_refused_while_fullscreen");
            return;
        }
        let path = self.capture_dir.join(format!("capture-{now_ms}.rgba"));
        match File::create(&path) {
            Ok(file) => {
                self.capture = Some(BufWriter::new(file));
                self.clock.restart_display(now_ms);
                info!(
                    path = %path.display(),
                    width = self.resolution.0,
                    height = self.resolution.1,
                    "capture_started"
                );
            }
            Err(error) => warn!(path = %path.display(), error = %error, "capture_open_failed"),
        }
    }

    fn stop_capture(&mut self) {
        if let Some(mut writer) = self.capture.take() {
            if let Err(error) = writer.flush() {
                warn!(error = %error, "capture_flush_failed");
            }
            info!("capture_stopped");
        }
    }

    fn write_captures(&mut self, display_ms: u64) {
        if self.capture.is_none() && !self.screenshot_requested {
            return;
        }
        self.presenter.display.read_pixels(&mut self.pixel_buffer);

        if self.screenshot_requested {
            self.screenshot_requested = false;
            let path = self.capture_dir.join(format!("screenshot-{display_ms}.png"));
            let (width, height) = self.resolution;
            match image::save_buffer(
                &path,
                &self.pixel_buffer,
                width,
                height,
                image::ColorType::Rgba8,
            ) {
                Ok(()) => info!(path = %path.display(), "screenshot_saved"),
                Err(error) => warn!(path = %path.display(), error = %error, "screenshot_failed"),
            }
        }

        let failed = match self.capture.as_mut() {
            Some(writer) => writer.write_all(&self.pixel_buffer).err(),
            None => None,
        };
        if let Some(error) = failed {
            warn!(error = %error, "capture_write_failed");
            self.capture = None;
        } else if self.capture.is_some() {
            debug!(display_ms, "capture_frame_written");
        }
    }
}
