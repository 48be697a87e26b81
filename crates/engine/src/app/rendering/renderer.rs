use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::{debug, warn};
use winit::window::{Fullscreen, Window};

use crate::app::{Actor, Display, DisplayError, ModelId};
use crate::geom::Vec2;

use super::text::{draw_text_clipped, GLYPH_ADVANCE, LINE_ADVANCE};
use super::{world_to_screen, Viewport, PIXELS_PER_WORLD};

const CLEAR_COLOR: [u8; 4] = [12, 10, 18, 255];
const TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const TEXT_PADDING_PX: i32 = 8;
const TILESET_GRID: u32 = 8;
const BLINK_PERIOD_FRAMES: u64 = 4;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

struct Model {
    sprite: Option<LoadedSprite>,
    tileset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRectPx {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

/// Software renderer over a fixed-resolution `pixels` frame.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    models: HashMap<ModelId, Model>,
    warned_missing_models: HashSet<ModelId>,
    queued_actors: Vec<Actor>,
    queued_texts: Vec<(Vec2, String)>,
    camera: Vec2,
    ambient_light: f32,
    frame_counter: u64,
}

impl Renderer {
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport { width, height },
            models: HashMap::new(),
            warned_missing_models: HashSet::new(),
            queued_actors: Vec::new(),
            queued_texts: Vec::new(),
            camera: Vec2::ZERO,
            ambient_light: 0.0,
            frame_counter: 0,
        })
    }
}

impl Display for Renderer {
    fn begin_draw(&mut self) {
        self.queued_actors.clear();
        self.queued_texts.clear();
    }

    fn draw_actor(&mut self, actor: &Actor) {
        if !self.models.contains_key(&actor.model) {
            warn_model_missing_once(&mut self.warned_missing_models, actor.model, None, "not_loaded");
        }
        self.queued_actors.push(*actor);
    }

    fn draw_text(&mut self, cell: Vec2, text: &str) {
        self.queued_texts.push((cell, text.to_string()));
    }

    fn end_draw(&mut self) -> Result<(), DisplayError> {
        self.queued_actors.sort_by_key(|actor| actor.z_order);
        let blink_hidden = (self.frame_counter / BLINK_PERIOD_FRAMES) % 2 == 1;
        let light = light_factor(self.ambient_light);
        let viewport = self.viewport;

        let frame = self.pixels.frame_mut();
        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CLEAR_COLOR);
        }

        for actor in &self.queued_actors {
            if actor.blinking && blink_hidden {
                continue;
            }
            let camera = if actor.screen_space {
                Vec2::ZERO
            } else {
                self.camera
            };
            let dest = actor_screen_rect(actor, camera, viewport);
            match self.models.get(&actor.model) {
                Some(Model {
                    sprite: Some(sprite),
                    tileset,
                }) => {
                    let source = source_rect(sprite, *tileset, actor.action);
                    draw_sprite_region(frame, viewport, dest, sprite, source, actor.flip_x, light);
                }
                _ => draw_placeholder(frame, viewport, dest, actor.model, light),
            }
        }

        for (cell, text) in &self.queued_texts {
            let x = TEXT_PADDING_PX + (cell.x * GLYPH_ADVANCE as f32).round() as i32;
            let y = TEXT_PADDING_PX + (cell.y * LINE_ADVANCE as f32).round() as i32;
            draw_text_clipped(frame, viewport.width, viewport.height, x, y, text, TEXT_COLOR);
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.pixels.render().map_err(DisplayError::Present)
    }

    fn set_camera(&mut self, pos: Vec2) {
        self.camera = pos;
    }

    fn set_ambient_light(&mut self, amount: f32) {
        self.ambient_light = amount;
    }

    fn set_caption(&mut self, caption: &str) {
        self.window.set_title(caption);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let mode = fullscreen.then_some(Fullscreen::Borderless(None));
        self.window.set_fullscreen(mode);
    }

    fn load_model(&mut self, model: ModelId, path: &Path, tileset: bool) {
        let sprite = match load_sprite_rgba(path) {
            Ok(sprite) => {
                debug!(model, path = %path.display(), "model_loaded");
                self.warned_missing_models.remove(&model);
                Some(sprite)
            }
            Err(reason) => {
                warn_model_missing_once(
                    &mut self.warned_missing_models,
                    model,
                    Some(path),
                    reason.as_str(),
                );
                None
            }
        };
        self.models.insert(model, Model { sprite, tileset });
    }

    fn read_pixels(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend_from_slice(self.pixels.frame());
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(width, height)
            .map_err(|source| DisplayError::Resize {
                width,
                height,
                source,
            })
    }
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_model_missing_once(
    warned: &mut HashSet<ModelId>,
    model: ModelId,
    path: Option<&Path>,
    reason: &str,
) {
    if !warned.insert(model) {
        return;
    }
    let path_display = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("<unresolved>"));
    warn!(
        model,
        path = %path_display.display(),
        reason,
        "renderer_model_load_failed_using_placeholder"
    );
}

/// `0` is neutral, `-1` is black; positive values brighten.
fn light_factor(ambient_light: f32) -> f32 {
    (1.0 + ambient_light).max(0.0)
}

fn apply_light(channel: u8, light: f32) -> u8 {
    (channel as f32 * light).round().clamp(0.0, 255.0) as u8
}

fn actor_screen_rect(actor: &Actor, camera: Vec2, viewport: Viewport) -> ScreenRectPx {
    let top_left = Vec2::new(actor.pos.x, actor.pos.y + actor.scale.height);
    let (left, top) = world_to_screen(top_left, camera, viewport, PIXELS_PER_WORLD);
    ScreenRectPx {
        left,
        top,
        width: (actor.scale.width * PIXELS_PER_WORLD).round() as i32,
        height: (actor.scale.height * PIXELS_PER_WORLD).round() as i32,
    }
}

fn source_rect(sprite: &LoadedSprite, tileset: bool, action: i32) -> SourceRect {
    if !tileset {
        return SourceRect {
            x: 0,
            y: 0,
            width: sprite.width,
            height: sprite.height,
        };
    }
    let cell_width = (sprite.width / TILESET_GRID).max(1);
    let cell_height = (sprite.height / TILESET_GRID).max(1);
    let cell = action.rem_euclid((TILESET_GRID * TILESET_GRID) as i32) as u32;
    SourceRect {
        x: (cell % TILESET_GRID) * cell_width,
        y: (cell / TILESET_GRID) * cell_height,
        width: cell_width,
        height: cell_height,
    }
}

fn draw_sprite_region(
    frame: &mut [u8],
    viewport: Viewport,
    dest: ScreenRectPx,
    sprite: &LoadedSprite,
    source: SourceRect,
    flip_x: bool,
    light: f32,
) {
    if dest.width <= 0 || dest.height <= 0 || source.width == 0 || source.height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let draw_left = dest.left.max(0);
    let draw_top = dest.top.max(0);
    let draw_right = (dest.left + dest.width).min(viewport.width as i32);
    let draw_bottom = (dest.top + dest.height).min(viewport.height as i32);

    for out_y in draw_top..draw_bottom {
        let dy = (out_y - dest.top) as u32;
        let src_y = source.y + (dy * source.height / dest.height as u32).min(source.height - 1);
        for out_x in draw_left..draw_right {
            let mut dx = (out_x - dest.left) as u32;
            if flip_x {
                dx = dest.width as u32 - 1 - dx;
            }
            let src_x = source.x + (dx * source.width / dest.width as u32).min(source.width - 1);
            if src_x >= sprite.width || src_y >= sprite.height {
                continue;
            }
            let src_offset = (src_y as usize * sprite.width as usize + src_x as usize) * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let color = [
                apply_light(sprite.rgba[src_offset], light),
                apply_light(sprite.rgba[src_offset + 1], light),
                apply_light(sprite.rgba[src_offset + 2], light),
                255,
            ];
            write_pixel_rgba_clipped(
                frame,
                viewport.width,
                viewport.height,
                out_x,
                out_y,
                color,
            );
        }
    }
}

fn placeholder_color(model: ModelId) -> [u8; 3] {
    let seed = (model as u32).wrapping_mul(2_654_435_761);
    [
        96 + (seed >> 24) as u8 % 160,
        96 + (seed >> 16) as u8 % 160,
        96 + (seed >> 8) as u8 % 160,
    ]
}

fn draw_placeholder(
    frame: &mut [u8],
    viewport: Viewport,
    dest: ScreenRectPx,
    model: ModelId,
    light: f32,
) {
    let [r, g, b] = placeholder_color(model);
    let color = [
        apply_light(r, light),
        apply_light(g, light),
        apply_light(b, light),
        255,
    ];
    for y in dest.top..dest.top + dest.height {
        for x in dest.left..dest.left + dest.width {
            let edge = y == dest.top
                || x == dest.left
                || y == dest.top + dest.height - 1
                || x == dest.left + dest.width - 1;
            if edge || (x + y) % 4 == 0 {
                write_pixel_rgba_clipped(frame, viewport.width, viewport.height, x, y, color);
            }
        }
    }
}

pub(super) fn write_pixel_rgba_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    color: [u8; 4],
) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let byte_offset = (y as usize * width as usize + x as usize) * 4;
    let Some(pixel) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };
    pixel.copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Size2;

    fn checker_sprite(width: u32, height: u32) -> LoadedSprite {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        LoadedSprite {
            width,
            height,
            rgba,
        }
    }

    #[test]
    fn tileset_action_selects_grid_cell() {
        let sprite = checker_sprite(64, 64);
        let source = source_rect(&sprite, true, 10);
        assert_eq!(
            source,
            SourceRect {
                x: 16,
                y: 8,
                width: 8,
                height: 8
            }
        );
        assert_eq!(source_rect(&sprite, false, 10).width, 64);
    }

    #[test]
    fn actor_rect_anchors_bottom_left() {
        let viewport = Viewport {
            width: 512,
            height: 512,
        };
        let actor = Actor::new(0, Vec2::new(0.0, 0.0), Size2::new(1.0, 2.0));
        let rect = actor_screen_rect(&actor, Vec2::ZERO, viewport);
        assert_eq!(
            rect,
            ScreenRectPx {
                left: 256,
                top: 192,
                width: 32,
                height: 64
            }
        );
    }

    #[test]
    fn flipped_sprite_mirrors_columns() {
        let viewport = Viewport {
            width: 4,
            height: 1,
        };
        let sprite = checker_sprite(4, 1);
        let source = source_rect(&sprite, false, 0);
        let dest = ScreenRectPx {
            left: 0,
            top: 0,
            width: 4,
            height: 1,
        };
        let mut frame = vec![0u8; 16];
        draw_sprite_region(&mut frame, viewport, dest, &sprite, source, true, 1.0);
        let reds: Vec<u8> = frame.chunks(4).map(|pixel| pixel[0]).collect();
        assert_eq!(reds, vec![3, 2, 1, 0]);
    }

    #[test]
    fn ambient_light_darkens_and_clamps() {
        assert_eq!(apply_light(200, light_factor(0.0)), 200);
        assert_eq!(apply_light(200, light_factor(-1.0)), 0);
        assert_eq!(apply_light(200, light_factor(-2.0)), 0);
        assert_eq!(apply_light(200, light_factor(0.5)), 255);
    }

    #[test]
    fn clipped_writes_ignore_out_of_bounds() {
        let mut frame = vec![0u8; 2 * 2 * 4];
        write_pixel_rgba_clipped(&mut frame, 2, 2, -1, 0, [1, 1, 1, 1]);
        write_pixel_rgba_clipped(&mut frame, 2, 2, 2, 1, [1, 1, 1, 1]);
        assert!(frame.iter().all(|byte| *byte == 0));
        write_pixel_rgba_clipped(&mut frame, 2, 2, 1, 1, [9, 9, 9, 9]);
        assert_eq!(&frame[12..16], &[9, 9, 9, 9]);
    }
}
