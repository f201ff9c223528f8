use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::{OverlayData, Vec2};
use crate::sprite_keys::validate_sprite_key;

use super::raster::{blend_rect, blit_sprite_stretched, clear, LoadedSprite};
use super::text::draw_text;
use super::{DrawCommand, DrawList};

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];

pub struct Renderer {
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
    asset_root: PathBuf,
    sprite_cache: HashMap<&'static str, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<&'static str>,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        buffer_width: u32,
        buffer_height: u32,
        asset_root: PathBuf,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        Ok(Self {
            pixels,
            buffer_width,
            buffer_height,
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    pub fn window_to_board(&self, x: f32, y: f32) -> Vec2 {
        let (bx, by) = self
            .pixels
            .window_pos_to_pixel((x, y))
            .unwrap_or_else(|outside| self.pixels.clamp_pixel_pos(outside));
        Vec2 {
            x: bx as f32,
            y: by as f32,
        }
    }

    pub(crate) fn render(
        &mut self,
        draw_list: &DrawList,
        overlay: Option<&OverlayData>,
    ) -> Result<(), Error> {
        let width = self.buffer_width;
        let height = self.buffer_height;
        for command in draw_list.commands() {
            if let DrawCommand::Sprite { key, .. } = command {
                self.ensure_sprite_cached(*key);
            }
        }

        let frame = self.pixels.frame_mut();
        clear(frame, CLEAR_COLOR);
        for command in draw_list.commands() {
            match command {
                DrawCommand::Sprite {
                    key,
                    dest,
                    placeholder,
                } => match self.sprite_cache.get(key).and_then(Option::as_ref) {
                    Some(sprite) => blit_sprite_stretched(frame, width, height, sprite, *dest),
                    None => blend_rect(frame, width, height, *dest, *placeholder),
                },
                DrawCommand::Fill { rect, color } => blend_rect(frame, width, height, *rect, *color),
                DrawCommand::Text {
                    text,
                    origin,
                    scale,
                    color,
                } => draw_text(
                    frame,
                    width,
                    height,
                    origin.x.round() as i32,
                    origin.y.round() as i32,
                    text,
                    *scale,
                    *color,
                ),
            }
        }

        if let Some(overlay) = overlay {
            crate::app::tools::draw_overlay(frame, width, height, overlay);
        }

        self.pixels.render()
    }

    fn ensure_sprite_cached(&mut self, key: &'static str) {
        if self.sprite_cache.contains_key(key) {
            return;
        }
        let sprite = match resolve_sprite_image_path(&self.asset_root, key) {
            Ok(path) => match load_sprite_rgba(&path) {
                Ok(sprite) => Some(sprite),
                Err(reason) => {
                    warn_sprite_load_once(
                        &mut self.warned_missing_sprite_keys,
                        key,
                        Some(path.as_path()),
                        reason.as_str(),
                    );
                    None
                }
            },
            Err(reason) => {
                warn_sprite_load_once(&mut self.warned_missing_sprite_keys, key, None, &reason);
                None
            }
        };
        self.sprite_cache.insert(key, sprite);
    }
}

fn resolve_sprite_image_path(asset_root: &Path, key: &str) -> Result<PathBuf, String> {
    validate_sprite_key(key).map_err(|error| format!("invalid_key:{error}"))?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
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

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<&'static str>,
    key: &'static str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        sprite_key = key,
        path = %path_display,
        reason = reason,
        "renderer_sprite_load_failed_using_placeholder"
    );
}
