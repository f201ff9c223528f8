use crate::app::Rect;

use super::Rgba;

pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelSpan {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

fn clip_rect(rect: Rect, width: u32, height: u32) -> Option<PixelSpan> {
    if width == 0 || height == 0 || !rect.width.is_finite() || !rect.height.is_finite() {
        return None;
    }
    let span = PixelSpan {
        left: (rect.left().round() as i32).max(0),
        top: (rect.top().round() as i32).max(0),
        right: (rect.right().round() as i32).min(width as i32),
        bottom: (rect.bottom().round() as i32).min(height as i32),
    };
    (span.left < span.right && span.top < span.bottom).then_some(span)
}

fn pixel_offset(width: u32, x: i32, y: i32, frame_len: usize) -> Option<usize> {
    if x < 0 || y < 0 {
        return None;
    }
    let byte_offset = (y as usize)
        .checked_mul(width as usize)?
        .checked_add(x as usize)?
        .checked_mul(4)?;
    (byte_offset.checked_add(4)? <= frame_len).then_some(byte_offset)
}

pub(crate) fn clear(frame: &mut [u8], color: Rgba) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8
}

fn blend_pixel(frame: &mut [u8], offset: usize, color: Rgba) {
    match color[3] {
        0 => {}
        255 => frame[offset..offset + 4].copy_from_slice(&color),
        alpha => {
            for channel in 0..3 {
                frame[offset + channel] = blend_channel(frame[offset + channel], color[channel], alpha);
            }
            frame[offset + 3] = 255;
        }
    }
}

pub(crate) fn blend_rect(frame: &mut [u8], width: u32, height: u32, rect: Rect, color: Rgba) {
    let Some(span) = clip_rect(rect, width, height) else {
        return;
    };
    for y in span.top..span.bottom {
        for x in span.left..span.right {
            if let Some(offset) = pixel_offset(width, x, y, frame.len()) {
                blend_pixel(frame, offset, color);
            }
        }
    }
}

pub(crate) fn draw_rect_outline(frame: &mut [u8], width: u32, height: u32, rect: Rect, color: Rgba) {
    if !(rect.width > 1.0 && rect.height > 1.0) {
        return;
    }
    let edges = [
        Rect { height: 1.0, ..rect },
        Rect {
            y: rect.bottom() - 1.0,
            height: 1.0,
            ..rect
        },
        Rect { width: 1.0, ..rect },
        Rect {
            x: rect.right() - 1.0,
            width: 1.0,
            ..rect
        },
    ];
    for edge in edges {
        blend_rect(frame, width, height, edge, color);
    }
}

pub(crate) fn blit_sprite_stretched(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &LoadedSprite,
    dest: Rect,
) {
    if sprite.width == 0 || sprite.height == 0 || dest.width <= 0.0 || dest.height <= 0.0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }
    let Some(span) = clip_rect(dest, width, height) else {
        return;
    };

    let scale_x = sprite.width as f32 / dest.width;
    let scale_y = sprite.height as f32 / dest.height;
    let sprite_width = sprite.width as usize;

    for out_y in span.top..span.bottom {
        let src_y = ((out_y as f32 - dest.top() + 0.5) * scale_y).floor().max(0.0) as u32;
        let src_y = src_y.min(sprite.height - 1) as usize;
        for out_x in span.left..span.right {
            let src_x = ((out_x as f32 - dest.left() + 0.5) * scale_x).floor().max(0.0) as u32;
            let src_x = src_x.min(sprite.width - 1) as usize;
            let src = (src_y * sprite_width + src_x) * 4;
            let color = [
                sprite.rgba[src],
                sprite.rgba[src + 1],
                sprite.rgba[src + 2],
                sprite.rgba[src + 3],
            ];
            if let Some(offset) = pixel_offset(width, out_x, out_y, frame.len()) {
                blend_pixel(frame, offset, color);
            }
        }
    }
}
