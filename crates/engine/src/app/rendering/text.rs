use super::Rgba;

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
const GLYPH_SPACING: u32 = 1;

#[rustfmt::skip]
const GLYPHS: [u16; 64] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400,
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4,
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292,
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2,
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f,
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f,
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd,
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007,
];

const UNKNOWN_GLYPH: u16 = 0x72c2;

fn glyph_bits(ch: char) -> u16 {
    let ch = ch.to_ascii_uppercase();
    match ch {
        ' '..='_' => GLYPHS[ch as usize - ' ' as usize],
        _ => UNKNOWN_GLYPH,
    }
}

fn glyph_pixel_set(bits: u16, col: u32, row: u32) -> bool {
    let shift = (GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH + (GLYPH_WIDTH - 1 - col);
    bits & (1 << shift) != 0
}

pub fn text_extent(text: &str, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, GLYPH_HEIGHT * scale);
    }
    let width = chars * (GLYPH_WIDTH + GLYPH_SPACING) * scale - GLYPH_SPACING * scale;
    (width, GLYPH_HEIGHT * scale)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    text: &str,
    scale: u32,
    color: Rgba,
) {
    if width == 0 || height == 0 {
        return;
    }
    let scale = scale.max(1) as i32;
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i32 * scale;
    let mut pen_x = x;
    for ch in text.chars() {
        draw_glyph(frame, width, height, pen_x, y, glyph_bits(ch), scale, color);
        pen_x = pen_x.saturating_add(advance);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    bits: u16,
    scale: i32,
    color: Rgba,
) {
    for row in 0..GLYPH_HEIGHT {
        for col in 0..GLYPH_WIDTH {
            if !glyph_pixel_set(bits, col, row) {
                continue;
            }
            let cell_x = x + col as i32 * scale;
            let cell_y = y + row as i32 * scale;
            for py in cell_y.max(0)..(cell_y + scale).min(height as i32) {
                for px in cell_x.max(0)..(cell_x + scale).min(width as i32) {
                    let offset = (py as usize * width as usize + px as usize) * 4;
                    if let Some(pixel) = frame.get_mut(offset..offset + 4) {
                        pixel.copy_from_slice(&color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(frame: &[u8]) -> usize {
        frame.chunks_exact(4).filter(|pixel| pixel[0] == 255).count()
    }

    #[test]
    fn digit_one_matches_reference_rows() {
        let bits = glyph_bits('1');
        let rows: Vec<u16> = (0..GLYPH_HEIGHT)
            .map(|row| {
                (0..GLYPH_WIDTH).fold(0, |acc, col| (acc << 1) | glyph_pixel_set(bits, col, row) as u16)
            })
            .collect();
        assert_eq!(rows, vec![0b010, 0b110, 0b010, 0b010, 0b111]);
    }

    #[test]
    fn lowercase_uses_uppercase_glyph() {
        assert_eq!(glyph_bits('a'), glyph_bits('A'));
        assert_eq!(glyph_bits('z'), glyph_bits('Z'));
        assert_eq!(glyph_bits(' '), 0);
    }

    #[test]
    fn unknown_characters_draw_a_visible_fallback() {
        assert_eq!(glyph_bits('é'), UNKNOWN_GLYPH);
        assert_eq!(glyph_bits('~'), UNKNOWN_GLYPH);
    }

    #[test]
    fn extent_scales_with_text_length() {
        assert_eq!(text_extent("", 4), (0, 20));
        assert_eq!(text_extent("A", 1), (3, 5));
        assert_eq!(text_extent("AB", 2), (14, 10));
    }

    #[test]
    fn scaled_glyph_fills_whole_cells() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text(&mut frame, 16, 16, 0, 0, "-", 2, [255, 255, 255, 255]);
        assert_eq!(lit_pixels(&frame), 3 * 4);
    }

    #[test]
    fn clipped_text_never_writes_out_of_bounds() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        draw_text(&mut frame, 4, 4, -5, -3, "WIN", 3, [255, 255, 255, 255]);
        draw_text(&mut frame, 4, 4, 3, 3, "LOSS", 3, [255, 255, 255, 255]);
        draw_text(&mut frame, 0, 0, 0, 0, "X", 1, [255, 255, 255, 255]);
        assert!(lit_pixels(&frame) <= 16);
    }
}
