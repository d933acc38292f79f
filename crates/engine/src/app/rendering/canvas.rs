use crate::app::layout::Rect;

use super::font::{glyph_advance, glyph_for, Glyph, GLYPH_WIDTH, MISSING_GLYPH, SPACE_GLYPH};

/// Decoded RGBA8 image, row-major.
pub(crate) struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub(crate) fn clear(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

fn pixel_offset(width: u32, height: u32, x: i32, y: i32) -> Option<usize> {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return None;
    }
    (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
        .and_then(|pixel| pixel.checked_mul(4))
}

fn write_pixel(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    let Some(offset) = pixel_offset(width, height, x, y) else {
        return;
    };
    if let Some(target) = frame.get_mut(offset..offset + 4) {
        target.copy_from_slice(&color);
    }
}

fn blend_pixel(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    let alpha = color[3] as u32;
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        write_pixel(frame, width, height, x, y, color);
        return;
    }
    let Some(offset) = pixel_offset(width, height, x, y) else {
        return;
    };
    let Some(target) = frame.get_mut(offset..offset + 4) else {
        return;
    };
    for channel in 0..3 {
        let src = color[channel] as u32;
        let dst = target[channel] as u32;
        target[channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
    }
    target[3] = 255;
}

pub(crate) fn fill_rect(frame: &mut [u8], width: u32, height: u32, rect: Rect, color: [u8; 4]) {
    let start_x = rect.x.max(0);
    let start_y = rect.y.max(0);
    let end_x = rect.right().min(width as i32);
    let end_y = rect.bottom().min(height as i32);
    for y in start_y..end_y {
        for x in start_x..end_x {
            write_pixel(frame, width, height, x, y, color);
        }
    }
}

pub(crate) fn outline_rect(frame: &mut [u8], width: u32, height: u32, rect: Rect, color: [u8; 4]) {
    if rect.width <= 1 || rect.height <= 1 {
        return;
    }
    let edges = [
        Rect::new(rect.x, rect.y, rect.width, 1),
        Rect::new(rect.x, rect.bottom() - 1, rect.width, 1),
        Rect::new(rect.x, rect.y, 1, rect.height),
        Rect::new(rect.right() - 1, rect.y, 1, rect.height),
    ];
    for edge in edges {
        fill_rect(frame, width, height, edge, color);
    }
}

/// Both diagonals of `rect`.
pub(crate) fn cross_rect(frame: &mut [u8], width: u32, height: u32, rect: Rect, color: [u8; 4]) {
    let steps = rect.width.max(rect.height);
    if steps <= 1 {
        return;
    }
    for step in 0..steps {
        let x = rect.x + step * (rect.width - 1) / (steps - 1);
        let y = rect.y + step * (rect.height - 1) / (steps - 1);
        let mirrored_x = rect.right() - 1 - (x - rect.x);
        write_pixel(frame, width, height, x, y, color);
        write_pixel(frame, width, height, mirrored_x, y, color);
    }
}

/// Draws `text` left to right from `(x, y)`; characters without a glyph use a
/// hollow box so missing coverage stays visible.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: [u8; 4],
) {
    let scale = scale.max(1);
    for ch in text.chars() {
        let glyph = if ch.is_whitespace() {
            SPACE_GLYPH
        } else {
            glyph_for(ch).unwrap_or(MISSING_GLYPH)
        };
        draw_glyph(frame, width, height, x, y, glyph, scale, color);
        x += glyph_advance(scale);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    scale: i32,
    color: [u8; 4],
) {
    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }
            let cell = Rect::new(x + col * scale, y + row_index as i32 * scale, scale, scale);
            fill_rect(frame, width, height, cell, color);
        }
    }
}

/// Nearest-neighbour blit of `image` stretched onto `target`, alpha-blended
/// over the existing frame.
pub(crate) fn draw_image_into(
    frame: &mut [u8],
    width: u32,
    height: u32,
    target: Rect,
    image: &LoadedImage,
) {
    if image.width == 0 || image.height == 0 || target.width <= 0 || target.height <= 0 {
        return;
    }
    let expected_len = image.width as usize * image.height as usize * 4;
    if image.rgba.len() < expected_len {
        return;
    }

    let start_x = target.x.max(0);
    let start_y = target.y.max(0);
    let end_x = target.right().min(width as i32);
    let end_y = target.bottom().min(height as i32);
    let x_ratio = image.width as f32 / target.width as f32;
    let y_ratio = image.height as f32 / target.height as f32;

    for out_y in start_y..end_y {
        let src_y = (((out_y - target.y) as f32) * y_ratio) as u32;
        let src_y = src_y.min(image.height - 1) as usize;
        for out_x in start_x..end_x {
            let src_x = (((out_x - target.x) as f32) * x_ratio) as u32;
            let src_x = src_x.min(image.width - 1) as usize;
            let offset = (src_y * image.width as usize + src_x) * 4;
            let color = [
                image.rgba[offset],
                image.rgba[offset + 1],
                image.rgba[offset + 2],
                image.rgba[offset + 3],
            ];
            blend_pixel(frame, width, height, out_x, out_y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0; width as usize * height as usize * 4]
    }

    fn pixel(frame: &[u8], width: u32, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * width as usize + x) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn fill_rect_clips_to_frame_bounds() {
        let mut buffer = frame(4, 4);
        fill_rect(&mut buffer, 4, 4, Rect::new(-2, -2, 4, 4), [9, 9, 9, 255]);

        assert_eq!(pixel(&buffer, 4, 0, 0), [9, 9, 9, 255]);
        assert_eq!(pixel(&buffer, 4, 1, 1), [9, 9, 9, 255]);
        assert_eq!(pixel(&buffer, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn drawing_outside_a_zero_sized_frame_is_safe() {
        let mut buffer = Vec::new();
        fill_rect(&mut buffer, 0, 0, Rect::new(0, 0, 10, 10), [1, 2, 3, 255]);
        draw_text(&mut buffer, 0, 0, 0, 0, "Привет", 2, [1, 2, 3, 255]);
        cross_rect(&mut buffer, 0, 0, Rect::new(0, 0, 10, 10), [1, 2, 3, 255]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn outline_leaves_interior_untouched() {
        let mut buffer = frame(5, 5);
        outline_rect(&mut buffer, 5, 5, Rect::new(0, 0, 5, 5), [255, 0, 0, 255]);

        assert_eq!(pixel(&buffer, 5, 0, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 5, 4, 4), [255, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 5, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn unknown_characters_draw_the_missing_glyph_box() {
        let mut buffer = frame(5, 7);
        draw_text(&mut buffer, 5, 7, 0, 0, "\u{1f642}", 1, [255, 255, 255, 255]);

        assert_eq!(pixel(&buffer, 5, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&buffer, 5, 4, 6), [255, 255, 255, 255]);
        assert_eq!(pixel(&buffer, 5, 2, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn image_blit_stretches_and_blends_alpha() {
        let image = LoadedImage {
            width: 2,
            height: 1,
            rgba: vec![200, 0, 0, 255, 0, 200, 0, 0],
        };
        let mut buffer = frame(4, 2);
        clear(&mut buffer, [10, 10, 10, 255]);

        draw_image_into(&mut buffer, 4, 2, Rect::new(0, 0, 4, 2), &image);

        assert_eq!(pixel(&buffer, 4, 0, 0), [200, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 1, 1), [200, 0, 0, 255]);
        assert_eq!(pixel(&buffer, 4, 3, 0), [10, 10, 10, 255]);
    }

    #[test]
    fn truncated_image_buffer_is_ignored() {
        let image = LoadedImage {
            width: 4,
            height: 4,
            rgba: vec![255; 8],
        };
        let mut buffer = frame(2, 2);
        draw_image_into(&mut buffer, 2, 2, Rect::new(0, 0, 2, 2), &image);
        assert!(buffer.iter().all(|byte| *byte == 0));
    }
}
