use crate::view::SceneView;

use super::rendering::font::{glyph_advance, line_advance, text_width_px, GLYPH_HEIGHT};

pub(crate) const TITLE_TEXT_SCALE: i32 = 3;
pub(crate) const BODY_TEXT_SCALE: i32 = 2;
const PAGE_PADDING: i32 = 24;
const SECTION_GAP: i32 = 16;
const BUTTON_HEIGHT: i32 = 40;
const BUTTON_GAP: i32 = 10;
const BUTTON_INSET_X: i32 = 12;
const IMAGE_MAX_HEIGHT_FRACTION: f32 = 0.4;
const PLACEHOLDER_IMAGE_SIZE: (u32, u32) = (4, 3);
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) const fn right(self) -> i32 {
        self.x + self.width
    }

    pub(crate) const fn bottom(self) -> i32 {
        self.y + self.height
    }

    pub(crate) fn contains(self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < self.right() as f32
            && y >= self.y as f32
            && y < self.bottom() as f32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextLine {
    pub x: i32,
    pub y: i32,
    pub scale: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ButtonLayout {
    pub rect: Rect,
    pub label: TextLine,
}

/// Screen placement of one projected scene. Button `i` activates control `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SceneLayout {
    pub title: Vec<TextLine>,
    pub image: Rect,
    pub body: Vec<TextLine>,
    pub buttons: Vec<ButtonLayout>,
}

impl SceneLayout {
    pub(crate) fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.buttons
            .iter()
            .position(|button| button.rect.contains(x, y))
    }
}

/// Title on top, then the image, then body text; buttons are pinned to the
/// bottom edge. `image_size` is the decoded image's native size, `None` when
/// the placeholder is drawn instead.
pub(crate) fn layout_scene(
    view: &SceneView<'_>,
    viewport: Viewport,
    image_size: Option<(u32, u32)>,
) -> SceneLayout {
    let viewport_width = viewport.width.min(i32::MAX as u32) as i32;
    let viewport_height = viewport.height.min(i32::MAX as u32) as i32;
    let content_width = (viewport_width - PAGE_PADDING * 2).max(0);
    let mut cursor_y = PAGE_PADDING;

    let mut title = Vec::new();
    if let Some(text) = view.title {
        let max_chars = chars_per_line(content_width, TITLE_TEXT_SCALE);
        for line in wrap_text(text, max_chars) {
            let line_width = text_width_px(&line, TITLE_TEXT_SCALE);
            title.push(TextLine {
                x: PAGE_PADDING + (content_width - line_width).max(0) / 2,
                y: cursor_y,
                scale: TITLE_TEXT_SCALE,
                text: line,
            });
            cursor_y += line_advance(TITLE_TEXT_SCALE);
        }
        cursor_y += SECTION_GAP;
    }

    let control_count = view.controls.len() as i32;
    let buttons_height = if control_count == 0 {
        0
    } else {
        control_count * BUTTON_HEIGHT + (control_count - 1) * BUTTON_GAP
    };
    let buttons_top = (viewport_height - PAGE_PADDING - buttons_height).max(cursor_y);

    let flow_bottom = (buttons_top - SECTION_GAP).max(cursor_y);
    let image_box_height = ((viewport_height as f32 * IMAGE_MAX_HEIGHT_FRACTION) as i32)
        .min((flow_bottom - cursor_y) / 2)
        .max(0);
    let (image_width, image_height) = fit_within(
        image_size.unwrap_or(PLACEHOLDER_IMAGE_SIZE),
        (content_width, image_box_height),
    );
    let image = Rect::new(
        PAGE_PADDING + (content_width - image_width) / 2,
        cursor_y,
        image_width,
        image_height,
    );
    if image_height > 0 {
        cursor_y += image_height + SECTION_GAP;
    }

    let body_max_chars = chars_per_line(content_width, BODY_TEXT_SCALE);
    let visible_lines =
        ((flow_bottom - cursor_y).max(0) / line_advance(BODY_TEXT_SCALE)) as usize;
    let body = clip_lines(wrap_text(view.body, body_max_chars), visible_lines, body_max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextLine {
            x: PAGE_PADDING,
            y: cursor_y + index as i32 * line_advance(BODY_TEXT_SCALE),
            scale: BODY_TEXT_SCALE,
            text,
        })
        .collect();

    let label_max_chars = chars_per_line(content_width - BUTTON_INSET_X * 2, BODY_TEXT_SCALE);
    let label_offset_y = (BUTTON_HEIGHT - GLYPH_HEIGHT * BODY_TEXT_SCALE) / 2;
    let buttons = view
        .controls
        .iter()
        .enumerate()
        .map(|(index, control)| {
            let rect = Rect::new(
                PAGE_PADDING,
                buttons_top + index as i32 * (BUTTON_HEIGHT + BUTTON_GAP),
                content_width,
                BUTTON_HEIGHT,
            );
            let numbered = format!("{}. {}", index + 1, control.label);
            ButtonLayout {
                rect,
                label: TextLine {
                    x: rect.x + BUTTON_INSET_X,
                    y: rect.y + label_offset_y,
                    scale: BODY_TEXT_SCALE,
                    text: truncate_chars(&numbered, label_max_chars),
                },
            }
        })
        .collect();

    SceneLayout {
        title,
        image,
        body,
        buttons,
    }
}

fn chars_per_line(width_px: i32, scale: i32) -> usize {
    (width_px.max(0) / glyph_advance(scale)).max(1) as usize
}

/// Greedy word wrap at `max_chars` characters per line. Explicit newlines are
/// kept; words longer than a line are split.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word_chars = word.chars().collect::<Vec<_>>();
            while word_chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word_chars.split_off(max_chars);
                lines.push(word_chars.into_iter().collect());
                word_chars = rest;
            }
            let word_len = word_chars.len();
            if word_len == 0 {
                continue;
            }
            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word_chars);
            current_len += word_len;
        }
        lines.push(current);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn clip_lines(mut lines: Vec<String>, visible: usize, max_chars: usize) -> Vec<String> {
    if lines.len() <= visible {
        return lines;
    }
    lines.truncate(visible);
    if let Some(last) = lines.last_mut() {
        let keep = max_chars.saturating_sub(ELLIPSIS.len());
        let mut clipped = last.chars().take(keep).collect::<String>();
        clipped.push_str(ELLIPSIS);
        *last = clipped;
    }
    lines
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated = text.chars().take(keep).collect::<String>();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Largest size with `source`'s aspect ratio that fits in `bounds`.
pub(crate) fn fit_within(source: (u32, u32), bounds: (i32, i32)) -> (i32, i32) {
    let (source_width, source_height) = source;
    let (max_width, max_height) = bounds;
    if source_width == 0 || source_height == 0 || max_width <= 0 || max_height <= 0 {
        return (0, 0);
    }
    let scale =
        (max_width as f32 / source_width as f32).min(max_height as f32 / source_height as f32);
    let width = ((source_width as f32 * scale) as i32).clamp(1, max_width);
    let height = ((source_height as f32 * scale) as i32).clamp(1, max_height);
    (width, height)
}
