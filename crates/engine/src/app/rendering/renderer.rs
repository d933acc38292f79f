use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::app::layout::{SceneLayout, TextLine, Viewport};
use crate::asset_refs::resolve_asset_path;

use super::canvas::{
    clear, cross_rect, draw_image_into, draw_text, fill_rect, outline_rect, LoadedImage,
};

const CLEAR_COLOR: [u8; 4] = [18, 20, 27, 255];
const TITLE_COLOR: [u8; 4] = [240, 226, 190, 255];
const BODY_COLOR: [u8; 4] = [214, 218, 226, 255];
const PLACEHOLDER_FILL_COLOR: [u8; 4] = [32, 35, 45, 255];
const PLACEHOLDER_LINE_COLOR: [u8; 4] = [70, 76, 94, 255];
const BUTTON_COLOR: [u8; 4] = [38, 44, 60, 255];
const BUTTON_HOVER_COLOR: [u8; 4] = [58, 70, 98, 255];
const BUTTON_BORDER_COLOR: [u8; 4] = [96, 110, 140, 255];
const BUTTON_LABEL_COLOR: [u8; 4] = [236, 238, 244, 255];

pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    image_cache: HashMap<String, Option<LoadedImage>>,
    warned_image_refs: HashSet<String>,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            image_cache: HashMap::new(),
            warned_image_refs: HashSet::new(),
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Native size of the scene image, or `None` when it cannot be loaded.
    pub(crate) fn image_size(&mut self, reference: &str) -> Option<(u32, u32)> {
        resolve_cached_image(
            &mut self.image_cache,
            &mut self.warned_image_refs,
            &self.asset_root,
            reference,
        )
        .map(|image| (image.width, image.height))
    }

    pub(crate) fn render_scene(
        &mut self,
        layout: &SceneLayout,
        image_ref: &str,
        hovered: Option<usize>,
    ) -> Result<(), Error> {
        let width = self.viewport.width;
        let height = self.viewport.height;
        let image = resolve_cached_image(
            &mut self.image_cache,
            &mut self.warned_image_refs,
            &self.asset_root,
            image_ref,
        );
        let frame = self.pixels.frame_mut();
        clear(frame, CLEAR_COLOR);

        for line in &layout.title {
            draw_line(frame, width, height, line, TITLE_COLOR);
        }

        match image {
            Some(image) => draw_image_into(frame, width, height, layout.image, image),
            None => {
                fill_rect(frame, width, height, layout.image, PLACEHOLDER_FILL_COLOR);
                cross_rect(frame, width, height, layout.image, PLACEHOLDER_LINE_COLOR);
                outline_rect(frame, width, height, layout.image, PLACEHOLDER_LINE_COLOR);
            }
        }

        for line in &layout.body {
            draw_line(frame, width, height, line, BODY_COLOR);
        }

        for (index, button) in layout.buttons.iter().enumerate() {
            let fill = if hovered == Some(index) {
                BUTTON_HOVER_COLOR
            } else {
                BUTTON_COLOR
            };
            fill_rect(frame, width, height, button.rect, fill);
            outline_rect(frame, width, height, button.rect, BUTTON_BORDER_COLOR);
            draw_line(frame, width, height, &button.label, BUTTON_LABEL_COLOR);
        }

        self.pixels.render()
    }
}

fn draw_line(frame: &mut [u8], width: u32, height: u32, line: &TextLine, color: [u8; 4]) {
    draw_text(
        frame, width, height, line.x, line.y, &line.text, line.scale, color,
    );
}

fn resolve_cached_image<'a>(
    cache: &'a mut HashMap<String, Option<LoadedImage>>,
    warned_refs: &mut HashSet<String>,
    asset_root: &Path,
    reference: &str,
) -> Option<&'a LoadedImage> {
    if !cache.contains_key(reference) {
        let loaded = match resolve_asset_path(asset_root, reference) {
            Ok(path) => match load_image_rgba(&path) {
                Ok(image) => Some(image),
                Err(reason) => {
                    warn_image_load_once(warned_refs, reference, Some(&path), &reason);
                    None
                }
            },
            Err(error) => {
                let reason = format!("invalid_ref:{error}");
                warn_image_load_once(warned_refs, reference, None, &reason);
                None
            }
        };
        cache.insert(reference.to_string(), loaded);
    }
    cache.get(reference).and_then(Option::as_ref)
}

fn load_image_rgba(path: &Path) -> Result<LoadedImage, String> {
    let reader = ImageReader::open(path)
        .map_err(|error| format!("file_open_failed:{error}"))?
        .with_guessed_format()
        .map_err(|error| format!("format_probe_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_image_load_once(
    warned_refs: &mut HashSet<String>,
    reference: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_refs.insert(reference.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        image = reference,
        path = %path_display,
        reason = reason,
        "image_load_failed_using_placeholder"
    );
}
