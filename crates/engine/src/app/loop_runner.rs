use std::path::PathBuf;
use std::sync::Arc;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::navigator::SceneNavigator;
use crate::story::{LookupError, StoryLoadError};
use crate::view::{project_scene, NavAction, SceneView, DEFAULT_RESTART_LABEL};
use crate::{read_optional_env, StartupError};

use super::input::{InputCollector, InputCommand};
use super::layout::{layout_scene, SceneLayout, Viewport};
use super::rendering::Renderer;

pub const RESTART_LABEL_ENV_VAR: &str = "TALE_RESTART_LABEL";
const MIN_WINDOW_WIDTH: u32 = 320;
const MIN_WINDOW_HEIGHT: u32 = 240;

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub restart_label: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            window_title: "Tale".to_string(),
            window_width: 960,
            window_height: 720,
            restart_label: DEFAULT_RESTART_LABEL.to_string(),
        }
    }
}

impl PlayerConfig {
    /// Applies `TALE_RESTART_LABEL` when it is set to a non-blank value.
    pub fn with_env_overrides(self) -> Result<Self, StartupError> {
        let label = read_optional_env(RESTART_LABEL_ENV_VAR)?;
        Ok(self.with_restart_label_override(label))
    }

    fn with_restart_label_override(mut self, label: Option<String>) -> Self {
        if let Some(label) = label {
            let trimmed = label.trim();
            if !trimmed.is_empty() {
                self.restart_label = trimmed.to_string();
            }
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    StoryLoad(#[from] StoryLoadError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("navigation failed: {0}")]
    Navigation(#[from] LookupError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Opens the player window and runs `navigator` until the window is closed.
/// The loop sleeps between input events and redraws only when the scene,
/// the window size or the hovered button changes.
pub fn run_app(
    config: PlayerConfig,
    mut navigator: SceneNavigator,
    asset_root: PathBuf,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_min_inner_size(LogicalSize::new(
                MIN_WINDOW_WIDTH as f64,
                MIN_WINDOW_HEIGHT as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer =
        Renderer::new(Arc::clone(&window), asset_root).map_err(AppError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut input = InputCollector::default();
    let mut presentation = present(&navigator, &config.restart_label, &mut renderer, None)?;
    apply_window_title(&window, &config, &presentation);
    let mut navigation_failure: Option<LookupError> = None;
    info!(
        width = renderer.viewport().width,
        height = renderer.viewport().height,
        restart_label = %config.restart_label,
        "window_opened"
    );
    window.request_redraw();

    let run_result = event_loop.run(|event, window_target| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => {
                info!(reason = "window_close", "shutdown_requested");
                window_target.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let size = window.inner_size();
                if let Err(error) = renderer.resize(size.width, size.height) {
                    warn!(error = %error, "renderer_resize_failed");
                    window_target.exit();
                    return;
                }
                match present(
                    &navigator,
                    &config.restart_label,
                    &mut renderer,
                    input.cursor_position_px(),
                ) {
                    Ok(next) => presentation = next,
                    Err(lookup) => {
                        error!(error = %lookup, "scene_lookup_failed");
                        navigation_failure = Some(lookup);
                        window_target.exit();
                        return;
                    }
                }
                window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                input.set_cursor_position_px(position.x as f32, position.y as f32);
                if presentation.update_hover(input.cursor_position_px()) {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorLeft { .. } => {
                input.clear_cursor_position();
                if presentation.update_hover(None) {
                    window.request_redraw();
                }
            }
            WindowEvent::Focused(false) => input.reset_held(),
            WindowEvent::MouseInput { state, button, .. } => {
                input.handle_mouse_input(button, state);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                input.handle_keyboard_input(&event);
            }
            WindowEvent::RedrawRequested => {
                if let Err(error) = renderer.render_scene(
                    &presentation.layout,
                    &presentation.image_ref,
                    presentation.hovered,
                ) {
                    warn!(error = %error, "renderer_draw_failed");
                    window_target.exit();
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            for command in input.drain_commands() {
                match resolve_command(command, &presentation) {
                    Some(LoopAction::Quit) => {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                        break;
                    }
                    Some(LoopAction::Navigate(action)) => {
                        let next = navigator.apply(&action).and_then(|()| {
                            present(
                                &navigator,
                                &config.restart_label,
                                &mut renderer,
                                input.cursor_position_px(),
                            )
                        });
                        match next {
                            Ok(next) => {
                                presentation = next;
                                apply_window_title(&window, &config, &presentation);
                                window.request_redraw();
                            }
                            Err(lookup) => {
                                error!(error = %lookup, "scene_lookup_failed");
                                navigation_failure = Some(lookup);
                                window_target.exit();
                                break;
                            }
                        }
                    }
                    None => debug!(?command, "input_ignored"),
                }
            }
        }
        Event::LoopExiting => {
            navigator.shutdown();
            info!(scene_entries = navigator.entry_count(), "shutdown");
        }
        _ => {}
    });

    run_result.map_err(AppError::EventLoopRun)?;
    match navigation_failure {
        Some(lookup) => Err(AppError::Navigation(lookup)),
        None => Ok(()),
    }
}

/// Everything the window needs to draw and hit-test the current scene.
#[derive(Debug, Clone, PartialEq)]
struct Presentation {
    title: Option<String>,
    layout: SceneLayout,
    actions: Vec<NavAction>,
    image_ref: String,
    hovered: Option<usize>,
}

impl Presentation {
    fn from_view(view: &SceneView<'_>, viewport: Viewport, image_size: Option<(u32, u32)>) -> Self {
        Self {
            title: view.title.map(str::to_string),
            layout: layout_scene(view, viewport, image_size),
            actions: view
                .controls
                .iter()
                .map(|control| control.action.clone())
                .collect(),
            image_ref: view.image.to_string(),
            hovered: None,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.actions.as_slice(), [NavAction::Restart])
    }

    /// Returns `true` when the hovered button changed.
    fn update_hover(&mut self, cursor: Option<(f32, f32)>) -> bool {
        let next = cursor.and_then(|(x, y)| self.layout.hit_test(x, y));
        let changed = next != self.hovered;
        self.hovered = next;
        changed
    }
}

fn present(
    navigator: &SceneNavigator,
    restart_label: &str,
    renderer: &mut Renderer,
    cursor: Option<(f32, f32)>,
) -> Result<Presentation, LookupError> {
    let viewport = renderer.viewport();
    present_at(
        navigator,
        restart_label,
        viewport,
        |reference| renderer.image_size(reference),
        cursor,
    )
}

fn present_at(
    navigator: &SceneNavigator,
    restart_label: &str,
    viewport: Viewport,
    image_size: impl FnOnce(&str) -> Option<(u32, u32)>,
    cursor: Option<(f32, f32)>,
) -> Result<Presentation, LookupError> {
    let scene = navigator.current_scene()?;
    let view = project_scene(scene, restart_label);
    let image_size = image_size(view.image);
    let mut presentation = Presentation::from_view(&view, viewport, image_size);
    presentation.update_hover(cursor);
    Ok(presentation)
}

fn apply_window_title(window: &Window, config: &PlayerConfig, presentation: &Presentation) {
    let title = presentation
        .title
        .as_deref()
        .unwrap_or(config.window_title.as_str());
    window.set_title(title);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopAction {
    Navigate(NavAction),
    Quit,
}

fn resolve_command(command: InputCommand, presentation: &Presentation) -> Option<LoopAction> {
    let control_index = match command {
        InputCommand::Quit => return Some(LoopAction::Quit),
        InputCommand::SelectControl(index) => Some(index),
        InputCommand::ClickAt { x, y } => presentation.layout.hit_test(x, y),
        InputCommand::Confirm => presentation.is_terminal().then_some(0),
    }?;
    presentation
        .actions
        .get(control_index)
        .cloned()
        .map(LoopAction::Navigate)
}
