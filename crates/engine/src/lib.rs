use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
mod asset_refs;
pub mod media;
mod navigator;
pub mod story;
mod view;

pub use app::{run_app, AppError, PlayerConfig, RESTART_LABEL_ENV_VAR};
pub use asset_refs::{resolve_asset_path, AssetRefError};
pub use media::{
    AudioChannel, LoggingMediaBackend, MediaBackend, MediaDeck, MediaError, MediaEvent, MediaLog,
    PlaybackCue, RecordingMediaBackend,
};
#[cfg(feature = "audio")]
pub use media::RodioMediaBackend;
pub use navigator::SceneNavigator;
pub use story::{
    load_story_file, parse_story_json, Choice, LookupError, Scene, SceneGraph, SceneId,
    StoryGraphError, StoryLoadError,
};
pub use view::{project_scene, NavAction, SceneControl, SceneView, DEFAULT_RESTART_LABEL};

pub const ROOT_ENV_VAR: &str = "TALE_ROOT";
pub const STORY_ENV_VAR: &str = "TALE_STORY";
const DEFAULT_STORY_FILE: &str = "story.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub asset_dir: PathBuf,
    pub story_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TALE_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\tale\"\n\
Bash/zsh: export {env_var}=\"/path/to/tale\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let asset_dir = root.join("assets");
    let story_file = match read_optional_env(STORY_ENV_VAR)? {
        Some(value) => normalize_path(Path::new(&value)),
        None => asset_dir.join(DEFAULT_STORY_FILE),
    };

    Ok(AppPaths {
        root,
        asset_dir,
        story_file,
    })
}

/// `Ok(None)` when the variable is unset; non-unicode values are errors.
pub fn read_optional_env(var: &'static str) -> Result<Option<String>, StartupError> {
    match env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(StartupError::EnvVar { var, source }),
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match read_optional_env(ROOT_ENV_VAR)? {
        Some(value) => {
            let normalized = normalize_path(Path::new(&value));
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        None => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
