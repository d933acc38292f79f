use std::path::{Path, PathBuf};

use tale_engine::{
    load_story_file, resolve_app_paths, AppError, AppPaths, LoggingMediaBackend, MediaBackend,
    PlayerConfig, SceneNavigator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) struct AppWiring {
    pub(crate) config: PlayerConfig,
    pub(crate) navigator: SceneNavigator,
    pub(crate) asset_dir: PathBuf,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    info!("=== Tale Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        asset_dir = %paths.asset_dir.display(),
        story_file = %paths.story_file.display(),
        "startup"
    );
    let config = PlayerConfig::default().with_env_overrides()?;
    wire(&paths, config)
}

fn wire(paths: &AppPaths, config: PlayerConfig) -> Result<AppWiring, AppError> {
    let graph = load_story_file(&paths.story_file)?;
    let navigator = SceneNavigator::new(graph, media_backend(&paths.asset_dir));

    Ok(AppWiring {
        config,
        navigator,
        asset_dir: paths.asset_dir.clone(),
    })
}

fn media_backend(asset_dir: &Path) -> Box<dyn MediaBackend> {
    #[cfg(feature = "audio")]
    {
        match tale_engine::RodioMediaBackend::open(asset_dir.to_path_buf()) {
            Ok(backend) => return Box::new(backend),
            Err(error) => {
                tracing::warn!(error = %error, "audio_output_unavailable_using_log_backend");
            }
        }
    }
    Box::new(LoggingMediaBackend::new(asset_dir.to_path_buf()))
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn paths_in(root: &Path) -> AppPaths {
        AppPaths {
            root: root.to_path_buf(),
            asset_dir: root.join("assets"),
            story_file: root.join("assets").join("story.json"),
        }
    }

    #[test]
    fn wiring_starts_navigator_at_story_start() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let paths = paths_in(dir.path());
        fs::create_dir_all(&paths.asset_dir).expect("assets");
        fs::write(
            &paths.story_file,
            r#"{"start":"gate","scenes":{"gate":{"text":"Closed.","image":"gate.png","choices":[]}}}"#,
        )
        .expect("story");

        let wiring = wire(&paths, PlayerConfig::default()).expect("wiring");

        assert_eq!(wiring.navigator.current_id().as_str(), "gate");
        assert_eq!(wiring.asset_dir, paths.asset_dir);
    }

    #[test]
    fn missing_story_file_is_a_startup_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let paths = paths_in(dir.path());

        let error = wire(&paths, PlayerConfig::default())
            .err()
            .expect("missing story");
        assert!(matches!(error, AppError::StoryLoad(_)));
    }

    #[test]
    fn broken_story_graph_is_rejected() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let paths = paths_in(dir.path());
        fs::create_dir_all(&paths.asset_dir).expect("assets");
        fs::write(
            &paths.story_file,
            r#"{"start":"nowhere","scenes":{"gate":{"text":"t","image":"i","choices":[]}}}"#,
        )
        .expect("story");

        assert!(wire(&paths, PlayerConfig::default()).is_err());
    }
}
