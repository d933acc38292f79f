use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::document::StoryDocument;
use super::graph::{SceneGraph, StoryGraphError};

#[derive(Debug, Error)]
pub enum StoryLoadError {
    #[error("failed to read story file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse story json{}: {message}", location_suffix(.json_path))]
    Parse {
        json_path: String,
        message: String,
    },
    #[error("story graph is inconsistent: {0}")]
    Graph(#[from] StoryGraphError),
}

fn location_suffix(json_path: &str) -> String {
    if json_path.is_empty() || json_path == "." {
        String::new()
    } else {
        format!(" at {json_path}")
    }
}

pub fn load_story_file(path: &Path) -> Result<SceneGraph, StoryLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| StoryLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_story_json(&raw)?;
    info!(
        path = %path.display(),
        scene_count = graph.len(),
        start = %graph.start(),
        "story_loaded"
    );
    Ok(graph)
}

pub fn parse_story_json(raw: &str) -> Result<SceneGraph, StoryLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let document = serde_path_to_error::deserialize::<_, StoryDocument>(&mut deserializer)
        .map_err(|error| {
            let json_path = error.path().to_string();
            StoryLoadError::Parse {
                json_path,
                message: error.into_inner().to_string(),
            }
        })?;
    Ok(SceneGraph::from_document(document)?)
}
