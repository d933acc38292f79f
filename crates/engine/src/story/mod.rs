mod document;
mod graph;
mod loader;

pub use document::{ChoiceRecord, SceneRecord, StoryDocument};
pub use graph::{Choice, LookupError, Scene, SceneGraph, SceneId, StoryGraphError};
pub use loader::{load_story_file, parse_story_json, StoryLoadError};
