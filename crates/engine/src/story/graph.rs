use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::document::{ChoiceRecord, SceneRecord, StoryDocument};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SceneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub target: SceneId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub title: Option<String>,
    pub text: String,
    pub image: String,
    pub background_music: Option<String>,
    pub sound_effect: Option<String>,
    pub choices: Vec<Choice>,
}

impl Scene {
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scene '{scene_id}' is not defined in the story graph")]
pub struct LookupError {
    pub scene_id: SceneId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryGraphError {
    #[error("story graph defines no scenes")]
    Empty,
    #[error("start scene '{start}' is not defined in the story graph")]
    MissingStart { start: SceneId },
    #[error("choice #{choice_index} of scene '{scene}' targets undefined scene '{target}'")]
    DanglingChoice {
        scene: SceneId,
        choice_index: usize,
        target: SceneId,
    },
}

/// Immutable scene graph. Every choice target and the start id are known to
/// resolve once construction succeeds.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    start: SceneId,
    scenes: BTreeMap<SceneId, Scene>,
}

impl SceneGraph {
    pub fn new(
        start: SceneId,
        scenes: BTreeMap<SceneId, Scene>,
    ) -> Result<Self, StoryGraphError> {
        if scenes.is_empty() {
            return Err(StoryGraphError::Empty);
        }
        if !scenes.contains_key(&start) {
            return Err(StoryGraphError::MissingStart { start });
        }
        for (scene_id, scene) in &scenes {
            for (choice_index, choice) in scene.choices.iter().enumerate() {
                if !scenes.contains_key(&choice.target) {
                    return Err(StoryGraphError::DanglingChoice {
                        scene: scene_id.clone(),
                        choice_index,
                        target: choice.target.clone(),
                    });
                }
            }
        }
        Ok(Self { start, scenes })
    }

    pub fn from_document(document: StoryDocument) -> Result<Self, StoryGraphError> {
        let scenes = document
            .scenes
            .into_iter()
            .map(|(id, record)| (SceneId::new(id), scene_from_record(record)))
            .collect::<BTreeMap<_, _>>();
        Self::new(SceneId::new(document.start), scenes)
    }

    pub fn start(&self) -> &SceneId {
        &self.start
    }

    pub fn scene(&self, id: &str) -> Result<&Scene, LookupError> {
        self.scenes.get(id).ok_or_else(|| LookupError {
            scene_id: SceneId::from(id),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// Resolves `id` to the graph's own key so callers can hold it without
    /// re-validating.
    pub fn resolve_id(&self, id: &str) -> Result<&SceneId, LookupError> {
        self.scenes
            .get_key_value(id)
            .map(|(key, _)| key)
            .ok_or_else(|| LookupError {
                scene_id: SceneId::from(id),
            })
    }

    pub fn scene_ids(&self) -> impl Iterator<Item = &SceneId> {
        self.scenes.keys()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

// Empty strings in optional fields read as "absent".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn scene_from_record(record: SceneRecord) -> Scene {
    Scene {
        title: non_empty(record.title),
        text: record.text,
        image: record.image,
        background_music: non_empty(record.background_music),
        sound_effect: non_empty(record.sound_effect),
        choices: record.choices.into_iter().map(choice_from_record).collect(),
    }
}

fn choice_from_record(record: ChoiceRecord) -> Choice {
    Choice {
        label: record.text,
        target: SceneId::new(record.next),
    }
}
