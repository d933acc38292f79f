use std::collections::BTreeMap;

use serde::Deserialize;

/// On-disk shape of a story file. Field names follow the JSON authoring format.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryDocument {
    pub start: String,
    pub scenes: BTreeMap<String, SceneRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    #[serde(default)]
    pub title: Option<String>,
    pub text: String,
    pub image: String,
    #[serde(default)]
    pub background_music: Option<String>,
    #[serde(default)]
    pub sound_effect: Option<String>,
    pub choices: Vec<ChoiceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceRecord {
    pub text: String,
    pub next: String,
}
