use crate::story::{Scene, SceneId};

pub const DEFAULT_RESTART_LABEL: &str = "Начать сначала";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Choose(SceneId),
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneControl<'a> {
    pub label: &'a str,
    pub action: NavAction,
}

/// What a frontend shows for one scene. Choice controls and the restart
/// control are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView<'a> {
    pub title: Option<&'a str>,
    pub image: &'a str,
    pub body: &'a str,
    pub controls: Vec<SceneControl<'a>>,
}

impl SceneView<'_> {
    pub fn is_terminal(&self) -> bool {
        matches!(self.controls.as_slice(), [control] if control.action == NavAction::Restart)
    }
}

pub fn project_scene<'a>(scene: &'a Scene, restart_label: &'a str) -> SceneView<'a> {
    let controls = if scene.choices.is_empty() {
        vec![SceneControl {
            label: restart_label,
            action: NavAction::Restart,
        }]
    } else {
        scene
            .choices
            .iter()
            .map(|choice| SceneControl {
                label: choice.label.as_str(),
                action: NavAction::Choose(choice.target.clone()),
            })
            .collect()
    };

    SceneView {
        title: scene.title.as_deref(),
        image: scene.image.as_str(),
        body: scene.text.as_str(),
        controls,
    }
}
