use tracing::{error, info};

use crate::media::{MediaBackend, MediaDeck};
use crate::story::{LookupError, Scene, SceneGraph, SceneId};
use crate::view::NavAction;

/// Owns the current scene id of one play session and drives scene-entry media.
///
/// Navigation is memoryless: the next state depends only on the chosen id.
/// Every transition, including a self-transition, re-runs the entry protocol:
/// the ambient channel is stopped, then restarted only if the entered scene
/// names a background track, and the scene's sound effect fires once.
pub struct SceneNavigator {
    graph: SceneGraph,
    current: SceneId,
    media: MediaDeck,
    entry_count: u64,
}

impl SceneNavigator {
    /// Starts a session at the graph's start scene and runs its entry protocol.
    pub fn new(graph: SceneGraph, backend: Box<dyn MediaBackend>) -> Self {
        let current = graph.start().clone();
        let mut navigator = Self {
            graph,
            current,
            media: MediaDeck::new(backend),
            entry_count: 0,
        };
        navigator.enter_current_scene();
        navigator
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn current_id(&self) -> &SceneId {
        &self.current
    }

    pub fn current_scene(&self) -> Result<&Scene, LookupError> {
        self.graph.scene(self.current.as_str())
    }

    /// Number of scene entries in this session, the initial one included.
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    pub fn media(&self) -> &MediaDeck {
        &self.media
    }

    /// Unknown ids are rejected and leave the session where it was.
    pub fn choose(&mut self, next: &str) -> Result<(), LookupError> {
        let next_id = self.graph.resolve_id(next)?.clone();
        info!(from = %self.current, to = %next_id, "choice_selected");
        self.transition_to(next_id);
        Ok(())
    }

    pub fn restart(&mut self) {
        info!(from = %self.current, start = %self.graph.start(), "story_restarted");
        let start = self.graph.start().clone();
        self.transition_to(start);
    }

    pub fn apply(&mut self, action: &NavAction) -> Result<(), LookupError> {
        match action {
            NavAction::Choose(target) => self.choose(target.as_str()),
            NavAction::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.media.stop_all();
    }

    fn transition_to(&mut self, next: SceneId) {
        self.media.stop_ambient();
        self.current = next;
        self.enter_current_scene();
    }

    fn enter_current_scene(&mut self) {
        self.entry_count += 1;
        // `current` only ever holds ids resolved through the graph.
        let scene = match self.graph.scene(self.current.as_str()) {
            Ok(scene) => scene,
            Err(lookup) => {
                error!(error = %lookup, "scene_lookup_failed");
                return;
            }
        };
        if let Some(track) = scene.background_music.as_deref() {
            self.media.play_ambient(track);
        }
        if let Some(effect) = scene.sound_effect.as_deref() {
            self.media.play_effect(effect);
        }
        info!(
            scene = %self.current,
            entry = self.entry_count,
            terminal = scene.is_terminal(),
            "scene_entered"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{AudioChannel, MediaEvent, MediaLog, RecordingMediaBackend};
    use crate::story::parse_story_json;
    use crate::view::{project_scene, DEFAULT_RESTART_LABEL};

    const SCENARIO: &str = r#"{
        "start": "intro",
        "scenes": {
            "intro": { "text": "Begin.", "image": "i.png", "choices": [{ "text": "Go", "next": "end" }] },
            "end": { "text": "Done.", "image": "e.png", "choices": [] }
        }
    }"#;

    const MEDIA_STORY: &str = r#"{
        "start": "hall",
        "scenes": {
            "hall": {
                "title": "Hall",
                "text": "Music plays.",
                "image": "hall.png",
                "backgroundMusic": "a.mp3",
                "soundEffect": "door.mp3",
                "choices": [
                    { "text": "Stay", "next": "hall" },
                    { "text": "Leave", "next": "yard" },
                    { "text": "Cellar", "next": "cellar" }
                ]
            },
            "yard": {
                "text": "Silence.",
                "image": "yard.png",
                "backgroundMusic": null,
                "choices": [{ "text": "Back", "next": "hall" }]
            },
            "cellar": {
                "text": "Drip.",
                "image": "cellar.png",
                "backgroundMusic": "b.mp3",
                "choices": []
            }
        }
    }"#;

    fn navigator(raw: &str) -> (SceneNavigator, MediaLog) {
        let graph = parse_story_json(raw).expect("story");
        let log = MediaLog::default();
        let navigator = SceneNavigator::new(graph, Box::new(RecordingMediaBackend::new(log.clone())));
        (navigator, log)
    }

    #[test]
    fn session_starts_at_start_scene() {
        let (navigator, _) = navigator(SCENARIO);

        assert_eq!(navigator.current_id().as_str(), "intro");
        assert_eq!(navigator.entry_count(), 1);
    }

    #[test]
    fn navigating_to_each_scene_yields_its_record() {
        let (mut navigator, _) = navigator(MEDIA_STORY);
        let ids = navigator.graph().scene_ids().cloned().collect::<Vec<_>>();

        for id in ids {
            navigator.choose(id.as_str()).expect("choose");
            let expected = navigator.graph().scene(id.as_str()).expect("scene").clone();
            assert_eq!(navigator.current_scene().expect("current"), &expected);
        }
    }

    #[test]
    fn restart_returns_to_start_from_any_scene() {
        let (mut navigator, _) = navigator(MEDIA_STORY);
        let ids = navigator.graph().scene_ids().cloned().collect::<Vec<_>>();

        for id in ids {
            navigator.choose(id.as_str()).expect("choose");
            navigator.restart();
            assert_eq!(navigator.current_id().as_str(), "hall");
        }
    }

    #[test]
    fn restart_reruns_entry_protocol() {
        let (mut navigator, log) = navigator(MEDIA_STORY);
        navigator.choose("cellar").expect("cellar");
        log.clear();

        navigator.restart();

        let events = log.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            MediaEvent::Stopped {
                channel: AudioChannel::Ambient
            }
        );
        assert!(matches!(
            &events[1],
            MediaEvent::Played { channel: AudioChannel::Ambient, cue }
                if cue.asset == "a.mp3" && cue.looping
        ));
        assert_eq!(
            events[2],
            MediaEvent::Stopped {
                channel: AudioChannel::Effect
            }
        );
        assert!(matches!(
            &events[3],
            MediaEvent::Played { channel: AudioChannel::Effect, cue }
                if cue.asset == "door.mp3" && !cue.looping
        ));
        assert_eq!(navigator.entry_count(), 3);
    }

    #[test]
    fn entering_unresolved_scene_starts_no_media() {
        let (mut navigator, log) = navigator(MEDIA_STORY);
        navigator.media.stop_all();
        log.clear();

        navigator.current = SceneId::from("ghost");
        navigator.enter_current_scene();

        assert!(navigator.current_scene().is_err());
        assert!(log.events().is_empty());
    }

    #[test]
    fn unknown_target_is_a_lookup_error_and_keeps_state() {
        let (mut navigator, log) = navigator(SCENARIO);
        log.clear();

        let error = navigator.choose("missing").expect_err("unknown id");

        assert_eq!(error.scene_id.as_str(), "missing");
        assert_eq!(navigator.current_id().as_str(), "intro");
        assert_eq!(navigator.entry_count(), 1);
        assert!(log.events().is_empty());
    }

    #[test]
    fn self_transition_retriggers_entry_protocol() {
        let (mut navigator, log) = navigator(MEDIA_STORY);
        log.clear();

        navigator.choose("hall").expect("first");
        navigator.choose("hall").expect("second");

        assert_eq!(navigator.entry_count(), 3);
        let ambient_plays = log
            .played_cues()
            .into_iter()
            .filter(|(channel, cue)| *channel == AudioChannel::Ambient && cue.asset == "a.mp3")
            .count();
        let effect_plays = log
            .played_cues()
            .into_iter()
            .filter(|(channel, cue)| *channel == AudioChannel::Effect && cue.asset == "door.mp3")
            .count();
        assert_eq!(ambient_plays, 2);
        assert_eq!(effect_plays, 2);
    }

    #[test]
    fn transition_stops_ambient_but_not_effect_channel() {
        let (mut navigator, log) = navigator(MEDIA_STORY);
        log.clear();

        navigator.choose("cellar").expect("cellar");

        let events = log.events();
        assert_eq!(
            events[0],
            MediaEvent::Stopped {
                channel: AudioChannel::Ambient
            }
        );
        assert!(!events.contains(&MediaEvent::Stopped {
            channel: AudioChannel::Effect
        }));
        assert_eq!(navigator.media().ambient().last_started(), Some("b.mp3"));
        assert_eq!(navigator.media().effect().last_started(), Some("door.mp3"));
    }

    #[test]
    fn entering_scene_without_music_raises_no_error() {
        let (mut navigator, _) = navigator(MEDIA_STORY);

        assert!(navigator.choose("yard").is_ok());
        assert!(navigator.current_scene().is_ok());
    }

    #[test]
    fn playback_refusal_never_blocks_navigation() {
        let graph = parse_story_json(MEDIA_STORY).expect("story");
        let log = MediaLog::default();
        let mut navigator = SceneNavigator::new(
            graph,
            Box::new(RecordingMediaBackend::new(log.clone()).refusing_playback()),
        );

        navigator.choose("cellar").expect("cellar");
        navigator.restart();

        assert_eq!(navigator.current_id().as_str(), "hall");
        assert!(log.played_cues().is_empty());
    }

    #[test]
    fn intro_to_end_and_back_scenario() {
        let (mut navigator, _) = navigator(SCENARIO);

        let intro = project_scene(navigator.current_scene().expect("intro"), DEFAULT_RESTART_LABEL);
        assert_eq!(intro.body, "Begin.");
        assert_eq!(intro.controls.len(), 1);
        assert_eq!(intro.controls[0].label, "Go");

        let action = intro.controls[0].action.clone();
        navigator.apply(&action).expect("go");
        assert_eq!(navigator.current_id().as_str(), "end");

        let end = project_scene(navigator.current_scene().expect("end"), DEFAULT_RESTART_LABEL);
        assert_eq!(end.body, "Done.");
        assert_eq!(end.controls.len(), 1);
        assert_eq!(end.controls[0].label, "Начать сначала");
        assert_eq!(end.controls[0].action, NavAction::Restart);

        let action = end.controls[0].action.clone();
        navigator.apply(&action).expect("restart");
        assert_eq!(navigator.current_id().as_str(), "intro");
    }

    #[test]
    fn shutdown_stops_both_channels() {
        let (mut navigator, log) = navigator(MEDIA_STORY);
        log.clear();

        navigator.shutdown();

        let events = log.events();
        assert!(events.contains(&MediaEvent::Stopped {
            channel: AudioChannel::Ambient
        }));
        assert!(events.contains(&MediaEvent::Stopped {
            channel: AudioChannel::Effect
        }));
    }
}
