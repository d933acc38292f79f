use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tale_engine::{
    load_story_file, project_scene, resolve_app_paths, LoggingMediaBackend, NavAction,
    SceneNavigator, SceneView,
};

const PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPaths {
    pub story_file: PathBuf,
    pub asset_dir: PathBuf,
}

pub enum CommandKind {
    Play,
    Script { path: PathBuf },
}

/// Explicit flags win; a lone `--story` takes its directory as the asset root;
/// anything left unset falls back to the project layout.
pub fn resolve_story_paths(
    story: Option<PathBuf>,
    assets: Option<PathBuf>,
) -> Result<StoryPaths, String> {
    match (story, assets) {
        (Some(story_file), Some(asset_dir)) => Ok(StoryPaths {
            story_file,
            asset_dir,
        }),
        (Some(story_file), None) => {
            let asset_dir = story_file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok(StoryPaths {
                story_file,
                asset_dir,
            })
        }
        (None, assets) => {
            let app_paths = resolve_app_paths().map_err(|error| error.to_string())?;
            Ok(StoryPaths {
                story_file: app_paths.story_file,
                asset_dir: assets.unwrap_or(app_paths.asset_dir),
            })
        }
    }
}

pub fn run<R: BufRead, W: Write>(
    kind: CommandKind,
    paths: &StoryPaths,
    restart_label: &str,
    input: &mut R,
    stdout: &mut W,
) -> Result<(), String> {
    let graph = load_story_file(&paths.story_file).map_err(|error| {
        format!(
            "failed to load story '{}': {error}",
            paths.story_file.display()
        )
    })?;
    let backend = LoggingMediaBackend::new(paths.asset_dir.clone());
    let mut navigator = SceneNavigator::new(graph, Box::new(backend));

    let result = match kind {
        CommandKind::Play => play_session(&mut navigator, restart_label, input, stdout),
        CommandKind::Script { path } => fs::read_to_string(&path)
            .map_err(|error| format!("failed to read script file '{}': {error}", path.display()))
            .and_then(|content| parse_script(&content))
            .and_then(|steps| replay_script(&mut navigator, restart_label, &steps, stdout)),
    };
    navigator.shutdown();
    result
}

/// Interactive loop: one control number per input line, `q` or end of input
/// stops. Bad input is reported and asked for again.
pub fn play_session<R: BufRead, W: Write>(
    navigator: &mut SceneNavigator,
    restart_label: &str,
    input: &mut R,
    stdout: &mut W,
) -> Result<(), String> {
    loop {
        let action = {
            let scene = navigator.current_scene().map_err(|error| error.to_string())?;
            let view = project_scene(scene, restart_label);
            write_out(stdout, &render_scene_text(&view))?;
            match prompt_for_action(&view, input, stdout)? {
                Some(action) => action,
                None => return Ok(()),
            }
        };
        navigator.apply(&action).map_err(|error| error.to_string())?;
    }
}

fn prompt_for_action<R: BufRead, W: Write>(
    view: &SceneView<'_>,
    input: &mut R,
    stdout: &mut W,
) -> Result<Option<NavAction>, String> {
    let mut line = String::new();
    loop {
        write_out(stdout, PROMPT)?;
        stdout
            .flush()
            .map_err(|error| format!("failed to flush output: {error}"))?;
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|error| format!("failed to read input: {error}"))?;
        if read == 0 {
            write_out(stdout, "\n")?;
            return Ok(None);
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        match parse_selection(answer, view.controls.len()) {
            Ok(index) => return Ok(Some(view.controls[index].action.clone())),
            Err(message) => write_out(stdout, &format!("{message}\n"))?,
        }
    }
}

/// Replays 1-based control numbers, printing every scene on the way.
pub fn replay_script<W: Write>(
    navigator: &mut SceneNavigator,
    restart_label: &str,
    steps: &[usize],
    stdout: &mut W,
) -> Result<(), String> {
    for (step_index, &selection) in steps.iter().enumerate() {
        let action = {
            let scene = navigator.current_scene().map_err(|error| error.to_string())?;
            let view = project_scene(scene, restart_label);
            write_out(stdout, &render_scene_text(&view))?;
            let control = selection
                .checked_sub(1)
                .and_then(|index| view.controls.get(index))
                .ok_or_else(|| {
                    format!(
                        "step {}: control {selection} is out of range (scene '{}' has {} controls)",
                        step_index + 1,
                        navigator.current_id(),
                        view.controls.len()
                    )
                })?;
            write_out(stdout, &format!("{PROMPT}{selection}\n"))?;
            control.action.clone()
        };
        navigator.apply(&action).map_err(|error| error.to_string())?;
    }

    let scene = navigator.current_scene().map_err(|error| error.to_string())?;
    write_out(stdout, &render_scene_text(&project_scene(scene, restart_label)))
}

pub fn render_scene_text(view: &SceneView<'_>) -> String {
    let mut text = String::new();
    if let Some(title) = view.title {
        text.push_str(&format!("== {title} ==\n"));
    }
    text.push_str(&format!("[image: {}]\n", view.image));
    if !view.body.is_empty() {
        text.push_str(view.body);
        text.push('\n');
    }
    text.push('\n');
    for (index, control) in view.controls.iter().enumerate() {
        text.push_str(&format!("  {}. {}\n", index + 1, control.label));
    }
    text
}

/// Parses a 1-based control number into a 0-based index below `count`.
pub fn parse_selection(raw: &str, count: usize) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(number) if (1..=count).contains(&number) => Ok(number - 1),
        _ => Err(format!(
            "expected a number between 1 and {count}, got '{raw}'"
        )),
    }
}

pub fn parse_script(content: &str) -> Result<Vec<usize>, String> {
    let mut steps = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = trimmed
            .parse::<usize>()
            .ok()
            .filter(|step| *step >= 1)
            .ok_or_else(|| {
                format!(
                    "script line {}: expected a control number, got '{trimmed}'",
                    line_index + 1
                )
            })?;
        steps.push(step);
    }
    Ok(steps)
}

fn write_out<W: Write>(stdout: &mut W, text: &str) -> Result<(), String> {
    stdout
        .write_all(text.as_bytes())
        .map_err(|error| format!("failed to write output: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tale_engine::{parse_story_json, MediaLog, RecordingMediaBackend, DEFAULT_RESTART_LABEL};

    const STORY: &str = r#"{
        "start": "intro",
        "scenes": {
            "intro": {
                "title": "Gate",
                "text": "A gate stands closed.",
                "image": "/img/gate.png",
                "choices": [
                    { "text": "Knock", "next": "end" },
                    { "text": "Wait", "next": "intro" }
                ]
            },
            "end": { "text": "Done.", "image": "end.png", "choices": [] }
        }
    }"#;

    fn navigator() -> SceneNavigator {
        let graph = parse_story_json(STORY).expect("story");
        SceneNavigator::new(
            graph,
            Box::new(RecordingMediaBackend::new(MediaLog::default())),
        )
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn scene_text_lists_title_image_body_and_numbered_controls() {
        let navigator = navigator();
        let scene = navigator.current_scene().expect("scene");
        let text = render_scene_text(&project_scene(scene, DEFAULT_RESTART_LABEL));

        assert_eq!(
            text,
            "== Gate ==\n[image: /img/gate.png]\nA gate stands closed.\n\n  1. Knock\n  2. Wait\n"
        );
    }

    #[test]
    fn untitled_terminal_scene_shows_restart_control() {
        let mut navigator = navigator();
        navigator.choose("end").expect("end");
        let scene = navigator.current_scene().expect("scene");
        let text = render_scene_text(&project_scene(scene, DEFAULT_RESTART_LABEL));

        assert!(!text.contains("=="));
        assert!(text.ends_with("  1. Начать сначала\n"));
    }

    #[test]
    fn selection_parsing_is_one_based_and_bounded() {
        assert_eq!(parse_selection("1", 2), Ok(0));
        assert_eq!(parse_selection("2", 2), Ok(1));
        assert!(parse_selection("0", 2).is_err());
        assert!(parse_selection("3", 2).is_err());
        assert!(parse_selection("two", 2).is_err());
    }

    #[test]
    fn script_parsing_skips_blank_and_comment_lines() {
        let content = "\n# knock first\n1\n\n  # then restart\n 1 \n";
        assert_eq!(parse_script(content), Ok(vec![1, 1]));
    }

    #[test]
    fn script_parsing_reports_bad_line_number() {
        let error = parse_script("1\nleft\n").expect_err("bad step");
        assert!(error.starts_with("script line 2:"));
        assert!(parse_script("0").is_err());
    }

    #[test]
    fn play_session_walks_to_end_and_restarts() {
        let mut navigator = navigator();
        let mut input = Cursor::new("1\n1\nq\n");
        let mut stdout = Vec::new();

        play_session(&mut navigator, DEFAULT_RESTART_LABEL, &mut input, &mut stdout)
            .expect("session");

        assert_eq!(navigator.current_id().as_str(), "intro");
        assert_eq!(navigator.entry_count(), 3);
        let printed = output(stdout);
        assert!(printed.contains("Done."));
        assert_eq!(printed.matches("== Gate ==").count(), 2);
    }

    #[test]
    fn invalid_input_is_reported_and_asked_again() {
        let mut navigator = navigator();
        let mut input = Cursor::new("9\nabc\n2\n");
        let mut stdout = Vec::new();

        play_session(&mut navigator, DEFAULT_RESTART_LABEL, &mut input, &mut stdout)
            .expect("session");

        let printed = output(stdout);
        assert!(printed.contains("expected a number between 1 and 2, got '9'"));
        assert!(printed.contains("got 'abc'"));
        assert_eq!(navigator.entry_count(), 2);
        assert_eq!(navigator.current_id().as_str(), "intro");
    }

    #[test]
    fn end_of_input_stops_session() {
        let mut navigator = navigator();
        let mut input = Cursor::new("");
        let mut stdout = Vec::new();

        play_session(&mut navigator, DEFAULT_RESTART_LABEL, &mut input, &mut stdout)
            .expect("session");
        assert_eq!(navigator.entry_count(), 1);
    }

    #[test]
    fn replay_prints_every_scene_and_final_state() {
        let mut navigator = navigator();
        let mut stdout = Vec::new();

        replay_script(&mut navigator, "Again", &[2, 1, 1], &mut stdout).expect("replay");

        assert_eq!(navigator.current_id().as_str(), "intro");
        let printed = output(stdout);
        assert_eq!(printed.matches("== Gate ==").count(), 3);
        assert!(printed.contains("  1. Again\n"));
        assert!(printed.contains("> 2\n"));
    }

    #[test]
    fn replay_rejects_out_of_range_selection() {
        let mut navigator = navigator();
        let mut stdout = Vec::new();

        let error = replay_script(&mut navigator, "Again", &[1, 2], &mut stdout)
            .expect_err("terminal scene has one control");

        assert_eq!(
            error,
            "step 2: control 2 is out of range (scene 'end' has 1 controls)"
        );
        assert_eq!(navigator.current_id().as_str(), "end");
    }

    #[test]
    fn run_loads_story_and_script_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let story_file = dir.path().join("story.json");
        let script_file = dir.path().join("walk.txt");
        fs::write(&story_file, STORY).expect("story");
        fs::write(&script_file, "# straight to the end\n1\n").expect("script");
        let paths = resolve_story_paths(Some(story_file), None).expect("paths");
        let mut stdout = Vec::new();

        run(
            CommandKind::Script { path: script_file },
            &paths,
            DEFAULT_RESTART_LABEL,
            &mut Cursor::new(""),
            &mut stdout,
        )
        .expect("run");

        assert_eq!(paths.asset_dir, dir.path());
        assert!(output(stdout).ends_with("Done.\n\n  1. Начать сначала\n"));
    }

    #[test]
    fn run_reports_unreadable_story() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let paths = StoryPaths {
            story_file: dir.path().join("missing.json"),
            asset_dir: dir.path().to_path_buf(),
        };

        let error = run(
            CommandKind::Play,
            &paths,
            DEFAULT_RESTART_LABEL,
            &mut Cursor::new(""),
            &mut Vec::new(),
        )
        .expect_err("missing story");
        assert!(error.starts_with("failed to load story"));
    }
}
