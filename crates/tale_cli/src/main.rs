use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tale_cli::{resolve_story_paths, run, CommandKind};
use tale_engine::PlayerConfig;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }

    let mut story = None;
    let mut assets = None;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--story" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --story".to_string())?;
                story = Some(PathBuf::from(value));
                index += 2;
            }
            "--assets" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --assets".to_string())?;
                assets = Some(PathBuf::from(value));
                index += 2;
            }
            _ => break,
        }
    }

    let command = args
        .get(index)
        .ok_or_else(|| "missing subcommand".to_string())?
        .as_str();
    let command_args = &args[(index + 1)..];

    let kind = match command {
        "play" => {
            if !command_args.is_empty() {
                return Err("play takes no arguments".to_string());
            }
            CommandKind::Play
        }
        "script" => match command_args {
            [path] => CommandKind::Script {
                path: PathBuf::from(path),
            },
            [] => return Err("script requires a file path".to_string()),
            _ => return Err("script takes exactly one file path".to_string()),
        },
        other => return Err(format!("unknown subcommand '{other}'")),
    };

    let paths = resolve_story_paths(story, assets)?;
    let config = PlayerConfig::default()
        .with_env_overrides()
        .map_err(|error| error.to_string())?;
    let stdin = io::stdin();
    run(
        kind,
        &paths,
        &config.restart_label,
        &mut stdin.lock(),
        &mut io::stdout(),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "tale_cli - play a branching story in the terminal",
        "",
        "Usage:",
        "  tale_cli [--story <path>] [--assets <dir>] play",
        "  tale_cli [--story <path>] [--assets <dir>] script <file>",
        "",
        "Defaults:",
        "  --story   $TALE_STORY, else <root>/assets/story.json",
        "  --assets  directory of --story, else <root>/assets",
        "",
        "Script files hold one control number per line; '#' starts a comment.",
    ]
    .join("\n")
}
