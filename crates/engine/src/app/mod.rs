mod input;
mod layout;
mod loop_runner;
mod rendering;

pub use loop_runner::{run_app, AppError, PlayerConfig, RESTART_LABEL_ENV_VAR};
