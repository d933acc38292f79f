mod bootstrap;
mod loop_runner;

pub(crate) use bootstrap::{build_app, init_tracing};
pub(crate) use loop_runner::run;
