mod bootstrap;
mod cli;
mod loop_runner;
mod script;

pub(crate) use bootstrap::build_app;
pub(crate) use cli::{parse_args, usage_text};
pub(crate) use loop_runner::run;
