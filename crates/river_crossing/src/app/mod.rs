pub(crate) mod bootstrap;
mod config;
pub(crate) mod loop_runner;
mod puzzle;
