// Library surface for the binary and the headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod keymap;
pub mod language;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod theme;
pub mod time_series;
pub mod typing_policy;
pub mod ui;
pub mod word_generator;
