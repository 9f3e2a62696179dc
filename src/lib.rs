//! Terminal front end for page analyses.
//!
//! The interesting part is [`dialog::DialogController`]: a modal dialog that
//! shows a spinner while an analysis runs and a templated message when it
//! fails. Everything else wires it to a terminal and an analysis backend.

pub mod analysis;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod template;
pub mod theme;
pub mod tui;
pub mod ui;

pub use theme::Theme;
