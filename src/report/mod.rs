//! Report output in text, Markdown and JSON formats.

pub mod generator;

pub use generator::{render, write_report};
