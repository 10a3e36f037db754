// LogPanel - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, chrono, regex, serde.
// Must NOT depend on: ui, platform, app, or any I/O crate directly.

pub mod filter;
pub mod model;
pub mod refresh;
