// LogPanel - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, toml, url.
// Must NOT depend on: app, ui.

pub mod config;
