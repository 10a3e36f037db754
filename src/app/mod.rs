// LogPanel - app/mod.rs
//
// Application layer: endpoint access, background fetching, and the panel
// controller.
// Dependencies: core layer, ureq, url.
// Must NOT depend on: ui, platform specifics.

pub mod controller;
pub mod fetch;
