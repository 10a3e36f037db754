// LogPanel - ui/panels/mod.rs

pub mod detail;
pub mod filters;
pub mod log_table;
pub mod toast;
pub mod toolbar;
