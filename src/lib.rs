//! Routes chat-style text commands to registered operations, injecting a
//! session scope and resolving identifiers on the way.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Engine, command-line options and the demo command set.
pub mod cli;
/// Names and defaults shared across the crate.
pub mod constants;
/// The routing engine: registry, binding, injection and help.
pub mod core;
/// Data models for signatures, settings and the inventory.
pub mod models;
/// The session context.
pub mod state;
/// File-backed collaborators.
pub mod system;
