//! # System Interaction Layer
//!
//! Everything that touches files outside the engine itself.
//!
//! ## Modules
//!
//! - **`inventory`**: The demo management backend. Loads nodes and virtual
//!   machines from an `inventory.toml`, serves as the engine's connector and
//!   resolves VM references by id or name.
//! - **`settings`**: Loads and validates the binary's `config.toml`.

/// Demo inventory backend.
pub mod inventory;
/// `config.toml` loading.
pub mod settings;
