// src/cli/handlers/mod.rs

// The operations the `chatroute` binary serves, one module per command group.

use crate::{
    cli::dispatcher::{Engine, EngineBuilder},
    core::{operation::Operation, registry::RegistryError},
    system::inventory::{Inventory, InventoryClient},
};
use std::sync::Arc;

/// Formatting shared by the handlers.
pub mod commons;
/// `nodes` and `node status`.
pub mod node;
/// `session node`, `session clear` and `session show`.
pub mod session;
/// `vm list`, `vm status` and the power operations.
pub mod vm;

/// The backend handle every demo operation receives.
pub type Api = Arc<Inventory>;

/// Every operation of the demo command set.
pub fn operations() -> Vec<Operation<Api>> {
    let mut ops = Vec::new();
    ops.extend(node::operations());
    ops.extend(vm::operations());
    ops.extend(session::operations());
    ops
}

/// Builds the engine used by the binary.
pub fn build_engine(
    client: InventoryClient,
    initial_node: Option<String>,
) -> Result<Engine<Api>, RegistryError> {
    EngineBuilder::new(client)
        .resolver(|api: &Api, node: Option<&str>, raw: &str| api.resolve_vm_identifier(node, raw))
        .register_all(operations())
        .initial_scope(initial_node)
        .build()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) const SAMPLE_INVENTORY: &str = r#"
[[nodes]]
name = "pve1"

[[nodes.vms]]
id = 101
name = "web"
status = "running"

[[nodes.vms]]
id = 102
name = "db"

[[nodes]]
name = "pve2"
online = false
"#;

    /// An engine over a temporary copy of `SAMPLE_INVENTORY`.
    pub(crate) fn engine(initial_node: Option<&str>) -> (Engine<Api>, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.toml");
        fs::write(&path, SAMPLE_INVENTORY).unwrap();
        let engine = build_engine(InventoryClient::new(path), initial_node.map(str::to_string)).unwrap();
        (engine, dir)
    }
}
