// src/cli/handlers/node.rs

use super::{Api, commons};
use crate::core::operation::{Invocation, Operation};
use anyhow::Result;

/// The operations of the `node` handlers.
pub fn operations() -> Vec<Operation<Api>> {
    vec![
        Operation::new("nodes", "List all nodes and how many VMs run on each.", list),
        Operation::new("node_status", "Show the state of a node.", status).context_param("node"),
    ]
}

/// Handler for `nodes`.
pub fn list(inv: &Invocation<'_, Api>) -> Result<String> {
    let nodes = inv.handle().nodes();
    if nodes.is_empty() {
        return Ok(t!("inventory.no_nodes").to_string());
    }
    Ok(nodes
        .iter()
        .map(commons::format_node)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Handler for `node status`.
pub fn status(inv: &Invocation<'_, Api>) -> Result<String> {
    let node = inv.handle().node(inv.args().require("node")?)?;
    Ok(commons::format_node(&node))
}

#[cfg(test)]
mod tests {
    use crate::cli::handlers::test_support::engine;

    #[test]
    fn test_nodes_lists_every_node() {
        let (engine, _dir) = engine(None);
        assert_eq!(
            engine.respond("nodes"),
            "**pve1** (online): 1/2 VM(s) running\n**pve2** (offline): 0/0 VM(s) running"
        );
    }

    #[test]
    fn test_node_status_uses_session_node() {
        let (engine, _dir) = engine(Some("pve2"));
        assert_eq!(engine.respond("node status"), "**pve2** (offline): 0/0 VM(s) running");

        let response = engine.respond("node status pve1");
        assert_eq!(response, t!("dispatch.usage"));
    }

    #[test]
    fn test_unknown_node_is_an_operation_failure() {
        let (engine, _dir) = engine(None);
        let response = engine.respond("node status pve9");
        assert!(response.contains("node.status"));
        assert!(response.contains("Node 'pve9' not found."));
    }
}
