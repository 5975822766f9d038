// src/cli/handlers/session.rs

// Commands that change which node the conversation is about.

use super::Api;
use crate::core::operation::{Invocation, Operation};
use anyhow::Result;

/// The operations of the `session` handlers.
pub fn operations() -> Vec<Operation<Api>> {
    vec![
        Operation::new("session_node", "Select the node later commands act on.", select).param("node"),
        Operation::new("session_clear", "Forget the selected node.", clear),
        Operation::new("session_show", "Show the selected node.", show),
    ]
}

/// Handler for `session node <node>`. The node must exist in the inventory.
pub fn select(inv: &Invocation<'_, Api>) -> Result<String> {
    let node = inv.handle().node(inv.args().require("node")?)?;
    inv.session().set_scope(node.name.clone());
    Ok(format!(t!("session.node_set"), node = node.name))
}

/// Handler for `session clear`.
pub fn clear(inv: &Invocation<'_, Api>) -> Result<String> {
    inv.session().clear();
    Ok(t!("session.cleared").to_string())
}

/// Handler for `session show`.
pub fn show(inv: &Invocation<'_, Api>) -> Result<String> {
    Ok(match inv.session().get_scope() {
        Some(node) => format!(t!("session.show_node"), node = node),
        None => t!("session.show_empty").to_string(),
    })
}
