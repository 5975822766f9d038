// src/cli/handlers/commons.rs

// Formatting shared by the demo handlers.

use crate::models::{NodeConfig, VmConfig, VmStatus};

/// Colored dot for a power state.
pub fn status_icon(status: VmStatus) -> &'static str {
    match status {
        VmStatus::Running => "🟢",
        VmStatus::Stopped => "🔴",
    }
}

/// One line per VM: `🟢 101 web (running)`.
pub fn format_vm(vm: &VmConfig) -> String {
    format!("{} {} {} ({})", status_icon(vm.status), vm.id, vm.name, vm.status)
}

/// Summary line: `**pve1** (online): 1/2 VM(s) running`.
pub fn format_node(node: &NodeConfig) -> String {
    let running = node
        .vms
        .iter()
        .filter(|vm| vm.status == VmStatus::Running)
        .count();
    let state = if node.online { "online" } else { "offline" };
    format!(
        "**{}** ({}): {}/{} VM(s) running",
        node.name,
        state,
        running,
        node.vms.len()
    )
}
