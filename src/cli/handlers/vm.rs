// src/cli/handlers/vm.rs

use super::{Api, commons};
use crate::{
    core::operation::{Invocation, Operation},
    models::VmStatus,
};
use anyhow::Result;

/// The operations of the `vm` handlers.
pub fn operations() -> Vec<Operation<Api>> {
    vec![
        Operation::new("vm_list", "List the virtual machines of a node.", list)
            .context_param("node"),
        Operation::new("vm_status", "Show the state of a virtual machine.", status)
            .context_param("node")
            .resolvable_param("vm_id"),
        Operation::new("vm_start", "Start a virtual machine.", start)
            .context_param("node")
            .resolvable_param("vm_id"),
        Operation::new("vm_stop", "Stop a virtual machine.", stop)
            .context_param("node")
            .resolvable_param("vm_id"),
        Operation::new("vm_reboot", "Reboot a running virtual machine.", reboot)
            .context_param("node")
            .resolvable_param("vm_id"),
    ]
}

/// The `(node, vm_id)` pair every VM command works on.
fn target<'a>(inv: &'a Invocation<'_, Api>) -> Result<(&'a str, &'a str)> {
    Ok((inv.args().require("node")?, inv.args().require("vm_id")?))
}

/// Handler for `vm list`.
pub fn list(inv: &Invocation<'_, Api>) -> Result<String> {
    let node = inv.args().require("node")?;
    let vms = inv.handle().vms(node)?;
    if vms.is_empty() {
        return Ok(format!(t!("inventory.no_vms"), node = node));
    }
    Ok(vms.iter().map(commons::format_vm).collect::<Vec<_>>().join("\n"))
}

/// Handler for `vm status`.
pub fn status(inv: &Invocation<'_, Api>) -> Result<String> {
    let (node, vm_id) = target(inv)?;
    let vm = inv.handle().vm(node, vm_id)?;
    Ok(commons::format_vm(&vm))
}

/// Handler for `vm start`.
pub fn start(inv: &Invocation<'_, Api>) -> Result<String> {
    let (node, vm_id) = target(inv)?;
    let vm = inv.handle().set_status(node, vm_id, VmStatus::Running)?;
    log::info!("VM {} started on node '{}'.", vm.id, node);
    Ok(format!(t!("inventory.vm_started"), vm = vm.id, node = node))
}

/// Handler for `vm stop`.
pub fn stop(inv: &Invocation<'_, Api>) -> Result<String> {
    let (node, vm_id) = target(inv)?;
    let vm = inv.handle().set_status(node, vm_id, VmStatus::Stopped)?;
    log::info!("VM {} stopped on node '{}'.", vm.id, node);
    Ok(format!(t!("inventory.vm_stopped"), vm = vm.id, node = node))
}

/// Handler for `vm reboot`. Only running machines can be rebooted.
pub fn reboot(inv: &Invocation<'_, Api>) -> Result<String> {
    let (node, vm_id) = target(inv)?;
    let vm = inv.handle().vm(node, vm_id)?;
    if vm.status != VmStatus::Running {
        anyhow::bail!("VM {} is not running.", vm.id);
    }
    log::info!("VM {} rebooted on node '{}'.", vm.id, node);
    Ok(format!(t!("inventory.vm_rebooted"), vm = vm.id, node = node))
}

#[cfg(test)]
mod tests {
    use crate::cli::handlers::test_support::engine;

    #[test]
    fn test_list_with_and_without_session() {
        let (engine, _dir) = engine(None);
        let expected = "🟢 101 web (running)\n🔴 102 db (stopped)";

        assert_eq!(engine.respond("vm list pve1"), expected);
        engine.respond("session node pve1");
        assert_eq!(engine.respond("vm list"), expected);
    }

    #[test]
    fn test_status_resolves_names() {
        let (engine, _dir) = engine(Some("pve1"));
        assert_eq!(engine.respond("vm status db"), "🔴 102 db (stopped)");
        assert_eq!(engine.respond("vm status 101"), "🟢 101 web (running)");

        let response = engine.respond("vm status mail");
        assert_eq!(response, format!(t!("dispatch.unresolved"), raw = "mail"));
    }

    #[test]
    fn test_power_cycle() {
        // --- Setup ---
        let (engine, _dir) = engine(Some("pve1"));

        // --- Execute & Assert ---
        assert_eq!(
            engine.respond("vm start db"),
            format!(t!("inventory.vm_started"), vm = 102, node = "pve1")
        );
        assert_eq!(engine.respond("vm status db"), "🟢 102 db (running)");
        assert_eq!(
            engine.respond("vm reboot db"),
            format!(t!("inventory.vm_rebooted"), vm = 102, node = "pve1")
        );
        assert_eq!(
            engine.respond("vm stop 102"),
            format!(t!("inventory.vm_stopped"), vm = 102, node = "pve1")
        );

        // Stopping again fails inside the operation and names it.
        let response = engine.respond("vm stop db");
        assert!(response.contains("vm.stop"));
        assert!(response.contains("already stopped"));

        let response = engine.respond("vm reboot db");
        assert!(response.contains("vm.reboot"));
        assert!(response.contains("is not running"));
    }

    #[test]
    fn test_offline_node_reports_failure() {
        let (engine, _dir) = engine(None);
        let response = engine.respond("vm list pve2");
        assert!(response.contains("Node 'pve2' is offline."));
    }
}
