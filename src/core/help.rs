// src/core/help.rs

use crate::{
    constants::DEFAULT_GROUP,
    core::{operation::Operation, registry::Registry},
};

/// One rendered line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandUsage {
    /// What the user types, e.g. `vm reboot <vm_id>`.
    pub command: String,
    /// The operation's description.
    pub description: String,
}

/// Builds the usage string of an operation as the user has to type it right now.
///
/// Uses `Operation::user_params`, the same view the injector binds against,
/// so the listing follows the session context.
pub fn command_usage<H>(operation: &Operation<H>, scope_selected: bool) -> CommandUsage {
    let mut parts = Vec::new();
    if operation.group() != DEFAULT_GROUP {
        parts.push(operation.group().to_string());
    }
    parts.push(operation.name().to_string());
    parts.extend(
        operation
            .user_params(scope_selected)
            .into_iter()
            .map(|p| format!("<{}>", p.name)),
    );

    let description = if operation.description().trim().is_empty() {
        t!("help.no_description").to_string()
    } else {
        operation.description().to_string()
    };

    CommandUsage {
        command: parts.join(" "),
        description,
    }
}

/// Renders the command listing, optionally restricted to one group.
///
/// The `default` group comes first, the rest in name order. Returns the
/// "no commands" message when nothing matches.
pub fn render<H>(registry: &Registry<H>, scope_selected: bool, group: Option<&str>) -> String {
    let default_first = registry
        .list_groups()
        .filter(|g| *g == DEFAULT_GROUP)
        .chain(registry.list_groups().filter(|g| *g != DEFAULT_GROUP));

    let mut blocks = Vec::new();
    for group_name in default_first {
        if group.is_some_and(|wanted| wanted != group_name) {
            continue;
        }
        let Some(operations) = registry.operations_in(group_name) else {
            continue;
        };

        let usages: Vec<CommandUsage> = operations
            .values()
            .map(|op| command_usage(op, scope_selected))
            .collect();
        if !usages.is_empty() {
            blocks.push(commands_to_markdown(group_name, &usages));
        }
    }

    if blocks.is_empty() {
        t!("help.no_commands").to_string()
    } else {
        blocks.join("\n\n")
    }
}

fn commands_to_markdown(group: &str, usages: &[CommandUsage]) -> String {
    let mut out = format!("**{}**", group);
    for usage in usages {
        out.push_str(&format!("\n- `{}`: {}", usage.command, usage.description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::Invocation;

    fn noop(_: &Invocation<'_, ()>) -> anyhow::Result<String> {
        Ok(String::new())
    }

    fn registry() -> Registry<()> {
        let mut registry = Registry::new();
        registry
            .register(
                Operation::new("vm_reboot", "Reboot a VM", noop)
                    .context_param("node")
                    .resolvable_param("vm_id"),
            )
            .unwrap();
        registry
            .register(Operation::new("nodes", "", noop))
            .unwrap();
        registry
            .register(Operation::new("session_node", "Select a node", noop).param("node"))
            .unwrap();
        registry
    }

    #[test]
    fn test_context_param_follows_session() {
        // --- Setup ---
        let registry = registry();
        let op = registry.lookup("vm", "reboot").unwrap();

        // --- Execute ---
        let with_scope = command_usage(op, true);
        let without_scope = command_usage(op, false);

        // --- Assert ---
        assert_eq!(with_scope.command, "vm reboot <vm_id>");
        assert_eq!(without_scope.command, "vm reboot <node> <vm_id>");
    }

    #[test]
    fn test_render_lists_default_group_first_without_prefix() {
        let output = render(&registry(), true, None);

        let expected = format!(
            "**default**\n- `nodes`: {}\n\n**session**\n- `session node <node>`: Select a node\n\n**vm**\n- `vm reboot <vm_id>`: Reboot a VM",
            t!("help.no_description")
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_filters_by_group() {
        let output = render(&registry(), false, Some("vm"));
        assert_eq!(output, "**vm**\n- `vm reboot <node> <vm_id>`: Reboot a VM");

        let output = render(&registry(), false, Some("storage"));
        assert_eq!(output, t!("help.no_commands"));
    }

    #[test]
    fn test_render_empty_registry() {
        let registry = Registry::<()>::new();
        assert_eq!(render(&registry, false, None), t!("help.no_commands"));
    }
}
