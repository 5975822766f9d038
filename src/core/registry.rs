// src/core/registry.rs

use crate::{
    constants::HELP_KEYWORD,
    core::operation::Operation,
    models::ParamRole,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

lazy_static! {
    static ref DECLARED_NAME_RE: Regex =
        Regex::new(r"^[A-Za-z0-9]+(?:[_-][A-Za-z0-9]+)*$").expect("static regex is valid");
}

/// Startup-time configuration errors. Any of these aborts engine construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The `(group, name)` key is taken.
    #[error("Command '{name}' is already registered in group '{group}'.")]
    Duplicate {
        /// Group of the clashing operation.
        group: String,
        /// Name of the clashing operation.
        name: String,
    },
    /// The declared name is empty or contains unsupported characters.
    #[error("Invalid operation name '{declared}'.")]
    InvalidName {
        /// The name as declared.
        declared: String,
    },
    /// Group or command would shadow the help keyword.
    #[error("'{name}' is reserved and cannot be used as a group or command name.")]
    ReservedName {
        /// The reserved part.
        name: String,
    },
    /// Two parameters share a name.
    #[error("Command '{command}' declares parameter '{param}' more than once.")]
    DuplicateParam {
        /// Qualified name of the operation.
        command: String,
        /// The repeated parameter.
        param: String,
    },
    /// More than one implicit-context or resolvable parameter.
    #[error("Command '{command}' declares more than one {role:?} parameter.")]
    DuplicateRole {
        /// Qualified name of the operation.
        command: String,
        /// The repeated role.
        role: ParamRole,
    },
}

/// Catalog of operations keyed by group, then by command name.
///
/// Filled once while the engine is built and only read afterwards.
pub struct Registry<H> {
    groups: BTreeMap<String, BTreeMap<String, Operation<H>>>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<H> std::fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.groups
                    .iter()
                    .map(|(group, ops)| (group, ops.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

impl<H> Registry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an operation under its `(group, name)`.
    ///
    /// # Errors
    /// Rejects duplicate keys, malformed or reserved names and signatures that
    /// repeat a parameter name or a non-ordinary role.
    pub fn register(&mut self, operation: Operation<H>) -> Result<(), RegistryError> {
        validate(&operation)?;

        let ops = self.groups.entry(operation.group().to_string()).or_default();
        if ops.contains_key(operation.name()) {
            return Err(RegistryError::Duplicate {
                group: operation.group().to_string(),
                name: operation.name().to_string(),
            });
        }

        log::debug!(
            "Command '{}' registered under group '{}'",
            operation.name(),
            operation.group()
        );
        ops.insert(operation.name().to_string(), operation);
        Ok(())
    }

    /// Finds an operation. Group and name match case-insensitively.
    pub fn lookup(&self, group: &str, name: &str) -> Option<&Operation<H>> {
        self.groups
            .get(&group.to_lowercase())
            .and_then(|ops| ops.get(&name.to_lowercase()))
    }

    /// Group names in sorted order.
    pub fn list_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Whether any operation is registered under `group` (case-insensitive).
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(&group.to_lowercase())
    }

    /// The operations of one group, keyed by command name.
    pub fn operations_in(&self, group: &str) -> Option<&BTreeMap<String, Operation<H>>> {
        self.groups.get(&group.to_lowercase())
    }

    /// Number of registered operations across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate<H>(operation: &Operation<H>) -> Result<(), RegistryError> {
    if !DECLARED_NAME_RE.is_match(operation.declared_name()) {
        return Err(RegistryError::InvalidName {
            declared: operation.declared_name().to_string(),
        });
    }

    for name in [operation.group(), operation.name()] {
        if name.eq_ignore_ascii_case(HELP_KEYWORD) {
            return Err(RegistryError::ReservedName {
                name: name.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for param in operation.params() {
        if !seen.insert(param.name.as_str()) {
            return Err(RegistryError::DuplicateParam {
                command: operation.qualified_name(),
                param: param.name.clone(),
            });
        }
    }

    for role in [ParamRole::ImplicitContext, ParamRole::ResolvableIdentifier] {
        if operation.params().iter().filter(|p| p.role == role).count() > 1 {
            return Err(RegistryError::DuplicateRole {
                command: operation.qualified_name(),
                role,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operation::Invocation;

    fn noop(_: &Invocation<'_, ()>) -> anyhow::Result<String> {
        Ok(String::new())
    }

    #[test]
    fn test_lookup_returns_registered_descriptor() {
        // --- Setup ---
        let mut registry = Registry::new();
        registry
            .register(Operation::new("vm_reboot", "Reboot a VM", noop).context_param("node"))
            .unwrap();
        registry
            .register(Operation::new("nodes", "List nodes", noop))
            .unwrap();

        // --- Execute ---
        let op = registry.lookup("vm", "reboot");

        // --- Assert ---
        let op = op.expect("vm reboot should be registered");
        assert_eq!(op.description(), "Reboot a VM");
        assert_eq!(op.params().len(), 1);
        assert!(registry.lookup("default", "nodes").is_some());
        assert!(registry.lookup("vm", "nodes").is_none());
        assert_eq!(registry.list_groups().collect::<Vec<_>>(), vec!["default", "vm"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.operations_in("vm").map(BTreeMap::len), Some(1));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register(Operation::new("vm_reboot", "first", noop))
            .unwrap();

        let err = registry
            .register(Operation::new("vm_reboot", "second", noop))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::Duplicate {
                group: "vm".to_string(),
                name: "reboot".to_string()
            }
        );
        // The first registration is left untouched.
        assert_eq!(
            registry.lookup("vm", "reboot").map(Operation::description),
            Some("first")
        );

        // Keys are case-insensitive.
        let err = registry
            .register(Operation::new("VM_Reboot", "third", noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));
        assert!(registry.has_group("Vm"));
        assert!(registry.lookup("VM", "REBOOT").is_some());
    }

    #[test]
    fn test_invalid_signatures_are_rejected() {
        let mut registry = Registry::<()>::new();

        let err = registry
            .register(Operation::new("vm reboot", "", noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }));

        let err = registry
            .register(Operation::new("help", "", noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::ReservedName { .. }));

        let err = registry
            .register(
                Operation::new("vm_move", "", noop)
                    .context_param("node")
                    .context_param("target"),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateRole {
                command: "vm.move".to_string(),
                role: ParamRole::ImplicitContext
            }
        );

        let err = registry
            .register(Operation::new("vm_tag", "", noop).param("tag").param("tag"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateParam { .. }));
        assert!(registry.is_empty());
    }
}
