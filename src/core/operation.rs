//! # Operation Descriptors
//!
//! An `Operation` is an ordinary function plus the metadata the engine needs to
//! call it from chat: its group and command name, a description for the help
//! listing, and the ordered list of declared parameters with their roles.
//!
//! Everything here is fixed when the operation is built. Dispatch never looks
//! at parameter names to decide how to treat them; it reads the `ParamRole`.

use crate::{
    constants::{DEFAULT_GROUP, GROUP_SEPARATOR},
    core::arg_parser::BoundArgs,
    models::{ParamRole, ParamSpec},
    state::SessionContext,
};
use std::fmt;

/// The callable behind an operation. It receives the connected backend handle,
/// the session and the fully bound arguments.
pub type OperationBody<H> =
    Box<dyn Fn(&Invocation<'_, H>) -> anyhow::Result<String> + Send + Sync>;

/// Immutable descriptor of a registered operation.
pub struct Operation<H> {
    declared_name: String,
    group: String,
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    body: OperationBody<H>,
}

impl<H> Operation<H> {
    /// Creates an operation from its declared name (e.g. `vm_reboot`).
    ///
    /// The group is the part before the first `_`; names without a separator
    /// land in the `default` group. Name validity is checked on registration.
    pub fn new<F>(declared_name: impl Into<String>, description: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Invocation<'_, H>) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        let declared_name = declared_name.into();
        let (group, name) = split_declared_name(&declared_name);
        Self {
            declared_name,
            group,
            name,
            description: description.into(),
            params: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Declares a required ordinary parameter.
    pub fn param(self, name: impl Into<String>) -> Self {
        self.declare(ParamSpec::new(name, ParamRole::Ordinary))
    }

    /// Declares an ordinary parameter with a default value.
    pub fn optional_param(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.declare(ParamSpec::new(name, ParamRole::Ordinary).with_default(default))
    }

    /// Declares the parameter filled from the session context.
    pub fn context_param(self, name: impl Into<String>) -> Self {
        self.declare(ParamSpec::new(name, ParamRole::ImplicitContext))
    }

    /// Declares the parameter whose value goes through the identifier resolver.
    pub fn resolvable_param(self, name: impl Into<String>) -> Self {
        self.declare(ParamSpec::new(name, ParamRole::ResolvableIdentifier))
    }

    /// Declares a fully specified parameter.
    pub fn declare(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// The name the operation was created with.
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// Lowercase group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Lowercase command name within the group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown in the help listing.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared parameters in order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// `group.name`, used in logs and failure messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }

    /// Index of the first parameter declared with `role`.
    pub fn position_of(&self, role: ParamRole) -> Option<usize> {
        self.params.iter().position(|p| p.role == role)
    }

    /// The parameters a user has to type, in the order they have to type them.
    ///
    /// When no scope is selected the implicit-context parameter is moved to
    /// the front, because the injector consumes the first token for it. When a
    /// scope is selected it disappears entirely.
    pub fn user_params(&self, scope_selected: bool) -> Vec<&ParamSpec> {
        let context = self
            .params
            .iter()
            .filter(|p| p.role == ParamRole::ImplicitContext);
        let rest = self
            .params
            .iter()
            .filter(|p| p.role != ParamRole::ImplicitContext);
        if scope_selected {
            rest.collect()
        } else {
            context.chain(rest).collect()
        }
    }

    pub(crate) fn call(&self, invocation: &Invocation<'_, H>) -> anyhow::Result<String> {
        (self.body)(invocation)
    }
}

impl<H> fmt::Debug for Operation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Splits `vm_reboot` into (`vm`, `reboot`) and `status` into (`default`, `status`).
/// Both parts are stored lowercase.
pub fn split_declared_name(declared: &str) -> (String, String) {
    match declared.split_once(GROUP_SEPARATOR) {
        Some((group, name)) if !group.is_empty() && !name.is_empty() => {
            (group.to_lowercase(), name.to_lowercase())
        }
        _ => (DEFAULT_GROUP.to_string(), declared.to_lowercase()),
    }
}

/// Everything an operation body gets to see during one call.
pub struct Invocation<'a, H> {
    handle: &'a H,
    session: &'a SessionContext,
    args: BoundArgs,
    qualified_name: String,
}

impl<'a, H> Invocation<'a, H> {
    pub(crate) fn new(
        handle: &'a H,
        session: &'a SessionContext,
        args: BoundArgs,
        qualified_name: String,
    ) -> Self {
        Self {
            handle,
            session,
            args,
            qualified_name,
        }
    }

    /// The connected backend handle.
    pub fn handle(&self) -> &H {
        self.handle
    }

    /// The engine's session context.
    pub fn session(&self) -> &SessionContext {
        self.session
    }

    /// The bound arguments.
    pub fn args(&self) -> &BoundArgs {
        &self.args
    }

    /// `group.name` of the running operation.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }
}

impl<H> fmt::Debug for Invocation<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("qualified_name", &self.qualified_name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Invocation<'_, ()>) -> anyhow::Result<String> {
        Ok(String::new())
    }

    #[test]
    fn test_group_is_derived_from_declared_name() {
        let op = Operation::new("vm_reboot", "Reboot a VM", noop);
        assert_eq!(op.group(), "vm");
        assert_eq!(op.name(), "reboot");
        assert_eq!(op.qualified_name(), "vm.reboot");

        let op = Operation::new("nodes", "List nodes", noop);
        assert_eq!(op.group(), DEFAULT_GROUP);
        assert_eq!(op.name(), "nodes");

        let op = Operation::new("VM_Reboot", "Reboot a VM", noop);
        assert_eq!(op.qualified_name(), "vm.reboot");
        assert_eq!(op.declared_name(), "VM_Reboot");
    }

    #[test]
    fn test_only_first_separator_splits_group() {
        let (group, name) = split_declared_name("vm_list_all");
        assert_eq!(group, "vm");
        assert_eq!(name, "list_all");
    }

    #[test]
    fn test_user_params_follow_scope_selection() {
        // --- Setup ---
        let op = Operation::new("vm_migrate", "Migrate a VM", noop)
            .resolvable_param("vm_id")
            .context_param("node")
            .optional_param("target", "auto");

        // --- Execute ---
        let without_scope: Vec<&str> =
            op.user_params(false).iter().map(|p| p.name.as_str()).collect();
        let with_scope: Vec<&str> =
            op.user_params(true).iter().map(|p| p.name.as_str()).collect();

        // --- Assert ---
        assert_eq!(without_scope, vec!["node", "vm_id", "target"]);
        assert_eq!(with_scope, vec!["vm_id", "target"]);
        assert_eq!(op.position_of(ParamRole::ImplicitContext), Some(1));
        assert!(op.params().get(2).is_some_and(ParamSpec::has_default));
    }
}
