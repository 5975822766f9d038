use crate::{
    constants::{DEFAULT_GROUP, HELP_KEYWORD},
    core::{
        context_resolver::{Connector, IdentifierResolver, PassthroughResolver},
        errors::DispatchError,
        help,
        injector::{Injector, panic_message},
        operation::Operation,
        registry::{Registry, RegistryError},
    },
    state::SessionContext,
};
use std::panic::{self, AssertUnwindSafe};

/// The result of splitting a message into group, command and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercase group the command belongs to.
    pub group: String,
    /// Lowercase command name within the group.
    pub name: String,
    /// Remaining tokens, passed positionally.
    pub args: Vec<String>,
}

/// Decides the `(group, name, args)` split of a non-empty tokenized message.
///
/// Rules, in order:
/// 1. `<group> <name> [args...]` when the first token is a known group and a
///    second token exists.
/// 2. `<name> [args...]` when the first token is a command of the default group.
/// 3. Anything else is still parsed as a default-group command; the lookup
///    reports it as unknown.
///
/// Group and command tokens are case-insensitive; arguments keep their case.
pub fn parse_command<H>(registry: &Registry<H>, first: &str, rest: &[String]) -> ParsedCommand {
    let first = first.to_lowercase();
    if registry.has_group(&first)
        && let Some((name, args)) = rest.split_first()
    {
        log::debug!("Command group specified. Group: {}, Command: {}, Args: {:?}", first, name, args);
        return ParsedCommand {
            group: first,
            name: name.to_lowercase(),
            args: args.to_vec(),
        };
    }

    if registry.lookup(DEFAULT_GROUP, &first).is_some() {
        log::debug!("Default command group. Command: {}, Args: {:?}", first, rest);
    } else {
        log::warn!(
            "Command may not follow expected structure. Interpreted Command: {}, Args: {:?}",
            first,
            rest
        );
    }

    ParsedCommand {
        group: DEFAULT_GROUP.to_string(),
        name: first,
        args: rest.to_vec(),
    }
}

/// Collects operations and collaborators, then builds an `Engine`.
pub struct EngineBuilder<H> {
    connector: Box<dyn Connector<H>>,
    resolver: Box<dyn IdentifierResolver<H>>,
    operations: Vec<Operation<H>>,
    initial_scope: Option<String>,
}

impl<H> std::fmt::Debug for EngineBuilder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("operations", &self.operations)
            .field("initial_scope", &self.initial_scope)
            .finish_non_exhaustive()
    }
}

impl<H: 'static> EngineBuilder<H> {
    /// Starts a builder. Identifiers pass through unchanged until a resolver is set.
    pub fn new(connector: impl Connector<H> + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            resolver: Box::new(PassthroughResolver),
            operations: Vec::new(),
            initial_scope: None,
        }
    }

    /// Sets the identifier resolver.
    pub fn resolver(mut self, resolver: impl IdentifierResolver<H> + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Queues one operation.
    pub fn register(mut self, operation: Operation<H>) -> Self {
        self.operations.push(operation);
        self
    }

    /// Queues several operations.
    pub fn register_all(mut self, operations: impl IntoIterator<Item = Operation<H>>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Session scope the engine starts with.
    pub fn initial_scope(mut self, scope: Option<String>) -> Self {
        self.initial_scope = scope;
        self
    }

    /// Registers every collected operation exactly once.
    ///
    /// # Errors
    /// Fails on the first registration conflict; no engine is produced.
    pub fn build(self) -> Result<Engine<H>, RegistryError> {
        let mut registry = Registry::new();
        for operation in self.operations {
            log::debug!("Registering command: {} {}", operation.group(), operation.name());
            registry.register(operation)?;
        }
        log::info!("Registered {} command(s).", registry.len());

        Ok(Engine {
            registry,
            session: SessionContext::new(self.initial_scope),
            connector: self.connector,
            resolver: self.resolver,
        })
    }
}

/// Owns the registry and the session context and answers chat messages.
pub struct Engine<H> {
    registry: Registry<H>,
    session: SessionContext,
    connector: Box<dyn Connector<H>>,
    resolver: Box<dyn IdentifierResolver<H>>,
}

impl<H> std::fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<H> Engine<H> {
    /// Turns one raw message into the text to send back. Never fails.
    pub fn respond(&self, message: &str) -> String {
        log::debug!("Received message: {}", message);
        let tokens: Vec<String> = message.split_whitespace().map(str::to_string).collect();

        let Some((first, rest)) = tokens.split_first() else {
            log::warn!("No command parts found after splitting message.");
            return t!("dispatch.empty").to_string();
        };

        if first.eq_ignore_ascii_case(HELP_KEYWORD) {
            let group = rest.first().map(|g| g.to_lowercase());
            return self.help(group.as_deref());
        }

        let parsed = parse_command(&self.registry, first, rest);

        match self.invoke(&parsed.group, &parsed.name, parsed.args, Vec::new()) {
            Ok(response) => {
                log::debug!("Command function executed successfully. Result: {}", response);
                response
            }
            Err(e) => {
                match &e {
                    DispatchError::UnknownCommand { .. } => log::warn!("{}", e),
                    _ => log::error!("{}", e),
                }
                e.to_response()
            }
        }
    }

    /// Looks up and runs a command with explicit positional and keyword arguments.
    ///
    /// # Errors
    /// Every failure of the dispatch pipeline, as a `DispatchError`.
    pub fn invoke(
        &self,
        group: &str,
        name: &str,
        positional: Vec<String>,
        keyword: Vec<(String, String)>,
    ) -> Result<String, DispatchError> {
        let operation =
            self.registry
                .lookup(group, name)
                .ok_or_else(|| DispatchError::UnknownCommand {
                    group: group.to_string(),
                    name: name.to_string(),
                })?;

        let handle = panic::catch_unwind(AssertUnwindSafe(|| self.connector.connect()))
            .map_err(|payload| DispatchError::Connectivity {
                message: panic_message(payload.as_ref()),
            })?
            .map_err(|e| DispatchError::Connectivity {
                message: format!("{:#}", e),
            })?;

        Injector::new(&self.session, self.resolver.as_ref()).invoke(
            operation, &handle, positional, keyword,
        )
    }

    /// The command listing for the current session state.
    pub fn help(&self, group: Option<&str>) -> String {
        log::debug!("Generating help message for group {:?}.", group);
        help::render(&self.registry, self.session.is_set(), group)
    }

    /// The session context shared by every dispatch.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The registered operations.
    pub fn registry(&self) -> &Registry<H> {
        &self.registry
    }
}
