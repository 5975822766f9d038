//! Error types surfaced by a dispatch.
//!
//! None of these ever cross `Engine::respond`; each one is turned into a
//! localized response line there. The `Display` text carries the internal
//! detail and is only written to the log.

use crate::core::arg_parser::BindError;
use thiserror::Error;

/// Every way a single dispatch can fail.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The management backend could not be reached.
    #[error("failed to connect to the management API: {message}")]
    Connectivity {
        /// Internal detail, logged only.
        message: String,
    },

    /// The identifier resolver did not recognise a user-typed value.
    #[error("could not resolve identifier '{raw}' (scope: {scope:?})")]
    Unresolved {
        /// The value as typed.
        raw: String,
        /// Scope the lookup ran in.
        scope: Option<String>,
    },

    /// The arguments did not fit the command's signature.
    #[error("invalid usage of '{command}': {source}")]
    Usage {
        /// Qualified name of the operation.
        command: String,
        /// Why binding failed.
        #[source]
        source: BindError,
    },

    /// The operation body returned an error or panicked.
    #[error("operation '{command}' failed: {message}")]
    Operation {
        /// Qualified name of the operation.
        command: String,
        /// The error chain or panic text.
        message: String,
    },

    /// No operation is registered under the parsed group and name.
    #[error("unknown command '{name}' in group '{group}'")]
    UnknownCommand {
        /// Parsed group.
        group: String,
        /// Parsed command name.
        name: String,
    },
}

impl DispatchError {
    /// The text returned to the chat user for this failure.
    pub fn to_response(&self) -> String {
        match self {
            Self::Connectivity { .. } => t!("dispatch.connect_failed").to_string(),
            Self::Unresolved { raw, .. } => format!(t!("dispatch.unresolved"), raw = raw),
            // Binding details stay in the log.
            Self::Usage { .. } => t!("dispatch.usage").to_string(),
            Self::Operation { command, message } => format!(
                t!("dispatch.operation_failed"),
                command = command,
                message = message
            ),
            Self::UnknownCommand { .. } => t!("dispatch.unknown").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_response_hides_binding_details() {
        let err = DispatchError::Usage {
            command: "vm.reboot".to_string(),
            source: BindError::MissingArgument {
                name: "vm_id".to_string(),
            },
        };

        assert!(err.to_string().contains("vm_id"));
        assert_eq!(err.to_response(), t!("dispatch.usage"));
        assert!(!err.to_response().contains("vm_id"));
    }

    #[test]
    fn test_responses_name_the_offending_values() {
        let unresolved = DispatchError::Unresolved {
            raw: "webx".to_string(),
            scope: Some("pve1".to_string()),
        };
        assert!(unresolved.to_response().contains("webx"));

        let failed = DispatchError::Operation {
            command: "vm.reboot".to_string(),
            message: "boom".to_string(),
        };
        let response = failed.to_response();
        assert!(response.contains("vm.reboot"));
        assert!(response.contains("boom"));
    }
}
