// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// --- OPERATION SIGNATURE MODELS ---
// Fixed at registration time and read on every dispatch.

/// How the injector treats a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamRole {
    /// Passed through exactly as the user typed it.
    #[default]
    Ordinary,
    /// Filled from the session context when one is selected, otherwise
    /// required from the user as the first positional token.
    ImplicitContext,
    /// Translated to its canonical form by the identifier resolver before
    /// the operation runs.
    ResolvableIdentifier,
}

/// A single declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name used for keywords and in the help listing.
    pub name: String,
    /// How the injector treats this parameter.
    pub role: ParamRole,
    /// Declared default, applied when no value reaches the parameter.
    pub default: Option<String>,
}

impl ParamSpec {
    /// A parameter without default.
    pub fn new(name: impl Into<String>, role: ParamRole) -> Self {
        Self {
            name: name.into(),
            role,
            default: None,
        }
    }

    /// Sets the declared default.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether a default was declared.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

// --- `config.toml` MODELS ---

/// Runtime settings of the `chatroute` binary.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Only lines starting with this prefix are treated as commands.
    pub prefix: String,
    /// Path to the inventory file. `~` and environment variables are expanded.
    pub inventory: Option<String>,
    /// Session node selected at startup.
    pub node: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: crate::constants::DEFAULT_COMMAND_PREFIX.to_string(),
            inventory: None,
            node: None,
        }
    }
}

// --- `inventory.toml` MODELS ---

/// Power state of a virtual machine.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VmStatus {
    /// Powered on.
    Running,
    /// Powered off.
    #[default]
    Stopped,
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// A virtual machine entry of a node.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Canonical numeric id.
    pub id: u32,
    /// Display name, matched case-insensitively by the resolver.
    pub name: String,
    /// Power state. Defaults to stopped.
    #[serde(default)]
    pub status: VmStatus,
}

/// A managed node and its virtual machines.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Node name, also the session scope value.
    pub name: String,
    /// Offline nodes refuse VM operations. Defaults to online.
    #[serde(default = "default_online")]
    pub online: bool,
    /// Virtual machines hosted on the node.
    #[serde(default)]
    pub vms: Vec<VmConfig>,
}

fn default_online() -> bool {
    true
}

/// Represents the deserialized structure of an `inventory.toml` file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFile {
    /// Every managed node.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Resolved locations of the files the binary reads.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    /// The settings file, whether or not it exists.
    pub config_file: PathBuf,
    /// The inventory file the connector loads.
    pub inventory_file: PathBuf,
}
