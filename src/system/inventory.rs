// src/system/inventory.rs

use crate::{
    core::context_resolver::Connector,
    models::{InventoryFile, NodeConfig, VmConfig, VmStatus},
};
use anyhow::Context;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;

/// Failures of the inventory backend.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The inventory file could not be read.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The inventory file is not valid TOML for this model.
    #[error("Invalid inventory file: {0}")]
    Parse(#[from] toml::de::Error),
    /// No node with that name.
    #[error("Node '{name}' not found.")]
    NodeNotFound {
        /// Requested node.
        name: String,
    },
    /// The node exists but does not answer.
    #[error("Node '{name}' is offline.")]
    NodeOffline {
        /// Requested node.
        name: String,
    },
    /// No VM with that id on the node.
    #[error("VM '{id}' not found on node '{node}'.")]
    VmNotFound {
        /// Node searched.
        node: String,
        /// Id as given.
        id: String,
    },
    /// A power operation that would not change anything.
    #[error("VM {id} on node '{node}' is already {status}.")]
    AlreadyInState {
        /// Node of the VM.
        node: String,
        /// Canonical VM id.
        id: u32,
        /// The state it is already in.
        status: VmStatus,
    },
}

/// In-memory view of the managed nodes and their virtual machines.
///
/// Power operations mutate this view; nothing is written back to disk.
#[derive(Debug, Default)]
pub struct Inventory {
    state: Mutex<InventoryFile>,
}

impl Inventory {
    /// Wraps an already parsed inventory.
    pub fn new(file: InventoryFile) -> Self {
        Self {
            state: Mutex::new(file),
        }
    }

    /// Parses an inventory from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, InventoryError> {
        Ok(Self::new(toml::from_str(content)?))
    }

    /// Reads and parses an inventory file.
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        debug!("Loading inventory from '{}'", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn lock(&self) -> MutexGuard<'_, InventoryFile> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every node.
    pub fn nodes(&self) -> Vec<NodeConfig> {
        self.lock().nodes.clone()
    }

    /// Snapshot of one node, online or not.
    pub fn node(&self, name: &str) -> Result<NodeConfig, InventoryError> {
        self.lock()
            .nodes
            .iter()
            .find(|n| n.name == name)
            .cloned()
            .ok_or_else(|| InventoryError::NodeNotFound {
                name: name.to_string(),
            })
    }

    /// The VMs of an online node.
    pub fn vms(&self, node: &str) -> Result<Vec<VmConfig>, InventoryError> {
        let node = self.node(node)?;
        if !node.online {
            return Err(InventoryError::NodeOffline { name: node.name });
        }
        Ok(node.vms)
    }

    /// Looks up a VM by its canonical (numeric) id.
    pub fn vm(&self, node: &str, id: &str) -> Result<VmConfig, InventoryError> {
        let not_found = || InventoryError::VmNotFound {
            node: node.to_string(),
            id: id.to_string(),
        };
        let id: u32 = id.parse().map_err(|_| not_found())?;
        self.vms(node)?
            .into_iter()
            .find(|vm| vm.id == id)
            .ok_or_else(not_found)
    }

    /// Changes the power state of a VM and returns the updated record.
    pub fn set_status(&self, node: &str, id: &str, status: VmStatus) -> Result<VmConfig, InventoryError> {
        let current = self.vm(node, id)?;
        if current.status == status {
            return Err(InventoryError::AlreadyInState {
                node: node.to_string(),
                id: current.id,
                status,
            });
        }

        let mut state = self.lock();
        let vm = state
            .nodes
            .iter_mut()
            .filter(|n| n.name == node)
            .flat_map(|n| n.vms.iter_mut())
            .find(|vm| vm.id == current.id)
            .ok_or_else(|| InventoryError::VmNotFound {
                node: node.to_string(),
                id: id.to_string(),
            })?;
        vm.status = status;
        Ok(vm.clone())
    }

    /// Maps a user-typed VM reference to its canonical id.
    ///
    /// A numeric reference matches a VM id, anything else a VM name
    /// (case-insensitive). With a node the search stays on that node;
    /// without one it spans every node and a name found on several nodes
    /// does not resolve.
    pub fn resolve_vm_identifier(&self, node: Option<&str>, raw: &str) -> Option<String> {
        let state = self.lock();
        let candidates: Vec<&VmConfig> = state
            .nodes
            .iter()
            .filter(|n| node.is_none_or(|wanted| n.name == wanted))
            .flat_map(|n| n.vms.iter())
            .collect();

        let matches: Vec<u32> = match raw.parse::<u32>() {
            Ok(id) => candidates.iter().filter(|vm| vm.id == id).map(|vm| vm.id).collect(),
            Err(_) => candidates
                .iter()
                .filter(|vm| vm.name.eq_ignore_ascii_case(raw))
                .map(|vm| vm.id)
                .collect(),
        };

        match matches.as_slice() {
            [id] => Some(id.to_string()),
            _ => {
                debug!(
                    "Identifier '{}' matched {} VM(s) (node: {:?})",
                    raw,
                    matches.len(),
                    node
                );
                None
            }
        }
    }
}

/// Connects to the inventory file, loading it on first use.
///
/// A failed load is not cached, so the next dispatch tries again.
#[derive(Debug)]
pub struct InventoryClient {
    path: PathBuf,
    loaded: Mutex<Option<Arc<Inventory>>>,
}

impl InventoryClient {
    /// A client for the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: Mutex::new(None),
        }
    }

    /// The inventory file this client loads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector<Arc<Inventory>> for InventoryClient {
    fn connect(&self) -> anyhow::Result<Arc<Inventory>> {
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(inventory) = loaded.as_ref() {
            return Ok(Arc::clone(inventory));
        }

        let inventory = Arc::new(
            Inventory::load(&self.path)
                .with_context(|| format!("Failed to load inventory '{}'", self.path.display()))?,
        );
        *loaded = Some(Arc::clone(&inventory));
        Ok(inventory)
    }
}
