// src/core/mod.rs

/// Argument slots and the values handed to operation bodies.
pub mod arg_parser;
/// Backend connection and identifier resolution traits.
pub mod context_resolver;
/// Dispatch failures and their responses.
pub mod errors;
/// Help listing.
pub mod help;
/// Binding, injection and guarded execution of one call.
pub mod injector;
/// Operation descriptors.
pub mod operation;
/// Config and inventory file locations.
pub mod paths;
/// The operation registry.
pub mod registry;
