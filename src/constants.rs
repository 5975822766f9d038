// src/constants.rs

/// Group assigned to operations whose declared name has no separator.
pub const DEFAULT_GROUP: &str = "default";

/// Separates the group from the command in a declared operation name (`vm_reboot`).
pub const GROUP_SEPARATOR: char = '_';

/// First token that routes a message to the help generator (case-insensitive).
pub const HELP_KEYWORD: &str = "help";

/// Prefix that marks a chat line as a command.
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Name of the configuration directory under the system config dir.
pub const APP_DIR: &str = "chatroute";

/// The name of the settings file (inside the config dir).
pub const CONFIG_FILENAME: &str = "config.toml";

/// The name of the default inventory file (inside the config dir).
pub const INVENTORY_FILENAME: &str = "inventory.toml";
