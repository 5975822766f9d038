use clap::Parser;
use std::path::PathBuf;

/// Parsing and dispatch of chat messages.
pub mod dispatcher;
/// The demo command set served by the binary.
pub mod handlers;

/// Builds the color-aware help text from the localized template.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted = t!("cli.help.template")
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted.into_boxed_str())
}

/// chatroute: routes prefixed chat lines to registered operations.
#[derive(Parser, Debug)]
#[command(author, version, about, help_template = { build_help_string() })]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Path to `config.toml`. Defaults to the user config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Overrides the command prefix from the configuration.
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Node selected when the session starts.
    #[arg(short, long)]
    pub node: Option<String>,

    /// A single command to run instead of reading lines from stdin.
    #[arg()]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_options_and_one_shot_command() {
        let cli = Cli::try_parse_from(["chatroute", "--node", "pve1", "vm", "status", "web"]).unwrap();
        assert_eq!(cli.node.as_deref(), Some("pve1"));
        assert_eq!(cli.command, vec!["vm", "status", "web"]);
        assert!(cli.config.is_none());
        assert!(cli.prefix.is_none());
    }

    #[test]
    fn test_no_command_means_interactive() {
        let cli = Cli::try_parse_from(["chatroute", "-p", "/"]).unwrap();
        assert_eq!(cli.prefix.as_deref(), Some("/"));
        assert!(cli.command.is_empty());
    }
}
