//! Clap derive structures for the `bookshelf` CLI.
//!
//! Defines the command tree, global flags, and shared value types. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bookshelf -- organize your reading into shelves
#[derive(Debug, Parser)]
#[command(
    name = "bookshelf",
    version,
    about = "Organize books into Currently Reading, Want to Read, and Read",
    long_about = "Keep books on three shelves: Currently Reading, Want to Read, and Read.\n\n\
        Shelves are stored by a remote book catalog; every change is sent to\n\
        the catalog and reflected locally once it is acknowledged.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Catalog profile to use
    #[arg(long, short = 'p', env = "BOOKSHELF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Catalog URL (overrides profile)
    #[arg(long, short = 'c', env = "BOOKSHELF_CATALOG", global = true)]
    pub catalog: Option<String>,

    /// Catalog token (overrides profile and keyring)
    #[arg(long, env = "BOOKSHELF_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOOKSHELF_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "BOOKSHELF_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BOOKSHELF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Show shelf changes before the catalog confirms them
    #[arg(long, global = true)]
    pub optimistic: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Shelf names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShelfArg {
    /// Currently Reading
    #[value(alias = "currentlyReading", alias = "reading")]
    CurrentlyReading,
    /// Want to Read
    #[value(alias = "wantToRead", alias = "want")]
    WantToRead,
    /// Read
    Read,
    /// Not on any shelf
    None,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tracked books grouped by shelf
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one book
    Show(ShowArgs),

    /// Move a book to a shelf
    #[command(alias = "mv")]
    Move(MoveArgs),

    /// Take a book off your shelves
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Search the catalog
    Search(SearchArgs),

    /// Show the shelves and how many books each holds
    Shelves,

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BOOKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list this shelf
    #[arg(long, short = 's')]
    pub shelf: Option<ShelfArg>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Book ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Book ID
    pub id: String,

    /// Target shelf (`none` stops tracking the book)
    pub shelf: ShelfArg,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Book ID
    pub id: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search terms
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., "catalog", "timeout", "update_policy")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's token in the system keyring
    SetToken {
        /// Generate a fresh random token instead of prompting
        #[arg(long)]
        generate: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
