//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "paver",
    bin_name = "paver",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate microservices from a service definition",
    long_about = "Paver reads a service definition (tables, endpoints, project \
                  metadata) and renders a blueprint plus reusable template \
                  blocks from a local cache into a working service tree.",
    after_help = "EXAMPLES:\n\
        \x20 paver validate billing.yaml\n\
        \x20 paver generate billing.yaml --output ./billing\n\
        \x20 paver block io.pavedroad.http.routers.gorilla\n\
        \x20 paver list\n\
        \x20 paver completions bash > /usr/share/bash-completion/completions/paver",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a service from a definition file.
    #[command(
        visible_alias = "gen",
        about = "Generate a service from a definition",
        after_help = "EXAMPLES:\n\
            \x20 paver generate billing.yaml\n\
            \x20 paver generate billing.yaml -o ./out --blueprint microservices/ga/datamgr\n\
            \x20 paver generate billing.yaml --seed 42"
    )]
    Generate(GenerateArgs),

    /// Validate a definition file without generating anything.
    #[command(
        about = "Validate a definition",
        after_help = "EXAMPLES:\n\
            \x20 paver validate billing.yaml\n\
            \x20 paver validate billing.yaml --output-format json"
    )]
    Validate(ValidateArgs),

    /// Load a block and describe its resolved import tree.
    #[command(
        about = "Describe a resolved block",
        after_help = "EXAMPLES:\n\
            \x20 paver block io.pavedroad.http.methods.gorilla\n\
            \x20 paver block cache://blocks.pavedroad.io/go/loggers --label logging"
    )]
    Block(BlockArgs),

    /// List available blueprints and built-in blocks.
    #[command(
        visible_alias = "ls",
        about = "List blueprints and blocks",
        after_help = "EXAMPLES:\n\
            \x20 paver list\n\
            \x20 paver list --blocks\n\
            \x20 paver list --output-format json"
    )]
    List(ListArgs),

    /// Initialise a Paver configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 paver init                      # default location\n\
            \x20 paver --config ./paver.toml init\n\
            \x20 paver init --cache-dir ~/blocks"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 paver completions bash > ~/.local/share/bash-completion/completions/paver\n\
            \x20 paver completions zsh  > ~/.zfunc/_paver\n\
            \x20 paver completions fish > ~/.config/fish/completions/paver.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `paver generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Definition file (YAML).
    #[arg(value_name = "DEFINITION", help = "Service definition file")]
    pub definition: PathBuf,

    /// Output directory; defaults to `generation.output_dir`.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Blueprint to render instead of the definition's `info.id`.
    #[arg(
        short = 'b',
        long = "blueprint",
        value_name = "NAME",
        help = "Blueprint name or <tld>/<stage>/<name>"
    )]
    pub blueprint: Option<String>,

    /// Seed for reproducible sample documents.
    #[arg(long = "seed", value_name = "N", help = "Seed for sample data")]
    pub seed: Option<u64>,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `paver validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Definition file (YAML).
    #[arg(value_name = "DEFINITION", help = "Service definition file")]
    pub definition: PathBuf,
}

// ── block ─────────────────────────────────────────────────────────────────────

/// Arguments for `paver block`.
#[derive(Debug, Args)]
pub struct BlockArgs {
    /// Block identifier (built-in or `cache://host/path`).
    #[arg(value_name = "ID", help = "Block identifier")]
    pub id: String,

    /// Labels merged into the loaded block.
    #[arg(
        short = 'l',
        long = "label",
        value_name = "LABEL",
        help = "Label to merge into the block (repeatable)"
    )]
    pub labels: Vec<String>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `paver list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Also list built-in blocks.
    #[arg(long = "blocks", help = "Include built-in blocks")]
    pub blocks: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `paver init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `paver completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
