use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "iconmap")]
#[command(about = "Keep an icon catalog (Config.yaml) in sync with a tree of SVG icons")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding iconmap.toml; relative paths resolve against it (default: .)
    #[arg(long, global = true, env = "ICONMAP_BASE")]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Reconcile the existing catalog with the icon trees
    Merge,
    /// Regenerate the catalog from the official icon tree
    Rebuild,
}

/// Icon roots and catalog location (override iconmap.toml)
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Official icon root
    #[arg(long, env = "ICONMAP_OFFICIAL")]
    pub official: Option<PathBuf>,

    /// Manual icon root
    #[arg(long, env = "ICONMAP_MANUAL")]
    pub manual: Option<PathBuf>,

    /// Ignore the manual icon root
    #[arg(long)]
    pub no_manual: bool,

    /// Catalog file
    #[arg(long, env = "ICONMAP_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Update the catalog from the icon trees
    Sync {
        /// merge: reconcile the existing catalog; rebuild: regenerate it
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        #[command(flatten)]
        paths: PathArgs,

        /// Prefix for targets of services added in merge mode
        #[arg(long)]
        prefix: Option<String>,

        /// Merge: only add services found in the category's own directory
        #[arg(long)]
        scoped: bool,

        /// Print the resulting catalog instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Report catalog services whose SVG file cannot be found
    Check {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Print the flattened category/service table
    Lookup {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Catalog file
        #[arg(long, env = "ICONMAP_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Manage iconmap.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g., paths.official)
        key: String,
    },

    /// Set a settings value
    Set {
        /// Settings key (e.g., sync.mode)
        key: String,

        /// Value to set (e.g., "rebuild")
        value: String,
    },

    /// List all settings values
    List,

    /// Show settings file path
    Path,

    /// Initialize settings file with defaults
    Init,
}
