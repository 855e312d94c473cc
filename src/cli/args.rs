//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Resolve inherit directives in declarative configuration trees
#[derive(Parser, Debug)]
#[command(name = "cfgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "CFGTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a source and print the linked tree
    Resolve {
        /// Source file (yml, yaml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Hide node attributes
        #[arg(long)]
        no_attributes: bool,
    },

    /// Resolve a source and report problems only
    Check {
        /// Source file (yml, yaml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective attributes of one node, including inherited ones
    Show {
        /// Source file (yml, yaml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Dotted node path, e.g. `entity.node.article`; quote keys that contain dots: `a."b.c"`
        path: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
