//! Command-line interface.

pub mod completions;
pub mod exec;
pub mod keys;
pub mod output;

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::bundle::Format;
use crate::core::config::Overrides;

/// envseal - launch a program with decrypted secrets as its environment.
#[derive(Parser)]
#[command(
    name = "envseal",
    about = "Launch a program with decrypted secrets as its environment",
    version,
    after_help = "Secrets stay in memory. Nothing plaintext touches disk."
)]
pub struct Cli {
    /// Show debug output (or set ENVSEAL_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file [default: .envseal.toml]
    #[arg(long, global = true, env = "ENVSEAL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the secrets come from and how to decrypt them.
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Encrypted secret store
    #[arg(short, long, env = "ENVSEAL_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Decrypted payload format [default: from the store extension]
    #[arg(short, long, env = "ENVSEAL_FORMAT", value_enum)]
    pub format: Option<Format>,

    /// Decryption program [default: sops]
    #[arg(long, env = "ENVSEAL_DECRYPTOR", value_name = "PROGRAM")]
    pub decryptor: Option<String>,

    /// Argument for the decryption program, before the store path (repeatable)
    #[arg(long = "decryptor-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub decryptor_args: Vec<String>,
}

impl From<StoreArgs> for Overrides {
    fn from(args: StoreArgs) -> Self {
        Self {
            store: args.store,
            format: args.format,
            decryptor: args.decryptor,
            decryptor_args: args.decryptor_args,
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Decrypt the store and replace this process with COMMAND
    Exec {
        #[command(flatten)]
        store: StoreArgs,

        /// Program and arguments to run
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<OsString>,
    },

    /// Decrypt the store and list its secret names
    Keys {
        #[command(flatten)]
        store: StoreArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command, config: Option<PathBuf>) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Exec { store, command } => exec::execute(config.as_deref(), store.into(), command),
        Keys { store, json } => keys::execute(config.as_deref(), store.into(), json),
        Completions { shell } => completions::execute(shell),
    }
}
