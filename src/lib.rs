//! envseal - launch a program with decrypted secrets as its environment.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── exec          # Decrypt and hand off to a target
//! │   ├── keys          # List secret names in a store
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── decrypt       # Decryptor trait and external command backend
//!     ├── bundle        # Payload parsing (JSON, YAML, dotenv)
//!     ├── validation    # Environment variable name rules
//!     ├── env           # Launch environment construction
//!     ├── launch        # Process replacement
//!     ├── pipeline      # Stage composition
//!     ├── config        # .envseal.toml and overrides
//!     └── constants     # Defaults
//! ```
//!
//! Secrets are decrypted by an external tool (SOPS by default) straight
//! into memory, merged over the inherited environment, and handed to the
//! target through `execve`. They are never written to disk and never
//! passed as arguments.

pub mod cli;
pub mod core;
pub mod error;
