//! Command trees with typed options, nested subcommand dispatch and
//! generated help.
//!
//! A program builds a tree of [`Command`] nodes, registers [`Opt`] flags on
//! each, and hands the process arguments to [`Command::run`] on the root.
//! Every node parses its own flags, then either descends into the subcommand
//! named by its first positional argument or runs its handler.
//!
//! ```
//! use cmd_tree::{help_only, Command, Opt};
//!
//! let mut root = Command::new("app", "Example application", help_only).subs([
//!     Command::new("greet", "Say hello", |cmd: &Command| {
//!         let name = cmd.string_opt("name").unwrap_or("world");
//!         for _ in 0..cmd.int_opt("times").unwrap_or(1) {
//!             println!("hello {name}");
//!         }
//!         Ok(())
//!     })
//!     .add_opts([
//!         Opt::string("name", "world", "Who to greet"),
//!         Opt::int("times", 1, "How many greetings"),
//!     ]),
//! ]);
//!
//! let argv: Vec<String> = ["app", "greet", "--times=2", "--name", "ada"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! root.run(&argv)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod command;
mod engine;
mod error;
mod help;
mod option;
mod summary;

pub use command::{Command, Handler};
pub use error::ParseError;
pub use help::{help_only, recursive_help};
pub use option::{Opt, OptKind, OptValue};
pub use summary::{CommandSummary, OptionSummary};
