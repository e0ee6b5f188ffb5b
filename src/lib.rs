//! A small interactive shell with a raw-mode line editor.
//!
//! The shell reads one line at a time from the controlling terminal, completes
//! the leading command name on Tab, and then runs the line either as one of a
//! handful of builtins (`cd`, `pwd`, `echo`, `type`, `exit`) or as an external
//! program found on `PATH`.
//!
//! The main entry point is [`Interpreter`], which owns the [`env::Environment`]
//! and the [`ExecutableIndex`] and drives the read/dispatch loop over any
//! terminal implementing [`terminal::ModeControl`].

mod builtin;
pub mod command;
pub mod config;
pub mod editor;
pub mod env;
pub mod error;
mod external;
mod interpreter;
mod parser;
pub mod resolver;
pub mod terminal;

/// The read/dispatch loop and the command dispatcher.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
/// Name to path index of the executables on the search path.
pub use resolver::ExecutableIndex;
