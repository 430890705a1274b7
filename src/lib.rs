//! A small interactive command interpreter centered on child-process
//! lifecycle management.
//!
//! The interpreter reads a line, splits it into tokens, and either runs a
//! built-in (`cd`, `exit`) in-process or launches an external program as a
//! child. A trailing `&` sends the child to the background; backgrounded
//! children are tracked in a [`registry::ProcessRegistry`] and reclaimed by a
//! non-blocking sweep at the top of every prompt iteration, so no terminated
//! child lingers in the OS process table.
//!
//! The main entry point is [`Interpreter`], which dispatches parsed
//! invocations through a chain of pluggable factories (built-ins first,
//! external launcher last). The public modules [`command`], [`env`],
//! [`lexer`] and [`registry`] expose the types needed to implement your own
//! commands or embed the loop.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
pub mod lexer;
pub mod reaper;
pub mod registry;
pub mod signal;
pub mod waiter;

pub use external::LaunchError;
pub use interpreter::{Interpreter, Options};
