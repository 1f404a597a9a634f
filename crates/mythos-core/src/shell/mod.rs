//! The interactive shell
//!
//! This module provides:
//! - `ShellLoop`, the prompt/read/dispatch state machine
//! - The builtin registry (`cd`, `ls`, `exit`)
//! - External command lookup and execution
//! - Timestamped console messages

mod builtins;
mod command;
mod console;
mod shell_loop;

pub use builtins::{Arity, Builtin, BuiltinKind, BuiltinRegistry};
#[cfg(test)]
pub use command::{MockCommandResolver, MockCommandRunner};
pub use command::{
    CommandResolver, CommandRunner, Invocation, ProcessRunner, SearchPathResolver, EARLY_EXIT_STATUS,
};
pub use console::{format_line, log, LogLevel};
pub use shell_loop::{parse_command, Flow, ShellLoop, ShellState};
