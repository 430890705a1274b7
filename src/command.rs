use crate::env::Environment;
use crate::lexer::Invocation;
use crate::registry::ProcessRegistry;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure,
/// mirroring the convention used by POSIX shells.
pub type ExitCode = i32;

/// Object-safe trait for anything the interpreter can run.
///
/// Implemented by built-ins via a blanket impl and by the external-command
/// launcher. The registry is passed in so a launcher can record a
/// backgrounded child; built-ins never touch it.
pub trait ExecutableCommand {
    /// Executes the command, returning its exit code.
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        jobs: &mut ProcessRegistry,
    ) -> Result<ExitCode>;
}

/// Factory that tries to turn a parsed invocation into a runnable command.
///
/// Returns `None` when the factory doesn't recognize the invocation. The
/// interpreter queries its factories in order, built-ins before the external
/// launcher, which is what gives built-ins precedence over same-named
/// executables on PATH.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        invocation: &Invocation,
    ) -> Option<Box<dyn ExecutableCommand>>;
}
