//! Launching of external programs, in the foreground or the background.

use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::Invocation;
use crate::registry::{BackgroundProcess, ProcessRegistry};
use crate::waiter;
use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use thiserror::Error;

/// Errors from creating a child process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The invocation named nothing resolvable on PATH or as a path.
    #[error("{0}: command not found")]
    NotFound(String),
    /// Process creation itself failed (resource exhaustion, permissions, a
    /// vanished executable). Recoverable; the interpreter loop continues.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A command resolved to an executable outside the shell.
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
    background: bool,
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        invocation: &Invocation,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.get_var("PATH")?;
        let program = resolve_program(OsStr::new(&search_paths), Path::new(invocation.name()))?;
        Some(Box::new(ExternalCommand {
            program: program.into_os_string(),
            args: invocation.args().iter().map(|a| a.into()).collect(),
            background: invocation.background,
        }))
    }
}

impl ExternalCommand {
    fn spawn(&self, env: &Environment) -> Result<Child, LaunchError> {
        // Inherited stdio: the child talks to the same terminal as the shell.
        // Exec-image failure surfaces here as an error in the parent; no child
        // ever survives it to run interpreter code.
        Command::new(&self.program)
            .args(&self.args)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                source,
            })
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        jobs: &mut ProcessRegistry,
    ) -> Result<ExitCode> {
        let mut child = self.spawn(env)?;

        if self.background {
            println!("pid {} running in background", child.id());
            jobs.insert(BackgroundProcess::new(child));
            return Ok(0);
        }

        let report = waiter::wait_foreground(&mut child)?;
        println!(
            "pid {} exited with status {} after {} ms",
            report.pid,
            report.status,
            report.elapsed.as_millis()
        );
        Ok(report.status)
    }
}

/// Resolves a program name the way an interactive shell does.
///
/// Absolute paths and explicit relative paths (more than one component, e.g.
/// `./foo` or `bin/sh`) are taken as-is when they exist; a bare name is
/// searched in every directory of the PATH-style `search_paths`, first match
/// wins. An empty name resolves to nothing.
pub fn resolve_program(search_paths: &OsStr, name: &Path) -> Option<PathBuf> {
    if name.as_os_str().is_empty() {
        return None;
    }
    if name.is_absolute() || name.components().nth(1).is_some() {
        return name.exists().then(|| name.to_path_buf());
    }
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
}
