use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::Invocation;
use crate::registry::ProcessRegistry;
use anyhow::{Context, Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::env as stdenv;
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in commands known to the shell at compile time.
///
/// Built-ins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process; they never spawn a child.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command against the interpreter environment.
    fn execute(self, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        env: &mut Environment,
        _jobs: &mut ProcessRegistry,
    ) -> Result<ExitCode> {
        BuiltinCommand::execute(*self, env)
    }
}

/// Produced when argh rejects the arguments; prints the usage or error text
/// argh rendered.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _env: &mut Environment,
        _jobs: &mut ProcessRegistry,
    ) -> Result<ExitCode> {
        if self.is_error {
            eprintln!("{}", self.output.trim_end());
            Ok(1)
        } else {
            println!("{}", self.output.trim_end());
            Ok(0)
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        invocation: &Invocation,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if invocation.name() != T::name() {
            return None;
        }
        let args: Vec<&str> = invocation.args().iter().map(String::as_str).collect();
        Some(match T::from_args(&[T::name()], &args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// When the target is omitted, invalid, or inaccessible, falls back to the
/// directory named by the HOME environment variable.
pub struct Cd {
    #[argh(positional, greedy)]
    /// target directory; anything after the first argument is ignored
    pub target: Vec<String>,
}

impl Cd {
    fn change_dir(env: &mut Environment, dir: &Path) -> Result<()> {
        let target = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            env.current_dir.join(dir)
        };
        let canonical = fs::canonicalize(&target)
            .with_context(|| format!("cd: can't resolve {}", target.display()))?;
        stdenv::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(())
    }
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        if let Some(target) = self.target.first() {
            if Self::change_dir(env, &PathBuf::from(target)).is_ok() {
                return Ok(0);
            }
        }

        let home = env
            .home()
            .ok_or_else(|| anyhow!("cd: no target and HOME is not set"))?;
        Self::change_dir(env, Path::new(&home))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the shell. Background children still running are abandoned to the
/// operating system; none are waited for or signalled.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
