use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use crate::external::LaunchError;
use crate::lexer::{self, Invocation};
use crate::reaper::{self, Reaped};
use crate::registry::ProcessRegistry;
use anyhow::Result;
use argh::FromArgs;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Factory for command instances of one concrete type.
///
/// Only commands defined in this crate are wired up: the built-ins and
/// [`ExternalCommand`](crate::external::ExternalCommand).
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

#[derive(FromArgs)]
/// minish - an interactive command interpreter.
pub struct Options {
    /// prompt printed before each input line
    #[argh(option, default = "String::from(\"> \")")]
    pub prompt: String,

    /// maximum accepted input line length in bytes; longer lines are rejected
    #[argh(option, default = "lexer::DEFAULT_MAX_LINE_LEN")]
    pub max_line_len: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prompt: String::from("> "),
            max_line_len: lexer::DEFAULT_MAX_LINE_LEN,
        }
    }
}

/// The interactive interpreter: environment, background-process registry and
/// the ordered factory chain commands are dispatched through.
///
/// Example
/// ```
/// use minish::{Interpreter, lexer};
///
/// let mut sh = Interpreter::default();
/// let invocation = lexer::tokenize("true", 4096).unwrap().unwrap();
/// assert_eq!(sh.run(&invocation).unwrap(), 0);
/// ```
pub struct Interpreter {
    env: Environment,
    jobs: ProcessRegistry,
    commands: Vec<Box<dyn CommandFactory>>,
    options: Options,
}

impl Interpreter {
    /// Creates an interpreter with a custom factory chain. Factories are
    /// queried in order, so built-ins placed first shadow PATH executables of
    /// the same name.
    pub fn new(options: Options, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            jobs: ProcessRegistry::new(),
            commands,
            options,
        }
    }

    /// Creates an interpreter with the default command set: the `cd` and
    /// `exit` built-ins, then the external launcher.
    pub fn with_options(options: Options) -> Self {
        use crate::builtin::{Cd, Exit};
        use crate::external::ExternalCommand;
        Self::new(
            options,
            vec![
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }

    /// Runs a single parsed invocation through the factory chain.
    pub fn run(&mut self, invocation: &Invocation) -> Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, invocation) {
                return cmd.execute(&mut self.env, &mut self.jobs);
            }
        }
        Err(LaunchError::NotFound(invocation.name().to_owned()).into())
    }

    /// The prompt loop.
    ///
    /// Each iteration: reap finished background children, read a line,
    /// tokenize, dispatch. Ctrl-C typed at the prompt discards the current
    /// line and re-prompts; end-of-input ends the loop like `exit`. Still
    /// running background children are abandoned to the OS on exit.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            self.drain_finished();

            match rl.readline(&self.options.prompt) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.dispatch(&line);
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// One reap pass plus the report lines it produced.
    fn drain_finished(&mut self) {
        for reaped in reaper::reap(&mut self.jobs) {
            match reaped {
                Reaped::Exited { pid, status } => {
                    println!("pid {pid} exited with status {status}");
                }
                Reaped::Failed { pid, error } => {
                    eprintln!("pid {pid}: status check failed: {error}");
                }
            }
        }
    }

    fn dispatch(&mut self, line: &str) {
        let invocation = match lexer::tokenize(line, self.options.max_line_len) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => return,
            Err(err) => {
                eprintln!("{err}");
                return;
            }
        };
        if let Err(err) = self.run(&invocation) {
            eprintln!("{err:#}");
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}
