use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// Holds the variable map handed to spawned children, the working directory
/// commands run in, and the flag a prompt loop checks to know when `exit` was
/// requested.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g. PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// Set to true by the `exit` built-in; the interactive loop then stops.
    pub should_exit: bool,
}

impl Environment {
    /// Captures the current process state into a new `Environment`.
    ///
    /// Variables are copied from `std::env::vars()` and `current_dir` is read
    /// from `std::env::current_dir()`.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// Looks up a variable, falling back to the live process environment for
    /// keys not present in `self.vars`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Sets or overrides a variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The user's home directory, read from HOME. Used as the `cd` fallback
    /// target.
    pub fn home(&self) -> Option<String> {
        self.get_var("HOME")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide working directory is shared by every test that calls
/// `set_current_dir`; they serialize on this lock.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
