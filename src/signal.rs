//! Interrupt policy for the interpreter process.
//!
//! The shell must keep prompting after Ctrl-C, whether the interrupt arrives
//! at the idle prompt or while a foreground child runs. A real no-op handler
//! is installed rather than `SIG_IGN` so that spawned children revert to the
//! default disposition across exec; whether the interrupt also reaches a
//! running foreground child is left to normal process-group delivery.

#[cfg(unix)]
mod imp {
    use anyhow::Result;
    use nix::libc::c_int;
    use nix::sys::signal::{self, SigHandler, Signal};

    // Must stay async-signal-safe: no allocation, no buffered I/O.
    extern "C" fn on_interrupt(_signum: c_int) {}

    /// One-time registration of the no-op SIGINT handler.
    pub fn install_interrupt_policy() -> Result<()> {
        unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(on_interrupt)) }?;
        Ok(())
    }
}

#[cfg(unix)]
pub use imp::install_interrupt_policy;

#[cfg(not(unix))]
pub fn install_interrupt_policy() -> anyhow::Result<()> {
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use nix::sys::signal::{Signal, raise};

    #[test]
    fn test_interrupt_does_not_kill_the_process() {
        install_interrupt_policy().expect("install handler");
        // with the default disposition this would terminate the test runner
        raise(Signal::SIGINT).expect("raise SIGINT");
    }
}
