//! Tracking of backgrounded children.
//!
//! The registry is touched from exactly two places in the interpreter loop:
//! the launcher inserts after a background spawn, and the reaper sweeps once
//! per iteration. There is no other mutation and no concurrent access.

use std::io;
use std::process::{Child, ExitStatus};

/// One child launched without blocking, owned by the registry until a sweep
/// observes its termination.
///
/// The [`Child`] handle doubles as the process identifier: it is what the
/// non-blocking status check operates on, it is unique by construction, and
/// dropping it after the check has consumed the exit status is what releases
/// the OS process-table entry. Numeric pid reuse by the OS after that point
/// is outside the registry's concern.
pub struct BackgroundProcess {
    child: Child,
}

/// Result of one non-blocking status check on a background child.
#[derive(Debug)]
pub enum PollOutcome {
    /// The child has not exited yet.
    Running,
    /// The child exited; its status has now been consumed by the check.
    Exited(ExitStatus),
    /// The check itself failed (e.g. the process was already reaped by
    /// something outside the interpreter).
    Failed(io::Error),
}

impl BackgroundProcess {
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    /// OS process identifier, for report lines.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Checks the child's status without blocking.
    pub fn poll(&mut self) -> PollOutcome {
        match self.child.try_wait() {
            Ok(None) => PollOutcome::Running,
            Ok(Some(status)) => PollOutcome::Exited(status),
            Err(err) => PollOutcome::Failed(err),
        }
    }
}

/// The set of all background children at a point in time.
///
/// Insertion order is preserved across sweeps; order carries no meaning for
/// the interpreter but keeps report sequences deterministic.
#[derive(Default)]
pub struct ProcessRegistry {
    jobs: Vec<BackgroundProcess>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly backgrounded child.
    pub fn insert(&mut self, job: BackgroundProcess) {
        self.jobs.push(job);
    }

    /// Visits every entry exactly once, in insertion order, removing those
    /// for which `keep` returns false. Survivors keep their relative order;
    /// removed entries are never visited again.
    pub fn sweep(&mut self, keep: impl FnMut(&mut BackgroundProcess) -> bool) {
        self.jobs.retain_mut(keep);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Identifiers currently tracked, in insertion order.
    pub fn pids(&self) -> Vec<u32> {
        self.jobs.iter().map(BackgroundProcess::pid).collect()
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn spawn_sleep(seconds: &str) -> BackgroundProcess {
        let child = Command::new("sleep")
            .arg(seconds)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .expect("spawn sleep");
        BackgroundProcess::new(child)
    }

    fn kill_all(registry: &mut ProcessRegistry) {
        registry.sweep(|job| {
            let _ = job.child.kill();
            let _ = job.child.wait();
            false
        });
    }

    #[test]
    fn test_insert_tracks_pids_in_order() {
        let mut registry = ProcessRegistry::new();
        let a = spawn_sleep("30");
        let b = spawn_sleep("30");
        let (pid_a, pid_b) = (a.pid(), b.pid());

        registry.insert(a);
        registry.insert(b);

        assert_eq!(registry.pids(), vec![pid_a, pid_b]);
        kill_all(&mut registry);
    }

    #[test]
    fn test_sweep_visits_each_entry_exactly_once() {
        let mut registry = ProcessRegistry::new();
        for _ in 0..3 {
            registry.insert(spawn_sleep("30"));
        }
        let expected = registry.pids();

        let mut visited = Vec::new();
        registry.sweep(|job| {
            visited.push(job.pid());
            true
        });

        assert_eq!(visited, expected);
        assert_eq!(registry.len(), 3);
        kill_all(&mut registry);
    }

    #[test]
    fn test_sweep_preserves_survivor_order() {
        let mut registry = ProcessRegistry::new();
        for _ in 0..4 {
            registry.insert(spawn_sleep("30"));
        }
        let pids = registry.pids();
        let dropped = pids[1];

        registry.sweep(|job| {
            let keep = job.pid() != dropped;
            if !keep {
                let _ = job.child.kill();
                let _ = job.child.wait();
            }
            keep
        });

        assert_eq!(registry.pids(), vec![pids[0], pids[2], pids[3]]);
        kill_all(&mut registry);
    }

    #[test]
    fn test_removed_entries_are_not_revisited() {
        let mut registry = ProcessRegistry::new();
        registry.insert(spawn_sleep("30"));
        let pid = registry.pids()[0];

        registry.sweep(|job| {
            let _ = job.child.kill();
            let _ = job.child.wait();
            false
        });
        assert!(registry.is_empty());

        let mut visited = Vec::new();
        registry.sweep(|job| {
            visited.push(job.pid());
            true
        });
        assert!(visited.is_empty(), "pid {pid} should be gone");
    }

    #[test]
    fn test_poll_reports_running_then_exited() {
        let child = Command::new("sh")
            .args(["-c", "exit 0"])
            .stdin(Stdio::null())
            .spawn()
            .expect("spawn sh");
        let mut job = BackgroundProcess::new(child);

        // the child exits on its own; poll until the check consumes it
        let status = loop {
            match job.poll() {
                PollOutcome::Running => std::thread::sleep(std::time::Duration::from_millis(10)),
                PollOutcome::Exited(status) => break status,
                PollOutcome::Failed(err) => panic!("status check failed: {err}"),
            }
        };
        assert!(status.success());
    }
}
