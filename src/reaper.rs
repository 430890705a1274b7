//! Non-blocking reclamation of terminated background children.

use crate::command::ExitCode;
use crate::registry::{PollOutcome, ProcessRegistry};
use crate::waiter;
use std::io;

/// Outcome of removing one entry during a sweep.
#[derive(Debug)]
pub enum Reaped {
    /// The child exited; its status has been consumed.
    Exited { pid: u32, status: ExitCode },
    /// The status check itself failed; the entry is dropped anyway so the
    /// registry never revisits it.
    Failed { pid: u32, error: io::Error },
}

/// One non-blocking pass over the registry.
///
/// Runs at the top of every prompt iteration, before the next line is read.
/// Entries still running are retained; everything else is removed and
/// returned so the caller can print exactly one report per reclaimed child.
pub fn reap(jobs: &mut ProcessRegistry) -> Vec<Reaped> {
    let mut reaped = Vec::new();
    jobs.sweep(|job| {
        let pid = job.pid();
        match job.poll() {
            PollOutcome::Running => true,
            PollOutcome::Exited(status) => {
                reaped.push(Reaped::Exited {
                    pid,
                    status: waiter::decode_status(status),
                });
                false
            }
            PollOutcome::Failed(error) => {
                reaped.push(Reaped::Failed { pid, error });
                false
            }
        }
    });
    reaped
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::registry::BackgroundProcess;
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    fn background(program: &str, args: &[&str]) -> BackgroundProcess {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .expect("spawn test child");
        BackgroundProcess::new(child)
    }

    /// Reaps until the registry drains, collecting every report.
    fn reap_until_empty(jobs: &mut ProcessRegistry) -> Vec<Reaped> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut reports = Vec::new();
        while !jobs.is_empty() {
            assert!(Instant::now() < deadline, "children never finished");
            reports.extend(reap(jobs));
            std::thread::sleep(Duration::from_millis(10));
        }
        reports
    }

    #[test]
    fn test_running_child_is_retained() {
        let mut jobs = ProcessRegistry::new();
        jobs.insert(background("sleep", &["1"]));
        let pid = jobs.pids()[0];

        let reports = reap(&mut jobs);
        assert!(reports.is_empty());
        assert_eq!(jobs.pids(), vec![pid]);

        let _ = reap_until_empty(&mut jobs);
    }

    #[test]
    fn test_exited_child_is_reported_exactly_once() {
        let mut jobs = ProcessRegistry::new();
        jobs.insert(background("true", &[]));
        let pid = jobs.pids()[0];

        let reports = reap_until_empty(&mut jobs);
        assert_eq!(reports.len(), 1);
        match &reports[0] {
            Reaped::Exited { pid: seen, status } => {
                assert_eq!(*seen, pid);
                assert_eq!(*status, 0);
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_failing_child_status_is_reported() {
        let mut jobs = ProcessRegistry::new();
        jobs.insert(background("sh", &["-c", "exit 5"]));

        let reports = reap_until_empty(&mut jobs);
        assert_eq!(reports.len(), 1);
        assert!(matches!(
            reports[0],
            Reaped::Exited { status: 5, .. }
        ));
    }

    #[test]
    fn test_mixed_registry_only_drops_the_finished() {
        let mut jobs = ProcessRegistry::new();
        jobs.insert(background("sleep", &["2"]));
        jobs.insert(background("true", &[]));
        let sleeper = jobs.pids()[0];

        // the short-lived child disappears first, the sleeper survives it
        let deadline = Instant::now() + Duration::from_secs(10);
        while jobs.len() == 2 {
            assert!(Instant::now() < deadline, "true never finished");
            let _ = reap(&mut jobs);
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(jobs.pids(), vec![sleeper]);

        let _ = reap_until_empty(&mut jobs);
    }
}
