use crate::executor::{ExecutionRecord, ExecutionStatus};

/// Classification of one candidate execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The target exited cleanly; the campaign continues.
    Pass,
    /// The target misbehaved; the campaign halts with a finding.
    Fail,
}

/// A candidate execution the campaign surfaces as its result.
#[derive(Debug, Clone)]
pub struct Finding {
    /// The input that triggered this finding.
    pub input: String,
    /// How the target terminated.
    pub status: ExecutionStatus,
    /// Full captured standard output.
    pub stdout: String,
    /// Full captured standard error.
    pub stderr: String,
    /// MD5 hex digest of the input, for tracking findings across runs.
    pub input_hash: String,
}

/// An `Oracle` inspects one execution record and decides whether it
/// constitutes a finding.
pub trait Oracle: Send + Sync {
    /// Classifies a termination status as Pass or Fail.
    fn classify(&self, status: &ExecutionStatus) -> Verdict;

    /// Builds a [`Finding`] from the record when it classifies as Fail.
    fn examine(&self, record: &ExecutionRecord) -> Option<Finding>;
}

/// The baseline oracle: exit status 0 is a Pass, everything else (nonzero
/// exit, termination by signal, timeout) is a Fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExitStatusOracle;

impl ExitStatusOracle {
    pub fn new() -> Self {
        ExitStatusOracle
    }
}

impl Oracle for ExitStatusOracle {
    fn classify(&self, status: &ExecutionStatus) -> Verdict {
        if status.is_success() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    fn examine(&self, record: &ExecutionRecord) -> Option<Finding> {
        match self.classify(&record.status) {
            Verdict::Pass => None,
            Verdict::Fail => {
                let digest = md5::compute(record.input.as_bytes());
                Some(Finding {
                    input: record.input.clone(),
                    status: record.status.clone(),
                    stdout: record.stdout.clone(),
                    stderr: record.stderr.clone(),
                    input_hash: format!("{:x}", digest),
                })
            }
        }
    }
}
