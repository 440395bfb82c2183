use std::io::Write;

use rand::Rng;

use crate::engine::MutationEngine;
use crate::executor::TargetCommand;
use crate::oracle::{Finding, Oracle};

/// Knobs for one fuzzing campaign.
#[derive(Debug, Clone, Copy)]
pub struct CampaignSettings {
    /// Number of mutated candidates generated on top of the seed.
    pub candidate_count: usize,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            candidate_count: 10,
        }
    }
}

/// The overall verdict of a campaign.
#[derive(Debug)]
pub enum CampaignOutcome {
    /// Every executed candidate passed.
    AllPassed {
        /// Candidates that ran to completion.
        executed: usize,
        /// Candidates skipped because the harness hit a local I/O failure.
        io_failures: usize,
    },
    /// A candidate failed; execution stopped at that candidate.
    Finding(Finding),
}

/// Runs one campaign: the seed followed by `candidate_count` mutated inputs,
/// strictly in generation order.
///
/// Per candidate, a record (input, exit status, full stdout, full stderr) is
/// written to `report`. A harness I/O failure is reported with the offending
/// input and the campaign moves on to the next candidate. A Fail verdict
/// halts immediately: no later candidate is executed.
pub fn run_campaign<R, O, W>(
    seed: &str,
    engine: &MutationEngine,
    target: &TargetCommand,
    oracle: &O,
    settings: &CampaignSettings,
    rng: &mut R,
    report: &mut W,
) -> Result<CampaignOutcome, std::io::Error>
where
    R: Rng + ?Sized,
    O: Oracle + ?Sized,
    W: Write,
{
    let mutated = engine.generate(seed, settings.candidate_count, rng);
    for candidate in &mutated {
        writeln!(report, "Mutated input: {candidate}")?;
    }

    let mut executed = 0;
    let mut io_failures = 0;

    for (index, candidate) in std::iter::once(seed.to_string()).chain(mutated).enumerate() {
        match target.execute(&candidate) {
            Err(harness_error) => {
                io_failures += 1;
                writeln!(
                    report,
                    "Harness failure on candidate {index} (input {candidate:?}): {harness_error}"
                )?;
            }
            Ok(record) => {
                executed += 1;
                writeln!(report, "Input: {}", record.input)?;
                writeln!(report, "Exit status: {}", record.status)?;
                writeln!(report, "Stdout:\n{}", record.stdout)?;
                writeln!(report, "Stderr:\n{}", record.stderr)?;

                if let Some(finding) = oracle.examine(&record) {
                    writeln!(report, "!!! FINDING (candidate {index}) !!!")?;
                    writeln!(report, "  Input: {:?}", finding.input)?;
                    writeln!(report, "  Status: {}", finding.status)?;
                    writeln!(report, "  Input hash: {}", finding.input_hash)?;
                    return Ok(CampaignOutcome::Finding(finding));
                }
            }
        }
    }

    Ok(CampaignOutcome::AllPassed {
        executed,
        io_failures,
    })
}
