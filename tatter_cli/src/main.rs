use tatter_core::campaign::{CampaignOutcome, CampaignSettings, run_campaign};
use tatter_core::config::{TargetSettings, TatterConfig, default_working_dir};
use tatter_core::engine::MutationEngine;
use tatter_core::executor::TargetCommand;
use tatter_core::oracle::ExitStatusOracle;

use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_core::{OsRng, SeedableRng, TryRngCore};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Command line of the target to fuzz, run through the platform shell.
    target_command: Option<String>,
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// Number of mutated candidates to generate on top of the seed.
    #[clap(short = 'n', long)]
    candidates: Option<usize>,
    /// Seed input the candidates are derived from.
    #[clap(long)]
    seed_input: Option<String>,
    /// RNG seed for a deterministic, replayable campaign.
    #[clap(long)]
    rng_seed: Option<u64>,
    /// Working directory the target is spawned in.
    #[clap(long)]
    working_dir: Option<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = match cli.config_file {
        Some(config_path) => {
            println!("Loading configuration from specified path: {config_path:?}");
            TatterConfig::load_from_file(&config_path)?
        }
        None => {
            let default_config_path = PathBuf::from("tatter.toml");
            if default_config_path.exists() {
                println!(
                    "No config file specified via CLI, loading default: {default_config_path:?}"
                );
                TatterConfig::load_from_file(&default_config_path)?
            } else {
                TatterConfig::default()
            }
        }
    };

    if let Some(candidates) = cli.candidates {
        config.campaign.candidate_count = candidates;
    }
    if let Some(seed_input) = cli.seed_input {
        config.campaign.seed_input = seed_input;
    }
    if let Some(rng_seed) = cli.rng_seed {
        config.campaign.rng_seed = Some(rng_seed);
    }
    if let Some(target_cmd) = cli.target_command {
        let target = config.target.get_or_insert_with(|| TargetSettings {
            command: String::new(),
            working_dir: default_working_dir(),
            timeout_ms: None,
        });
        target.command = target_cmd;
    }
    if let Some(working_dir) = cli.working_dir {
        if let Some(target) = config.target.as_mut() {
            target.working_dir = working_dir;
        } else {
            println!("Warning: --working-dir specified without a target command. Ignored.");
        }
    }

    let target_settings = config
        .target
        .ok_or_else(|| anyhow::anyhow!("No target command given (argument or config file)"))?;

    // Fail fast before any execution if the target cannot be found.
    let target_path = target_settings.working_dir.join(&target_settings.command);
    if !target_path.exists() {
        anyhow::bail!(
            "Could not find command '{}' under {:?}",
            target_settings.command,
            target_settings.working_dir
        );
    }

    let mut target = TargetCommand::new(target_settings.command, target_settings.working_dir);
    if let Some(timeout_ms) = target_settings.timeout_ms {
        target = target.with_timeout(Duration::from_millis(timeout_ms));
    }

    let rng_seed = match config.campaign.rng_seed {
        Some(seed) => seed,
        None => OsRng
            .try_next_u64()
            .map_err(|e| anyhow::anyhow!("Failed to draw an RNG seed from the OS: {}", e))?,
    };
    println!("Command: {}", target.command);
    println!("RNG seed: {rng_seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);

    let engine = MutationEngine::new(config.campaign.mutation_probability);
    let oracle = ExitStatusOracle::new();
    let settings = CampaignSettings {
        candidate_count: config.campaign.candidate_count,
    };

    let mut report = std::io::stdout().lock();
    let outcome = run_campaign(
        &config.campaign.seed_input,
        &engine,
        &target,
        &oracle,
        &settings,
        &mut rng,
        &mut report,
    )?;
    drop(report);

    match outcome {
        CampaignOutcome::AllPassed {
            executed,
            io_failures,
        } => {
            if io_failures > 0 {
                println!("{io_failures} candidate(s) hit local harness failures.");
            }
            println!("All {executed} executed candidate(s) passed, exiting with exit code 0");
            Ok(())
        }
        CampaignOutcome::Finding(finding) => {
            println!(
                "Non-zero outcome ({}) for input {:?} (hash {}), exiting with exit code 1",
                finding.status, finding.input, finding.input_hash
            );
            std::process::exit(1);
        }
    }
}
