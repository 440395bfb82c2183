pub mod campaign;
pub mod config;
pub mod engine;
pub mod executor;
pub mod operator;
pub mod oracle;
pub mod tokenizer;

pub use campaign::{CampaignOutcome, CampaignSettings, run_campaign};
pub use config::TatterConfig;
pub use engine::MutationEngine;
pub use executor::{ExecutionRecord, ExecutionStatus, HarnessError, TargetCommand};
pub use operator::Operator;
pub use oracle::{ExitStatusOracle, Finding, Oracle, Verdict};
pub use tokenizer::{Token, tokenize};
