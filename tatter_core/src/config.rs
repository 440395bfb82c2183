use serde::Deserialize;
use std::path::PathBuf;

/// The seed the original campaign fuzzes when none is configured.
pub const DEFAULT_SEED_INPUT: &str = "<html a=\"value\">...</html>";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct TargetSettings {
    pub command: String,
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub fn default_working_dir() -> PathBuf {
    PathBuf::from("./")
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct CampaignConfig {
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
    #[serde(default = "default_seed_input")]
    pub seed_input: String,
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

pub fn default_candidate_count() -> usize {
    10
}

fn default_seed_input() -> String {
    DEFAULT_SEED_INPUT.to_string()
}

fn default_mutation_probability() -> f64 {
    0.7
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            seed_input: default_seed_input(),
            mutation_probability: default_mutation_probability(),
            rng_seed: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct TatterConfig {
    #[serde(default)]
    pub target: Option<TargetSettings>,
    #[serde(default)]
    pub campaign: CampaignConfig,
}

impl TatterConfig {
    pub fn load_from_file(path: &PathBuf) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: TatterConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }
}
