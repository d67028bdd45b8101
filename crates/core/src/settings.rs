//! Layered configuration: defaults, then an optional TOML file, then
//! `PIPELINE__`-prefixed environment variables, in that order of
//! increasing precedence.

use serde::{Deserialize, Serialize};

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_repair_rounds() -> u32 {
    3
}

fn default_run_timeout_secs() -> u64 {
    86_400
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_collaborator_timeout_secs() -> u64 {
    120
}

fn default_prompt_adaptation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_evolution_decay_lambda() -> f64 {
    0.05
}

fn default_reinforce_multiplier() -> f64 {
    1.2
}

fn default_diversify_multiplier() -> f64 {
    0.8
}

fn default_store_dir() -> String {
    "./data/releases".to_string()
}

fn default_persona_dir() -> String {
    "./data/personas".to_string()
}

fn default_run_status_dir() -> String {
    "./data/runs".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_max_repair_rounds")]
    pub max_repair_rounds: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_repair_rounds: default_max_repair_rounds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSettings {
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_run_status_dir")]
    pub run_status_dir: String,
    /// Per-collaborator-call deadline (orchestrator, generation loop, video
    /// selection, approval dispatch/poll); distinct from the overall
    /// approval-wait budget.
    #[serde(default = "default_collaborator_timeout_secs")]
    pub collaborator_timeout_secs: u64,
    /// Model id passed to the orchestrator for the prompt-adaptation call
    /// in `select_persona` → `adapt_parameters`.
    #[serde(default = "default_prompt_adaptation_model")]
    pub prompt_adaptation_model: String,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            run_timeout_secs: default_run_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            run_status_dir: default_run_status_dir(),
            collaborator_timeout_secs: default_collaborator_timeout_secs(),
            prompt_adaptation_model: default_prompt_adaptation_model(),
        }
    }
}

impl SupervisorSettings {
    /// `poll_interval_secs` must leave room for at least 10 polls within
    /// `run_timeout_secs`, otherwise a timed-out run could never have been
    /// observed as pending.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs > self.run_timeout_secs / 10 {
            return Err(format!(
                "poll_interval_secs ({}) must be <= run_timeout_secs / 10 ({})",
                self.poll_interval_secs,
                self.run_timeout_secs / 10
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionSettings {
    #[serde(default = "default_evolution_decay_lambda")]
    pub decay_lambda: f64,
    #[serde(default = "default_reinforce_multiplier")]
    pub reinforce_multiplier: f64,
    #[serde(default = "default_diversify_multiplier")]
    pub diversify_multiplier: f64,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            decay_lambda: default_evolution_decay_lambda(),
            reinforce_multiplier: default_reinforce_multiplier(),
            diversify_multiplier: default_diversify_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_dir")]
    pub release_dir: String,
    #[serde(default = "default_persona_dir")]
    pub persona_dir: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            release_dir: default_store_dir(),
            persona_dir: default_persona_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub supervisor: SupervisorSettings,
    #[serde(default)]
    pub evolution: EvolutionSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

impl Settings {
    /// Loads defaults, then merges `path` if it exists, then merges
    /// environment variables prefixed `PIPELINE__` with `__` as the
    /// nesting separator (e.g. `PIPELINE__SUPERVISOR__POLL_INTERVAL_SECS`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            if std::path::Path::new(path).exists() {
                builder = builder.add_source(config::File::with_name(path));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PIPELINE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
