use std::path::PathBuf;
use std::str::FromStr;

/// Which classifier backs `/bmi_predict/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    /// Gradient boosted model read from `MODEL_PATH`.
    Model,
    /// Built-in underwriting rules.
    Rules,
}

impl FromStr for ClassifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" => Ok(ClassifierKind::Model),
            "rules" => Ok(ClassifierKind::Rules),
            other => anyhow::bail!("CLASSIFIER must be 'model' or 'rules', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model_path: PathBuf,
    pub model_sha256: Option<String>,
    pub classifier_kind: ClassifierKind,
    pub prediction_cache_ttl_secs: u64,
    pub prediction_cache_capacity: u64,
}

pub const DEFAULT_MODEL_PATH: &str = "models/clf_gdbt_synthetic.json";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_sha256: None,
            classifier_kind: ClassifierKind::Model,
            prediction_cache_ttl_secs: 3600,
            prediction_cache_capacity: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised without
    /// touching process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            port: lookup("PORT")
                .map(|p| p.trim().parse::<u16>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?
                .unwrap_or(defaults.port),
            model_path: match lookup("MODEL_PATH") {
                Some(path) if path.trim().is_empty() => anyhow::bail!("MODEL_PATH cannot be empty"),
                Some(path) => PathBuf::from(path.trim()),
                None => defaults.model_path,
            },
            model_sha256: lookup("MODEL_SHA256")
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .map(|digest| {
                    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                        anyhow::bail!("MODEL_SHA256 must be a 64-character hex digest");
                    }
                    Ok(digest)
                })
                .transpose()?,
            classifier_kind: lookup("CLASSIFIER")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ClassifierKind>())
                .transpose()?
                .unwrap_or(defaults.classifier_kind),
            prediction_cache_ttl_secs: lookup("PREDICTION_CACHE_TTL_SECS")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .map_err(|_| {
                    anyhow::anyhow!("PREDICTION_CACHE_TTL_SECS must be a non-negative integer")
                })?
                .unwrap_or(defaults.prediction_cache_ttl_secs),
            prediction_cache_capacity: lookup("PREDICTION_CACHE_CAPACITY")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .map_err(|_| {
                    anyhow::anyhow!("PREDICTION_CACHE_CAPACITY must be a non-negative integer")
                })?
                .unwrap_or(defaults.prediction_cache_capacity),
        };

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Classifier: {:?}", config.classifier_kind);
        tracing::debug!("Model path: {}", config.model_path.display());
        if config.model_sha256.is_some() {
            tracing::info!("Model checksum pinning enabled");
        }
        tracing::debug!(
            "Prediction cache: {} entries, {}s TTL",
            config.prediction_cache_capacity,
            config.prediction_cache_ttl_secs
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
