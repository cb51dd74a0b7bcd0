//! Classifier capability and startup loading.
//!
//! Handlers only see `Arc<dyn Classifier>`; the concrete model is chosen once
//! at startup from configuration and never mutated afterwards.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ClassifierKind, Config};
use crate::gbdt::GradientBoostedModel;
use crate::model_artifact::ModelArtifact;

/// Classifier input vector, in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub age: f64,
    pub gender_code: f64,
    pub bmi: f64,
}

impl Features {
    /// Number of input columns.
    pub const LEN: usize = 3;

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [self.age, self.gender_code, self.bmi]
    }
}

/// Errors raised while loading or running a classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// The model artifact could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The model artifact is not valid JSON for the expected schema.
    Decode(serde_json::Error),
    /// The decoded model is structurally unusable.
    InvalidModel(String),
    /// The artifact's SHA-256 does not match the configured value.
    ChecksumMismatch { expected: String, actual: String },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::Io { path, source } => {
                write!(f, "failed to read model {}: {}", path.display(), source)
            }
            ClassifierError::Decode(e) => write!(f, "failed to decode model: {}", e),
            ClassifierError::InvalidModel(msg) => write!(f, "invalid model: {}", msg),
            ClassifierError::ChecksumMismatch { expected, actual } => write!(
                f,
                "model checksum mismatch: expected {}, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for ClassifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClassifierError::Io { source, .. } => Some(source),
            ClassifierError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Decode(err)
    }
}

/// A trained model mapping `(age, gender_code, bmi)` to a category code.
pub trait Classifier: Send + Sync {
    /// Predicts the category code for one applicant.
    fn predict(&self, features: &Features) -> Result<u8, ClassifierError>;

    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &str;
}

/// The underwriting rules the shipped model was trained to reproduce.
///
/// Selected with `CLASSIFIER=rules` when no model artifact is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl Classifier for RuleBasedClassifier {
    fn predict(&self, features: &Features) -> Result<u8, ClassifierError> {
        let age = features.age;
        let bmi = features.bmi;
        let outside = |low: f64| bmi < low || bmi >= 38.5;

        let category = if (18.0..=39.0).contains(&age) && outside(17.49) {
            0
        } else if (40.0..=59.0).contains(&age) && outside(18.49) {
            1
        } else if age >= 60.0 && outside(18.49) {
            2
        } else {
            3
        };

        Ok(category)
    }

    fn name(&self) -> &str {
        "rules"
    }
}

/// Builds the classifier selected by configuration.
///
/// For `ClassifierKind::Model` the artifact at `config.model_path` is read,
/// checksummed against `config.model_sha256` when set, and decoded.
pub fn load_classifier(config: &Config) -> anyhow::Result<Arc<dyn Classifier>> {
    match config.classifier_kind {
        ClassifierKind::Rules => {
            tracing::warn!("Using rule-based classifier; no model artifact loaded");
            Ok(Arc::new(RuleBasedClassifier))
        }
        ClassifierKind::Model => {
            let artifact = ModelArtifact::read(&config.model_path)?;
            tracing::info!(
                "Read model artifact {} ({} bytes, sha256 {})",
                config.model_path.display(),
                artifact.len(),
                artifact.checksum()
            );
            artifact.verify(config.model_sha256.as_deref())?;

            let model = GradientBoostedModel::from_slice(artifact.bytes())?;
            if model.n_features() != Features::LEN {
                anyhow::bail!(
                    "model expects {} features, applicants provide {}",
                    model.n_features(),
                    Features::LEN
                );
            }
            tracing::info!(
                "✓ Loaded gradient boosted model: {} classes, {} stages",
                model.n_classes(),
                model.n_stages()
            );
            Ok(Arc::new(model))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(age: f64, bmi: f64) -> Features {
        Features {
            age,
            gender_code: 1.0,
            bmi,
        }
    }

    #[test]
    fn test_rules_by_age_band() {
        let clf = RuleBasedClassifier;
        assert_eq!(clf.predict(&features(25.0, 16.0)).unwrap(), 0);
        assert_eq!(clf.predict(&features(25.0, 40.0)).unwrap(), 0);
        assert_eq!(clf.predict(&features(45.0, 18.0)).unwrap(), 1);
        assert_eq!(clf.predict(&features(70.0, 38.5)).unwrap(), 2);
        assert_eq!(clf.predict(&features(25.0, 22.0)).unwrap(), 3);
    }

    #[test]
    fn test_rules_thresholds() {
        let clf = RuleBasedClassifier;
        // Young band uses the lower 17.49 cutoff.
        assert_eq!(clf.predict(&features(30.0, 18.0)).unwrap(), 3);
        assert_eq!(clf.predict(&features(30.0, 17.49)).unwrap(), 3);
        assert_eq!(clf.predict(&features(50.0, 18.0)).unwrap(), 1);
        assert_eq!(clf.predict(&features(50.0, 38.49)).unwrap(), 3);
    }

    #[test]
    fn test_rules_outside_age_bands() {
        let clf = RuleBasedClassifier;
        assert_eq!(clf.predict(&features(16.0, 45.0)).unwrap(), 3);
        assert_eq!(clf.predict(&features(39.5, 45.0)).unwrap(), 3);
    }

    #[test]
    fn test_features_column_order() {
        let f = Features {
            age: 40.0,
            gender_code: 0.0,
            bmi: 22.5,
        };
        assert_eq!(f.to_array(), [40.0, 0.0, 22.5]);
    }
}
