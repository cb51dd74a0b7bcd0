use moka::future::Cache;
use std::time::Duration;

use crate::classifier::{Classifier, ClassifierError, Features};

/// Exact bit patterns of `[age, gender_code, bmi]`.
pub type FeatureKey = [u64; Features::LEN];

fn feature_key(features: &Features) -> FeatureKey {
    features.to_array().map(f64::to_bits)
}

/// Memoizes classifier output per feature vector.
///
/// The loaded model is immutable, so identical features always map to the same
/// category. A capacity of zero disables caching.
#[derive(Clone)]
pub struct PredictionCache {
    cache: Option<Cache<FeatureKey, u8>>,
}

impl PredictionCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        if capacity == 0 {
            return Self::disabled();
        }

        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();
        Self { cache: Some(cache) }
    }

    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the cached category or runs the classifier and stores its answer.
    ///
    /// Errors are not cached.
    pub async fn get_or_predict(
        &self,
        classifier: &dyn Classifier,
        features: &Features,
    ) -> Result<u8, ClassifierError> {
        let Some(cache) = &self.cache else {
            return classifier.predict(features);
        };

        let key = feature_key(features);
        if let Some(category) = cache.get(&key).await {
            tracing::debug!("Prediction cache hit: {:?} -> {}", features, category);
            return Ok(category);
        }

        let category = classifier.predict(features)?;
        cache.insert(key, category).await;
        Ok(category)
    }
}
