//! Multi-class gradient boosted decision tree ensemble.
//!
//! The artifact is a JSON export of a boosted tree classifier:
//!
//! ```json
//! {
//!   "n_features": 3,
//!   "n_classes": 4,
//!   "learning_rate": 0.1,
//!   "init_scores": [0.0, 0.0, 0.0, 0.0],
//!   "estimators": [
//!     [ { "nodes": [ { "kind": "leaf", "value": 0.0 } ] }, ... one tree per class ]
//!   ]
//! }
//! ```
//!
//! Each stage holds one regression tree per class. Splits send a sample left
//! when `x[feature] <= threshold`. The predicted class is the argmax of
//! `init_scores[k] + learning_rate * sum(tree_k(x))`, lowest index on ties.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierError, Features};

/// One node of a regression tree, addressed by index within its tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A regression tree rooted at `nodes[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children always sit after their parent, so a validated tree cannot loop.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} but model has {} features",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} points to invalid child {}",
                                idx, child
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has non-finite value", idx));
                    }
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[feature] <= threshold { left } else { right },
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Boosted tree ensemble. Only constructible through validated decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    n_features: usize,
    n_classes: usize,
    learning_rate: f64,
    init_scores: Vec<f64>,
    /// `estimators[stage][class]`.
    estimators: Vec<Vec<RegressionTree>>,
}

impl GradientBoostedModel {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let model: Self = serde_json::from_slice(bytes)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ClassifierError> {
        Self::from_slice(json.as_bytes())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_stages(&self) -> usize {
        self.estimators.len()
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| ClassifierError::InvalidModel(msg);

        if self.n_features == 0 {
            return Err(invalid("model has no features".to_string()));
        }
        if self.n_classes < 2 || self.n_classes > usize::from(u8::MAX) + 1 {
            return Err(invalid(format!(
                "unsupported class count {}",
                self.n_classes
            )));
        }
        if !self.learning_rate.is_finite() {
            return Err(invalid("learning rate is not finite".to_string()));
        }
        if self.init_scores.len() != self.n_classes {
            return Err(invalid(format!(
                "expected {} init scores, found {}",
                self.n_classes,
                self.init_scores.len()
            )));
        }
        if self.init_scores.iter().any(|s| !s.is_finite()) {
            return Err(invalid("init scores must be finite".to_string()));
        }

        for (stage_idx, stage) in self.estimators.iter().enumerate() {
            if stage.len() != self.n_classes {
                return Err(invalid(format!(
                    "stage {} has {} trees, expected {}",
                    stage_idx,
                    stage.len(),
                    self.n_classes
                )));
            }
            for (class_idx, tree) in stage.iter().enumerate() {
                tree.validate(self.n_features).map_err(|e| {
                    invalid(format!("stage {} class {}: {}", stage_idx, class_idx, e))
                })?;
            }
        }

        Ok(())
    }

    /// Raw per-class scores before argmax.
    pub fn decision_function(&self, x: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if x.len() != self.n_features {
            return Err(ClassifierError::InvalidModel(format!(
                "expected {} features, got {}",
                self.n_features,
                x.len()
            )));
        }

        let mut scores = self.init_scores.clone();
        for stage in &self.estimators {
            for (score, tree) in scores.iter_mut().zip(stage) {
                *score += self.learning_rate * tree.evaluate(x);
            }
        }
        Ok(scores)
    }
}

impl Classifier for GradientBoostedModel {
    fn predict(&self, features: &Features) -> Result<u8, ClassifierError> {
        let scores = self.decision_function(&features.to_array())?;

        let mut best = 0;
        for (k, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = k;
            }
        }

        u8::try_from(best)
            .map_err(|_| ClassifierError::InvalidModel(format!("class index {} overflows", best)))
    }

    fn name(&self) -> &str {
        "gradient_boosted_trees"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(value: f64) -> serde_json::Value {
        json!({ "nodes": [ { "kind": "leaf", "value": value } ] })
    }

    /// Two classes, one stage: class 1 wins when bmi > 30.
    fn bmi_stump() -> serde_json::Value {
        json!({
            "n_features": 3,
            "n_classes": 2,
            "learning_rate": 1.0,
            "init_scores": [0.5, 0.0],
            "estimators": [[
                leaf(0.0),
                { "nodes": [
                    { "kind": "split", "feature": 2, "threshold": 30.0, "left": 1, "right": 2 },
                    { "kind": "leaf", "value": 0.0 },
                    { "kind": "leaf", "value": 1.0 }
                ] }
            ]]
        })
    }

    fn features(bmi: f64) -> Features {
        Features {
            age: 30.0,
            gender_code: 0.0,
            bmi,
        }
    }

    #[test]
    fn test_stump_prediction() {
        let model = GradientBoostedModel::from_json_str(&bmi_stump().to_string()).unwrap();
        assert_eq!(model.predict(&features(22.0)).unwrap(), 0);
        assert_eq!(model.predict(&features(30.0)).unwrap(), 0);
        assert_eq!(model.predict(&features(31.0)).unwrap(), 1);
    }

    #[test]
    fn test_ties_resolve_to_lowest_class() {
        let mut doc = bmi_stump();
        doc["init_scores"] = json!([0.0, 0.0]);
        let model = GradientBoostedModel::from_json_str(&doc.to_string()).unwrap();
        assert_eq!(model.predict(&features(10.0)).unwrap(), 0);
    }

    #[test]
    fn test_stages_accumulate() {
        let mut doc = bmi_stump();
        let stage = doc["estimators"][0].clone();
        doc["estimators"] = json!([stage.clone(), stage]);
        doc["learning_rate"] = json!(0.3);
        let model = GradientBoostedModel::from_json_str(&doc.to_string()).unwrap();

        let scores = model.decision_function(&[30.0, 0.0, 40.0]).unwrap();
        assert!((scores[0] - 0.5).abs() < 1e-12);
        assert!((scores[1] - 0.6).abs() < 1e-12);
        assert_eq!(model.n_stages(), 2);
    }

    #[test]
    fn test_rejects_backward_child() {
        let mut doc = bmi_stump();
        doc["estimators"][0][1]["nodes"][0]["left"] = json!(0);
        let result = GradientBoostedModel::from_json_str(&doc.to_string());
        assert!(matches!(result, Err(ClassifierError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_out_of_range_child() {
        let mut doc = bmi_stump();
        doc["estimators"][0][1]["nodes"][0]["right"] = json!(9);
        let result = GradientBoostedModel::from_json_str(&doc.to_string());
        assert!(matches!(result, Err(ClassifierError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_unknown_feature() {
        let mut doc = bmi_stump();
        doc["estimators"][0][1]["nodes"][0]["feature"] = json!(3);
        let result = GradientBoostedModel::from_json_str(&doc.to_string());
        assert!(matches!(result, Err(ClassifierError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_class_count_mismatch() {
        let mut doc = bmi_stump();
        doc["init_scores"] = json!([0.0, 0.0, 0.0]);
        let result = GradientBoostedModel::from_json_str(&doc.to_string());
        assert!(matches!(result, Err(ClassifierError::InvalidModel(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = GradientBoostedModel::from_json_str("{\"n_features\": 3");
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn test_nan_feature_goes_right() {
        let model = GradientBoostedModel::from_json_str(&bmi_stump().to_string()).unwrap();
        assert_eq!(model.predict(&features(f64::NAN)).unwrap(), 1);
    }
}
