//! Tree-ensemble regression model
//!
//! Each tree is stored as flat node arrays. Node `i` is a leaf when both
//! children are `-1`; otherwise rows with `x[feature[i]] <= threshold[i]`
//! go to `left[i]` and the rest to `right[i]`. The ensemble prediction is
//! the mean of the tree predictions.
//!
//! Trees and forests can only be obtained through validation, whether built
//! in code or deserialized, so prediction never indexes out of bounds.

use super::PriceModel;
use crate::features::{FeatureVector, NUM_FEATURES};
use serde::{Deserialize, Serialize};

/// Child index marking a leaf
pub const LEAF: i64 = -1;

/// On-disk node arrays of one tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TreeArrays {
    feature: Vec<i64>,
    threshold: Vec<f64>,
    left: Vec<i64>,
    right: Vec<i64>,
    value: Vec<f64>,
}

impl TreeArrays {
    /// Check array shapes and that every split points forward to a valid node
    fn validate(&self) -> Result<(), String> {
        let n = self.value.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.feature.len() != n
            || self.threshold.len() != n
            || self.left.len() != n
            || self.right.len() != n
        {
            return Err(format!(
                "node arrays differ in length (feature={}, threshold={}, left={}, right={}, value={})",
                self.feature.len(),
                self.threshold.len(),
                self.left.len(),
                self.right.len(),
                n
            ));
        }

        for node in 0..n {
            let (left, right) = (self.left[node], self.right[node]);
            if left == LEAF && right == LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {node} has non-finite value"));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= NUM_FEATURES as i64 {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
        }
        Ok(())
    }
}

/// A single validated regression tree in flat-array form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeArrays", into = "TreeArrays")]
pub struct RegressionTree {
    nodes: TreeArrays,
}

impl TryFrom<TreeArrays> for RegressionTree {
    type Error = String;

    fn try_from(nodes: TreeArrays) -> Result<Self, String> {
        nodes.validate()?;
        Ok(Self { nodes })
    }
}

impl From<RegressionTree> for TreeArrays {
    fn from(tree: RegressionTree) -> Self {
        tree.nodes
    }
}

impl RegressionTree {
    /// Build a tree from its node arrays, rejecting malformed shapes
    pub fn new(
        feature: Vec<i64>,
        threshold: Vec<f64>,
        left: Vec<i64>,
        right: Vec<i64>,
        value: Vec<f64>,
    ) -> Result<Self, String> {
        Self::try_from(TreeArrays {
            feature,
            threshold,
            left,
            right,
            value,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.value.len()
    }

    /// Walk from the root to a leaf
    ///
    /// Children always have larger indices, so the walk terminates.
    pub fn predict_one(&self, row: &[f64; NUM_FEATURES]) -> f64 {
        let t = &self.nodes;
        let mut node = 0usize;
        loop {
            let (left, right) = (t.left[node], t.right[node]);
            if left == LEAF && right == LEAF {
                return t.value[node];
            }
            let x = row[t.feature[node] as usize];
            node = if x <= t.threshold[node] {
                left as usize
            } else {
                right as usize
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StoredForest {
    trees: Vec<RegressionTree>,
}

/// Mean of a non-empty ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredForest", into = "StoredForest")]
pub struct ForestModel {
    trees: Vec<RegressionTree>,
}

impl TryFrom<StoredForest> for ForestModel {
    type Error = String;

    fn try_from(stored: StoredForest) -> Result<Self, String> {
        Self::new(stored.trees)
    }
}

impl From<ForestModel> for StoredForest {
    fn from(forest: ForestModel) -> Self {
        StoredForest {
            trees: forest.trees,
        }
    }
}

impl ForestModel {
    /// Build a forest; at least one tree is required
    pub fn new(trees: Vec<RegressionTree>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        Ok(Self { trees })
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    fn predict_one(&self, row: &FeatureVector) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_one(row.as_array()))
            .sum();
        sum / self.trees.len() as f64
    }
}

impl PriceModel for ForestModel {
    fn predict(&self, rows: &[FeatureVector]) -> anyhow::Result<Vec<f64>> {
        Ok(rows.iter().map(|row| self.predict_one(row)).collect())
    }
}
