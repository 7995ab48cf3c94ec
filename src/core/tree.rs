//! CART regression tree used as the forest's base learner.
//!
//! Splits minimise the summed squared error of the two children. A sample goes
//! left when `x[feature] <= threshold`; thresholds sit halfway between two
//! adjacent distinct values seen at the node.

use rand::rngs::StdRng;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features drawn at each split; `None` means all of them.
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Unnormalised squared-error reduction per feature.
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Grows a tree on the rows of `x` selected by `sample` (duplicates allowed,
    /// which is how bootstrap draws are passed in). `sample` must be non-empty.
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[f64],
        sample: &[usize],
        n_features: usize,
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            config,
            n_features,
            nodes: Vec::new(),
            impurity_decrease: vec![0.0; n_features],
        };
        let mut indices = sample.to_vec();
        builder.grow(&mut indices, 0, rng);

        Self {
            nodes: builder.nodes,
            impurity_decrease: builder.impurity_decrease,
        }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut current = 0;
        loop {
            match self.nodes[current] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    current = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Importances normalised to sum to one, or all zeros for a single-leaf tree.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.impurity_decrease.iter().sum();
        if total > 0.0 {
            self.impurity_decrease.iter().map(|v| v / total).collect()
        } else {
            vec![0.0; self.impurity_decrease.len()]
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

struct Builder<'a, R> {
    x: &'a [R],
    y: &'a [f64],
    config: &'a TreeConfig,
    n_features: usize,
    nodes: Vec<Node>,
    impurity_decrease: Vec<f64>,
}

impl<R: AsRef<[f64]>> Builder<'_, R> {
    fn value(&self, row: usize, feature: usize) -> f64 {
        self.x[row].as_ref()[feature]
    }

    fn grow(&mut self, indices: &mut [usize], depth: usize, rng: &mut StdRng) -> usize {
        let n = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0, 0.0), |(s, sq), &i| {
            let y = self.y[i];
            (s + y, sq + y * y)
        });

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: sum / n as f64,
        });

        let first = self.y[indices[0]];
        let pure = indices.iter().all(|&i| self.y[i] == first);
        let too_deep = self.config.max_depth.is_some_and(|max| depth >= max);
        if pure
            || too_deep
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
        {
            return id;
        }

        let sse = sum_sq - sum * sum / n as f64;
        let Some(split) = self.best_split(indices, sum, sum_sq, sse, rng) else {
            return id;
        };

        let mut mid = 0;
        for k in 0..n {
            if self.value(indices[k], split.feature) <= split.threshold {
                indices.swap(k, mid);
                mid += 1;
            }
        }

        self.impurity_decrease[split.feature] += split.gain.max(0.0);

        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.grow(left_indices, depth + 1, rng);
        let right = self.grow(right_indices, depth + 1, rng);

        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn candidate_features(&self, rng: &mut StdRng) -> Vec<usize> {
        match self.config.max_features {
            Some(k) if k < self.n_features => {
                let mut picked = rand::seq::index::sample(rng, self.n_features, k).into_vec();
                picked.sort_unstable();
                picked
            }
            _ => (0..self.n_features).collect(),
        }
    }

    fn best_split(
        &self,
        indices: &[usize],
        total_sum: f64,
        total_sq: f64,
        sse: f64,
        rng: &mut StdRng,
    ) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf;
        let mut order = indices.to_vec();
        let mut best: Option<Split> = None;

        for feature in self.candidate_features(rng) {
            order.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 0..n - 1 {
                let y = self.y[order[k]];
                left_sum += y;
                left_sq += y * y;

                let current = self.value(order[k], feature);
                let next = self.value(order[k + 1], feature);
                if current == next {
                    continue;
                }

                let left_n = (k + 1) as f64;
                let right_n = (n - k - 1) as f64;
                if k + 1 < min_leaf || n - k - 1 < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let left_sse = left_sq - left_sum * left_sum / left_n;
                let right_sse = (total_sq - left_sq) - right_sum * right_sum / right_n;
                let gain = sse - left_sse - right_sse;

                if best.is_none_or(|b| gain > b.gain) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}
