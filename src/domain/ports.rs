/// A fitted regression model that can be shared across request handlers.
pub trait Regressor: Send + Sync {
    /// Predicts the target for one row laid out in `Feature::ALL` order.
    fn predict(&self, row: &[f64]) -> f64;

    /// Per-feature importance weights in the same order as the input row.
    fn feature_importances(&self) -> &[f64];
}
