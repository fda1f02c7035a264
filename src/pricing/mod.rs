/// Price estimation for a hypothetical diamond.
///
/// ```text
///   DiamondSpec ──► estimator ──► PriceEstimate
///        │              │
///        │              └─ similar rows in Dataset (≥ 5 → median)
///        ├──► breakdown   additive explanation of the heuristic
///        └──► market      price band comparison, tips, star ratings
/// ```

pub mod breakdown;
pub mod estimator;
pub mod market;
