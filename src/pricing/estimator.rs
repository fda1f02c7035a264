use std::fmt;
use std::ops::RangeInclusive;

use log::debug;

use crate::data::model::{Clarity, Color, Cut, Dataset, Grade, NumericColumn};
use crate::data::stats::median;
use crate::error::{DiamondError, Result};

/// Carat window (±) for the empirical lookup.
pub const CARAT_TOLERANCE: f64 = 0.2;
/// Matches needed before the empirical median is trusted.
pub const MIN_EVIDENCE: usize = 5;

const BASE_FACTOR: f64 = 2000.0;
const BASE_EXPONENT: f64 = 1.8;
const PROPORTION_PENALTY: f64 = 0.95;

pub const IDEAL_DEPTH: RangeInclusive<f64> = 58.0..=65.0;
pub const IDEAL_TABLE: RangeInclusive<f64> = 53.0..=58.0;

// ---------------------------------------------------------------------------
// Per-grade price multipliers
// ---------------------------------------------------------------------------

/// Fixed price multiplier attached to every grade of a quality axis.
pub trait PriceFactor: Grade {
    fn multiplier(self) -> f64;
}

impl PriceFactor for Cut {
    fn multiplier(self) -> f64 {
        match self {
            Cut::Fair => 0.8,
            Cut::Good => 0.9,
            Cut::VeryGood => 1.0,
            Cut::Premium => 1.1,
            Cut::Ideal => 1.2,
        }
    }
}

impl PriceFactor for Color {
    fn multiplier(self) -> f64 {
        match self {
            Color::D => 1.2,
            Color::E => 1.15,
            Color::F => 1.1,
            Color::G => 1.05,
            Color::H => 1.0,
            Color::I => 0.95,
            Color::J => 0.9,
        }
    }
}

impl PriceFactor for Clarity {
    fn multiplier(self) -> f64 {
        match self {
            Clarity::IF => 1.3,
            Clarity::VVS1 => 1.2,
            Clarity::VVS2 => 1.15,
            Clarity::VS1 => 1.1,
            Clarity::VS2 => 1.05,
            Clarity::SI1 => 1.0,
            Clarity::SI2 => 0.95,
            Clarity::I1 => 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// Query and result types
// ---------------------------------------------------------------------------

/// A hypothetical diamond to price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondSpec {
    pub carat: f64,
    pub cut: Cut,
    pub color: Color,
    pub clarity: Clarity,
    pub depth: f64,
    pub table: f64,
}

impl Default for DiamondSpec {
    fn default() -> Self {
        Self {
            carat: 1.0,
            cut: Cut::Ideal,
            color: Color::D,
            clarity: Clarity::IF,
            depth: 61.0,
            table: 55.0,
        }
    }
}

impl DiamondSpec {
    /// Build a spec from text labels, e.g. form input.
    pub fn from_labels(
        carat: f64,
        cut: &str,
        color: &str,
        clarity: &str,
        depth: f64,
        table: f64,
    ) -> Result<Self> {
        Ok(Self {
            carat,
            cut: cut.parse()?,
            color: color.parse()?,
            clarity: clarity.parse()?,
            depth,
            table,
        })
    }

    pub fn ideal_depth(&self) -> bool {
        IDEAL_DEPTH.contains(&self.depth)
    }

    pub fn ideal_table(&self) -> bool {
        IDEAL_TABLE.contains(&self.table)
    }

    fn validate(&self) -> Result<()> {
        if !self.carat.is_finite() || self.carat <= 0.0 {
            return Err(DiamondError::InvalidAttribute(format!(
                "carat must be positive, got {}",
                self.carat
            )));
        }
        for (name, v) in [("depth", self.depth), ("table", self.table)] {
            if !v.is_finite() {
                return Err(DiamondError::InvalidAttribute(format!(
                    "{name} must be a finite percentage, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Median of similar diamonds in the dataset.
    Empirical,
    /// Parametric fallback.
    Heuristic,
}

impl Method {
    pub fn label(self) -> &'static str {
        match self {
            Method::Empirical => "empirical",
            Method::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEstimate {
    pub price: f64,
    pub method: Method,
    pub confidence: Confidence,
    /// Dataset rows matching the spec (both branches report it).
    pub evidence_count: usize,
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Rows with the same cut, color and clarity and a carat within
/// [`CARAT_TOLERANCE`] of the spec.
pub fn similar_diamonds(spec: &DiamondSpec, dataset: &Dataset) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            r.cut == spec.cut
                && r.color == spec.color
                && r.clarity == spec.clarity
                && (r.carat - spec.carat).abs() <= CARAT_TOLERANCE
        })
        .map(|(i, _)| i)
        .collect()
}

/// `2000 · carat^1.8`, the weight-only part of the heuristic.
pub fn base_price(carat: f64) -> f64 {
    BASE_FACTOR * carat.powf(BASE_EXPONENT)
}

/// Parametric price: base × grade multipliers × proportion penalties.
pub fn heuristic_price(spec: &DiamondSpec) -> f64 {
    let depth_penalty = if spec.ideal_depth() { 1.0 } else { PROPORTION_PENALTY };
    let table_penalty = if spec.ideal_table() { 1.0 } else { PROPORTION_PENALTY };

    base_price(spec.carat)
        * spec.cut.multiplier()
        * spec.color.multiplier()
        * spec.clarity.multiplier()
        * depth_penalty
        * table_penalty
}

/// Estimate the price of `spec`.
///
/// With at least [`MIN_EVIDENCE`] similar diamonds the median of their prices
/// is returned; otherwise the heuristic. Never touches `dataset`.
pub fn estimate(spec: &DiamondSpec, dataset: &Dataset) -> Result<PriceEstimate> {
    spec.validate()?;

    let similar = similar_diamonds(spec, dataset);
    let evidence_count = similar.len();

    if evidence_count >= MIN_EVIDENCE {
        let prices = dataset.column(NumericColumn::Price, &similar);
        if let Some(price) = median(&prices) {
            debug!("Empirical estimate from {evidence_count} matches: {price:.0}");
            return Ok(PriceEstimate {
                price,
                method: Method::Empirical,
                confidence: Confidence::High,
                evidence_count,
            });
        }
    }

    let price = heuristic_price(spec);
    debug!("Heuristic estimate ({evidence_count} matches): {price:.0}");
    Ok(PriceEstimate {
        price,
        method: Method::Heuristic,
        confidence: Confidence::Medium,
        evidence_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{mixed_dataset, raw};
    use crate::data::prepare::prepare;

    fn ideal_d_if(carats_and_prices: &[(f64, f64)]) -> Dataset {
        let rows: Vec<_> = carats_and_prices
            .iter()
            .map(|&(c, p)| raw(c, "Ideal", "D", "IF", p))
            .collect();
        prepare(&rows).unwrap()
    }

    #[test]
    fn test_empirical_scenario() {
        let ds = ideal_d_if(&[
            (0.85, 10000.0),
            (0.9, 10000.0),
            (0.95, 10000.0),
            (1.0, 10000.0),
            (1.1, 10000.0),
            (1.15, 10000.0),
        ]);
        let est = estimate(&DiamondSpec::default(), &ds).unwrap();
        assert_eq!(est.method, Method::Empirical);
        assert_eq!(est.confidence, Confidence::High);
        assert_eq!(est.evidence_count, 6);
        assert_eq!(est.price, 10000.0);
    }

    #[test]
    fn test_empirical_uses_median() {
        let ds = ideal_d_if(&[
            (1.0, 100.0),
            (1.0, 200.0),
            (1.1, 300.0),
            (0.9, 400.0),
            (1.2, 50000.0),
            // outside the window
            (1.5, 1.0),
        ]);
        let est = estimate(&DiamondSpec::default(), &ds).unwrap();
        assert_eq!(est.method, Method::Empirical);
        assert_eq!(est.evidence_count, 5);
        assert_eq!(est.price, 300.0);
    }

    #[test]
    fn test_falls_back_below_five_matches() {
        let ds = ideal_d_if(&[(1.0, 10000.0), (1.0, 10000.0), (1.0, 10000.0), (1.0, 10000.0)]);
        let spec = DiamondSpec::default();
        let est = estimate(&spec, &ds).unwrap();
        assert_eq!(est.method, Method::Heuristic);
        assert_eq!(est.confidence, Confidence::Medium);
        assert_eq!(est.evidence_count, 4);
        assert!((est.price - 2000.0 * 1.2 * 1.2 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_grade_mismatch_is_not_evidence() {
        let ds = mixed_dataset();
        let spec = DiamondSpec {
            carat: 0.3,
            color: Color::E,
            ..DiamondSpec::default()
        };
        assert!(similar_diamonds(&spec, &ds).is_empty());
        let spec = DiamondSpec {
            carat: 0.45,
            ..DiamondSpec::default()
        };
        assert_eq!(similar_diamonds(&spec, &ds), vec![0]);
    }

    #[test]
    fn test_empty_dataset_uses_heuristic() {
        let est = estimate(&DiamondSpec::default(), &Dataset::default()).unwrap();
        assert_eq!(est.method, Method::Heuristic);
        assert_eq!(est.evidence_count, 0);
        assert!(est.price > 0.0);
    }

    #[test]
    fn test_proportion_penalties() {
        let base = DiamondSpec {
            cut: Cut::VeryGood,
            color: Color::H,
            clarity: Clarity::SI1,
            ..DiamondSpec::default()
        };
        assert!((heuristic_price(&base) - 2000.0).abs() < 1e-9);

        let deep = DiamondSpec { depth: 66.0, ..base };
        assert!((heuristic_price(&deep) - 1900.0).abs() < 1e-9);

        let both = DiamondSpec {
            depth: 57.9,
            table: 58.5,
            ..base
        };
        assert!((heuristic_price(&both) - 2000.0 * 0.95 * 0.95).abs() < 1e-9);

        let edges = DiamondSpec {
            depth: 65.0,
            table: 53.0,
            ..base
        };
        assert!((heuristic_price(&edges) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_price_grows_superlinearly() {
        let mut prev = 0.0;
        for i in 1..=50 {
            let carat = i as f64 * 0.1;
            let p = base_price(carat);
            assert!(p >= prev);
            prev = p;
        }
        assert!(base_price(2.0) > 2.0 * base_price(1.0));
    }

    #[test]
    fn test_invalid_attributes() {
        let ds = mixed_dataset();
        let negative = DiamondSpec {
            carat: -1.0,
            ..DiamondSpec::default()
        };
        assert!(matches!(
            estimate(&negative, &ds),
            Err(DiamondError::InvalidAttribute(_))
        ));
        let zero = DiamondSpec {
            carat: 0.0,
            ..DiamondSpec::default()
        };
        assert!(estimate(&zero, &ds).is_err());
        let nan_depth = DiamondSpec {
            depth: f64::NAN,
            ..DiamondSpec::default()
        };
        assert!(estimate(&nan_depth, &ds).is_err());

        assert!(matches!(
            DiamondSpec::from_labels(1.0, "Excellent", "D", "IF", 61.0, 55.0),
            Err(DiamondError::InvalidAttribute(_))
        ));
        let spec = DiamondSpec::from_labels(1.0, "Premium", "G", "VS2", 61.0, 55.0).unwrap();
        assert_eq!(spec.cut, Cut::Premium);
    }

    #[test]
    fn test_estimate_does_not_mutate_dataset() {
        let ds = mixed_dataset();
        let before = ds.clone();
        estimate(&DiamondSpec::default(), &ds).unwrap();
        assert_eq!(ds, before);
    }
}
