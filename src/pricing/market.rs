use std::collections::BTreeMap;

use crate::data::model::{Clarity, Color, Cut, Dataset, Grade, NumericColumn};
use crate::data::stats::{mean, mode};

use super::estimator::DiamondSpec;

/// Relative half-width of the displayed price interval.
const INTERVAL_SPREAD: f64 = 0.15;
/// Relative half-width of the "similar price" market band.
const MARKET_BAND: f64 = 0.2;
const TOP_COMBINATIONS: usize = 5;

/// `(low, high)` = estimate ∓ 15 %.
pub fn price_interval(price: f64) -> (f64, f64) {
    (price * (1.0 - INTERVAL_SPREAD), price * (1.0 + INTERVAL_SPREAD))
}

// ---------------------------------------------------------------------------
// Market comparison
// ---------------------------------------------------------------------------

/// Mean price and weight of one grade combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    pub cut: Cut,
    pub color: Color,
    pub clarity: Clarity,
    pub mean_price: f64,
    pub mean_carat: f64,
}

/// Diamonds priced within ±20 % of an estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketComparison {
    pub count: usize,
    /// Most expensive grade combinations in the band.
    pub top_combinations: Vec<Combination>,
    pub mean_carat: f64,
    pub common_cut: Cut,
    pub common_color: Color,
    pub common_clarity: Clarity,
}

/// `None` when no diamond falls in the band.
pub fn market_comparison(dataset: &Dataset, price: f64) -> Option<MarketComparison> {
    let (lo, hi) = (price * (1.0 - MARKET_BAND), price * (1.0 + MARKET_BAND));
    let band: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.price >= lo && r.price <= hi)
        .map(|(i, _)| i)
        .collect();

    let mut groups: BTreeMap<(Cut, Color, Clarity), (f64, f64, usize)> = BTreeMap::new();
    for &i in &band {
        let r = &dataset.records[i];
        let entry = groups.entry((r.cut, r.color, r.clarity)).or_default();
        entry.0 += r.price;
        entry.1 += r.carat;
        entry.2 += 1;
    }

    let mut top_combinations: Vec<Combination> = groups
        .into_iter()
        .map(|((cut, color, clarity), (price_sum, carat_sum, n))| Combination {
            cut,
            color,
            clarity,
            mean_price: price_sum / n as f64,
            mean_carat: carat_sum / n as f64,
        })
        .collect();
    top_combinations.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price));
    top_combinations.truncate(TOP_COMBINATIONS);

    Some(MarketComparison {
        count: band.len(),
        top_combinations,
        mean_carat: mean(&dataset.column(NumericColumn::Carat, &band))?,
        common_cut: mode(dataset, &band)?,
        common_color: mode(dataset, &band)?,
        common_clarity: mode(dataset, &band)?,
    })
}

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tip {
    ReduceCarat,
    TopQuality,
    Depth,
    Table,
    Balanced,
}

impl Tip {
    pub fn message(self) -> &'static str {
        match self {
            Tip::ReduceCarat => {
                "Consider a slightly lower carat weight – price falls off steeply with weight"
            }
            Tip::TopQuality => {
                "You picked top quality on every axis – dropping one grade gives better value"
            }
            Tip::Depth => "Depth should be between 58 and 65 % for optimal light return",
            Tip::Table => "Table should be between 53 and 58 % for the best result",
            Tip::Balanced => "Good choice! Your diamond balances quality and price well",
        }
    }
}

pub fn optimization_tips(spec: &DiamondSpec) -> Vec<Tip> {
    let mut tips = Vec::new();
    if spec.carat >= 1.0 {
        tips.push(Tip::ReduceCarat);
    }
    if spec.cut == Cut::Ideal
        && matches!(spec.color, Color::D | Color::E)
        && matches!(spec.clarity, Clarity::IF | Clarity::VVS1)
    {
        tips.push(Tip::TopQuality);
    }
    if !spec.ideal_depth() {
        tips.push(Tip::Depth);
    }
    if !spec.ideal_table() {
        tips.push(Tip::Table);
    }
    if tips.is_empty() {
        tips.push(Tip::Balanced);
    }
    tips
}

/// Star ratings shown next to the user's choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityStars {
    pub carat: u8,
    pub cut: u8,
    pub color: u8,
    pub clarity: u8,
    pub depth: u8,
    pub table: u8,
}

pub fn quality_stars(spec: &DiamondSpec) -> QualityStars {
    let proportion = |ideal: bool| if ideal { 3 } else { 2 };
    QualityStars {
        carat: (spec.carat * 2.0).floor().clamp(0.0, 5.0) as u8,
        cut: spec.cut.rank(),
        color: 9 - spec.color.rank(),
        clarity: 10 - spec.clarity.rank(),
        depth: proportion(spec.ideal_depth()),
        table: proportion(spec.ideal_table()),
    }
}

pub fn stars(n: u8) -> String {
    "★".repeat(n as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::mixed_dataset;

    #[test]
    fn test_price_interval() {
        let (lo, hi) = price_interval(1000.0);
        assert!((lo - 850.0).abs() < 1e-9);
        assert!((hi - 1150.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_comparison_band() {
        let ds = mixed_dataset();
        // band 4000..=6000 → prices 4800 (Good H SI1, 1.1) and 5200 (Premium I SI2, 1.3)
        let m = market_comparison(&ds, 5000.0).unwrap();
        assert_eq!(m.count, 2);
        assert_eq!(m.top_combinations.len(), 2);
        assert_eq!(m.top_combinations[0].cut, Cut::Premium);
        assert_eq!(m.top_combinations[0].mean_price, 5200.0);
        assert!((m.mean_carat - 1.2).abs() < 1e-9);
        assert_eq!(m.common_cut, Cut::Good);
        assert_eq!(m.common_color, Color::H);
        assert_eq!(m.common_clarity, Clarity::SI1);
    }

    #[test]
    fn test_market_comparison_empty_band() {
        let ds = mixed_dataset();
        assert!(market_comparison(&ds, 100_000.0).is_none());
        assert!(market_comparison(&Dataset::default(), 1000.0).is_none());
    }

    #[test]
    fn test_tips() {
        let top = DiamondSpec::default();
        assert_eq!(optimization_tips(&top), vec![Tip::ReduceCarat, Tip::TopQuality]);

        let modest = DiamondSpec {
            carat: 0.7,
            cut: Cut::Premium,
            color: Color::G,
            clarity: Clarity::VS1,
            depth: 67.0,
            table: 52.0,
        };
        assert_eq!(optimization_tips(&modest), vec![Tip::Depth, Tip::Table]);

        let balanced = DiamondSpec {
            depth: 61.0,
            table: 55.0,
            ..modest
        };
        assert_eq!(optimization_tips(&balanced), vec![Tip::Balanced]);
    }

    #[test]
    fn test_quality_stars() {
        let s = quality_stars(&DiamondSpec::default());
        assert_eq!(s.carat, 2);
        assert_eq!(s.cut, 5);
        assert_eq!(s.color, 8);
        assert_eq!(s.clarity, 9);
        assert_eq!((s.depth, s.table), (3, 3));

        let big = DiamondSpec {
            carat: 4.2,
            color: Color::J,
            clarity: Clarity::I1,
            depth: 70.0,
            ..DiamondSpec::default()
        };
        let s = quality_stars(&big);
        assert_eq!(s.carat, 5);
        assert_eq!(s.color, 2);
        assert_eq!(s.clarity, 2);
        assert_eq!(s.depth, 2);
        assert_eq!(stars(3), "★★★");
    }
}
