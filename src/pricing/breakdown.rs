use super::estimator::{base_price, DiamondSpec, PriceFactor};

/// Additive explanation of the heuristic price.
///
/// Each adjustment is `base × (multiplier − 1)` for its axis, so the parts
/// read as "this grade adds / removes so much". The heuristic itself combines
/// the multipliers multiplicatively and also applies the depth/table
/// penalties, so [`PriceBreakdown::total`] generally differs from
/// [`heuristic_price`](super::estimator::heuristic_price). The breakdown is an
/// explanatory approximation only and is not reconciled with the estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub base: f64,
    pub cut_adjustment: f64,
    pub color_adjustment: f64,
    pub clarity_adjustment: f64,
}

impl PriceBreakdown {
    /// Sum of the four components.
    pub fn total(&self) -> f64 {
        self.base + self.cut_adjustment + self.color_adjustment + self.clarity_adjustment
    }

    /// `(name, value)` pairs in display order.
    pub fn components(&self) -> [(&'static str, f64); 4] {
        [
            ("Base carat price", self.base),
            ("Cut adjustment", self.cut_adjustment),
            ("Color adjustment", self.color_adjustment),
            ("Clarity adjustment", self.clarity_adjustment),
        ]
    }
}

pub fn price_components(spec: &DiamondSpec) -> PriceBreakdown {
    let base = base_price(spec.carat);
    PriceBreakdown {
        base,
        cut_adjustment: base * (spec.cut.multiplier() - 1.0),
        color_adjustment: base * (spec.color.multiplier() - 1.0),
        clarity_adjustment: base * (spec.clarity.multiplier() - 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Clarity, Color, Cut};
    use crate::pricing::estimator::heuristic_price;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_components_follow_multipliers() {
        let spec = DiamondSpec::default();
        let b = price_components(&spec);
        assert!(close(b.base, 2000.0));
        assert!(close(b.cut_adjustment, 400.0));
        assert!(close(b.color_adjustment, 400.0));
        assert!(close(b.clarity_adjustment, 600.0));
        assert!(close(b.total(), 3400.0));
    }

    #[test]
    fn test_negative_adjustments() {
        let spec = DiamondSpec {
            cut: Cut::Fair,
            color: Color::J,
            clarity: Clarity::I1,
            ..DiamondSpec::default()
        };
        let b = price_components(&spec);
        assert!(close(b.cut_adjustment, -400.0));
        assert!(close(b.color_adjustment, -200.0));
        assert!(close(b.clarity_adjustment, -400.0));
    }

    #[test]
    fn test_additive_total_differs_from_heuristic() {
        let spec = DiamondSpec::default();
        // 2000 · 1.2 · 1.2 · 1.3 = 3744 vs 2000 + 400 + 400 + 600 = 3400
        assert!(close(heuristic_price(&spec), 3744.0));
        assert!(!close(price_components(&spec).total(), heuristic_price(&spec)));

        // neutral grades agree
        let neutral = DiamondSpec {
            cut: Cut::VeryGood,
            color: Color::H,
            clarity: Clarity::SI1,
            ..DiamondSpec::default()
        };
        assert!(close(price_components(&neutral).total(), heuristic_price(&neutral)));
    }
}
