use log::debug;

use crate::error::{DiamondError, Result};

use super::model::{
    AutoBinning, CaratGroup, Clarity, Color, Cut, Dataset, DiamondRecord, Grade, RawRow,
};

/// Number of equal-width bins in the automatic grouping.
const AUTO_BINS: usize = 5;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn raw rows into the prepared [`Dataset`].
///
/// Pure and deterministic: identical input always yields an identical table,
/// so callers may cache the result freely. Fails with
/// [`DiamondError::Schema`] on the first categorical value outside its domain
/// or the first impossible measurement (non-positive carat or price, negative
/// or non-finite dimension).
pub fn prepare(raw_rows: &[RawRow]) -> Result<Dataset> {
    let auto_binning = AutoBinning::from_carats(raw_rows.iter().map(|r| r.carat));

    let records = raw_rows
        .iter()
        .enumerate()
        .map(|(row, raw)| prepare_row(row, raw, auto_binning.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Prepared {} rows, auto bin edges {:?}",
        records.len(),
        auto_binning.map(|b| b.edges)
    );

    Ok(Dataset {
        records,
        auto_binning,
    })
}

fn prepare_row(row: usize, raw: &RawRow, binning: Option<&AutoBinning>) -> Result<DiamondRecord> {
    let cut: Cut = parse_domain(row, &raw.cut)?;
    let color: Color = parse_domain(row, &raw.color)?;
    let clarity: Clarity = parse_domain(row, &raw.clarity)?;
    check_measurements(row, raw)?;

    // Non-empty input always produces a binning.
    let binning = binning.ok_or_else(|| DiamondError::Schema("missing carat range".into()))?;

    Ok(DiamondRecord {
        carat: raw.carat,
        cut,
        color,
        clarity,
        x: raw.x,
        y: raw.y,
        z: raw.z,
        depth: raw.depth,
        table: raw.table,
        price: raw.price,
        volume: raw.x * raw.y * raw.z,
        cut_ord: cut.ordinal(),
        color_ord: color.ordinal(),
        clarity_ord: clarity.ordinal(),
        carat_group: bucket(raw.carat),
        carat_group_auto: binning.assign(raw.carat),
    })
}

fn check_measurements(row: usize, raw: &RawRow) -> Result<()> {
    for (name, value) in [("carat", raw.carat), ("price", raw.price)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(DiamondError::Schema(format!(
                "Row {row}: {name} must be a positive number, got {value}"
            )));
        }
    }
    for (name, value) in [("x", raw.x), ("y", raw.y), ("z", raw.z)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(DiamondError::Schema(format!(
                "Row {row}: {name} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

fn parse_domain<G: Grade>(row: usize, value: &str) -> Result<G> {
    G::parse_label(value).map_err(|e| DiamondError::Schema(format!("Row {row}: {e}")))
}

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

/// Fixed-threshold bucket for a carat weight. Depends on nothing but `carat`.
pub fn bucket(carat: f64) -> CaratGroup {
    if carat < 0.5 {
        CaratGroup::Small
    } else if carat < 1.0 {
        CaratGroup::Medium
    } else if carat < 1.5 {
        CaratGroup::Large
    } else if carat < 2.0 {
        CaratGroup::VeryLarge
    } else {
        CaratGroup::Exceptional
    }
}

impl AutoBinning {
    /// Five equal-width bins spanning the observed carat range.
    ///
    /// The lowest edge is pulled down by 0.1 % of the range so the minimum
    /// lands in the first right-closed bin. A single distinct value is
    /// widened by 0.1 % of its magnitude on both sides. Returns `None` for
    /// empty input.
    pub fn from_carats(carats: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (mut lo, mut hi) = carats.into_iter().fold(None, |acc: Option<(f64, f64)>, c| {
            Some(match acc {
                None => (c, c),
                Some((lo, hi)) => (lo.min(c), hi.max(c)),
            })
        })?;

        let degenerate = lo == hi;
        if degenerate {
            lo -= if lo != 0.0 { 0.001 * lo.abs() } else { 0.001 };
            hi += if hi != 0.0 { 0.001 * hi.abs() } else { 0.001 };
        }

        let step = (hi - lo) / AUTO_BINS as f64;
        let mut edges = [0.0; AUTO_BINS + 1];
        for (i, edge) in edges.iter_mut().enumerate() {
            *edge = lo + step * i as f64;
        }
        edges[AUTO_BINS] = hi;
        if !degenerate {
            edges[0] -= (hi - lo) * 0.001;
        }

        Some(AutoBinning { edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::raw;
    use crate::data::model::AutoGroup;

    fn sample_rows() -> Vec<RawRow> {
        vec![
            raw(0.23, "Ideal", "E", "SI2", 326.0),
            raw(0.9, "Premium", "D", "IF", 4200.0),
            raw(1.2, "Good", "J", "I1", 3100.0),
            raw(1.7, "Very Good", "G", "VS1", 9800.0),
            raw(3.0, "Fair", "H", "VVS2", 15000.0),
        ]
    }

    #[test]
    fn test_bucket_fixed_thresholds() {
        assert_eq!(bucket(0.3).label(), "Liten (< 0.5)");
        assert_eq!(bucket(0.5).label(), "Medium (0.5-1.0)");
        assert_eq!(bucket(1.2).label(), "Stor (1.0-1.5)");
        assert_eq!(bucket(1.7).label(), "Mycket stor (1.5-2.0)");
        assert_eq!(bucket(3.0).label(), "Exceptionell (>2.0)");
        assert_eq!(bucket(1.0), CaratGroup::Large);
        assert_eq!(bucket(2.0), CaratGroup::Exceptional);
        assert_eq!(bucket(500.0), CaratGroup::Exceptional);
    }

    #[test]
    fn test_prepare_derives_columns() {
        let ds = prepare(&sample_rows()).unwrap();
        assert_eq!(ds.len(), 5);

        for r in &ds.records {
            assert_eq!(r.volume, r.x * r.y * r.z);
            assert!(r.volume >= 0.0);
            assert!((1..=5).contains(&r.cut_ord));
            assert!((1..=7).contains(&r.color_ord));
            assert!((1..=8).contains(&r.clarity_ord));
            assert_eq!(r.carat_group, bucket(r.carat));
        }

        let premium = &ds.records[1];
        assert_eq!(premium.cut, Cut::Premium);
        assert_eq!(premium.cut_ord, 4);
        assert_eq!(premium.color_ord, 7);
        assert_eq!(premium.clarity_ord, 8);

        let good = &ds.records[2];
        assert_eq!(good.color_ord, 1);
        assert_eq!(good.clarity_ord, 1);
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let rows = sample_rows();
        assert_eq!(prepare(&rows).unwrap(), prepare(&rows).unwrap());
    }

    #[test]
    fn test_prepare_rejects_unknown_cut() {
        let mut rows = sample_rows();
        rows.push(raw(1.0, "Excellent", "D", "IF", 5000.0));
        let err = prepare(&rows).unwrap_err();
        assert!(matches!(err, DiamondError::Schema(ref msg) if msg.contains("Row 5")));
    }

    #[test]
    fn test_prepare_rejects_unknown_clarity() {
        let rows = vec![raw(1.0, "Ideal", "D", "FL", 5000.0)];
        assert!(matches!(prepare(&rows), Err(DiamondError::Schema(_))));
    }

    fn rejected(row: RawRow) -> String {
        let mut rows = sample_rows();
        rows.push(row);
        match prepare(&rows) {
            Err(DiamondError::Schema(msg)) => msg,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_prepare_rejects_non_positive_carat() {
        let msg = rejected(raw(-1.0, "Ideal", "D", "IF", 5000.0));
        assert!(msg.contains("Row 5") && msg.contains("carat"));
        let msg = rejected(raw(0.0, "Ideal", "D", "IF", 5000.0));
        assert!(msg.contains("carat"));
    }

    #[test]
    fn test_prepare_rejects_nan_carat() {
        let msg = rejected(raw(f64::NAN, "Ideal", "D", "IF", 5000.0));
        assert!(msg.contains("carat"));
    }

    #[test]
    fn test_prepare_rejects_bad_price() {
        let msg = rejected(raw(1.0, "Ideal", "D", "IF", 0.0));
        assert!(msg.contains("price"));
        let msg = rejected(raw(1.0, "Ideal", "D", "IF", f64::INFINITY));
        assert!(msg.contains("price"));
    }

    #[test]
    fn test_prepare_rejects_negative_dimension() {
        let msg = rejected(RawRow {
            x: -4.0,
            ..raw(1.0, "Ideal", "D", "IF", 5000.0)
        });
        assert!(msg.contains("Row 5") && msg.contains("x must"));
        let msg = rejected(RawRow {
            z: f64::NAN,
            ..raw(1.0, "Ideal", "D", "IF", 5000.0)
        });
        assert!(msg.contains("z must"));
    }

    #[test]
    fn test_prepare_accepts_zero_dimension() {
        let mut rows = sample_rows();
        rows.push(RawRow {
            y: 0.0,
            ..raw(1.0, "Ideal", "D", "IF", 5000.0)
        });
        let ds = prepare(&rows).unwrap();
        assert_eq!(ds.records[5].volume, 0.0);
    }

    #[test]
    fn test_prepare_empty() {
        let ds = prepare(&[]).unwrap();
        assert!(ds.is_empty());
        assert!(ds.auto_binning.is_none());
    }

    #[test]
    fn test_auto_binning_spans_observed_range() {
        let ds = prepare(&sample_rows()).unwrap();
        let bins = ds.auto_binning.unwrap();
        assert!(bins.edges[0] < 0.23);
        assert_eq!(bins.edges[5], 3.0);
        for pair in bins.edges.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        let groups: Vec<AutoGroup> = ds.records.iter().map(|r| r.carat_group_auto).collect();
        assert_eq!(groups[0], AutoGroup::VerySmall);
        assert_eq!(groups[4], AutoGroup::VeryLarge);
        // width = 2.77 / 5 = 0.554 → 0.9 lies in the second bin, 1.7 in the third
        assert_eq!(groups[1], AutoGroup::Small);
        assert_eq!(groups[3], AutoGroup::Medium);
    }

    #[test]
    fn test_auto_binning_follows_dataset() {
        let small = AutoBinning::from_carats([0.2, 0.4]).unwrap();
        let large = AutoBinning::from_carats([0.2, 4.0]).unwrap();
        assert_eq!(small.assign(0.4), AutoGroup::VeryLarge);
        assert_eq!(large.assign(0.4), AutoGroup::VerySmall);
    }

    #[test]
    fn test_auto_binning_single_value() {
        let bins = AutoBinning::from_carats([1.0, 1.0]).unwrap();
        assert!((bins.edges[0] - 0.999).abs() < 1e-12);
        assert!((bins.edges[5] - 1.001).abs() < 1e-12);
        assert_eq!(bins.assign(1.0), AutoGroup::Medium);
    }
}
