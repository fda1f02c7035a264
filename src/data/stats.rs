//! Descriptive statistics over a filtered view of the dataset.
//!
//! Every function takes the dataset plus the visible row indices and degrades
//! gracefully on an empty view: results are `None`, zero counts or empty
//! vectors, never an error.

use super::model::{AutoGroup, CaratGroup, Color, Cut, Dataset, Grade, NumericColumn};

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Scalar summaries
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    (!sorted.is_empty()).then(|| quantile(&sorted, 0.5))
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Linear-interpolated quantile of already sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// `describe()`-style summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Option<Describe> {
    let sorted = sorted(values);
    let n = sorted.len();
    let mean = mean(&sorted)?;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    Some(Describe {
        count: n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// [`describe`] for every numeric column.
pub fn describe_all(dataset: &Dataset, indices: &[usize]) -> Vec<(NumericColumn, Option<Describe>)> {
    NumericColumn::ALL
        .iter()
        .map(|&c| (c, describe(&dataset.column(c, indices))))
        .collect()
}

/// Box-plot summary with Tukey whiskers (1.5 × IQR, clipped to the data).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    let d = describe(values)?;
    let iqr = d.q3 - d.q1;
    let (lo_fence, hi_fence) = (d.q1 - 1.5 * iqr, d.q3 + 1.5 * iqr);
    let lower_whisker = values
        .iter()
        .copied()
        .filter(|&v| v >= lo_fence)
        .fold(f64::INFINITY, f64::min);
    let upper_whisker = values
        .iter()
        .copied()
        .filter(|&v| v <= hi_fence)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(FiveNumber {
        lower_whisker,
        q1: d.q1,
        median: d.median,
        q3: d.q3,
        upper_whisker,
    })
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + self.width * (i as f64 + 0.5)
    }
}

pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };

    let mut counts = vec![0; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram {
        start: lo,
        width,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Headline numbers for the overview page.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_carat: Option<f64>,
    pub common_cut: Option<Cut>,
    pub common_color: Option<Color>,
    pub price_range: Option<(f64, f64)>,
}

pub fn overview(dataset: &Dataset, indices: &[usize]) -> Overview {
    let prices = dataset.column(NumericColumn::Price, indices);
    let price_range = describe(&prices).map(|d| (d.min, d.max));
    Overview {
        count: indices.len(),
        mean_price: mean(&prices),
        mean_carat: mean(&dataset.column(NumericColumn::Carat, indices)),
        common_cut: mode(dataset, indices),
        common_color: mode(dataset, indices),
        price_range,
    }
}

// ---------------------------------------------------------------------------
// Categorical summaries
// ---------------------------------------------------------------------------

/// Row count of one category in a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCount<C> {
    pub category: C,
    pub count: usize,
    /// Share of the view, rounded to one decimal.
    pub percent: f64,
}

/// Counts for every category of `G`, in domain order, zeros included.
pub fn value_counts<G: Grade>(dataset: &Dataset, indices: &[usize]) -> Vec<CategoryCount<G>> {
    let mut counts = vec![0usize; G::ALL.len()];
    for &i in indices {
        counts[G::of(&dataset.records[i]).rank() as usize - 1] += 1;
    }
    G::ALL
        .iter()
        .zip(counts)
        .map(|(&category, count)| CategoryCount {
            category,
            count,
            percent: percent(count, indices.len()),
        })
        .collect()
}

/// Most frequent category; ties resolve to the earliest in domain order.
pub fn mode<G: Grade>(dataset: &Dataset, indices: &[usize]) -> Option<G> {
    value_counts::<G>(dataset, indices)
        .into_iter()
        .filter(|c| c.count > 0)
        .fold(None, |best: Option<CategoryCount<G>>, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
        .map(|c| c.category)
}

/// Mean price per category, most expensive first. Empty categories are left out.
pub fn mean_price_by<G: Grade>(dataset: &Dataset, indices: &[usize]) -> Vec<(G, f64)> {
    let mut out: Vec<(G, f64)> = G::ALL
        .iter()
        .filter_map(|&g| {
            let prices: Vec<f64> = indices
                .iter()
                .map(|&i| &dataset.records[i])
                .filter(|r| G::of(r) == g)
                .map(|r| r.price)
                .collect();
            mean(&prices).map(|m| (g, m))
        })
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// Correlations
// ---------------------------------------------------------------------------

/// Pearson correlation; `None` with fewer than two points or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mx = mean(&xs[..n])?;
    let my = mean(&ys[..n])?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// Row-major, `values[i][j]` = r(columns[i], columns[j]).
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn correlation_matrix(dataset: &Dataset, indices: &[usize]) -> CorrelationMatrix {
    let columns = NumericColumn::ALL.to_vec();
    let data: Vec<Vec<f64>> = columns
        .iter()
        .map(|&c| dataset.column(c, indices))
        .collect();
    let values = data
        .iter()
        .map(|a| data.iter().map(|b| pearson(a, b)).collect())
        .collect();
    CorrelationMatrix { columns, values }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPair {
    pub a: NumericColumn,
    pub b: NumericColumn,
    pub r: f64,
}

/// The `n` strongest distinct pairs by |r|, excluding perfect positive correlations.
pub fn strongest_correlations(matrix: &CorrelationMatrix, n: usize) -> Vec<CorrelationPair> {
    let mut pairs = Vec::new();
    for (i, row) in matrix.values.iter().enumerate() {
        for (j, r) in row.iter().enumerate().skip(i + 1) {
            if let Some(r) = *r {
                if r < 1.0 {
                    pairs.push(CorrelationPair {
                        a: matrix.columns[i],
                        b: matrix.columns[j],
                        r,
                    });
                }
            }
        }
    }
    pairs.sort_by(|p, q| q.r.abs().total_cmp(&p.r.abs()));
    pairs.truncate(n);
    pairs
}

// ---------------------------------------------------------------------------
// Carat groups
// ---------------------------------------------------------------------------

/// Aggregates of one manual carat group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group: CaratGroup,
    pub count: usize,
    pub mean_price: Option<f64>,
    pub median_price: Option<f64>,
    pub mean_volume: Option<f64>,
    pub mean_clarity_ord: Option<f64>,
    pub mean_cut_ord: Option<f64>,
    pub mean_color_ord: Option<f64>,
    pub common_cut: Option<Cut>,
    pub common_color: Option<Color>,
}

/// Rows of the view that fall into `group`.
pub fn group_indices(dataset: &Dataset, indices: &[usize], group: CaratGroup) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| dataset.records[i].carat_group == group)
        .collect()
}

/// One summary per manual group in bucket order, empty groups included.
pub fn carat_group_summary(dataset: &Dataset, indices: &[usize]) -> Vec<GroupSummary> {
    CaratGroup::ALL
        .iter()
        .map(|&group| {
            let rows = group_indices(dataset, indices, group);
            let col = |c: NumericColumn| dataset.column(c, &rows);
            GroupSummary {
                group,
                count: rows.len(),
                mean_price: mean(&col(NumericColumn::Price)),
                median_price: median(&col(NumericColumn::Price)),
                mean_volume: mean(&col(NumericColumn::Volume)),
                mean_clarity_ord: mean(&col(NumericColumn::ClarityOrd)),
                mean_cut_ord: mean(&col(NumericColumn::CutOrd)),
                mean_color_ord: mean(&col(NumericColumn::ColorOrd)),
                common_cut: mode(dataset, &rows),
                common_color: mode(dataset, &rows),
            }
        })
        .collect()
}

/// Counts per automatic bin, in bin order.
pub fn auto_group_counts(dataset: &Dataset, indices: &[usize]) -> Vec<CategoryCount<AutoGroup>> {
    AutoGroup::ALL
        .iter()
        .map(|&category| {
            let count = indices
                .iter()
                .filter(|&&i| dataset.records[i].carat_group_auto == category)
                .count();
            CategoryCount {
                category,
                count,
                percent: percent(count, indices.len()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::mixed_dataset;
    use crate::data::model::Clarity;

    fn all(ds: &Dataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn test_median_and_quantiles() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);

        let d = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(d.count, 5);
        assert_eq!(d.mean, 3.0);
        assert_eq!(d.q1, 2.0);
        assert_eq!(d.q3, 4.0);
        assert!((d.std.unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(describe(&[7.0]).unwrap().std, None);
    }

    #[test]
    fn test_five_number_whiskers_exclude_outliers() {
        let f = five_number(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(f.lower_whisker, 1.0);
        assert_eq!(f.upper_whisker, 5.0);
        assert_eq!(f.median, 3.5);
    }

    #[test]
    fn test_histogram() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(h.counts, vec![2, 3]);
        assert_eq!(h.bin_center(0), 1.0);

        let flat = histogram(&[2.0, 2.0], 4).unwrap();
        assert_eq!(flat.counts, vec![2, 0, 0, 0]);
        assert!(histogram(&[], 4).is_none());
    }

    #[test]
    fn test_overview() {
        let ds = mixed_dataset();
        let o = overview(&ds, &all(&ds));
        assert_eq!(o.count, 8);
        assert_eq!(o.mean_price, Some(5037.5));
        assert_eq!(o.common_cut, Some(Cut::Ideal));
        assert_eq!(o.common_color, Some(Color::J));
        assert_eq!(o.price_range, Some((900.0, 16000.0)));

        let empty = overview(&ds, &[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean_price, None);
        assert_eq!(empty.common_cut, None);
        assert_eq!(empty.price_range, None);
    }

    #[test]
    fn test_value_counts_in_domain_order() {
        let ds = mixed_dataset();
        let counts = value_counts::<Cut>(&ds, &all(&ds));
        let got: Vec<(Cut, usize)> = counts.iter().map(|c| (c.category, c.count)).collect();
        assert_eq!(
            got,
            vec![
                (Cut::Fair, 1),
                (Cut::Good, 1),
                (Cut::VeryGood, 1),
                (Cut::Premium, 2),
                (Cut::Ideal, 3),
            ]
        );
        assert_eq!(counts[4].percent, 37.5);

        let clarity = value_counts::<Clarity>(&ds, &[]);
        assert_eq!(clarity.len(), 8);
        assert!(clarity.iter().all(|c| c.count == 0 && c.percent == 0.0));
    }

    #[test]
    fn test_mode_tie_breaks_on_domain_order() {
        let ds = mixed_dataset();
        // rows 2 and 5: Premium, colors F and I
        assert_eq!(mode::<Color>(&ds, &[2, 5]), Some(Color::F));
        assert_eq!(mode::<Cut>(&ds, &[]), None);
    }

    #[test]
    fn test_mean_price_by_sorted_descending() {
        let ds = mixed_dataset();
        let by_cut = mean_price_by::<Cut>(&ds, &all(&ds));
        assert_eq!(
            by_cut,
            vec![
                (Cut::Fair, 7000.0),
                (Cut::Ideal, 6000.0),
                (Cut::Good, 4800.0),
                (Cut::Premium, 3850.0),
                (Cut::VeryGood, 2800.0),
            ]
        );
        assert!(mean_price_by::<Cut>(&ds, &[]).is_empty());
    }

    #[test]
    fn test_pearson() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_strongest_correlations() {
        let ds = mixed_dataset();
        let m = correlation_matrix(&ds, &all(&ds));
        assert_eq!(m.values.len(), NumericColumn::ALL.len());

        let top = strongest_correlations(&m, 5);
        assert_eq!(top.len(), 5);
        for w in top.windows(2) {
            assert!(w[0].r.abs() >= w[1].r.abs());
        }
        for p in &top {
            assert_ne!(p.a, p.b);
            assert!(p.r < 1.0);
        }

        // depth and table are constant in the fixture
        assert!(m.values[1].iter().all(Option::is_none));
        assert!(strongest_correlations(&correlation_matrix(&ds, &[]), 5).is_empty());
    }

    #[test]
    fn test_strongest_correlations_keeps_perfect_negative() {
        let m = CorrelationMatrix {
            columns: vec![NumericColumn::Carat, NumericColumn::Price, NumericColumn::Depth],
            values: vec![
                vec![Some(1.0), Some(1.0), Some(-1.0)],
                vec![Some(1.0), Some(1.0), Some(0.3)],
                vec![Some(-1.0), Some(0.3), Some(1.0)],
            ],
        };
        let top = strongest_correlations(&m, 5);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].a, top[0].b, top[0].r), (NumericColumn::Carat, NumericColumn::Depth, -1.0));
        assert_eq!((top[1].a, top[1].b), (NumericColumn::Price, NumericColumn::Depth));
    }

    #[test]
    fn test_carat_group_summary() {
        let ds = mixed_dataset();
        let summary = carat_group_summary(&ds, &all(&ds));
        assert_eq!(summary.len(), 5);
        assert_eq!(
            summary.iter().map(|s| s.group).collect::<Vec<_>>(),
            CaratGroup::ALL.to_vec()
        );

        let small = &summary[0];
        assert_eq!(small.count, 2);
        assert_eq!(small.mean_price, Some(1000.0));
        assert_eq!(small.median_price, Some(1000.0));
        assert_eq!(small.mean_cut_ord, Some(5.0));
        assert_eq!(small.mean_color_ord, Some(6.5));

        assert_eq!(summary[4].mean_price, Some(16000.0));

        let only_small = carat_group_summary(&ds, &[0, 1]);
        assert_eq!(only_small[3].count, 0);
        assert_eq!(only_small[3].mean_price, None);
        assert_eq!(only_small[3].common_cut, None);
    }

    #[test]
    fn test_auto_group_counts() {
        let ds = mixed_dataset();
        let counts = auto_group_counts(&ds, &all(&ds));
        assert_eq!(counts.len(), 5);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), 8);
        assert_eq!(counts[0].category, AutoGroup::VerySmall);
        assert!(counts[0].count > 0);
        assert_eq!(counts[4].count, 1);
    }
}
