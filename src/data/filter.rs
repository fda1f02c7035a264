use std::collections::BTreeSet;

use super::model::{Cut, Dataset, DiamondRecord, Grade, NumericColumn};

// ---------------------------------------------------------------------------
// Filter predicate: numeric ranges + selected cuts
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` window on one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
    /// Slider bounds: observed range rounded outwards to whole units.
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl RangeFilter {
    /// A window covering the whole observed range of `column`.
    pub fn full(dataset: &Dataset, column: NumericColumn) -> Self {
        let (lo, hi) = dataset
            .bounds(column)
            .map(|(lo, hi)| (lo.floor(), hi.ceil()))
            .unwrap_or((0.0, 0.0));
        RangeFilter {
            min: lo,
            max: hi,
            lower_bound: lo,
            upper_bound: hi,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Reset the window to the full slider range.
    pub fn reset(&mut self) {
        self.min = self.lower_bound;
        self.max = self.upper_bound;
    }
}

/// Every user-controlled filter of the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub carat: RangeFilter,
    pub volume: RangeFilter,
    pub price: RangeFilter,
    /// Selected cuts. Empty → nothing passes.
    pub cuts: BTreeSet<Cut>,
}

impl FilterState {
    fn passes(&self, r: &DiamondRecord) -> bool {
        self.cuts.contains(&r.cut)
            && self.carat.contains(r.carat)
            && self.volume.contains(r.volume)
            && self.price.contains(r.price)
    }
}

/// Initialise a [`FilterState`] with everything selected (i.e., show all).
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    FilterState {
        carat: RangeFilter::full(dataset, NumericColumn::Carat),
        volume: RangeFilter::full(dataset, NumericColumn::Volume),
        price: RangeFilter::full(dataset, NumericColumn::Price),
        cuts: Cut::ALL.iter().copied().collect(),
    }
}

/// Return indices of diamonds that pass all active filters.
///
/// The dataset is never modified; the result is a view into it.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.passes(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::mixed_dataset;

    #[test]
    fn test_default_filter_shows_everything() {
        let ds = mixed_dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), (0..ds.len()).collect::<Vec<_>>());
        assert_eq!(filters.carat.lower_bound, 0.0);
        assert_eq!(filters.carat.upper_bound, 3.0);
    }

    #[test]
    fn test_empty_cut_selection_hides_everything() {
        let ds = mixed_dataset();
        let mut filters = init_filter_state(&ds);
        filters.cuts.clear();
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn test_cut_and_range_filters_combine() {
        let ds = mixed_dataset();
        let mut filters = init_filter_state(&ds);
        filters.cuts = [Cut::Ideal].into_iter().collect();
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 7]);

        filters.price.max = 5000.0;
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1]);

        filters.carat.min = 0.35;
        assert_eq!(filtered_indices(&ds, &filters), vec![1]);
    }

    #[test]
    fn test_filtering_does_not_mutate_dataset() {
        let ds = mixed_dataset();
        let before = ds.clone();
        let mut filters = init_filter_state(&ds);
        filters.volume.max = 0.0;
        assert!(filtered_indices(&ds, &filters).is_empty());
        assert_eq!(ds, before);

        filters.volume.reset();
        assert_eq!(filtered_indices(&ds, &filters).len(), ds.len());
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::default();
        let filters = init_filter_state(&ds);
        assert!(filtered_indices(&ds, &filters).is_empty());
    }
}
