use std::path::PathBuf;

use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::{CaratGroup, Clarity, Color, Cut, Dataset, Grade, NumericColumn};
use crate::error::Result;
use crate::pricing::estimator::{estimate, DiamondSpec, PriceEstimate};

// ---------------------------------------------------------------------------
// Pages and pickers
// ---------------------------------------------------------------------------

/// The seven views of the side-panel page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Numeric,
    Categorical,
    Correlations,
    CaratGroups,
    Conclusion,
    Builder,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Overview,
        Page::Numeric,
        Page::Categorical,
        Page::Correlations,
        Page::CaratGroups,
        Page::Conclusion,
        Page::Builder,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Numeric => "Numeric attributes",
            Page::Categorical => "Categorical attributes",
            Page::Correlations => "Relationships & correlations",
            Page::CaratGroups => "Carat group analysis",
            Page::Conclusion => "Conclusion",
            Page::Builder => "Build your own diamond",
        }
    }
}

/// Quality axis picked on the categorical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalColumn {
    Cut,
    Color,
    Clarity,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 3] = [
        CategoricalColumn::Cut,
        CategoricalColumn::Color,
        CategoricalColumn::Clarity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Cut => Cut::COLUMN,
            CategoricalColumn::Color => Color::COLUMN,
            CategoricalColumn::Clarity => Clarity::COLUMN,
        }
    }
}

/// Numeric variables offered on the distribution page.
pub const DISTRIBUTION_COLUMNS: [NumericColumn; 3] =
    [NumericColumn::Carat, NumericColumn::Price, NumericColumn::Volume];

/// X-axis choices of the scatter plot.
pub const SCATTER_X_COLUMNS: [NumericColumn; 7] = [
    NumericColumn::Carat,
    NumericColumn::Depth,
    NumericColumn::Table,
    NumericColumn::X,
    NumericColumn::Y,
    NumericColumn::Z,
    NumericColumn::Volume,
];

/// Y-axis choices of the scatter plot.
pub const SCATTER_Y_COLUMNS: [NumericColumn; 8] = [
    NumericColumn::Price,
    NumericColumn::Carat,
    NumericColumn::Depth,
    NumericColumn::Table,
    NumericColumn::X,
    NumericColumn::Y,
    NumericColumn::Z,
    NumericColumn::Volume,
];

// ---------------------------------------------------------------------------
// Builder form
// ---------------------------------------------------------------------------

/// Raw inputs of the "build your own diamond" form.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderForm {
    pub carat: f64,
    pub cut: String,
    pub color: String,
    pub clarity: String,
    pub depth: f64,
    pub table: f64,
}

impl Default for BuilderForm {
    fn default() -> Self {
        let spec = DiamondSpec::default();
        Self {
            carat: spec.carat,
            cut: spec.cut.to_string(),
            color: spec.color.to_string(),
            clarity: spec.clarity.to_string(),
            depth: spec.depth,
            table: spec.table,
        }
    }
}

impl BuilderForm {
    pub fn to_spec(&self) -> Result<DiamondSpec> {
        DiamondSpec::from_labels(
            self.carat,
            &self.cut,
            &self.color,
            &self.clarity,
            self.depth,
            self.table,
        )
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Prepared table; replaced only by an explicit reload.
    pub dataset: Dataset,

    /// Where `dataset` was read from.
    pub source: PathBuf,

    /// Side-panel filters.
    pub filters: FilterState,

    /// Indices of diamonds passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub page: Page,
    pub distribution_column: NumericColumn,
    pub categorical_column: CategoricalColumn,
    pub scatter_x: NumericColumn,
    pub scatter_y: NumericColumn,
    /// Optional colouring of scatter points by a quality axis.
    pub scatter_hue: Option<CategoricalColumn>,
    pub selected_group: CaratGroup,
    pub builder: BuilderForm,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset, source: PathBuf) -> Self {
        let filters = init_filter_state(&dataset);
        let visible_indices = filtered_indices(&dataset, &filters);
        Self {
            dataset,
            source,
            filters,
            visible_indices,
            page: Page::Overview,
            distribution_column: NumericColumn::Carat,
            categorical_column: CategoricalColumn::Cut,
            scatter_x: NumericColumn::Carat,
            scatter_y: NumericColumn::Price,
            scatter_hue: None,
            selected_group: CaratGroup::Small,
            builder: BuilderForm::default(),
            status_message: None,
        }
    }

    /// Swap in a freshly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Dataset, source: PathBuf) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = filtered_indices(&dataset, &self.filters);
        self.dataset = dataset;
        self.source = source;
        self.status_message = None;
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
    }

    /// Toggle a single cut in the multi-select.
    pub fn toggle_cut(&mut self, cut: Cut) {
        if !self.filters.cuts.remove(&cut) {
            self.filters.cuts.insert(cut);
        }
        self.refilter();
    }

    pub fn select_all_cuts(&mut self) {
        self.filters.cuts = Cut::ALL.iter().copied().collect();
        self.refilter();
    }

    pub fn select_no_cuts(&mut self) {
        self.filters.cuts.clear();
        self.refilter();
    }

    /// Reset every filter to "show all".
    pub fn reset_filters(&mut self) {
        self.filters.carat.reset();
        self.filters.volume.reset();
        self.filters.price.reset();
        self.select_all_cuts();
    }

    /// Price estimate for the builder form.
    pub fn estimate(&self) -> Result<(DiamondSpec, PriceEstimate)> {
        let spec = self.builder.to_spec()?;
        let est = estimate(&spec, &self.dataset)?;
        Ok((spec, est))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::mixed_dataset;
    use crate::error::DiamondError;
    use crate::pricing::estimator::Method;

    fn state() -> AppState {
        AppState::new(mixed_dataset(), PathBuf::from("fixture.csv"))
    }

    #[test]
    fn test_new_state_shows_everything() {
        let s = state();
        assert_eq!(s.visible_indices.len(), 8);
        assert_eq!(s.page, Page::Overview);
    }

    #[test]
    fn test_toggle_cut_refilters() {
        let mut s = state();
        s.toggle_cut(Cut::Ideal);
        assert_eq!(s.visible_indices.len(), 5);
        s.toggle_cut(Cut::Ideal);
        assert_eq!(s.visible_indices.len(), 8);
        s.select_no_cuts();
        assert!(s.visible_indices.is_empty());
        s.select_all_cuts();
        assert_eq!(s.visible_indices.len(), 8);
    }

    #[test]
    fn test_reset_filters() {
        let mut s = state();
        s.filters.price.max = 1000.0;
        s.filters.cuts.remove(&Cut::Fair);
        s.refilter();
        assert_eq!(s.visible_indices, vec![0]);
        s.reset_filters();
        assert_eq!(s.visible_indices.len(), 8);
    }

    #[test]
    fn test_set_dataset_replaces_snapshot() {
        let mut s = state();
        s.select_no_cuts();
        s.status_message = Some("stale".into());
        s.set_dataset(Dataset::default(), PathBuf::from("empty.csv"));
        assert!(s.visible_indices.is_empty());
        assert_eq!(s.filters.cuts.len(), 5);
        assert_eq!(s.status_message, None);
        assert_eq!(s.source, PathBuf::from("empty.csv"));
    }

    #[test]
    fn test_builder_estimate() {
        let mut s = state();
        let (spec, est) = s.estimate().unwrap();
        assert_eq!(spec, DiamondSpec::default());
        assert_eq!(est.method, Method::Heuristic);

        s.builder.cut = "Excellent".into();
        assert!(matches!(s.estimate(), Err(DiamondError::InvalidAttribute(_))));

        s.builder = BuilderForm {
            carat: -1.0,
            ..BuilderForm::default()
        };
        assert!(matches!(s.estimate(), Err(DiamondError::InvalidAttribute(_))));
    }

    #[test]
    fn test_page_list() {
        assert_eq!(Page::ALL.len(), 7);
        assert_eq!(Page::ALL[6].title(), "Build your own diamond");
        assert_eq!(CategoricalColumn::Clarity.name(), "clarity");
    }
}
