use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::DiamondError;

// ---------------------------------------------------------------------------
// Grade – shared behaviour of the three quality axes
// ---------------------------------------------------------------------------

/// A closed, totally ordered quality domain (cut, color or clarity).
///
/// `Ord` follows declaration order of the domain (`ALL`), which for color and
/// clarity runs best → worst. Use [`Grade::ordinal`] for "higher is better".
pub trait Grade: Copy + Ord + fmt::Display + 'static {
    /// Every value of the domain in declaration order.
    const ALL: &'static [Self];
    /// Column name in the input table.
    const COLUMN: &'static str;

    fn label(self) -> &'static str;

    /// 1-based rank in declaration order.
    fn rank(self) -> u8;

    /// Quality score where 1 = worst and `ALL.len()` = best.
    fn ordinal(self) -> u8;

    /// Pick this axis out of a record.
    fn of(record: &DiamondRecord) -> Self;

    fn parse_label(s: &str) -> Result<Self, DiamondError> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.label() == s)
            .ok_or_else(|| {
                DiamondError::InvalidAttribute(format!(
                    "'{s}' is not a valid {} (expected one of {})",
                    Self::COLUMN,
                    Self::ALL
                        .iter()
                        .map(|g| g.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Cut
// ---------------------------------------------------------------------------

/// Cut grade, worst → best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cut {
    Fair,
    Good,
    VeryGood,
    Premium,
    Ideal,
}

impl Grade for Cut {
    const ALL: &'static [Self] = &[
        Cut::Fair,
        Cut::Good,
        Cut::VeryGood,
        Cut::Premium,
        Cut::Ideal,
    ];
    const COLUMN: &'static str = "cut";

    fn label(self) -> &'static str {
        match self {
            Cut::Fair => "Fair",
            Cut::Good => "Good",
            Cut::VeryGood => "Very Good",
            Cut::Premium => "Premium",
            Cut::Ideal => "Ideal",
        }
    }

    fn rank(self) -> u8 {
        self as u8 + 1
    }

    fn ordinal(self) -> u8 {
        self.rank()
    }

    fn of(record: &DiamondRecord) -> Self {
        record.cut
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// Color grade, best (D, colourless) → worst (J, visibly tinted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

impl Grade for Color {
    const ALL: &'static [Self] = &[
        Color::D,
        Color::E,
        Color::F,
        Color::G,
        Color::H,
        Color::I,
        Color::J,
    ];
    const COLUMN: &'static str = "color";

    fn label(self) -> &'static str {
        match self {
            Color::D => "D",
            Color::E => "E",
            Color::F => "F",
            Color::G => "G",
            Color::H => "H",
            Color::I => "I",
            Color::J => "J",
        }
    }

    fn rank(self) -> u8 {
        self as u8 + 1
    }

    fn ordinal(self) -> u8 {
        Self::ALL.len() as u8 + 1 - self.rank()
    }

    fn of(record: &DiamondRecord) -> Self {
        record.color
    }
}

// ---------------------------------------------------------------------------
// Clarity
// ---------------------------------------------------------------------------

/// Clarity grade, best (IF, internally flawless) → worst (I1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clarity {
    IF,
    VVS1,
    VVS2,
    VS1,
    VS2,
    SI1,
    SI2,
    I1,
}

impl Grade for Clarity {
    const ALL: &'static [Self] = &[
        Clarity::IF,
        Clarity::VVS1,
        Clarity::VVS2,
        Clarity::VS1,
        Clarity::VS2,
        Clarity::SI1,
        Clarity::SI2,
        Clarity::I1,
    ];
    const COLUMN: &'static str = "clarity";

    fn label(self) -> &'static str {
        match self {
            Clarity::IF => "IF",
            Clarity::VVS1 => "VVS1",
            Clarity::VVS2 => "VVS2",
            Clarity::VS1 => "VS1",
            Clarity::VS2 => "VS2",
            Clarity::SI1 => "SI1",
            Clarity::SI2 => "SI2",
            Clarity::I1 => "I1",
        }
    }

    fn rank(self) -> u8 {
        self as u8 + 1
    }

    fn ordinal(self) -> u8 {
        Self::ALL.len() as u8 + 1 - self.rank()
    }

    fn of(record: &DiamondRecord) -> Self {
        record.clarity
    }
}

// -- Display / FromStr for the three grades --

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Clarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cut {
    type Err = DiamondError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

impl FromStr for Color {
    type Err = DiamondError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

impl FromStr for Clarity {
    type Err = DiamondError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

// ---------------------------------------------------------------------------
// Carat groups
// ---------------------------------------------------------------------------

/// Fixed-threshold weight bucket, smallest → largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaratGroup {
    Small,
    Medium,
    Large,
    VeryLarge,
    Exceptional,
}

impl CaratGroup {
    pub const ALL: [CaratGroup; 5] = [
        CaratGroup::Small,
        CaratGroup::Medium,
        CaratGroup::Large,
        CaratGroup::VeryLarge,
        CaratGroup::Exceptional,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CaratGroup::Small => "Liten (< 0.5)",
            CaratGroup::Medium => "Medium (0.5-1.0)",
            CaratGroup::Large => "Stor (1.0-1.5)",
            CaratGroup::VeryLarge => "Mycket stor (1.5-2.0)",
            CaratGroup::Exceptional => "Exceptionell (>2.0)",
        }
    }

    /// First word of the label, used for compact axis ticks.
    pub fn short_label(self) -> &'static str {
        self.label().split(' ').next().unwrap_or_default()
    }
}

impl fmt::Display for CaratGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Equal-width bin over the observed carat range, smallest → largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AutoGroup {
    VerySmall,
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl AutoGroup {
    pub const ALL: [AutoGroup; 5] = [
        AutoGroup::VerySmall,
        AutoGroup::Small,
        AutoGroup::Medium,
        AutoGroup::Large,
        AutoGroup::VeryLarge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AutoGroup::VerySmall => "Mycket liten",
            AutoGroup::Small => "Liten",
            AutoGroup::Medium => "Medium",
            AutoGroup::Large => "Stor",
            AutoGroup::VeryLarge => "Mycket stor",
        }
    }
}

impl fmt::Display for AutoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bin edges for [`AutoGroup`], derived from one loaded dataset.
///
/// Bins are right-closed `(edge[i], edge[i + 1]]`; the first edge sits just
/// below the observed minimum so every observed carat is covered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoBinning {
    pub edges: [f64; 6],
}

impl AutoBinning {
    /// Bin a carat value. Values outside the observed range clamp to the
    /// outermost bins.
    pub fn assign(&self, carat: f64) -> AutoGroup {
        let idx = self.edges[1..]
            .iter()
            .position(|&upper| carat <= upper)
            .unwrap_or(AutoGroup::ALL.len() - 1);
        AutoGroup::ALL[idx]
    }

    /// `(lower, upper)` edge pair of a bin.
    pub fn range(&self, group: AutoGroup) -> (f64, f64) {
        let i = group as usize;
        (self.edges[i], self.edges[i + 1])
    }
}

// ---------------------------------------------------------------------------
// RawRow – one row as read from disk
// ---------------------------------------------------------------------------

/// One input row before domain checks. Categorical columns are still text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub carat: f64,
    pub cut: String,
    pub color: String,
    pub clarity: String,
    pub depth: f64,
    pub table: f64,
    pub price: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Columns every input source must provide.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "carat", "cut", "color", "clarity", "x", "y", "z", "depth", "table", "price",
];

// ---------------------------------------------------------------------------
// DiamondRecord – one prepared row
// ---------------------------------------------------------------------------

/// A single diamond with its derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DiamondRecord {
    pub carat: f64,
    pub cut: Cut,
    pub color: Color,
    pub clarity: Clarity,
    /// Length (mm).
    pub x: f64,
    /// Width (mm).
    pub y: f64,
    /// Height (mm).
    pub z: f64,
    /// Depth percentage.
    pub depth: f64,
    /// Table width percentage.
    pub table: f64,
    pub price: f64,

    /// `x * y * z` (mm³).
    pub volume: f64,
    pub cut_ord: u8,
    pub color_ord: u8,
    pub clarity_ord: u8,
    pub carat_group: CaratGroup,
    pub carat_group_auto: AutoGroup,
}

// ---------------------------------------------------------------------------
// NumericColumn – selectable numeric attributes
// ---------------------------------------------------------------------------

/// Numeric columns available to pickers, statistics and correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    Carat,
    Depth,
    Table,
    Price,
    X,
    Y,
    Z,
    Volume,
    CutOrd,
    ColorOrd,
    ClarityOrd,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 11] = [
        NumericColumn::Carat,
        NumericColumn::Depth,
        NumericColumn::Table,
        NumericColumn::Price,
        NumericColumn::X,
        NumericColumn::Y,
        NumericColumn::Z,
        NumericColumn::Volume,
        NumericColumn::CutOrd,
        NumericColumn::ColorOrd,
        NumericColumn::ClarityOrd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Carat => "carat",
            NumericColumn::Depth => "depth",
            NumericColumn::Table => "table",
            NumericColumn::Price => "price",
            NumericColumn::X => "x",
            NumericColumn::Y => "y",
            NumericColumn::Z => "z",
            NumericColumn::Volume => "volume",
            NumericColumn::CutOrd => "cut_ord",
            NumericColumn::ColorOrd => "color_ord",
            NumericColumn::ClarityOrd => "clarity_ord",
        }
    }

    pub fn value(self, r: &DiamondRecord) -> f64 {
        match self {
            NumericColumn::Carat => r.carat,
            NumericColumn::Depth => r.depth,
            NumericColumn::Table => r.table,
            NumericColumn::Price => r.price,
            NumericColumn::X => r.x,
            NumericColumn::Y => r.y,
            NumericColumn::Z => r.z,
            NumericColumn::Volume => r.volume,
            NumericColumn::CutOrd => r.cut_ord as f64,
            NumericColumn::ColorOrd => r.color_ord as f64,
            NumericColumn::ClarityOrd => r.clarity_ord as f64,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete prepared table
// ---------------------------------------------------------------------------

/// The prepared, immutable table. Every query borrows it; nothing mutates it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub records: Vec<DiamondRecord>,
    /// `None` only for an empty dataset.
    pub auto_binning: Option<AutoBinning>,
}

impl Dataset {
    /// Number of diamonds.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of `column` for the given row indices.
    pub fn column(&self, column: NumericColumn, indices: &[usize]) -> Vec<f64> {
        indices
            .iter()
            .map(|&i| column.value(&self.records[i]))
            .collect()
    }

    /// Observed `(min, max)` of a column over all rows.
    pub fn bounds(&self, column: NumericColumn) -> Option<(f64, f64)> {
        self.records.iter().map(|r| column.value(r)).fold(None, |acc, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }
}
