//! Small in-memory tables shared by unit tests.

use super::model::{Dataset, RawRow};
use super::prepare::prepare;

pub fn raw(carat: f64, cut: &str, color: &str, clarity: &str, price: f64) -> RawRow {
    RawRow {
        carat,
        cut: cut.to_string(),
        color: color.to_string(),
        clarity: clarity.to_string(),
        depth: 61.0,
        table: 56.0,
        price,
        x: 4.0 + carat,
        y: 4.1 + carat,
        z: 2.5 + carat / 2.0,
    }
}

/// A mixed table: eight diamonds across all cuts and several sizes.
pub fn mixed_dataset() -> Dataset {
    let rows = vec![
        raw(0.3, "Ideal", "D", "IF", 900.0),
        raw(0.4, "Ideal", "E", "VVS1", 1100.0),
        raw(0.7, "Premium", "F", "VS1", 2500.0),
        raw(0.8, "Very Good", "G", "VS2", 2800.0),
        raw(1.1, "Good", "H", "SI1", 4800.0),
        raw(1.3, "Premium", "I", "SI2", 5200.0),
        raw(1.8, "Fair", "J", "I1", 7000.0),
        raw(2.5, "Ideal", "J", "SI2", 16000.0),
    ];
    prepare(&rows).expect("fixture rows are valid")
}
