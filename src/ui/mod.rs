pub mod pages;
pub mod panels;
pub mod plot;

use eframe::egui::{self, RichText, Ui};

/// Shown wherever a filtered view has no rows.
pub const NO_DATA: &str = "N/A";

/// `12345.6` → `"12,346"`.
pub fn thousands(v: f64) -> String {
    let rounded = format!("{:.0}", v.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if v < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

/// Dollar amount with two decimals, or the placeholder.
pub fn money(v: Option<f64>) -> String {
    v.map(|v| format!("${v:.2}")).unwrap_or_else(|| NO_DATA.to_string())
}

/// Plain number with two decimals, or the placeholder.
pub fn number(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| NO_DATA.to_string())
}

pub fn or_na<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| NO_DATA.to_string())
}

/// Framed explanatory text.
pub fn info_box(ui: &mut Ui, text: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(text);
    });
    ui.add_space(6.0);
}

/// A labelled headline value.
pub fn metric(ui: &mut Ui, label: &str, value: impl Into<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small().weak());
        ui.label(RichText::new(value.into()).size(20.0).strong());
    });
    ui.add_space(4.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(12345.6), "12,346");
        assert_eq!(thousands(1234567.0), "1,234,567");
        assert_eq!(thousands(-2500.0), "-2,500");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(money(None), "N/A");
        assert_eq!(money(Some(3.456)), "$3.46");
        assert_eq!(number(Some(2.0)), "2.00");
        assert_eq!(or_na::<u8>(None), "N/A");
    }
}
