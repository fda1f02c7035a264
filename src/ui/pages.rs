use eframe::egui::{self, Color32, RichText, TextureHandle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{generate_palette, ColorMap};
use crate::data::model::{CaratGroup, Clarity, Color, Cut, Dataset, Grade, NumericColumn};
use crate::data::stats::{
    auto_group_counts, carat_group_summary, correlation_matrix, describe, describe_all,
    five_number, group_indices, histogram, mean_price_by, overview, strongest_correlations,
    value_counts, GroupSummary,
};
use crate::pricing::breakdown::price_components;
use crate::pricing::market::{
    market_comparison, optimization_tips, price_interval, quality_stars, stars,
};
use crate::state::{
    AppState, CategoricalColumn, Page, DISTRIBUTION_COLUMNS, SCATTER_X_COLUMNS, SCATTER_Y_COLUMNS,
};

use super::plot::{self, Series};
use super::{info_box, metric, money, number, or_na, thousands, NO_DATA};

const RAW_PREVIEW_ROWS: usize = 100;
const HISTOGRAM_BINS: usize = 30;

/// The correlation heatmap texture, or why it is missing.
pub type CorrelationImage<'a> = Result<&'a TextureHandle, &'a str>;

/// Render the page currently selected in the side panel.
pub fn show(ui: &mut Ui, state: &mut AppState, image: CorrelationImage<'_>) {
    match state.page {
        Page::Overview => overview_page(ui, state),
        Page::Numeric => numeric_page(ui, state),
        Page::Categorical => categorical_page(ui, state),
        Page::Correlations => correlation_page(ui, state, image),
        Page::CaratGroups => carat_group_page(ui, state),
        Page::Conclusion => conclusion_page(ui),
        Page::Builder => builder_page(ui, state),
    }
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No diamonds match the current filters.").italics());
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

fn overview_page(ui: &mut Ui, state: &AppState) {
    ui.heading("What determines the price of a diamond?");
    info_box(
        ui,
        "What makes one diamond cost more than another? This dashboard explores a \
         table of diamonds to find out. Expand the section below for a short primer.",
    );

    egui::CollapsingHeader::new("The four Cs of diamonds")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].label(
                    "Carat – the weight of the stone. Larger diamonds are \
                     disproportionately more expensive, not linearly so.\n\n\
                     Cut – how well the stone is shaped to reflect light: \
                     Fair → Good → Very Good → Premium → Ideal (best).",
                );
                cols[1].label(
                    "Color – from D (colourless, best) to J (visibly tinted).\n\n\
                     Clarity – internal and external flaws: IF (flawless), \
                     VVS1/VVS2, VS1/VS2, SI1/SI2, I1 (flaws visible to the eye).",
                );
            });
            ui.label(
                "x, y, z are length, width and height in mm. Depth = 2·z/(x + y), \
                 ideally around 60–62 %. Table is the top facet width relative to the \
                 widest point, ideally 53–58 %. Volume = x·y·z.",
            );
        });

    ui.add_space(8.0);
    ui.heading("Raw data");
    raw_table(ui, &state.dataset, &state.visible_indices);

    ui.add_space(8.0);
    ui.heading("Summary statistics");
    let o = overview(&state.dataset, &state.visible_indices);
    ui.columns(2, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Number of diamonds", o.count.to_string());
        metric(&mut cols[0], "Mean price", money(o.mean_price));
        metric(&mut cols[0], "Mean carat", number(o.mean_carat));
        metric(&mut cols[1], "Most common cut", or_na(o.common_cut));
        metric(&mut cols[1], "Most common color", or_na(o.common_color));
        metric(
            &mut cols[1],
            "Price range",
            o.price_range
                .map(|(lo, hi)| format!("${lo:.0} - ${hi:.0}"))
                .unwrap_or_else(|| NO_DATA.to_string()),
        );
    });

    ui.add_space(8.0);
    ui.heading("Descriptive statistics for numeric attributes");
    egui::Grid::new("describe_grid")
        .striped(true)
        .num_columns(9)
        .show(ui, |ui: &mut Ui| {
            for h in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                ui.strong(h);
            }
            ui.end_row();
            for (column, d) in describe_all(&state.dataset, &state.visible_indices) {
                ui.label(column.name());
                match d {
                    Some(d) => {
                        ui.label(d.count.to_string());
                        for v in [Some(d.mean), d.std, Some(d.min), Some(d.q1), Some(d.median), Some(d.q3), Some(d.max)] {
                            ui.label(number(v));
                        }
                    }
                    None => {
                        ui.label("0");
                        for _ in 0..7 {
                            ui.label(NO_DATA);
                        }
                    }
                }
                ui.end_row();
            }
        });
}

fn raw_table(ui: &mut Ui, dataset: &Dataset, indices: &[usize]) {
    if indices.is_empty() {
        no_data(ui);
        return;
    }
    let shown = &indices[..indices.len().min(RAW_PREVIEW_ROWS)];
    let headers = [
        "carat", "cut", "color", "clarity", "depth", "table", "price", "x", "y", "z", "volume",
        "carat_group",
    ];

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(300.0)
            .columns(Column::auto().at_least(48.0), headers.len())
            .header(20.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown.len(), |mut row| {
                    let r = &dataset.records[shown[row.index()]];
                    let cells = [
                        format!("{:.2}", r.carat),
                        r.cut.to_string(),
                        r.color.to_string(),
                        r.clarity.to_string(),
                        format!("{:.1}", r.depth),
                        format!("{:.1}", r.table),
                        format!("{:.0}", r.price),
                        format!("{:.2}", r.x),
                        format!("{:.2}", r.y),
                        format!("{:.2}", r.z),
                        format!("{:.2}", r.volume),
                        r.carat_group.to_string(),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Numeric attributes
// ---------------------------------------------------------------------------

fn numeric_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Numeric attributes");
    info_box(
        ui,
        "What do the distributions look like? Most diamonds are fairly small (under \
         one carat), prices are right-skewed with many cheap stones and a few very \
         expensive ones, and some outliers stand out as exceptionally large.",
    );

    egui::ComboBox::from_label("Numeric variable")
        .selected_text(state.distribution_column.name())
        .show_ui(ui, |ui: &mut Ui| {
            for c in DISTRIBUTION_COLUMNS {
                ui.selectable_value(&mut state.distribution_column, c, c.name());
            }
        });

    let column = state.distribution_column;
    let values = state.dataset.column(column, &state.visible_indices);
    let (Some(hist), Some(summary), Some(d)) = (
        histogram(&values, HISTOGRAM_BINS),
        five_number(&values),
        describe(&values),
    ) else {
        no_data(ui);
        return;
    };

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong(format!("Histogram of {column}"));
        plot::histogram(&mut cols[0], "numeric_hist", &hist, column.name());
        cols[1].strong(format!("Box plot of {column}"));
        plot::box_plot(&mut cols[1], "numeric_box", &summary, column.name());
    });

    ui.strong(format!("Statistics for {column}"));
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Mean", format!("{:.2}", d.mean));
        metric(&mut cols[1], "Median", format!("{:.2}", d.median));
        metric(&mut cols[2], "Min", format!("{:.2}", d.min));
        metric(&mut cols[3], "Max", format!("{:.2}", d.max));
    });

    let insight = match column {
        NumericColumn::Price => {
            "Price is right-skewed: many cheap stones, few expensive ones. \
             Outliers are exceptionally expensive diamonds."
        }
        NumericColumn::Carat => {
            "Most diamonds are relatively small (under one carat); \
             stones above two carats are very rare."
        }
        _ => {
            "Volume correlates strongly with carat weight; extreme values \
             may indicate unusual proportions."
        }
    };
    info_box(ui, insight);
}

// ---------------------------------------------------------------------------
// Categorical attributes
// ---------------------------------------------------------------------------

fn categorical_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Categorical attributes");
    info_box(
        ui,
        "Does quality matter for price? Cut describes how well a diamond reflects \
         light, color how colourless it is, and clarity how many flaws it has. Use the \
         filters on the left to compare, for example, different carat ranges.",
    );

    egui::ComboBox::from_label("Categorical variable")
        .selected_text(state.categorical_column.name())
        .show_ui(ui, |ui: &mut Ui| {
            for c in CategoricalColumn::ALL {
                ui.selectable_value(&mut state.categorical_column, c, c.name());
            }
        });

    match state.categorical_column {
        CategoricalColumn::Cut => categorical_section::<Cut>(
            ui,
            state,
            "\"Ideal\" and \"Premium\" cuts often carry the highest prices; \
             \"Fair\" is cheapest but less attractive.",
        ),
        CategoricalColumn::Color => categorical_section::<Color>(
            ui,
            state,
            "D, E and F are colourless and most expensive, G–I nearly colourless, \
             J visibly tinted and cheapest.",
        ),
        CategoricalColumn::Clarity => categorical_section::<Clarity>(
            ui,
            state,
            "IF is flawless and most expensive; VS1/VS2 have small flaws visible \
             under magnification, SI1/SI2 flaws visible to a trained eye.",
        ),
    }
}

fn categorical_section<G: Grade>(ui: &mut Ui, state: &AppState, insight: &str) {
    let ds = &state.dataset;
    let idx = &state.visible_indices;
    if idx.is_empty() {
        no_data(ui);
        return;
    }

    let colors = ColorMap::new(G::ALL);
    let counts = value_counts::<G>(ds, idx);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong(format!("Diamonds per {}", G::COLUMN));
        let bars: Vec<(String, f64)> = counts
            .iter()
            .map(|c| (c.category.to_string(), c.count as f64))
            .collect();
        let bar_colors: Vec<Color32> = counts.iter().map(|c| colors.color_for(&c.category)).collect();
        plot::category_bars(&mut cols[0], "category_counts", &bars, &bar_colors, "Count");

        cols[1].strong(format!("Distribution of {}", G::COLUMN));
        egui::Grid::new("category_table")
            .striped(true)
            .num_columns(3)
            .show(&mut cols[1], |ui: &mut Ui| {
                ui.strong(G::COLUMN);
                ui.strong("Count");
                ui.strong("Percent");
                ui.end_row();
                for c in &counts {
                    ui.label(c.category.label());
                    ui.label(c.count.to_string());
                    ui.label(format!("{:.1} %", c.percent));
                    ui.end_row();
                }
            });
    });

    ui.strong(format!("Mean price per {}", G::COLUMN));
    let by_price = mean_price_by::<G>(ds, idx);
    let bars: Vec<(String, f64)> = by_price.iter().map(|(g, p)| (g.to_string(), *p)).collect();
    let bar_colors: Vec<Color32> = by_price.iter().map(|(g, _)| colors.color_for(g)).collect();
    plot::category_bars(ui, "category_prices", &bars, &bar_colors, "Mean price (USD)");

    info_box(ui, insight);
}

// ---------------------------------------------------------------------------
// Correlations
// ---------------------------------------------------------------------------

fn correlation_page(ui: &mut Ui, state: &mut AppState, image: CorrelationImage<'_>) {
    ui.heading("Relationships and correlations");
    info_box(
        ui,
        "The scatter plot shows (although busy) how quality tends to drop as diamonds \
         get larger. Depth and table show almost no correlation with price, while \
         volume correlates strongly, as the correlation matrix confirms.",
    );

    ui.heading("Scatter plot");
    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_label("X")
            .selected_text(state.scatter_x.name())
            .show_ui(ui, |ui: &mut Ui| {
                for c in SCATTER_X_COLUMNS {
                    ui.selectable_value(&mut state.scatter_x, c, c.name());
                }
            });
        egui::ComboBox::from_label("Y")
            .selected_text(state.scatter_y.name())
            .show_ui(ui, |ui: &mut Ui| {
                for c in SCATTER_Y_COLUMNS {
                    ui.selectable_value(&mut state.scatter_y, c, c.name());
                }
            });
        egui::ComboBox::from_label("Group by (color)")
            .selected_text(state.scatter_hue.map_or("None", |h| h.name()))
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut state.scatter_hue, None, "None");
                for c in CategoricalColumn::ALL {
                    ui.selectable_value(&mut state.scatter_hue, Some(c), c.name());
                }
            });
    });

    let (x, y) = (state.scatter_x, state.scatter_y);
    let ds = &state.dataset;
    let idx = &state.visible_indices;
    let series = match state.scatter_hue {
        None => vec![Series {
            name: format!("{x} vs {y}"),
            color: Color32::from_rgb(90, 140, 220),
            points: idx
                .iter()
                .map(|&i| [x.value(&ds.records[i]), y.value(&ds.records[i])])
                .collect(),
        }],
        Some(CategoricalColumn::Cut) => hue_series::<Cut>(ds, idx, x, y),
        Some(CategoricalColumn::Color) => hue_series::<Color>(ds, idx, x, y),
        Some(CategoricalColumn::Clarity) => hue_series::<Clarity>(ds, idx, x, y),
    };
    ui.strong(format!("Relationship between {x} and {y}"));
    plot::scatter(ui, "scatter", series, x.name(), y.name());

    ui.add_space(8.0);
    ui.heading("Correlation matrix");
    ui.label("Correlations between the numeric attributes, from dark blue (weak) to dark red (strong).");
    match image {
        Ok(texture) => {
            ui.add(egui::Image::new(texture).max_width(ui.available_width().min(720.0)));
            ui.label(RichText::new("Correlation matrix for numeric variables").small().weak());
        }
        Err(reason) => {
            ui.label(RichText::new(format!("Correlation image unavailable: {reason}")).italics());
        }
    }

    ui.add_space(8.0);
    ui.heading("Strongest correlations");
    let pairs = strongest_correlations(&correlation_matrix(ds, idx), 5);
    if pairs.is_empty() {
        no_data(ui);
    }
    for (i, p) in pairs.iter().enumerate() {
        ui.label(format!("{}. {} - {}: {:.3}", i + 1, p.a, p.b, p.r.abs()));
    }
}

fn hue_series<G: Grade>(
    ds: &Dataset,
    indices: &[usize],
    x: NumericColumn,
    y: NumericColumn,
) -> Vec<Series> {
    let colors = ColorMap::new(G::ALL);
    G::ALL
        .iter()
        .map(|&g| Series {
            name: g.to_string(),
            color: colors.color_for(&g),
            points: indices
                .iter()
                .map(|&i| &ds.records[i])
                .filter(|r| G::of(r) == g)
                .map(|r| [x.value(r), y.value(r)])
                .collect(),
        })
        .filter(|s| !s.points.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Carat groups
// ---------------------------------------------------------------------------

fn carat_group_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Carat group analysis");
    info_box(
        ui,
        "Are bigger diamonds always better? Splitting the diamonds into weight classes \
         shows that price rises with size, but average cut, clarity and color tend to \
         fall. Large stones are often cut from lower-quality rough, so there is a \
         trade-off between size and quality.",
    );

    let ds = &state.dataset;
    let idx = &state.visible_indices;

    // ---- Automatic grouping ----
    ui.heading("Automatic carat groups");
    let auto = auto_group_counts(ds, idx);
    let palette = generate_palette(auto.len());
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label("Diamonds per carat group (equal-width bins)");
        let bars: Vec<(String, f64)> = auto
            .iter()
            .map(|c| (c.category.to_string(), c.count as f64))
            .collect();
        plot::category_bars(&mut cols[0], "auto_counts", &bars, &palette, "Diamonds");

        cols[1].label("Carat group distribution");
        egui::Grid::new("auto_table")
            .striped(true)
            .num_columns(4)
            .show(&mut cols[1], |ui: &mut Ui| {
                for h in ["Carat group", "Range", "Count", "Percent"] {
                    ui.strong(h);
                }
                ui.end_row();
                for c in &auto {
                    ui.label(c.category.label());
                    match ds.auto_binning {
                        Some(b) => {
                            let (lo, hi) = b.range(c.category);
                            ui.label(format!("({lo:.3}, {hi:.3}]"));
                        }
                        None => {
                            ui.label(NO_DATA);
                        }
                    }
                    ui.label(c.count.to_string());
                    ui.label(format!("{:.1} %", c.percent));
                    ui.end_row();
                }
            });
    });

    // ---- Manual grouping ----
    ui.add_space(8.0);
    ui.heading("Manual carat groups");
    let summary = carat_group_summary(ds, idx);
    egui::Grid::new("group_summary")
        .striped(true)
        .num_columns(8)
        .show(ui, |ui: &mut Ui| {
            for h in [
                "carat_group",
                "mean_price",
                "median_price",
                "count",
                "mean_volume",
                "mean_clarity_ord",
                "mean_cut_ord",
                "mean_color_ord",
            ] {
                ui.strong(h);
            }
            ui.end_row();
            for s in &summary {
                ui.label(s.group.label());
                ui.label(number(s.mean_price));
                ui.label(number(s.median_price));
                ui.label(s.count.to_string());
                ui.label(number(s.mean_volume));
                ui.label(number(s.mean_clarity_ord));
                ui.label(number(s.mean_cut_ord));
                ui.label(number(s.mean_color_ord));
                ui.end_row();
            }
        });

    let group_palette = generate_palette(summary.len());
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label("Mean price per carat group");
        let bars: Vec<(String, f64)> = summary
            .iter()
            .map(|s| (s.group.short_label().to_string(), s.mean_price.unwrap_or(0.0)))
            .collect();
        plot::category_bars(&mut cols[0], "group_prices", &bars, &group_palette, "Mean price (USD)");

        cols[1].label("Diamonds per manual carat group");
        let bars: Vec<(String, f64)> = summary
            .iter()
            .map(|s| (s.group.short_label().to_string(), s.count as f64))
            .collect();
        plot::category_bars(&mut cols[1], "group_counts", &bars, &group_palette, "Diamonds");
    });

    // ---- Detail for one group ----
    ui.add_space(8.0);
    ui.heading("Detailed analysis per carat group");
    egui::ComboBox::from_label("Carat group")
        .selected_text(state.selected_group.label())
        .show_ui(ui, |ui: &mut Ui| {
            for g in CaratGroup::ALL {
                ui.selectable_value(&mut state.selected_group, g, g.label());
            }
        });

    let ds = &state.dataset;
    let idx = &state.visible_indices;
    let group = state.selected_group;
    let rows = group_indices(ds, idx, group);
    if let Some(s) = summary.iter().find(|s| s.group == group && s.count > 0) {
        ui.columns(3, |cols: &mut [Ui]| {
            metric(&mut cols[0], "Number of diamonds", s.count.to_string());
            metric(&mut cols[0], "Mean price", money(s.mean_price));
            metric(&mut cols[1], "Median price", money(s.median_price));
            metric(&mut cols[1], "Mean volume", format!("{} mm³", number(s.mean_volume)));
            metric(&mut cols[2], "Most common cut", or_na(s.common_cut));
            metric(&mut cols[2], "Most common color", or_na(s.common_color));
        });
        let prices = ds.column(NumericColumn::Price, &rows);
        if let Some(hist) = histogram(&prices, HISTOGRAM_BINS) {
            ui.label(format!("Price distribution for {group}"));
            plot::histogram(ui, "group_hist", &hist, "Price (USD)");
        }
    } else {
        no_data(ui);
    }

    info_box(
        ui,
        "Small diamond → low price, low volume, high clarity/cut/color.\n\
         Larger diamond → higher price and volume, but lower clarity/cut/color.",
    );

    // ---- Trends ----
    ui.heading("Trend: size vs quality");
    let labels: Vec<String> = summary.iter().map(|s| s.group.short_label().to_string()).collect();
    let trend_colors = generate_palette(3);
    ui.columns(3, |cols: &mut [Ui]| {
        cols[0].strong("Price rises with size");
        plot::trend(
            &mut cols[0],
            "trend_price",
            vec![Series {
                name: "Mean price".into(),
                color: Color32::from_rgb(40, 160, 60),
                points: group_points(&summary, |s| s.mean_price),
            }],
            labels.clone(),
            "Price (USD)",
        );
        cols[1].strong("Volume rises with size");
        plot::trend(
            &mut cols[1],
            "trend_volume",
            vec![Series {
                name: "Mean volume".into(),
                color: Color32::from_rgb(50, 90, 220),
                points: group_points(&summary, |s| s.mean_volume),
            }],
            labels.clone(),
            "Volume (mm³)",
        );
        cols[2].strong("Quality falls with size");
        plot::trend(
            &mut cols[2],
            "trend_quality",
            vec![
                Series {
                    name: "Clarity".into(),
                    color: trend_colors[0],
                    points: group_points(&summary, |s| s.mean_clarity_ord),
                },
                Series {
                    name: "Cut".into(),
                    color: trend_colors[1],
                    points: group_points(&summary, |s| s.mean_cut_ord),
                },
                Series {
                    name: "Color".into(),
                    color: trend_colors[2],
                    points: group_points(&summary, |s| s.mean_color_ord),
                },
            ],
            labels,
            "Quality score (higher = better)",
        );
    });

    // ---- Reports ----
    ui.heading("Detailed reports per carat group");
    for s in summary.iter().filter(|s| s.count > 0) {
        egui::CollapsingHeader::new(format!("Group: {}", s.group))
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.label(format!("Number of diamonds: {}", s.count));
                ui.label(format!("Mean price: {}", money(s.mean_price)));
                ui.label(format!("Median price: {}", money(s.median_price)));
                ui.label(format!("Mean volume: {} mm³", number(s.mean_volume)));
                ui.label(format!("Mean clarity (ordinal): {}", number(s.mean_clarity_ord)));
                ui.label(format!("Mean cut (ordinal): {}", number(s.mean_cut_ord)));
                ui.label(format!("Most common cut: {}", or_na(s.common_cut)));
                ui.label(format!("Mean color (ordinal): {}", number(s.mean_color_ord)));
                ui.label(format!("Most common color: {}", or_na(s.common_color)));
            });
    }
}

/// Per-group `(position, value)` points, skipping groups without data.
fn group_points(summary: &[GroupSummary], f: impl Fn(&GroupSummary) -> Option<f64>) -> Vec<[f64; 2]> {
    summary
        .iter()
        .enumerate()
        .filter_map(|(i, s)| f(s).map(|v| [i as f64, v]))
        .collect()
}

// ---------------------------------------------------------------------------
// Conclusion
// ---------------------------------------------------------------------------

fn conclusion_page(ui: &mut Ui) {
    ui.heading("Conclusion");
    info_box(
        ui,
        "What have we learned? After looking at thousands of diamonds:\n\n\
         • Carat weight is the strongest price driver.\n\
         • Color, clarity and cut affect price, but to a lesser degree.\n\
         • Larger diamonds tend to have lower average quality.\n\n\
         So next time you look at a diamond, remember: price is more than carat. \
         It is a balance between size and quality.",
    );
}

// ---------------------------------------------------------------------------
// Build your own diamond
// ---------------------------------------------------------------------------

fn builder_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Build your own diamond");
    info_box(
        ui,
        "Pick the attributes of your dream diamond and get a price estimate based on \
         the diamonds in the dataset. See how each choice moves the price.",
    );

    ui.strong("Configure your diamond");
    let form = &mut state.builder;
    ui.add(
        egui::Slider::new(&mut form.carat, 0.2..=5.0)
            .step_by(0.1)
            .text("Carat"),
    )
    .on_hover_text("Carat weight is the strongest price driver");
    label_picker(ui, "Cut", &mut form.cut, Cut::ALL);
    label_picker(ui, "Color", &mut form.color, Color::ALL);
    label_picker(ui, "Clarity", &mut form.clarity, Clarity::ALL);
    egui::CollapsingHeader::new("Advanced settings")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.add(
                egui::Slider::new(&mut form.depth, 50.0..=70.0)
                    .step_by(0.1)
                    .text("Depth (%)"),
            )
            .on_hover_text("Optimal around 60-62 %");
            ui.add(
                egui::Slider::new(&mut form.table, 50.0..=70.0)
                    .step_by(0.1)
                    .text("Table (%)"),
            )
            .on_hover_text("Optimal around 53-58 %");
        });

    let (spec, est) = match state.estimate() {
        Ok(v) => v,
        Err(e) => {
            ui.label(RichText::new(format!("Cannot estimate: {e}")).color(Color32::RED));
            return;
        }
    };

    ui.separator();
    ui.heading("Price estimate");
    metric(ui, "Estimated price", format!("${}", thousands(est.price)));
    ui.label(format!("Method: {}", est.method));
    ui.label(format!("Confidence: {}", est.confidence));
    if est.evidence_count > 0 {
        ui.label(format!("Similar diamonds in the dataset: {}", est.evidence_count));
    }
    let (lo, hi) = price_interval(est.price);
    ui.label(format!("Price range: ${} - ${}", thousands(lo), thousands(hi)));

    ui.add_space(6.0);
    ui.strong("Your choices");
    let q = quality_stars(&spec);
    egui::Grid::new("builder_choices")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui: &mut Ui| {
            for (name, value, n) in [
                ("Carat", format!("{} carat", spec.carat), q.carat),
                ("Cut", spec.cut.to_string(), q.cut),
                ("Color", spec.color.to_string(), q.color),
                ("Clarity", spec.clarity.to_string(), q.clarity),
                ("Depth", format!("{}%", spec.depth), q.depth),
                ("Table", format!("{}%", spec.table), q.table),
            ] {
                ui.label(name);
                ui.label(value);
                ui.label(stars(n));
                ui.end_row();
            }
        });

    // ---- Market comparison ----
    ui.add_space(8.0);
    ui.heading("Comparison with the market");
    match market_comparison(&state.dataset, est.price) {
        Some(m) => {
            ui.columns(2, |cols: &mut [Ui]| {
                cols[0].strong(format!("Diamonds in a similar price class ({})", m.count));
                egui::Grid::new("market_top")
                    .striped(true)
                    .num_columns(5)
                    .show(&mut cols[0], |ui: &mut Ui| {
                        for h in ["cut", "color", "clarity", "price", "carat"] {
                            ui.strong(h);
                        }
                        ui.end_row();
                        for c in &m.top_combinations {
                            ui.label(c.cut.label());
                            ui.label(c.color.label());
                            ui.label(c.clarity.label());
                            ui.label(format!("{:.2}", c.mean_price));
                            ui.label(format!("{:.2}", c.mean_carat));
                            ui.end_row();
                        }
                    });

                cols[1].strong("Average attributes in your price class");
                cols[1].label(format!("Mean carat: {:.2}", m.mean_carat));
                cols[1].label(format!("Most common cut: {}", m.common_cut));
                cols[1].label(format!("Most common color: {}", m.common_color));
                cols[1].label(format!("Most common clarity: {}", m.common_clarity));
            });
        }
        None => {
            ui.label("No diamonds in the dataset are priced within ±20 % of the estimate.");
        }
    }

    // ---- Tips ----
    ui.add_space(8.0);
    ui.heading("Optimization tips");
    for tip in optimization_tips(&spec) {
        ui.label(format!("• {}", tip.message()));
    }

    // ---- Breakdown ----
    ui.add_space(8.0);
    ui.heading("Price components");
    let breakdown = price_components(&spec);
    let bars: Vec<(String, f64)> = breakdown
        .components()
        .iter()
        .map(|(name, v)| (name.to_string(), *v))
        .collect();
    let colors = [
        Color32::from_rgb(50, 90, 220),
        Color32::from_rgb(40, 160, 60),
        Color32::from_rgb(240, 150, 30),
        Color32::from_rgb(210, 50, 50),
    ];
    plot::category_bars(ui, "price_components", &bars, &colors, "Price impact (USD)");
    for (name, v) in breakdown.components() {
        ui.label(format!("{name}: ${}", thousands(v)));
    }
    ui.label(format!("Sum of components: ${}", thousands(breakdown.total())));
    ui.label(
        RichText::new(
            "Components are additive approximations of the multiplicative heuristic and \
             need not sum to the estimate above.",
        )
        .small()
        .weak(),
    );
}

/// Combo box over the labels of a grade domain, editing a text field.
fn label_picker<G: Grade>(ui: &mut Ui, label: &str, value: &mut String, options: &[G]) {
    egui::ComboBox::from_label(label)
        .selected_text(value.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for g in options {
                ui.selectable_value(value, g.label().to_string(), g.label());
            }
        });
}
