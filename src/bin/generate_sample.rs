use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 5000;

// (label, sampling weight, price multiplier) in the order the app ranks them.
const CUTS: [(&str, f64, f64); 5] = [
    ("Fair", 0.03, 0.70),
    ("Good", 0.09, 0.85),
    ("Very Good", 0.22, 0.95),
    ("Premium", 0.26, 1.05),
    ("Ideal", 0.40, 1.10),
];
const COLORS: [(&str, f64, f64); 7] = [
    ("D", 0.12, 1.30),
    ("E", 0.18, 1.20),
    ("F", 0.18, 1.10),
    ("G", 0.21, 1.00),
    ("H", 0.15, 0.90),
    ("I", 0.10, 0.80),
    ("J", 0.06, 0.70),
];
const CLARITIES: [(&str, f64, f64); 8] = [
    ("IF", 0.03, 1.50),
    ("VVS1", 0.07, 1.40),
    ("VVS2", 0.09, 1.30),
    ("VS1", 0.15, 1.20),
    ("VS2", 0.23, 1.10),
    ("SI1", 0.24, 1.00),
    ("SI2", 0.17, 0.90),
    ("I1", 0.02, 0.70),
];

#[derive(Debug, Serialize)]
struct Row {
    carat: f64,
    cut: &'static str,
    color: &'static str,
    clarity: &'static str,
    depth: f64,
    table: f64,
    price: f64,
    x: f64,
    y: f64,
    z: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Weighted pick; `shift` moves mass towards the end of the table.
    fn pick<const N: usize>(
        &mut self,
        table: &[(&'static str, f64, f64); N],
        shift: f64,
    ) -> (&'static str, f64) {
        let weights: Vec<f64> = table
            .iter()
            .enumerate()
            .map(|(i, &(_, w, _))| w * (1.0 + shift * i as f64 / N as f64).max(0.05))
            .collect();
        let mut target = self.next_f64() * weights.iter().sum::<f64>();
        for (&(label, _, factor), w) in table.iter().zip(&weights) {
            if target < *w {
                return (label, factor);
            }
            target -= w;
        }
        let (label, _, factor) = table[N - 1];
        (label, factor)
    }
}

fn round(v: f64, digits: i32) -> f64 {
    let p = 10f64.powi(digits);
    (v * p).round() / p
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let carat = round(rng.gauss(-0.45, 0.55).exp().clamp(0.2, 5.0), 2);
    // Larger stones lean towards weaker color and clarity.
    let (cut, cut_factor) = rng.pick(&CUTS, -0.3 * carat);
    let (color, color_factor) = rng.pick(&COLORS, carat);
    let (clarity, clarity_factor) = rng.pick(&CLARITIES, carat);

    let depth = round(rng.gauss(61.8, 1.4).clamp(50.0, 75.0), 1);
    let table = round(rng.gauss(57.4, 2.2).clamp(49.0, 72.0), 1);

    let x = (carat * 264.0).cbrt() * (1.0 + rng.gauss(0.0, 0.01));
    let y = x * (1.0 + rng.gauss(0.0, 0.008));
    let z = depth / 100.0 * (x + y) / 2.0;

    let noise = rng.gauss(0.0, 0.15).exp();
    let price = 2000.0 * carat.powf(1.8) * cut_factor * color_factor * clarity_factor * noise;

    Row {
        carat,
        cut,
        color,
        clarity,
        depth,
        table,
        price: price.round().max(326.0),
        x: round(x, 2),
        y: round(y, 2),
        z: round(z, 2),
    }
}

fn to_batch(rows: &[Row]) -> anyhow::Result<RecordBatch> {
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let text = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("carat", DataType::Float64, false),
        Field::new("cut", DataType::Utf8, false),
        Field::new("color", DataType::Utf8, false),
        Field::new("clarity", DataType::Utf8, false),
        Field::new("depth", DataType::Float64, false),
        Field::new("table", DataType::Float64, false),
        Field::new("price", DataType::Float64, false),
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
        Field::new("z", DataType::Float64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            float(|r| r.carat),
            text(|r| r.cut),
            text(|r| r.color),
            text(|r| r.clarity),
            float(|r| r.depth),
            float(|r| r.table),
            float(|r| r.price),
            float(|r| r.x),
            float(|r| r.y),
            float(|r| r.z),
        ],
    )
    .context("building record batch")
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Row> = (0..ROWS).map(|_| generate_row(&mut rng)).collect();

    let csv_path = "cleaned_diamonds.csv";
    let mut writer = csv::Writer::from_path(csv_path).with_context(|| format!("creating {csv_path}"))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let batch = to_batch(&rows)?;
    let parquet_path = "cleaned_diamonds.parquet";
    let file = std::fs::File::create(parquet_path).with_context(|| format!("creating {parquet_path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!("Wrote {} diamonds to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
