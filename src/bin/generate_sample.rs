//! Writes a synthetic salary dataset with the same columns as the published
//! survey, for working offline.
//!
//! Usage: `generate_sample [output.csv | output.parquet] [rows]`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 9] = [
    "ano",
    "senioridade",
    "contrato",
    "remoto",
    "tamanho_empresa",
    "moeda",
    "residencia_iso3",
    "cargo",
    "usd",
];

const YEARS: [i64; 5] = [2020, 2021, 2022, 2023, 2024];
/// Seniority level and its salary multiplier.
const SENIORITY: [(&str, f64); 4] = [
    ("junior", 0.6),
    ("pleno", 0.85),
    ("senior", 1.15),
    ("executivo", 1.6),
];
const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const REMOTE: [&str; 3] = ["remoto", "hibrido", "presencial"];
const COMPANY_SIZES: [&str; 3] = ["pequena", "media", "grande"];
/// Country, local currency and salary multiplier.
const COUNTRIES: [(&str, &str, f64); 8] = [
    ("USA", "USD", 1.0),
    ("CAN", "CAD", 0.8),
    ("GBR", "GBP", 0.75),
    ("DEU", "EUR", 0.7),
    ("ESP", "EUR", 0.5),
    ("BRA", "BRL", 0.3),
    ("IND", "INR", 0.2),
    ("AUS", "AUD", 0.8),
];
/// Role title and base salary in USD.
const ROLES: [(&str, f64); 8] = [
    ("Data Scientist", 140_000.0),
    ("Data Engineer", 135_000.0),
    ("Data Analyst", 95_000.0),
    ("Machine Learning Engineer", 160_000.0),
    ("Analytics Engineer", 125_000.0),
    ("Research Scientist", 170_000.0),
    ("Business Intelligence Analyst", 90_000.0),
    ("Data Architect", 155_000.0),
];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated row, kept column-wise for the Parquet writer.
#[derive(Default)]
struct Columns {
    year: Vec<i64>,
    text: [Vec<String>; 7],
    usd: Vec<f64>,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();
    for _ in 0..rows {
        let year = *rng.pick(&YEARS);
        let &(seniority, seniority_factor) = rng.pick(&SENIORITY);
        let &(country, currency, country_factor) = rng.pick(&COUNTRIES);
        let &(role, base) = rng.pick(&ROLES);
        let growth = 1.0 + 0.04 * (year - YEARS[0]) as f64;

        // Log-normal noise keeps salaries positive and right-skewed.
        let noise = rng.gauss(0.0, 0.25).exp();
        let usd = (base * seniority_factor * country_factor * growth * noise).round();

        cols.year.push(year);
        let text = [
            seniority,
            *rng.pick(&CONTRACTS),
            *rng.pick(&REMOTE),
            *rng.pick(&COMPANY_SIZES),
            currency,
            country,
            role,
        ];
        for (col, value) in cols.text.iter_mut().zip(text) {
            col.push(value.to_string());
        }
        cols.usd.push(usd);
    }
    cols
}

fn write_csv(path: &Path, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(COLUMNS)?;
    for row in 0..cols.year.len() {
        let mut record = vec![cols.year[row].to_string()];
        record.extend(cols.text.iter().map(|c| c[row].clone()));
        record.push(cols.usd[row].to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, cols: &Columns) -> Result<()> {
    let mut fields = vec![Field::new(COLUMNS[0], DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(cols.year.clone()))];
    for (name, values) in COLUMNS[1..8].iter().zip(&cols.text) {
        fields.push(Field::new(*name, DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from(values.clone())));
    }
    fields.push(Field::new(COLUMNS[8], DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from(cols.usd.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_salaries.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 2_000,
    };

    let mut rng = SimpleRng::new(42);
    let cols = generate(rows, &mut rng);

    let path = Path::new(&output);
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(path, &cols)?;
    } else {
        write_csv(path, &cols)?;
    }

    println!("Wrote {rows} salary records to {output}");
    Ok(())
}
