use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{columns, Dataset, SalaryRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Fatal for the session: the dashboard
/// shows the message instead of filters and charts.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("decoding parquet column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// CSV served over HTTP(S).
    Url(String),
    /// Local `.csv`, `.json` or `.parquet` file.
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locators are URLs, anything else a path.
    pub fn parse(locator: &str) -> Self {
        let trimmed = locator.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the salary dataset from `source`. One network or file read, no
/// retries.
pub fn load(source: &DataSource) -> Result<Dataset, LoadError> {
    let dataset = match source {
        DataSource::Url(url) => fetch_csv(url)?,
        DataSource::File(path) => load_file(path)?,
    };
    log::info!("Loaded {} salary records from {source}", dataset.len());
    Ok(dataset)
}

/// Load a dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names
/// * `.json`    – `[{ "ano": 2024, "cargo": "...", "usd": 123.0, ... }, ...]`
/// * `.parquet` – one column per source column
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => parse_csv(File::open(path)?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

fn fetch_csv(url: &str) -> Result<Dataset, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let body = reqwest::blocking::get(url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(fetch_err)?;
    parse_csv(body.as_ref())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse a CSV document with a header row. Every required column must be
/// present; extra columns are ignored. Header names are trimmed before both
/// the column check and deserialization.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    if let Some(missing) = columns::REQUIRED
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(LoadError::MissingColumn(missing.to_string()));
    }

    let records = reader
        .deserialize::<SalaryRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<SalaryRecord> = serde_json::from_str(&text)?;
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the source column names.
///
/// Columns are cast to the expected type first, so Int32 years, integer
/// salaries and dictionary-encoded strings written by Pandas or Polars all
/// work.
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        append_batch(&batch, records.len(), &mut records)?;
    }

    Ok(Dataset::from_records(records))
}

fn append_batch(
    batch: &RecordBatch,
    row_offset: usize,
    out: &mut Vec<SalaryRecord>,
) -> Result<(), LoadError> {
    let column = |name: &str, ty: &DataType| -> Result<ArrayRef, LoadError> {
        let col = batch
            .column_by_name(name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
        Ok(cast(col, ty)?)
    };

    let year = column(columns::YEAR, &DataType::Int64)?;
    let salary = column(columns::SALARY_USD, &DataType::Float64)?;
    let text: Vec<ArrayRef> = [
        columns::SENIORITY,
        columns::CONTRACT_TYPE,
        columns::REMOTE_MODE,
        columns::COMPANY_SIZE,
        columns::CURRENCY,
        columns::RESIDENCE_COUNTRY,
        columns::ROLE_TITLE,
    ]
    .iter()
    .map(|name| column(*name, &DataType::Utf8))
    .collect::<Result<_, _>>()?;

    let years = year.as_primitive::<Int64Type>();
    let salaries = salary.as_primitive::<Float64Type>();
    let strings: Vec<_> = text.iter().map(|a| a.as_string::<i32>()).collect();

    let null_err = |column: &str, row: usize| LoadError::NullValue {
        column: column.to_string(),
        row: row_offset + row,
    };

    for row in 0..batch.num_rows() {
        if years.is_null(row) {
            return Err(null_err(columns::YEAR, row));
        }
        if salaries.is_null(row) {
            return Err(null_err(columns::SALARY_USD, row));
        }
        let cell = |idx: usize, name: &str| -> Result<String, LoadError> {
            let arr = strings[idx];
            if arr.is_null(row) {
                return Err(null_err(name, row));
            }
            Ok(arr.value(row).to_string())
        };

        out.push(SalaryRecord {
            year: years.value(row),
            seniority: cell(0, columns::SENIORITY)?,
            contract_type: cell(1, columns::CONTRACT_TYPE)?,
            remote_mode: cell(2, columns::REMOTE_MODE)?,
            company_size: cell(3, columns::COMPANY_SIZE)?,
            currency: cell(4, columns::CURRENCY)?,
            residence_country: cell(5, columns::RESIDENCE_COUNTRY)?,
            role_title: cell(6, columns::ROLE_TITLE)?,
            salary_usd: salaries.value(row),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write `rows` as CSV with the source column names, so the file can be
/// loaded back with [`load_file`].
pub fn write_csv(path: &Path, rows: &[SalaryRecord]) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FilterColumn;
    use rstest::rstest;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    const HEADER: &str =
        "ano,senioridade,contrato,remoto,tamanho_empresa,moeda,residencia_iso3,cargo,usd,salario";

    fn sample_csv() -> String {
        [
            HEADER,
            "2024,senior,integral,remoto,media,USD,USA,Data Scientist,150000.0,150000",
            "2023,junior,integral,presencial,grande,BRL,BRA,Data Analyst,20000,100000",
            "2024,pleno,contrato,hibrido,pequena,EUR,DEU,Data Engineer,90000.5,85000",
        ]
        .join("\n")
    }

    #[test]
    fn test_parse_csv() {
        let ds = parse_csv(sample_csv().as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.records()[0];
        assert_eq!(first.year, 2024);
        assert_eq!(first.seniority, "senior");
        assert_eq!(first.residence_country, "USA");
        assert_eq!(first.role_title, "Data Scientist");
        assert_eq!(first.salary_usd, 150000.0);
        assert_eq!(ds.records()[1].salary_usd, 20000.0);
        assert_eq!(ds.options(FilterColumn::Year).len(), 2);
    }

    #[rstest]
    #[case("cargo")]
    #[case("usd")]
    #[case("residencia_iso3")]
    fn test_missing_column(#[case] dropped: &str) {
        let header: Vec<&str> = HEADER.split(',').filter(|h| *h != dropped).collect();
        let csv = format!("{}\n", header.join(","));

        match parse_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, dropped),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_row() {
        let csv = format!("{HEADER}\nnot-a-year,senior,x,y,z,USD,USA,Analyst,1,1\n");
        assert!(matches!(parse_csv(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_padded_headers() {
        let header: Vec<String> = HEADER.split(',').map(|h| format!(" {h} ")).collect();
        let csv = format!(
            "{}\n2024,senior,integral,remoto,media,USD,USA,Data Scientist,150000.0,150000\n",
            header.join(",")
        );

        let ds = parse_csv(csv.as_bytes()).unwrap();
        let row = &ds.records()[0];
        assert_eq!(row.year, 2024);
        assert_eq!(row.company_size, "media");
        assert_eq!(row.role_title, "Data Scientist");
        assert_eq!(row.salary_usd, 150000.0);
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let ds = parse_csv(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[rstest]
    #[case("https://example.com/data.csv", DataSource::Url("https://example.com/data.csv".into()))]
    #[case("http://localhost/x.csv", DataSource::Url("http://localhost/x.csv".into()))]
    #[case("data/salaries.csv", DataSource::File(PathBuf::from("data/salaries.csv")))]
    #[case("  /tmp/a.parquet ", DataSource::File(PathBuf::from("/tmp/a.parquet")))]
    fn test_data_source_parse(#[case] input: &str, #[case] expected: DataSource) {
        assert_eq!(DataSource::parse(input), expected);
    }

    #[test]
    fn test_load_csv_file_and_round_trip_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.csv");
        std::fs::write(&path, sample_csv()).unwrap();

        let ds = load(&DataSource::File(path)).unwrap();
        let out = dir.path().join("export.csv");
        write_csv(&out, ds.records()).unwrap();

        let reloaded = load_file(&out).unwrap();
        assert_eq!(reloaded.records(), ds.records());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"ano": 2024, "senioridade": "senior", "contrato": "integral",
                "remoto": "remoto", "tamanho_empresa": "media", "moeda": "USD",
                "residencia_iso3": "USA", "cargo": "Data Scientist", "usd": 123.5,
                "salario": 123}}]"#
        )
        .unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].salary_usd, 123.5);
    }

    #[test]
    fn test_load_parquet_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(columns::YEAR, DataType::Int32, false),
            Field::new(columns::SENIORITY, DataType::Utf8, false),
            Field::new(columns::CONTRACT_TYPE, DataType::Utf8, false),
            Field::new(columns::REMOTE_MODE, DataType::Utf8, false),
            Field::new(columns::COMPANY_SIZE, DataType::Utf8, false),
            Field::new(columns::CURRENCY, DataType::Utf8, false),
            Field::new(columns::RESIDENCE_COUNTRY, DataType::Utf8, false),
            Field::new(columns::ROLE_TITLE, DataType::Utf8, false),
            Field::new(columns::SALARY_USD, DataType::Float64, false),
        ]));
        let text = |a: &str, b: &str| -> ArrayRef { Arc::new(StringArray::from(vec![a, b])) };
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![2023, 2024])),
                text("junior", "senior"),
                text("integral", "integral"),
                text("remoto", "hibrido"),
                text("media", "grande"),
                text("USD", "EUR"),
                text("USA", "DEU"),
                text("Analyst", "Data Scientist"),
                Arc::new(Float64Array::from(vec![50000.0, 98000.0])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].year, 2024);
        assert_eq!(ds.records()[1].residence_country, "DEU");
        assert_eq!(ds.records()[0].salary_usd, 50000.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("salaries.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
