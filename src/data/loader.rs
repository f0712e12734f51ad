use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{whole_year, Dataset, Metric, Record, ENTITY_COLUMN, YEAR_COLUMN};
use crate::error::{LoadError, LoadResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row, one record per line (recommended)
/// * `.json`         – `[{ "Entity": "...", "Year": 2000, ... }, ...]`
/// * `.parquet`      – flat columns named like the CSV headers
///
/// Columns beyond the required ones are ignored.
pub fn load(path: &Path) -> LoadResult<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "Loaded {} records for {} entities from {}",
        dataset.len(),
        dataset.entities().len(),
        path.display()
    );
    Ok(dataset)
}

/// Headers every dataset must provide, in the order they are checked.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    [ENTITY_COLUMN, YEAR_COLUMN]
        .into_iter()
        .chain(Metric::ALL.into_iter().map(Metric::column_name))
}

fn check_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> LoadResult<()> {
    let present: BTreeSet<&str> = headers.into_iter().collect();
    match required_columns().find(|c| !present.contains(c)) {
        Some(missing) => Err(LoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Strip surrounding whitespace from the entity so every format agrees on
/// entity names; a blank entity is rejected.
fn normalize_record(mut record: Record, row: usize) -> LoadResult<Record> {
    let trimmed = record.entity.trim();
    if trimmed.is_empty() {
        return Err(LoadError::InvalidValue {
            row,
            column: ENTITY_COLUMN.to_string(),
            reason: "entity is blank".to_string(),
        });
    }
    if trimmed.len() != record.entity.len() {
        record.entity = trimmed.to_string();
    }
    Ok(record)
}

/// Whole-number year or `InvalidValue`; `shown` is the cell as written.
fn check_year(value: Option<f64>, shown: &str, row: usize) -> LoadResult<i32> {
    value.and_then(whole_year).ok_or_else(|| LoadError::InvalidValue {
        row,
        column: YEAR_COLUMN.to_string(),
        reason: format!("'{shown}' is not a whole-number year"),
    })
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Header row with column names; blank numeric cells load as missing.
/// Years may be written as integral floats (`2000.0`).
fn load_delimited(path: &Path, delimiter: u8) -> LoadResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    check_columns(headers.iter())?;
    let year_idx = headers
        .iter()
        .position(|h| h == YEAR_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(YEAR_COLUMN.to_string()))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let cell = row.get(year_idx).unwrap_or("");
        check_year(cell.parse().ok(), cell, row_no + 1)?;
        let record: Record = row.deserialize(Some(&headers))?;
        records.push(normalize_record(record, row_no + 1)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// `null` metric values load as missing.
fn load_json(path: &Path) -> LoadResult<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_str(&text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        check_columns(row.keys().map(String::as_str))?;
        let year = row.get(YEAR_COLUMN);
        let shown = year.map(JsonValue::to_string).unwrap_or_default();
        check_year(year.and_then(JsonValue::as_f64), &shown, i + 1)?;
        let record: Record = serde_json::from_value(JsonValue::Object(row))?;
        records.push(normalize_record(record, i + 1)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per header.
///
/// Column types are normalised with Arrow casts, so integer or float years
/// and integer or float metrics are all accepted; a fractional year is
/// rejected rather than truncated. Works with files written
/// by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> LoadResult<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let column = |name: &str, to: &DataType| -> LoadResult<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
            Ok(cast(batch.column(idx), to)?)
        };

        let entity_col = column(ENTITY_COLUMN, &DataType::Utf8)?;
        let entities = entity_col.as_string::<i32>();
        let year_col = column(YEAR_COLUMN, &DataType::Float64)?;
        let years = year_col.as_primitive::<Float64Type>();

        let metric_cols = Metric::ALL
            .into_iter()
            .map(|m| Ok((m, column(m.column_name(), &DataType::Float64)?)))
            .collect::<LoadResult<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            if entities.is_null(row) {
                return Err(LoadError::InvalidValue {
                    row: row_no,
                    column: ENTITY_COLUMN.to_string(),
                    reason: "entity is null".to_string(),
                });
            }
            let year = (!years.is_null(row)).then(|| years.value(row));
            let shown = year.map(|y| y.to_string()).unwrap_or_else(|| "null".to_string());
            let year = check_year(year, &shown, row_no)?;

            let mut record = Record::new(entities.value(row), year);
            for (metric, col) in &metric_cols {
                let values = col.as_primitive::<Float64Type>();
                if !values.is_null(row) {
                    *record.slot(*metric) = Some(values.value(row));
                }
            }
            records.push(normalize_record(record, row_no)?);
        }
    }

    Ok(Dataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn header() -> String {
        required_columns()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_loads_records_and_blank_cells() {
        let csv = format!(
            "{}\nPeru,2000,10,1.5,2.5,3.5,4.5\nPeru,2001,,1.0,,2.0,\nChad,2000,7,0,0,0,0\n",
            header()
        );
        let file = write_temp(".csv", &csv);
        let ds = load(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.entities(), ["Peru".to_string(), "Chad".to_string()]);
        let second = &ds.records()[1];
        assert_eq!(second.year, 2001);
        assert_eq!(second.value(Metric::PrematureDeathCount), None);
        assert_eq!(second.value(Metric::AgriculturalDischarge), Some(1.0));
        assert_eq!(second.value(Metric::UrbanUntreated), Some(2.0));
        assert_eq!(second.value(Metric::TotalInlandDischarge), None);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!("\"Code\",{}\nPE,Peru,2000,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.records()[0].value(Metric::TotalInlandDischarge), Some(5.0));
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let header = required_columns().collect::<Vec<_>>().join("\t");
        let tsv = format!("{header}\nPeru\t2000\t1\t2\t3\t4\t5\n");
        let file = write_temp(".tsv", &tsv);
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.records()[0].value(Metric::UrbanUntreated), Some(4.0));
    }

    #[test]
    fn missing_column_fails_fast() {
        let file = write_temp(".csv", "Entity,Year,Premature_Death_Count\nPeru,2000,1\n");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == Metric::AgriculturalDischarge.column_name()));
    }

    #[test]
    fn unparsable_year_is_rejected() {
        let csv = format!("{}\nPeru,two thousand,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { row: 1, ref column, .. }) if column == YEAR_COLUMN
        ));
    }

    #[test]
    fn csv_float_years_load_when_whole() {
        let csv = format!("{}\nPeru,2000.0,1,2,3,4,5\nPeru,2001,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        let ds = load(file.path()).unwrap();
        let years: Vec<i32> = ds.records().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2001]);
    }

    #[test]
    fn csv_fractional_year_is_rejected() {
        let csv = format!("{}\nPeru,2000,1,2,3,4,5\nPeru,2000.5,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { row: 2, ref column, .. }) if column == YEAR_COLUMN
        ));
    }

    #[test]
    fn json_float_years_follow_the_same_rule() {
        let row = |year: f64| {
            let mut r = serde_json::to_value(Record::new("Peru", 0)).unwrap();
            r[YEAR_COLUMN] = serde_json::json!(year);
            r
        };
        let file = write_temp(".json", &serde_json::json!([row(2000.0)]).to_string());
        assert_eq!(load(file.path()).unwrap().records()[0].year, 2000);

        let file = write_temp(".json", &serde_json::json!([row(2000.5)]).to_string());
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { row: 1, ref column, .. }) if column == YEAR_COLUMN
        ));
    }

    #[test]
    fn entities_are_trimmed_in_every_format() {
        let csv = format!("{}\n\"  Peru \",2000,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        assert_eq!(load(file.path()).unwrap().entities(), ["Peru".to_string()]);

        let mut row = serde_json::to_value(Record::new(" Peru", 2000)).unwrap();
        row[ENTITY_COLUMN] = serde_json::json!(" Peru\t");
        let file = write_temp(".json", &serde_json::json!([row]).to_string());
        let ds = load(file.path()).unwrap();
        assert_eq!(ds.entities(), ["Peru".to_string()]);
        assert_eq!(ds.records()[0].entity, "Peru");
    }

    #[test]
    fn blank_entity_is_rejected() {
        let csv = format!("{}\n,2000,1,2,3,4,5\n", header());
        let file = write_temp(".csv", &csv);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(matches!(
            load(file.path()),
            Err(LoadError::UnsupportedFormat(ref ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_records_load_with_nulls() {
        let rows = serde_json::json!([
            {
                "Entity": "Peru",
                "Year": 2000,
                "Premature_Death_Count": 12,
                (Metric::AgriculturalDischarge.column_name()): 1.5,
                (Metric::IndustrialUntreated.column_name()): null,
                (Metric::UrbanUntreated.column_name()): 3.0,
                (Metric::TotalInlandDischarge.column_name()): 9.0
            }
        ]);
        let file = write_temp(".json", &rows.to_string());
        let ds = load(file.path()).unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.value(Metric::PrematureDeathCount), Some(12.0));
        assert_eq!(r.value(Metric::IndustrialUntreated), None);
    }

    #[test]
    fn json_without_required_key_fails() {
        let file = write_temp(".json", r#"[{"Entity": "Peru", "Year": 2000}]"#);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::MissingColumn(ref c)) if c == "Premature_Death_Count"
        ));
    }

    #[test]
    fn parquet_columns_are_cast_to_record_types() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let mut fields = vec![
            Field::new(ENTITY_COLUMN, DataType::Utf8, false),
            Field::new(YEAR_COLUMN, DataType::Int64, false),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Peru", " Peru "])),
            Arc::new(Int64Array::from(vec![2000, 2001])),
        ];
        for m in Metric::ALL {
            fields.push(Field::new(m.column_name(), DataType::Float64, true));
            columns.push(Arc::new(Float64Array::from(vec![Some(1.0), None])));
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].year, 2001);
        assert_eq!(ds.records()[0].value(Metric::UrbanUntreated), Some(1.0));
        assert_eq!(ds.records()[1].value(Metric::UrbanUntreated), None);
        assert_eq!(ds.entities(), ["Peru".to_string()]);
    }

    #[test]
    fn parquet_float_years_are_checked_not_truncated() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let write = |years: Vec<f64>| {
            let mut fields = vec![
                Field::new(ENTITY_COLUMN, DataType::Utf8, false),
                Field::new(YEAR_COLUMN, DataType::Float64, false),
            ];
            let n = years.len();
            let mut columns: Vec<ArrayRef> = vec![
                Arc::new(StringArray::from(vec!["Peru"; n])),
                Arc::new(Float64Array::from(years)),
            ];
            for m in Metric::ALL {
                fields.push(Field::new(m.column_name(), DataType::Float64, true));
                columns.push(Arc::new(Float64Array::from(vec![1.0; n])));
            }
            let schema = Arc::new(Schema::new(fields));
            let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
            let file = Builder::new().suffix(".parquet").tempfile().unwrap();
            let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
            writer.write(&batch).unwrap();
            writer.close().unwrap();
            file
        };

        let file = write(vec![2000.0, 2001.0]);
        let years: Vec<i32> = load(file.path()).unwrap().records().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2001]);

        let file = write(vec![2000.0, 2001.5]);
        assert!(matches!(
            load(file.path()),
            Err(LoadError::InvalidValue { row: 2, ref column, .. }) if column == YEAR_COLUMN
        ));
    }
}
