use crate::domain::model::{Feature, ProjectRecord, FEATURE_COUNT, TARGET_COLUMN};
use crate::utils::error::{EstimatorError, Result};
use std::io::Read;
use std::path::Path;

/// Historical projects loaded from CSV. Rows keep file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ProjectRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self { records }
    }

    /// 從 CSV 檔案載入資料集
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EstimatorError::ConfigError {
                message: format!(
                    "Dataset file '{}' not found. Ensure the file exists and is accessible.",
                    path.display()
                ),
            },
            _ => EstimatorError::IoError(e),
        })?;

        Self::from_reader(file, &path.display().to_string())
    }

    /// Parses CSV from any reader. `source` only appears in error messages.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = reader.headers()?.clone();
        let missing: Vec<String> = Feature::ALL
            .iter()
            .map(|f| f.name())
            .chain(std::iter::once(TARGET_COLUMN))
            .filter(|column| !headers.iter().any(|h| h == *column))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(EstimatorError::MissingColumnsError {
                path: source.to_string(),
                columns: missing,
            });
        }

        let mut records = Vec::new();
        let mut raw = csv::StringRecord::new();
        while reader.read_record(&mut raw)? {
            let record: ProjectRecord = raw.deserialize(Some(&headers))?;
            let line = raw
                .position()
                .map(|p| p.line())
                .unwrap_or(records.len() as u64 + 2);
            check_finite(&record, line, source)?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(EstimatorError::ConfigError {
                message: format!("Dataset '{}' contains no rows", source),
            });
        }

        tracing::debug!("Loaded {} rows from {}", records.len(), source);
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Feature matrix in `Feature::ALL` column order.
    pub fn features(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.records.iter().map(ProjectRecord::features).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.project_cost).collect()
    }
}

/// Rejects NaN and infinities, including overflowed literals such as `1e400`.
fn check_finite(record: &ProjectRecord, line: u64, source: &str) -> Result<()> {
    let columns = Feature::ALL
        .iter()
        .map(|f| f.name())
        .zip(record.features())
        .chain(std::iter::once((TARGET_COLUMN, record.project_cost)));

    for (column, value) in columns {
        if !value.is_finite() {
            return Err(EstimatorError::NonFiniteValueError {
                path: source.to_string(),
                line,
                column: column.to_string(),
                value,
            });
        }
    }
    Ok(())
}
