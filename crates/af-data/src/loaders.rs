use std::io::Read;
use std::path::Path;

use af_types::{AfResult, DataError, Sample};

/// CSV loader for `(coordinate, observation)` series
#[derive(Debug, Clone)]
pub struct SampleLoader {
    has_headers: bool,
}

impl SampleLoader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    /// Load samples from a CSV file on disk
    pub fn load_csv_file<P: AsRef<Path>>(&self, file_path: P) -> AfResult<Vec<Sample>> {
        let path = file_path.as_ref();
        tracing::info!("Loading samples from: {}", path.display());

        if !path.exists() {
            return Err(DataError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let file = std::fs::File::open(path)?;
        self.load_csv(file, &path.display().to_string())
    }

    /// Load samples from any CSV reader; `source_name` only labels log lines and errors
    pub fn load_csv<R: Read>(&self, reader: R, source_name: &str) -> AfResult<Vec<Sample>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let (coordinate_idx, observation_idx) = if self.has_headers {
            let headers = rdr
                .headers()
                .map_err(|e| DataError::LoadingFailed {
                    message: format!("Failed to read CSV headers from {}: {}", source_name, e),
                })?
                .clone();
            tracing::debug!("CSV headers: {:?}", headers);
            Self::detect_columns(&headers)
        } else {
            (0, 1)
        };

        let first_line = if self.has_headers { 2 } else { 1 };
        let mut samples = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let line = row + first_line;
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV record at line {}: {}", line, e),
            })?;

            match Self::parse_record(&record, coordinate_idx, observation_idx, line) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    tracing::warn!("Skipping invalid record at line {}: {}", line, e);
                }
            }
        }

        if samples.is_empty() {
            return Err(DataError::NoValidRows {
                source_name: source_name.to_string(),
            }
            .into());
        }

        tracing::info!("Loaded {} samples from {}", samples.len(), source_name);
        Ok(samples)
    }

    /// Column positions from headers, falling back to the first two columns
    fn detect_columns(headers: &csv::StringRecord) -> (usize, usize) {
        let mut coordinate_idx = None;
        let mut observation_idx = None;

        for (i, header) in headers.iter().enumerate() {
            match header.to_lowercase().as_str() {
                "t" | "time" | "x" | "coordinate" => {
                    coordinate_idx.get_or_insert(i);
                }
                "y" | "value" | "observation" | "observed" => {
                    observation_idx.get_or_insert(i);
                }
                _ => {}
            }
        }

        match (coordinate_idx, observation_idx) {
            (Some(c), Some(o)) => (c, o),
            _ => (0, 1),
        }
    }

    fn parse_record(
        record: &csv::StringRecord,
        coordinate_idx: usize,
        observation_idx: usize,
        line: usize,
    ) -> Result<Sample, DataError> {
        let coordinate = Self::parse_field(record, coordinate_idx, "coordinate", line)?;
        let observation = Self::parse_field(record, observation_idx, "observation", line)?;
        Ok(Sample::new(coordinate, observation))
    }

    fn parse_field(
        record: &csv::StringRecord,
        idx: usize,
        field: &str,
        line: usize,
    ) -> Result<f64, DataError> {
        let raw = record.get(idx).ok_or_else(|| DataError::ParseError {
            line,
            message: format!("missing {} column (index {})", field, idx),
        })?;
        let value: f64 = raw.parse().map_err(|_| DataError::ParseError {
            line,
            message: format!("invalid {} '{}'", field, raw),
        })?;
        if !value.is_finite() {
            return Err(DataError::ParseError {
                line,
                message: format!("non-finite {} '{}'", field, raw),
            });
        }
        Ok(value)
    }
}

impl Default for SampleLoader {
    fn default() -> Self {
        Self::new()
    }
}
