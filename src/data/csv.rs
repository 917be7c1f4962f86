//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the class label, either `0`/`1` or a class name
//! - All other columns are numeric features
//! - First row can be headers (automatically detected)

use crate::core::{Label, LogRegError, Matrix, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mapping from class names in the label column to binary labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    /// Name mapped to 0
    pub negative: String,
    /// Name mapped to 1
    pub positive: String,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::new("Normal", "CKD")
    }
}

impl LabelMap {
    pub fn new(negative: impl Into<String>, positive: impl Into<String>) -> Self {
        Self {
            negative: negative.into(),
            positive: positive.into(),
        }
    }

    /// Resolve a raw label field; numeric `0`/`1` always pass through
    pub fn encode(&self, raw: &str) -> Option<Label> {
        let raw = raw.trim().trim_matches('"');
        if raw == self.negative {
            return Some(0);
        }
        if raw == self.positive {
            return Some(1);
        }
        match raw.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(0),
            Ok(v) if v == 1.0 => Some(1),
            _ => None,
        }
    }
}

/// Dense labeled dataset read from CSV
#[derive(Debug, Clone)]
pub struct CsvDataset {
    features: Matrix,
    labels: Vec<Label>,
    feature_names: Option<Vec<String>>,
}

impl CsvDataset {
    /// Load a dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P, labels: &LabelMap) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), labels)
    }

    /// Load a dataset from a reader, auto-detecting a header line
    pub fn from_reader<R: BufRead>(reader: R, labels: &LabelMap) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut targets: Vec<Label> = Vec::new();
        let mut feature_names = None;
        let mut seen_first = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !seen_first {
                seen_first = true;
                if Self::is_header_line(line) {
                    let fields: Vec<String> = line
                        .split(',')
                        .map(|f| f.trim().trim_matches('"').to_string())
                        .collect();
                    feature_names = Some(fields[..fields.len() - 1].to_vec());
                    continue;
                }
            }

            let (features, label) = Self::parse_data_line(line, line_no + 1, labels)?;
            if let Some(expected) = rows.first().map(Vec::len) {
                if features.len() != expected {
                    return Err(LogRegError::ParseError(format!(
                        "Line {}: expected {expected} features, found {}",
                        line_no + 1,
                        features.len()
                    )));
                }
            }
            rows.push(features);
            targets.push(label);
        }

        if rows.is_empty() {
            return Err(LogRegError::EmptyDataset);
        }

        if let Some(names) = &feature_names {
            if names.len() != rows[0].len() {
                return Err(LogRegError::ParseError(format!(
                    "Header names {} features but rows have {}",
                    names.len(),
                    rows[0].len()
                )));
            }
        }

        Ok(Self {
            features: Matrix::from_rows(&rows)?,
            labels: targets,
            feature_names,
        })
    }

    /// Check if a line appears to be a header
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        // Label column is excluded: class names are non-numeric in data rows too
        let non_numeric_count = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().trim_matches('"').parse::<f64>().is_err())
            .count();

        non_numeric_count > (fields.len() - 1) / 2
    }

    /// Parse a CSV data line into features and a label
    fn parse_data_line(line: &str, line_no: usize, labels: &LabelMap) -> Result<(Vec<f64>, Label)> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let (label_str, feature_fields) = match fields.split_last() {
            Some((label, features)) if !features.is_empty() => (*label, features),
            _ => {
                return Err(LogRegError::ParseError(format!(
                    "Line {line_no} has too few fields: {line}"
                )))
            }
        };

        let label = labels.encode(label_str).ok_or_else(|| {
            LogRegError::ParseError(format!(
                "Line {line_no}: unknown label '{label_str}' (expected '{}', '{}', 0 or 1)",
                labels.negative, labels.positive
            ))
        })?;

        let features = feature_fields
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.trim_matches('"').parse::<f64>().map_err(|_| {
                    LogRegError::ParseError(format!(
                        "Line {line_no}: invalid feature value at column {}: {field}",
                        col + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok((features, label))
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Column names from the header line, if one was present
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.features.n_cols()
    }

    /// Split into the feature matrix and label vector
    pub fn into_parts(self) -> (Matrix, Vec<Label>) {
        (self.features, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(data: &str) -> Result<CsvDataset> {
        CsvDataset::from_reader(Cursor::new(data), &LabelMap::default())
    }

    #[test]
    fn test_csv_numeric_labels() {
        let dataset = load("1.0,2.0,1\n3.0,4.0,0\n").unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.labels(), &[1, 0]);
        assert_eq!(dataset.features().row(1), &[3.0, 4.0]);
        assert!(dataset.feature_names().is_none());
    }

    #[test]
    fn test_csv_with_headers_and_named_labels() {
        let data = "age,bp,sg,label\n48,80,1.02,CKD\n7,50,1.02,Normal\n62,80,1.01,CKD\n";
        let dataset = load(data).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.labels(), &[1, 0, 1]);
        assert_eq!(
            dataset.feature_names().unwrap(),
            &["age".to_string(), "bp".to_string(), "sg".to_string()]
        );
    }

    #[test]
    fn test_csv_custom_label_map() {
        let data = "voltage,current,temp,label\n3.7,1.2,25,Defective\n3.9,1.0,24,Normal\n";
        let map = LabelMap::new("Normal", "Defective");
        let dataset = CsvDataset::from_reader(Cursor::new(data), &map).unwrap();
        assert_eq!(dataset.labels(), &[1, 0]);
    }

    #[test]
    fn test_csv_unknown_label() {
        let result = load("1.0,2.0,Maybe\n");
        assert!(matches!(result, Err(LogRegError::ParseError(msg)) if msg.contains("Maybe")));

        let result = load("1.0,2.0,2\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_empty_lines_and_comments() {
        let dataset = load("# Comment\n1.0,2.0,1\n\n3.0,4.0,0\n").unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_csv_empty() {
        assert!(matches!(load(""), Err(LogRegError::EmptyDataset)));
        assert!(matches!(load("a,b,label\n"), Err(LogRegError::EmptyDataset)));
    }

    #[test]
    fn test_csv_invalid_format() {
        // Too few fields
        assert!(load("1.0\n").is_err());
        // Invalid number
        assert!(load("1.0,2.0,1\n1.0,abc,0\n").is_err());
        // Ragged rows
        assert!(load("1.0,2.0,1\n1.0,0\n").is_err());
    }

    #[test]
    fn test_is_header_line() {
        assert!(CsvDataset::is_header_line("feature1,feature2,label"));
        assert!(CsvDataset::is_header_line("x1,x2,x3,y"));
        assert!(!CsvDataset::is_header_line("1.0,2.0,3.0,1"));
        assert!(!CsvDataset::is_header_line("1.0,2.0,CKD"));
        assert!(!CsvDataset::is_header_line("1")); // Too few fields
        assert!(!CsvDataset::is_header_line("\"1.0\",\"2.0\",\"CKD\""));
        assert!(CsvDataset::is_header_line("\"age\",\"bp\",\"class\""));
    }

    #[test]
    fn test_csv_quoted_values() {
        let dataset = load("\"1.5\",\"2.0\",\"CKD\"\n\"3.0\",4.5,Normal\n").unwrap();
        assert!(dataset.feature_names().is_none());
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features().row(0), &[1.5, 2.0]);
        assert_eq!(dataset.features().row(1), &[3.0, 4.5]);
        assert_eq!(dataset.labels(), &[1, 0]);

        let dataset = load("\"hemo\",\"sc\",\"class\"\n\"15.4\",\"1.2\",Normal\n").unwrap();
        assert_eq!(dataset.feature_names().unwrap().len(), 2);
        assert_eq!(dataset.features().row(0), &[15.4, 1.2]);

        // Quotes around garbage are still garbage
        assert!(load("\"1.0\",\"x\",1\n").is_err());
    }

    #[test]
    fn test_label_map_encode() {
        let map = LabelMap::default();
        assert_eq!(map.encode("Normal"), Some(0));
        assert_eq!(map.encode(" CKD "), Some(1));
        assert_eq!(map.encode("\"CKD\""), Some(1));
        assert_eq!(map.encode("1.0"), Some(1));
        assert_eq!(map.encode("0"), Some(0));
        assert_eq!(map.encode("Defective"), None);
    }
}
