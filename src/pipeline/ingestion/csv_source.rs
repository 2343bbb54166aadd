use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{ImportError, Result};
use crate::types::{clean_cell, RawRow};

/// Delimited-text source of toxicity rows.
///
/// Opening the source validates the header row once. Missing required
/// columns fail the whole run before any row is read.
pub struct CsvSource<R: Read> {
    headers: Vec<String>,
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ImportError::Precondition(format!(
                "CSV file not found: {}",
                path.display()
            )));
        }
        info!("📖 Reading CSV file: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ImportError::Precondition(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        check_required_columns(&headers)?;
        debug!("CSV columns: {:?}", headers);

        Ok(Self { headers, reader })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read every remaining row in file order. A row the reader cannot decode
    /// is kept as an error at its position so the caller can account for it.
    pub fn read_rows(mut self) -> Vec<Result<RawRow>> {
        let headers = self.headers;
        self.reader
            .records()
            .enumerate()
            .map(|(index, record)| -> Result<RawRow> {
                let record = record?;
                let columns = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header.clone(), record.get(i).and_then(clean_cell)))
                    .collect();
                Ok(RawRow::new(index, columns))
            })
            .collect()
    }
}

/// Fail with every missing required column listed
pub fn check_required_columns(headers: &[String]) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h.as_str() == *required))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::Precondition(format!(
            "CSV file is missing required columns: {}",
            missing.join(", ")
        )))
    }
}

/// Column list plus the first `limit` rows, for a quick look at the data
pub fn render_preview(headers: &[String], rows: &[Result<RawRow>], limit: usize) -> String {
    let mut out = format!("Columns: {}\n", headers.join(", "));
    for row in rows.iter().take(limit) {
        match row {
            Ok(row) => {
                let cells: Vec<String> = row
                    .columns
                    .iter()
                    .map(|(col, value)| {
                        format!("{}={}", col, value.as_deref().unwrap_or("<missing>"))
                    })
                    .collect();
                out.push_str(&format!("  [{}] {}\n", row.index, cells.join(" | ")));
            }
            Err(e) => out.push_str(&format!("  <unreadable row: {}>\n", e)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
TAID,Name,IUPAC Name,PubChem CID,Canonical SMILES,InChIKey,Toxicity Value
T1,Parathion,,991,CCOP(=S)(OCC)OC1=CC=C(C=C1)[N+](=O)[O-],LCCNCVORNKJIRZ-UHFFFAOYSA-N,3
,Unknown Compound X,,,,,
T3,\"Mercury, dichloride\",,24085,,,NaN
";

    #[test]
    fn test_reads_rows_in_order() {
        let source = CsvSource::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(source.headers().len(), 7);

        let rows: Vec<RawRow> = source.read_rows().into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].get("PubChem CID"), Some("991"));
        assert_eq!(rows[0].get("IUPAC Name"), None);
        assert_eq!(rows[1].get("TAID"), None);
        assert_eq!(rows[2].get("Name"), Some("Mercury, dichloride"));
        assert_eq!(rows[2].get("Toxicity Value"), None);
    }

    #[test]
    fn test_short_rows_are_padded_with_absent_cells() {
        let input = "TAID,Name,Toxicity Value\nT1,Aldrin\n";
        let source = CsvSource::from_reader(input.as_bytes()).unwrap();
        let rows = source.read_rows();
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.get("Name"), Some("Aldrin"));
        assert_eq!(row.get("Toxicity Value"), None);
    }

    #[test]
    fn test_missing_required_columns_are_listed() {
        let err = CsvSource::from_reader("TAID,Compound\nT1,x\n".as_bytes()).err().unwrap();
        match err {
            ImportError::Precondition(msg) => {
                assert!(msg.contains("Name"));
                assert!(msg.contains("Toxicity Value"));
                assert!(!msg.contains("TAID"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_byte_order_mark_is_stripped() {
        let input = "\u{feff}TAID,Name,Toxicity Value\nT1,Aldrin,33\n";
        assert!(CsvSource::from_reader(input.as_bytes()).is_ok());
    }

    #[test]
    fn test_missing_file_is_precondition() {
        let err = CsvSource::open(Path::new("/definitely/not/here.csv")).err().unwrap();
        assert!(matches!(err, ImportError::Precondition(_)));
    }

    #[test]
    fn test_preview_lists_columns_and_rows() {
        let source = CsvSource::from_reader(SAMPLE.as_bytes()).unwrap();
        let headers = source.headers().to_vec();
        let rows = source.read_rows();
        let preview = render_preview(&headers, &rows, 2);
        assert!(preview.starts_with("Columns: TAID, Name"));
        assert!(preview.contains("[0] TAID=T1"));
        assert!(preview.contains("[1] TAID=<missing>"));
        assert!(!preview.contains("[2]"));
    }
}
