use std::io::Read;

use crate::errors::ModelError;

/// A rectangular table of text cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// # Errors
    ///
    /// Returns `ModelError::Schema` if a row is not as wide as the header. Rows
    /// are numbered as in a spreadsheet, the header being row 1.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ModelError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != header.len())
        {
            return Err(ModelError::Schema(format!(
                "sheet row {} has {} cells, header has {}",
                i + 2,
                row.len(),
                header.len()
            )));
        }
        Ok(Self { header, rows })
    }

    /// Parse CSV text with a header line. Cells are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Schema` for unreadable CSV or ragged rows.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header = reader
            .headers()
            .map_err(|e| ModelError::Schema(format!("sheet header: {e}")))?
            .iter()
            .map(String::from)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(String::from).collect::<Vec<_>>())
                    .map_err(|e| ModelError::Schema(format!("sheet: {e}")))
            })
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        Self::new(header, rows)
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
