//! CSV rendering of projected response tables.
//!
//! Shared by the `?type=csv` endpoint and `cerium export`.

use std::io;

/// Render `rows` (header first) as CSV.
pub fn to_csv(rows: &[Vec<String>]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(false)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_quotes_cells_with_separators() {
        let table = vec![
            row(&["Timestamp", "Favourite, colour"]),
            row(&["2024-03-01T10:30:00Z", "red, \"bright\""]),
        ];
        let csv = to_csv(&table).unwrap();
        assert_eq!(
            csv,
            "Timestamp,\"Favourite, colour\"\n2024-03-01T10:30:00Z,\"red, \"\"bright\"\"\"\n"
        );
    }

    #[test]
    fn test_header_only() {
        assert_eq!(to_csv(&[row(&["Timestamp", "Q1"])]).unwrap(), "Timestamp,Q1\n");
    }
}
