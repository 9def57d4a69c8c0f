//! CSV dataset output
//!
//! Writes harvested records as a UTF-8 CSV file with a byte-order mark, one
//! header row and one row per record. The BOM lets spreadsheet tools detect
//! the encoding of Thai text.

use crate::record::{BusinessRecord, DATASET_COLUMNS};
use crate::GatherError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// UTF-8 byte-order mark written at the start of the file
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the dataset to `path`, replacing any existing file
///
/// # Arguments
///
/// * `records` - Records in output order
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(GatherError)` - The file could not be created or written
pub fn write_dataset(records: &[BusinessRecord], path: &Path) -> Result<usize, GatherError> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    write_records(records, file)
}

/// Writes the header and record rows as CSV to any writer
///
/// No BOM is emitted here; `write_dataset` adds it for files.
pub fn write_records<W: Write>(records: &[BusinessRecord], writer: W) -> Result<usize, GatherError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(DATASET_COLUMNS)?;
    for record in records {
        csv_writer.write_record(record.as_row())?;
    }
    csv_writer.flush()?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DetailFields, NO_PHONE};
    use tempfile::TempDir;

    fn record(subcategory: &str, name: &str, description: Option<&str>) -> BusinessRecord {
        BusinessRecord::from_fields(
            subcategory,
            DetailFields {
                name: name.to_string(),
                address: Some("123/4 ถนนสุขุมวิท แขวงคลองเตย".to_string()),
                phone: None,
                map_link: Some("https://www.google.com/maps?q=13.7,100.5".to_string()),
                description: description.map(str::to_string),
            },
            &format!("https://directory.example.com/biz/{}", name.len()),
        )
    }

    /// Reads a dataset back, checking and stripping the BOM
    fn read_back(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM), "dataset must start with a BOM");

        let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_round_trip_preserves_rows_and_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("yellowpages_กีฬา.csv");
        let records = vec![
            record("สนามกอล์ฟ", "ไดรฟ์กอล์ฟ บางนา", Some("สนามไดรฟ์ 80 ช่อง, เปิดทุกวัน")),
            record("ฟิตเนส", "Fitness \"Prime\"", None),
            record("โยคะ", "Yoga\nStudio", Some("คลาสโยคะร้อน")),
        ];

        let written = write_dataset(&records, &path).unwrap();
        assert_eq!(written, 3);

        let (headers, rows) = read_back(&path);
        assert_eq!(headers, DATASET_COLUMNS.to_vec());
        assert_eq!(rows.len(), 3);

        for (row, record) in rows.iter().zip(&records) {
            let expected: Vec<String> = record.as_row().iter().map(|v| v.to_string()).collect();
            assert_eq!(row, &expected);
        }
        assert_eq!(rows[0][1], "ไดรฟ์กอล์ฟ บางนา");
        assert_eq!(rows[0][3], NO_PHONE);
        assert_eq!(rows[1][1], "Fitness \"Prime\"");
        assert_eq!(rows[2][1], "Yoga\nStudio");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale,content\nthat,is\nlonger,than\nthe,new\nfile,x\n").unwrap();

        write_dataset(&[record("กีฬา", "Court", None)], &path).unwrap();

        let (_, rows) = read_back(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "Court");
    }

    #[test]
    fn test_empty_dataset_has_header_only() {
        let mut buffer = Vec::new();
        let written = write_records(&[], &mut buffer).unwrap();

        assert_eq!(written, 0);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Subcategory,Name,Address,Phone,Map,Description,Profile URL\n"
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let result = write_dataset(&[], &path);
        assert!(matches!(result, Err(GatherError::Io(_))));
    }
}
