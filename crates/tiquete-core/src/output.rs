//! Receipt record serialization and output file naming.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::Result;
use crate::models::config::OutputConfig;
use crate::models::receipt::ReceiptRecord;

/// File name for a record: `<prefix>[_<invoice>].<extension>`.
///
/// Spaces in the invoice number become underscores; an empty invoice number
/// leaves just the prefix.
pub fn output_file_name(record: &ReceiptRecord, config: &OutputConfig) -> String {
    let invoice = record.invoice_number.replace(' ', "_");
    if invoice.is_empty() {
        format!("{}.{}", config.file_prefix, config.extension)
    } else {
        format!("{}_{}.{}", config.file_prefix, invoice, config.extension)
    }
}

/// Serialize a record as pretty JSON indented by `indent` spaces.
pub fn to_json(record: &ReceiptRecord, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Parse a record previously written by [`to_json`].
pub fn from_json(json: &str) -> serde_json::Result<ReceiptRecord> {
    serde_json::from_str(json)
}

/// Write a record into the configured output directory.
pub fn write_record(record: &ReceiptRecord, config: &OutputConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.directory)?;
    let path = config.directory.join(output_file_name(record, config));
    std::fs::write(&path, to_json(record, config.indent)?)?;
    debug!("Wrote receipt to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::LineItem;
    use pretty_assertions::assert_eq;

    fn record(invoice_number: &str) -> ReceiptRecord {
        ReceiptRecord {
            date: "03/02/2021".to_string(),
            store_address: "SUPER AHORRO\nAV CENTRAL 12".to_string(),
            invoice_number: invoice_number.to_string(),
            subtotal: 2000,
            total: 1500,
            line_items: vec![
                LineItem {
                    sku: 7441001234567,
                    description: "ARROZ 1KG".to_string(),
                    total: 1200,
                    tax_code: "G".to_string(),
                },
                LineItem {
                    sku: 7441009876543,
                    description: "FRIJOL ROJO".to_string(),
                    total: 800,
                    tax_code: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_output_file_name() {
        let config = OutputConfig::default();

        assert_eq!(output_file_name(&record("00045"), &config), "sample_00045.json");
        assert_eq!(output_file_name(&record("001 234"), &config), "sample_001_234.json");
        assert_eq!(output_file_name(&record(""), &config), "sample.json");
    }

    #[test]
    fn test_output_file_name_custom_prefix() {
        let config = OutputConfig {
            file_prefix: "ticket".to_string(),
            extension: "txt".to_string(),
            ..OutputConfig::default()
        };
        assert_eq!(output_file_name(&record("9"), &config), "ticket_9.txt");
    }

    #[test]
    fn test_json_round_trip_preserves_items() {
        let original = record("00045");
        let json = to_json(&original, 4).unwrap();

        assert!(json.starts_with("{\n    \"date\": \"03/02/2021\""));
        assert_eq!(from_json(&json).unwrap(), original);
    }

    #[test]
    fn test_write_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().join("out"),
            ..OutputConfig::default()
        };

        let path = write_record(&record("00045"), &config).unwrap();

        assert_eq!(path, dir.path().join("out").join("sample_00045.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(from_json(&written).unwrap(), record("00045"));
    }
}
