//! Loaders for normalized transaction files
//!
//! Two formats carry the canonical transaction shape:
//!
//! - JSON: an array of [`TransactionRecord`] objects
//! - CSV: header `id,date,description,amount,category,account,is_debit`,
//!   with `category` and `is_debit` allowed to be empty
//!
//! Bank-specific layouts and legacy field names belong to whatever produced
//! the file. Every record is normalized into a [`Transaction`] and the first
//! invalid one fails the whole load.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{SavingsSnapshot, Transaction, TransactionRecord};

/// Supported transaction file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} (expected .json or .csv)",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Load transactions from a JSON or CSV file
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let format = FileFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);

    let transactions = match format {
        FileFormat::Json => parse_json(reader)?,
        FileFormat::Csv => parse_csv(reader)?,
    };

    debug!(
        path = %path.display(),
        format = format.as_str(),
        count = transactions.len(),
        "Loaded transactions"
    );
    Ok(transactions)
}

/// Parse a JSON array of transaction records
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let records: Vec<TransactionRecord> = serde_json::from_reader(reader)?;

    let transactions = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            Transaction::try_from(record)
                .map_err(|e| Error::InvalidData(format!("record {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    check_unique_ids(&transactions)?;
    Ok(transactions)
}

/// Parse CSV with the canonical header
///
/// Row numbers in errors count the header as row 1.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();

    for (i, result) in rdr.deserialize::<TransactionRecord>().enumerate() {
        let row = i + 2;
        let record = result.map_err(|e| Error::InvalidData(format!("row {}: {}", row, e)))?;
        let tx = Transaction::try_from(record)
            .map_err(|e| Error::InvalidData(format!("row {}: {}", row, e)))?;
        transactions.push(tx);
    }

    check_unique_ids(&transactions)?;
    Ok(transactions)
}

fn check_unique_ids(transactions: &[Transaction]) -> Result<()> {
    let mut seen = HashSet::with_capacity(transactions.len());
    for tx in transactions {
        if !seen.insert(tx.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "duplicate transaction id: {}",
                tx.id
            )));
        }
    }
    Ok(())
}

/// Load a savings snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<SavingsSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: SavingsSnapshot = serde_json::from_reader(reader)?;

    if !snapshot.latest_net_asset_value.is_finite() {
        return Err(Error::InvalidData(
            "snapshot net asset value is not a finite number".to_string(),
        ));
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNCATEGORIZED;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_csv() {
        let csv = "id,date,description,amount,category,account,is_debit
t1,2024-01-15,NETFLIX.COM,15.99,Entertainment,Visa,true
t2,31/01/2024,Payroll,2500.00,Salary,Checking,false
t3,2024-02-01,Coffee,-4.50,,Checking,";

        let transactions = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 3);

        assert_eq!(transactions[0].description, "NETFLIX.COM");
        assert_eq!(transactions[0].amount, 15.99);
        assert!(transactions[0].is_debit);

        assert_eq!(
            transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert!(!transactions[1].is_debit);

        // Sign decides direction when is_debit is empty
        assert!(transactions[2].is_debit);
        assert_eq!(transactions[2].amount, 4.5);
        assert_eq!(transactions[2].category, UNCATEGORIZED);
    }

    #[test]
    fn test_parse_csv_reports_row() {
        let csv = "id,date,description,amount,category,account,is_debit
t1,2024-01-15,Fine,1.00,Misc,Checking,true
t2,not-a-date,Broken,1.00,Misc,Checking,true";

        let err = parse_csv(csv.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("row 3"), "{}", err);
    }

    #[test]
    fn test_parse_csv_rejects_double_negation() {
        let csv = "id,date,description,amount,category,account,is_debit
t1,2024-01-15,Refund?,-10.00,Misc,Checking,true";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"id": "a", "date": "2024-03-01", "amount": 12.5, "category": "Dining", "is_debit": true},
            {"id": "b", "date": "2024-03-02T09:00:00Z", "amount": -40.0}
        ]"#;

        let transactions = parse_json(json.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].category, "Dining");
        assert_eq!(transactions[0].description, "");
        assert!(transactions[1].is_debit);
        assert_eq!(transactions[1].amount, 40.0);
    }

    #[test]
    fn test_serialized_transactions_reload_with_checks() {
        let tx = Transaction::new("a", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 12.5, true)
            .unwrap()
            .with_account("Visa");
        let json = serde_json::to_string(&[tx.clone()]).unwrap();
        assert_eq!(parse_json(json.as_bytes()).unwrap(), vec![tx]);

        let tampered = json.replace("12.5", "-12.5");
        assert!(matches!(
            parse_json(tampered.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "a", "date": "2024-03-01", "amount": 1.0},
            {"id": "a", "date": "2024-03-02", "amount": 2.0}
        ]"#;
        let err = parse_json(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("tx.JSON")).unwrap(),
            FileFormat::Json
        );
        assert_eq!(
            FileFormat::from_path(Path::new("tx.csv")).unwrap(),
            FileFormat::Csv
        );
        assert!(matches!(
            FileFormat::from_path(Path::new("tx.xlsx")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("transactions")).is_err());
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();

        let tx_path = dir.path().join("transactions.csv");
        std::fs::write(
            &tx_path,
            "id,date,description,amount,category,account,is_debit\nt1,2024-01-15,Rent,1200,Housing,Checking,true\n",
        )
        .unwrap();
        assert_eq!(load_transactions(&tx_path).unwrap().len(), 1);

        let snap_path = dir.path().join("snapshot.json");
        std::fs::write(
            &snap_path,
            r#"{"latest_net_asset_value": 12000.0, "latest_quarter": "Q2 2024"}"#,
        )
        .unwrap();
        let snapshot = load_snapshot(&snap_path).unwrap();
        assert_eq!(snapshot.latest_net_asset_value, 12000.0);
        assert_eq!(snapshot.total_entries, 0);

        assert!(matches!(
            load_transactions(&dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
