use chrono::NaiveDate;
use legal_docs::documents::{AgreementRecord, DocumentKind, ExportFormat};
use legal_docs::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_kind(raw: &str) -> Result<DocumentKind, String> {
    DocumentKind::from_slug(raw)
        .ok_or_else(|| format!("unknown document kind '{raw}' (expected tenancy or vehicle-transfer)"))
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse::<ExportFormat>().map_err(|err| err.to_string())
}

/// Reads a record body from `path`, or from stdin when no path is given.
pub(crate) fn read_record(kind: DocumentKind, path: Option<&Path>) -> Result<AgreementRecord, AppError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(AgreementRecord::from_json_value(kind, value)?)
}

/// Overrides the agreement date on either record kind.
pub(crate) fn stamp_agreement_date(record: &mut AgreementRecord, date: NaiveDate) {
    let stamped = date.format("%Y-%m-%d").to_string();
    match record {
        AgreementRecord::Tenancy(record) => record.date_of_agreement = stamped,
        AgreementRecord::VehicleTransfer(record) => record.date_of_agreement = stamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legal_docs::documents::TenancyRecord;

    #[test]
    fn parsers_report_readable_errors() {
        assert!(parse_date("2025-13-01").is_err());
        assert_eq!(parse_kind("Tenancy"), Ok(DocumentKind::Tenancy));
        assert!(parse_kind("lease").unwrap_err().contains("unknown document kind"));
        assert_eq!(parse_format("pdf"), Ok(ExportFormat::Pdf));
        assert!(parse_format("rtf").is_err());
    }

    #[test]
    fn stamping_overrides_agreement_date() {
        let mut record = AgreementRecord::Tenancy(TenancyRecord::default());
        let date = parse_date("2025-06-03").expect("valid date");
        stamp_agreement_date(&mut record, date);
        match record {
            AgreementRecord::Tenancy(record) => assert_eq!(record.date_of_agreement, "2025-06-03"),
            AgreementRecord::VehicleTransfer(_) => panic!("kind changed"),
        }
    }

    #[test]
    fn read_record_parses_file_body() {
        let path = std::env::temp_dir().join(format!(
            "legal-docs-api-record-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"buyerName": "Efua", "totalPrice": 1000}"#).expect("write");

        let record = read_record(DocumentKind::VehicleTransfer, Some(&path)).expect("record");
        assert_eq!(record.primary_party(), "Efua");

        let _ = std::fs::remove_file(path);
    }
}
