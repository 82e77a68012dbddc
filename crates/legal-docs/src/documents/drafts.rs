//! Draft persistence, one slot per document kind under `legal_doc_draft_{kind}`.
//!
//! A failed save leaves whatever was stored before untouched.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::domain::{AgreementRecord, DocumentKind};

/// Storage abstraction so the document service can be exercised in isolation.
pub trait DraftRepository: Send + Sync {
    fn load(&self, kind: DocumentKind) -> Result<Option<AgreementRecord>, DraftError>;
    fn save(&self, kind: DocumentKind, record: &AgreementRecord) -> Result<(), DraftError>;
    /// Removes the stored draft. Clearing an empty slot is not an error.
    fn clear(&self, kind: DocumentKind) -> Result<(), DraftError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft storage failed: {0}")]
    Io(#[from] io::Error),
    #[error("draft is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("draft slot {expected:?} cannot hold a {actual:?} record")]
    KindMismatch {
        expected: DocumentKind,
        actual: DocumentKind,
    },
    #[error("draft storage unavailable: {0}")]
    Unavailable(String),
}

fn ensure_kind(kind: DocumentKind, record: &AgreementRecord) -> Result<(), DraftError> {
    if record.kind() == kind {
        Ok(())
    } else {
        Err(DraftError::KindMismatch {
            expected: kind,
            actual: record.kind(),
        })
    }
}

/// JSON files in one directory. Writes go to a sibling temp file first and
/// are renamed over the draft, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FileDraftRepository {
    root: PathBuf,
}

impl FileDraftRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: DocumentKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.draft_key()))
    }
}

impl DraftRepository for FileDraftRepository {
    fn load(&self, kind: DocumentKind) -> Result<Option<AgreementRecord>, DraftError> {
        let raw = match fs::read(self.path_for(kind)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value: serde_json::Value = serde_json::from_slice(&raw)?;
        Ok(Some(AgreementRecord::from_json_value(kind, value)?))
    }

    fn save(&self, kind: DocumentKind, record: &AgreementRecord) -> Result<(), DraftError> {
        ensure_kind(kind, record)?;
        let body = serde_json::to_vec_pretty(&record.to_json_value()?)?;

        fs::create_dir_all(&self.root)?;
        let target = self.path_for(kind);
        let staging = target.with_extension("json.tmp");

        let written = fs::File::create(&staging).and_then(|mut file| {
            file.write_all(&body)?;
            file.sync_all()
        });
        let result = written.and_then(|()| fs::rename(&staging, &target));
        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result?;

        tracing::debug!(kind = kind.slug(), path = %target.display(), "draft saved");
        Ok(())
    }

    fn clear(&self, kind: DocumentKind) -> Result<(), DraftError> {
        match fs::remove_file(self.path_for(kind)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryDraftRepository {
    drafts: Arc<Mutex<HashMap<DocumentKind, AgreementRecord>>>,
}

impl InMemoryDraftRepository {
    fn with_drafts<T>(
        &self,
        action: impl FnOnce(&mut HashMap<DocumentKind, AgreementRecord>) -> T,
    ) -> Result<T, DraftError> {
        let mut guard = self
            .drafts
            .lock()
            .map_err(|_| DraftError::Unavailable("draft mutex poisoned".to_string()))?;
        Ok(action(&mut guard))
    }
}

impl DraftRepository for InMemoryDraftRepository {
    fn load(&self, kind: DocumentKind) -> Result<Option<AgreementRecord>, DraftError> {
        self.with_drafts(|drafts| drafts.get(&kind).cloned())
    }

    fn save(&self, kind: DocumentKind, record: &AgreementRecord) -> Result<(), DraftError> {
        ensure_kind(kind, record)?;
        self.with_drafts(|drafts| {
            drafts.insert(kind, record.clone());
        })
    }

    fn clear(&self, kind: DocumentKind) -> Result<(), DraftError> {
        self.with_drafts(|drafts| {
            drafts.remove(&kind);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::domain::{TenancyRecord, VehicleTransferRecord};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "legal-docs-drafts-{label}-{}-{nanos}",
            std::process::id()
        ))
    }

    fn tenancy(name: &str) -> AgreementRecord {
        AgreementRecord::Tenancy(TenancyRecord {
            tenant_name: name.to_string(),
            ..TenancyRecord::default()
        })
    }

    #[test]
    fn file_repository_round_trips_under_draft_key() {
        let dir = scratch_dir("roundtrip");
        let repository = FileDraftRepository::new(&dir);

        assert!(repository.load(DocumentKind::Tenancy).expect("load").is_none());
        repository
            .save(DocumentKind::Tenancy, &tenancy("Kwame"))
            .expect("save");

        let path = repository.path_for(DocumentKind::Tenancy);
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("legal_doc_draft_tenancy.json")
        );
        let stored: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).expect("draft file")).expect("json");
        assert_eq!(stored["tenantName"], "Kwame");

        let loaded = repository.load(DocumentKind::Tenancy).expect("load");
        assert_eq!(loaded, Some(tenancy("Kwame")));
        assert!(repository
            .load(DocumentKind::VehicleTransfer)
            .expect("load other slot")
            .is_none());

        repository.clear(DocumentKind::Tenancy).expect("clear");
        repository.clear(DocumentKind::Tenancy).expect("clear twice");
        assert!(repository.load(DocumentKind::Tenancy).expect("load").is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn failed_save_keeps_previous_draft() {
        let dir = scratch_dir("failed");
        let repository = FileDraftRepository::new(&dir);
        repository
            .save(DocumentKind::Tenancy, &tenancy("First"))
            .expect("save");

        let staging = repository
            .path_for(DocumentKind::Tenancy)
            .with_extension("json.tmp");
        fs::create_dir_all(&staging).expect("block staging path");

        assert!(repository
            .save(DocumentKind::Tenancy, &tenancy("Second"))
            .is_err());
        assert_eq!(
            repository.load(DocumentKind::Tenancy).expect("load"),
            Some(tenancy("First"))
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let repository = InMemoryDraftRepository::default();
        let record = AgreementRecord::VehicleTransfer(VehicleTransferRecord::default());
        let err = repository
            .save(DocumentKind::Tenancy, &record)
            .expect_err("kind mismatch");
        assert!(matches!(err, DraftError::KindMismatch { .. }));
        assert!(repository.load(DocumentKind::Tenancy).expect("load").is_none());
    }

    #[test]
    fn corrupt_file_reports_serialization_error() {
        let dir = scratch_dir("corrupt");
        let repository = FileDraftRepository::new(&dir);
        fs::create_dir_all(&dir).expect("dir");
        fs::write(repository.path_for(DocumentKind::VehicleTransfer), b"{not json").expect("write");

        let err = repository
            .load(DocumentKind::VehicleTransfer)
            .expect_err("corrupt draft");
        assert!(matches!(err, DraftError::Serialization(_)));

        let _ = fs::remove_dir_all(dir);
    }
}
