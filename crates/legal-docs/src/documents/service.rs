use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tracing::{error, info};

use super::clauses::{clause_library, ClauseCategory};
use super::compose::compose;
use super::domain::{AgreementRecord, DocumentKind};
use super::drafts::{DraftError, DraftRepository};
use super::export::{export, ExportArtifact, ExportError, ExportFormat};
use super::ir::DocumentIr;
use super::render::{render_preview, PreviewDocument};

/// Everything the form needs to redraw its preview pane.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPreview {
    pub document: DocumentIr,
    pub preview: PreviewDocument,
    pub text: String,
}

/// Coordinates previews, exports and drafts for the HTTP layer and the CLI.
pub struct DocumentService<D> {
    drafts: D,
    pending_exports: AtomicUsize,
}

/// Counts an export as in flight for as long as it is alive, so the counter
/// returns to its previous value on success, failure or panic alike.
struct PendingExport<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> PendingExport<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for PendingExport<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<D> DocumentService<D>
where
    D: DraftRepository,
{
    pub fn new(drafts: D) -> Self {
        Self {
            drafts,
            pending_exports: AtomicUsize::new(0),
        }
    }

    pub fn drafts(&self) -> &D {
        &self.drafts
    }

    pub fn preview(&self, record: &AgreementRecord) -> DocumentPreview {
        let document = compose(record);
        let preview = render_preview(&document);
        let text = document.plain_text();
        DocumentPreview {
            document,
            preview,
            text,
        }
    }

    /// Renders the record. Failures are logged with their cause; callers show
    /// [`ExportError::user_message`] instead.
    pub fn export(
        &self,
        record: &AgreementRecord,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        let _pending = PendingExport::begin(&self.pending_exports);
        let kind = record.kind();

        match export(record, format) {
            Ok(artifact) => {
                info!(
                    kind = kind.slug(),
                    %format,
                    filename = %artifact.filename,
                    bytes = artifact.bytes.len(),
                    "document exported"
                );
                Ok(artifact)
            }
            Err(err) => {
                error!(kind = kind.slug(), %format, error = %err, "document export failed");
                Err(err)
            }
        }
    }

    pub fn pending_exports(&self) -> usize {
        self.pending_exports.load(Ordering::SeqCst)
    }

    pub fn load_draft(&self, kind: DocumentKind) -> Result<Option<AgreementRecord>, DraftError> {
        self.drafts.load(kind)
    }

    pub fn save_draft(&self, record: &AgreementRecord) -> Result<(), DraftError> {
        let kind = record.kind();
        self.drafts.save(kind, record).map_err(|err| {
            error!(kind = kind.slug(), error = %err, "failed to save draft");
            err
        })?;
        info!(kind = kind.slug(), "draft saved");
        Ok(())
    }

    pub fn clear_draft(&self, kind: DocumentKind) -> Result<(), DraftError> {
        self.drafts.clear(kind)?;
        info!(kind = kind.slug(), "draft cleared");
        Ok(())
    }

    pub fn clause_library(&self) -> &'static [ClauseCategory] {
        clause_library()
    }
}
