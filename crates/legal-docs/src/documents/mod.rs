//! Agreement drafting: records in, Word / PDF / print / preview out.
//!
//! The pipeline is `domain` record -> [`compose`] -> [`ir::DocumentIr`] ->
//! one of the [`render`] back ends. [`service`] and [`router`] wrap it for
//! the HTTP API and the CLI.

pub mod clauses;
pub mod compose;
pub mod derived;
pub mod domain;
pub mod drafts;
pub mod export;
pub mod format;
pub mod ir;
pub mod render;
pub mod router;
pub mod service;

pub use compose::{compose, compose_tenancy, compose_vehicle_transfer};
pub use domain::{AgreementRecord, DocumentKind, TenancyRecord, VehicleTransferRecord};
pub use drafts::{DraftError, DraftRepository, FileDraftRepository, InMemoryDraftRepository};
pub use export::{export, ExportArtifact, ExportError, ExportFormat};
pub use ir::DocumentIr;
pub use router::document_router;
pub use service::{DocumentPreview, DocumentService};
