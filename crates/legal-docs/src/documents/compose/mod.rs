//! Narrative composer: record in, [`DocumentIr`] out.
//!
//! Every conditional clause (caution fee, additional terms, installment
//! language, default clause) is decided here and nowhere else, so the Word,
//! PDF, print and preview outputs cannot drift apart.

mod tenancy;
mod vehicle;

pub use tenancy::compose_tenancy;
pub use vehicle::compose_vehicle_transfer;

use super::derived::{contact_suffix, display_name};
use super::domain::{AgreementRecord, DocumentKind};
use super::ir::{Block, DocumentIr, Heading, Section, SignatoryGroup, SignatureBlock};

pub fn compose(record: &AgreementRecord) -> DocumentIr {
    match record {
        AgreementRecord::Tenancy(record) => compose_tenancy(record),
        AgreementRecord::VehicleTransfer(record) => compose_vehicle_transfer(record),
    }
}

/// Accumulates sections and hands out contiguous heading numbers, so a
/// skipped optional section never leaves a gap.
struct DocumentBuilder {
    kind: DocumentKind,
    sections: Vec<Section>,
    signatures: Vec<SignatureBlock>,
    next_number: u32,
}

impl DocumentBuilder {
    fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            sections: Vec::new(),
            signatures: Vec::new(),
            next_number: 1,
        }
    }

    fn preamble(&mut self, text: String) {
        self.sections.push(Section {
            heading: None,
            body: vec![Block::Paragraph { text }],
        });
    }

    /// Appends a numbered section and returns the number it received.
    fn numbered(&mut self, title: &str, body: Vec<Block>) -> u32 {
        let number = self.next_number;
        self.next_number += 1;
        self.sections.push(Section {
            heading: Some(Heading {
                number: Some(number),
                text: title.to_string(),
            }),
            body,
        });
        number
    }

    fn unnumbered(&mut self, title: &str, body: Vec<Block>) {
        self.sections.push(Section {
            heading: Some(Heading {
                number: None,
                text: title.to_string(),
            }),
            body,
        });
    }

    fn signatory(
        &mut self,
        group: SignatoryGroup,
        role: impl Into<String>,
        name: &str,
        phone: &str,
        disclose: bool,
    ) {
        self.signatures.push(SignatureBlock {
            group,
            role: role.into(),
            name: display_name(name).to_string(),
            contact: contact_suffix(name, phone, disclose),
        });
    }

    fn finish(self) -> DocumentIr {
        DocumentIr {
            kind: self.kind,
            title: self.kind.title().to_string(),
            sections: self.sections,
            signatures: self.signatures,
        }
    }
}

fn paragraph(text: impl Into<String>) -> Block {
    Block::Paragraph { text: text.into() }
}
