//! Live preview model: the IR as a flat list of styled elements the form UI
//! can draw without parsing any markup.

use serde::Serialize;

use crate::documents::domain::DocumentKind;
use crate::documents::ir::{DocumentIr, TextRole};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub elements: Vec<PreviewElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewElement {
    pub role: TextRole,
    pub class_name: &'static str,
    pub text: String,
}

fn class_name(role: TextRole) -> &'static str {
    match role {
        TextRole::Title => "text-center text-xl font-bold mb-6",
        TextRole::Heading => "font-bold mt-4 mb-2",
        TextRole::Paragraph => "text-justify mb-3",
        TextRole::Clause => "ml-4 mb-1",
        TextRole::SignatureHeading => "font-bold mt-8 mb-4",
        TextRole::SignatureRole => "font-bold",
        TextRole::SignatureName => "mb-1",
        TextRole::SignatureLine => "mt-4 mb-6",
    }
}

pub fn render_preview(ir: &DocumentIr) -> PreviewDocument {
    PreviewDocument {
        kind: ir.kind,
        title: ir.title.clone(),
        elements: ir
            .styled_lines()
            .into_iter()
            .map(|line| PreviewElement {
                role: line.role,
                class_name: class_name(line.role),
                text: line.text,
            })
            .collect(),
    }
}

impl PreviewDocument {
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .map(|element| element.text.as_str())
            .collect()
    }
}
