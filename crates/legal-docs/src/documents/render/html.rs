//! Print-ready HTML. Also the page behind the "print" export, where the
//! browser is asked to open its print dialog once the page loads.

use serde::Serialize;
use tera::{Context, Tera};

use super::RenderError;
use crate::documents::ir::{Block, DocumentIr, SIGNATURE_LINE};

const TEMPLATE_NAME: &str = "agreement.html";
const TEMPLATE: &str = include_str!("../../../templates/agreement.html");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    pub auto_print: bool,
}

#[derive(Serialize)]
struct PageContext<'a> {
    document_label: &'static str,
    title: &'a str,
    sections: Vec<SectionView>,
    signature_groups: Vec<SignatureGroupView<'a>>,
    signature_line: &'static str,
    auto_print: bool,
}

#[derive(Serialize)]
struct SectionView {
    heading: Option<String>,
    blocks: Vec<BlockView>,
}

#[derive(Serialize)]
struct BlockView {
    class: &'static str,
    text: String,
}

#[derive(Serialize)]
struct SignatureGroupView<'a> {
    heading: &'static str,
    blocks: Vec<SignatureView<'a>>,
}

#[derive(Serialize)]
struct SignatureView<'a> {
    role: &'a str,
    name_line: String,
}

pub fn render_html(ir: &DocumentIr, options: HtmlOptions) -> Result<String, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let page = PageContext {
        document_label: ir.kind.label(),
        title: &ir.title,
        sections: ir
            .sections
            .iter()
            .map(|section| SectionView {
                heading: section.heading.as_ref().map(|heading| heading.label()),
                blocks: section
                    .body
                    .iter()
                    .map(|block| BlockView {
                        class: match block {
                            Block::Paragraph { .. } => "paragraph",
                            Block::Clause { .. } => "clause-item",
                        },
                        text: block.text(),
                    })
                    .collect(),
            })
            .collect(),
        signature_groups: ir
            .signature_groups()
            .into_iter()
            .map(|(group, blocks)| SignatureGroupView {
                heading: group.heading(),
                blocks: blocks
                    .into_iter()
                    .map(|block| SignatureView {
                        role: &block.role,
                        name_line: block.name_line(),
                    })
                    .collect(),
            })
            .collect(),
        signature_line: SIGNATURE_LINE,
        auto_print: options.auto_print,
    };

    let context = Context::from_serialize(&page)?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}
