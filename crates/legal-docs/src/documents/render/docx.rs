//! Minimal WordprocessingML package: one document part, one styles part.
//! Times New Roman throughout, A4 with 15mm margins.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::RenderError;
use crate::documents::ir::{DocumentIr, TextRole};

const FONT: &str = "Times New Roman";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults>
<w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman" w:cs="Times New Roman"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:rPrDefault>
<w:pPrDefault><w:pPr><w:spacing w:after="200" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>
</w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
</w:styles>"#;

/// Half-points and twentieths of a point, the units WordprocessingML expects.
struct ParagraphStyle {
    size: u32,
    bold: bool,
    centered: bool,
    justified: bool,
    before: u32,
    after: u32,
}

fn style_for(role: TextRole) -> ParagraphStyle {
    let body = ParagraphStyle {
        size: 24,
        bold: role.is_bold(),
        centered: false,
        justified: false,
        before: 0,
        after: 100,
    };
    match role {
        TextRole::Title => ParagraphStyle {
            size: 32,
            centered: true,
            after: 400,
            ..body
        },
        TextRole::Heading => ParagraphStyle {
            before: 300,
            after: 200,
            ..body
        },
        TextRole::Paragraph => ParagraphStyle {
            justified: true,
            after: 300,
            ..body
        },
        TextRole::SignatureHeading => ParagraphStyle {
            before: 400,
            after: 300,
            ..body
        },
        TextRole::SignatureLine => ParagraphStyle { after: 300, ..body },
        TextRole::Clause | TextRole::SignatureRole | TextRole::SignatureName => body,
    }
}

pub fn render_docx(ir: &DocumentIr) -> Result<Vec<u8>, RenderError> {
    let document = document_xml(ir);

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("word/styles.xml", STYLES),
        ("word/document.xml", document.as_str()),
    ] {
        archive.start_file(name, options)?;
        archive.write_all(body.as_bytes())?;
    }

    Ok(archive.finish()?.into_inner())
}

fn document_xml(ir: &DocumentIr) -> String {
    let mut body = String::new();
    for line in ir.styled_lines() {
        body.push_str(&paragraph_xml(&line.text, &style_for(line.role)));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="850" w:right="850" w:bottom="850" w:left="850" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn paragraph_xml(text: &str, style: &ParagraphStyle) -> String {
    let alignment = if style.centered {
        r#"<w:jc w:val="center"/>"#
    } else if style.justified {
        r#"<w:jc w:val="both"/>"#
    } else {
        ""
    };
    let bold = if style.bold { "<w:b/><w:bCs/>" } else { "" };

    format!(
        r#"<w:p><w:pPr><w:spacing w:before="{before}" w:after="{after}"/>{alignment}</w:pPr><w:r><w:rPr><w:rFonts w:ascii="{FONT}" w:hAnsi="{FONT}" w:cs="{FONT}"/>{bold}<w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#,
        before = style.before,
        after = style.after,
        size = style.size,
        text = escape_xml(text),
    )
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
