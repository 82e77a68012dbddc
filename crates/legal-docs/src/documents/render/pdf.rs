//! A4 PDF laid out directly from the IR. DejaVu Serif is embedded as a pair
//! of Type0 fonts with Identity-H encoding, so the cedi sign and the Akan
//! letters (Ɔ, Ɛ, ɔ, ɛ) print as written. Each font carries a ToUnicode map
//! and text extracted from the file matches the document text.

use std::collections::HashMap;
use std::fmt::Write as _;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use ttf_parser::{Face, GlyphId};

use super::RenderError;
use crate::documents::ir::{DocumentIr, TextRole};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
/// 15mm.
const MARGIN: f32 = 42.5;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const LINE_SPACING: f32 = 1.5;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

static REGULAR_TTF: &[u8] = include_bytes!("../../../fonts/DejaVuSerif.ttf");
static BOLD_TTF: &[u8] = include_bytes!("../../../fonts/DejaVuSerif-Bold.ttf");

/// bfchar entries per block; a CMap block may hold at most 100.
const CMAP_CHUNK: usize = 100;

struct Faces {
    regular: Face<'static>,
    bold: Face<'static>,
}

impl Faces {
    fn load() -> Result<Self, RenderError> {
        Ok(Self {
            regular: Face::parse(REGULAR_TTF, 0)?,
            bold: Face::parse(BOLD_TTF, 0)?,
        })
    }

    fn pick(&self, bold: bool) -> &Face<'static> {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

/// Advance of `ch` in font units. Characters the face lacks take the width
/// of `.notdef`.
fn advance(face: &Face<'_>, ch: char) -> u16 {
    let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
    face.glyph_hor_advance(glyph).unwrap_or(0)
}

fn text_width(face: &Face<'_>, text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(advance(face, ch))).sum();
    units as f32 * size / f32::from(face.units_per_em())
}

/// Scales font units to the 1/1000 em glyph space PDF metrics use.
fn to_glyph_space(face: &Face<'_>, value: i32) -> i64 {
    i64::from(value) * 1000 / i64::from(face.units_per_em())
}

/// Two-byte character codes shared by both faces. Code 0 stays `.notdef`;
/// every other character gets the next free code the first time it is laid
/// out.
#[derive(Default)]
struct CharCodes {
    chars: Vec<char>,
    codes: HashMap<char, u16>,
}

impl CharCodes {
    fn code(&mut self, ch: char) -> u16 {
        if let Some(code) = self.codes.get(&ch) {
            return *code;
        }
        match u16::try_from(self.chars.len() + 1) {
            Ok(code) => {
                self.chars.push(ch);
                self.codes.insert(ch, code);
                code
            }
            Err(_) => 0,
        }
    }

    fn encode(&mut self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.code(ch).to_be_bytes())
            .collect()
    }

    /// Glyph id for every code, in code order, as the big-endian stream a
    /// `CIDToGIDMap` expects.
    fn cid_to_gid(&self, face: &Face<'_>) -> Vec<u8> {
        let mut map = vec![0, 0];
        for ch in &self.chars {
            let glyph = face.glyph_index(*ch).unwrap_or(GlyphId(0));
            map.extend_from_slice(&glyph.0.to_be_bytes());
        }
        map
    }

    fn widths(&self, face: &Face<'_>) -> Object {
        let widths = self
            .chars
            .iter()
            .map(|ch| Object::Integer(to_glyph_space(face, i32::from(advance(face, *ch)))))
            .collect();
        Object::Array(vec![Object::Integer(1), Object::Array(widths)])
    }

    fn to_unicode(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );
        for (chunk_index, chunk) in self.chars.chunks(CMAP_CHUNK).enumerate() {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for (offset, ch) in chunk.iter().enumerate() {
                let code = chunk_index * CMAP_CHUNK + offset + 1;
                let mut units = [0u16; 2];
                let utf16: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{unit:04X}"))
                    .collect();
                let _ = writeln!(cmap, "<{code:04X}> <{utf16}>");
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }
}

struct LineStyle {
    size: f32,
    bold: bool,
    centered: bool,
    space_before: f32,
    space_after: f32,
}

fn style_for(role: TextRole) -> LineStyle {
    let body = LineStyle {
        size: 11.0,
        bold: role.is_bold(),
        centered: false,
        space_before: 0.0,
        space_after: 2.0,
    };
    match role {
        TextRole::Title => LineStyle {
            size: 14.0,
            centered: true,
            space_after: 14.0,
            ..body
        },
        TextRole::Heading => LineStyle {
            space_before: 10.0,
            space_after: 4.0,
            ..body
        },
        TextRole::Paragraph => LineStyle {
            space_after: 7.0,
            ..body
        },
        TextRole::SignatureHeading => LineStyle {
            space_before: 20.0,
            space_after: 8.0,
            ..body
        },
        TextRole::SignatureLine => LineStyle {
            space_before: 8.0,
            space_after: 12.0,
            ..body
        },
        TextRole::Clause | TextRole::SignatureRole | TextRole::SignatureName => body,
    }
}

/// Content operations for each page, filled top to bottom.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    cursor: f32,
    codes: CharCodes,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
            codes: CharCodes::default(),
        }
    }

    fn break_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            self.break_page();
        }
    }

    fn gap(&mut self, height: f32) {
        if self.cursor < PAGE_HEIGHT - MARGIN {
            self.cursor -= height;
        }
    }

    fn text_line(&mut self, text: &str, face: &Face<'_>, style: &LineStyle) {
        let leading = style.size * LINE_SPACING;
        self.ensure_room(leading);

        let x = if style.centered {
            ((PAGE_WIDTH - text_width(face, text, style.size)) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        let baseline = self.cursor - style.size;
        let font = if style.bold { BOLD } else { REGULAR };
        let encoded = self.codes.encode(text);
        if encoded.is_empty() {
            self.cursor -= leading;
            return;
        }

        if let Some(page) = self.pages.last_mut() {
            page.extend([
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(font.as_bytes().to_vec()), Object::Real(style.size)],
                ),
                Operation::new("Td", vec![Object::Real(x), Object::Real(baseline)]),
                Operation::new("Tj", vec![Object::String(encoded, StringFormat::Hexadecimal)]),
                Operation::new("ET", vec![]),
            ]);
        }
        self.cursor -= leading;
    }
}

pub fn render_pdf(ir: &DocumentIr) -> Result<Vec<u8>, RenderError> {
    let faces = Faces::load()?;
    let mut layout = PageLayout::new();

    for line in ir.styled_lines() {
        let style = style_for(line.role);
        let face = faces.pick(style.bold);
        layout.gap(style.space_before);
        if matches!(line.role, TextRole::Heading | TextRole::SignatureHeading) {
            // keep a heading with at least two lines of what follows
            layout.ensure_room(style.size * LINE_SPACING * 3.0);
        }
        for wrapped in wrap(&line.text, face, style.size) {
            layout.text_line(&wrapped, face, &style);
        }
        layout.gap(style.space_after);
    }

    assemble(layout.pages, &layout.codes, &faces)
}

fn assemble(
    pages: Vec<Vec<Operation>>,
    codes: &CharCodes,
    faces: &Faces,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut to_unicode = Stream::new(Dictionary::new(), codes.to_unicode());
    to_unicode.compress()?;
    let to_unicode_id = doc.add_object(to_unicode);

    let regular = embed_font(
        &mut doc,
        "DejaVuSerif",
        &faces.regular,
        REGULAR_TTF,
        codes,
        to_unicode_id,
    )?;
    let bold = embed_font(
        &mut doc,
        "DejaVuSerif-Bold",
        &faces.bold,
        BOLD_TTF,
        codes,
        to_unicode_id,
    )?;
    let fonts = Dictionary::from_iter(vec![
        (REGULAR, Object::Reference(regular)),
        (BOLD, Object::Reference(bold)),
    ]);
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(fonts),
    )]));

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let mut stream = Stream::new(Dictionary::new(), content.encode()?);
        stream.compress()?;
        let content_id = doc.add_object(stream);
        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
        ("Resources", Object::Reference(resources_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ]),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Adds a Type0 font over one embedded TrueType face and returns its id.
fn embed_font(
    doc: &mut Document,
    base_font: &str,
    face: &Face<'_>,
    program: &[u8],
    codes: &CharCodes,
    to_unicode_id: ObjectId,
) -> Result<ObjectId, RenderError> {
    let name = || Object::Name(base_font.as_bytes().to_vec());

    let mut file = Stream::new(
        Dictionary::from_iter(vec![("Length1", Object::Integer(program.len() as i64))]),
        program.to_vec(),
    );
    file.compress()?;
    let file_id = doc.add_object(file);

    let bbox = face.global_bounding_box();
    let notdef_width = face.glyph_hor_advance(GlyphId(0)).unwrap_or(0);
    let scaled = |value: i32| Object::Integer(to_glyph_space(face, value));
    let descriptor_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"FontDescriptor".to_vec())),
        ("FontName", name()),
        // serif, non-symbolic
        ("Flags", Object::Integer(34)),
        (
            "FontBBox",
            Object::Array(vec![
                scaled(bbox.x_min.into()),
                scaled(bbox.y_min.into()),
                scaled(bbox.x_max.into()),
                scaled(bbox.y_max.into()),
            ]),
        ),
        ("ItalicAngle", Object::Integer(0)),
        ("Ascent", scaled(face.ascender().into())),
        ("Descent", scaled(face.descender().into())),
        (
            "CapHeight",
            scaled(face.capital_height().unwrap_or(face.ascender()).into()),
        ),
        ("StemV", Object::Integer(80)),
        ("FontFile2", Object::Reference(file_id)),
    ]));

    let mut gid_map = Stream::new(Dictionary::new(), codes.cid_to_gid(face));
    gid_map.compress()?;
    let gid_map_id = doc.add_object(gid_map);

    let descendant_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"CIDFontType2".to_vec())),
        ("BaseFont", name()),
        (
            "CIDSystemInfo",
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Registry", Object::string_literal("Adobe")),
                ("Ordering", Object::string_literal("Identity")),
                ("Supplement", Object::Integer(0)),
            ])),
        ),
        ("FontDescriptor", Object::Reference(descriptor_id)),
        ("DW", scaled(notdef_width.into())),
        ("W", codes.widths(face)),
        ("CIDToGIDMap", Object::Reference(gid_map_id)),
    ]));

    Ok(doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type0".to_vec())),
        ("BaseFont", name()),
        ("Encoding", Object::Name(b"Identity-H".to_vec())),
        (
            "DescendantFonts",
            Object::Array(vec![Object::Reference(descendant_id)]),
        ),
        ("ToUnicode", Object::Reference(to_unicode_id)),
    ])))
}

/// Greedy word wrap to the text column. Only the single space at each break
/// is dropped, so joining the lines with spaces gives back the input. A word
/// wider than the column is split at the last character that fits.
fn wrap(text: &str, face: &Face<'_>, size: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width(face, candidate, size) <= TEXT_WIDTH;
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for word in text.split(' ') {
        let candidate = match &current {
            Some(line) => format!("{line} {word}"),
            None => word.to_string(),
        };
        if fits(&candidate) {
            current = Some(candidate);
            continue;
        }
        if let Some(line) = current.take() {
            lines.push(line);
        }

        let mut rest = word;
        while !fits(rest) {
            let split = rest
                .char_indices()
                .map(|(index, _)| index)
                .skip(1)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .find(|end| fits(&rest[..*end]))
                .or_else(|| rest.chars().next().map(char::len_utf8))
                .unwrap_or(rest.len());
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
        }
        current = Some(rest.to_string());
    }

    lines.extend(current);
    lines
}
