//! Format-agnostic document content. The composer builds one [`DocumentIr`]
//! per record and every renderer (and the live preview) walks the same value.

use serde::Serialize;

use super::domain::DocumentKind;

pub const SIGNATURE_LINE: &str = "Signature: ........................................";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentIr {
    pub kind: DocumentKind,
    pub title: String,
    pub sections: Vec<Section>,
    pub signatures: Vec<SignatureBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<Heading>,
    pub body: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub text: String,
}

impl Heading {
    pub fn label(&self) -> String {
        match self.number {
            Some(number) => format!("{number}. {}", self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    Clause { number: u32, text: String },
}

impl Block {
    pub fn text(&self) -> String {
        match self {
            Self::Paragraph { text } => text.clone(),
            Self::Clause { number, text } => format!("{number}. {text}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatoryGroup {
    Parties,
    Witnesses,
}

impl SignatoryGroup {
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Parties => "SIGNATURES",
            Self::Witnesses => "WITNESSES",
        }
    }
}

/// One signing line: who signs, the name as printed, and the optional contact suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub group: SignatoryGroup,
    pub role: String,
    pub name: String,
    pub contact: String,
}

impl SignatureBlock {
    pub fn name_line(&self) -> String {
        format!("{}{}", self.name, self.contact)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Title,
    Heading,
    Paragraph,
    Clause,
    SignatureHeading,
    SignatureRole,
    SignatureName,
    SignatureLine,
}

impl TextRole {
    pub const fn is_bold(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Heading | Self::SignatureHeading | Self::SignatureRole
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledLine {
    pub role: TextRole,
    pub text: String,
}

impl StyledLine {
    fn new(role: TextRole, text: String) -> Self {
        Self { role, text }
    }
}

impl DocumentIr {
    /// Signature blocks grouped in document order, each group with its heading.
    pub fn signature_groups(&self) -> Vec<(SignatoryGroup, Vec<&SignatureBlock>)> {
        let mut groups: Vec<(SignatoryGroup, Vec<&SignatureBlock>)> = Vec::new();
        for block in &self.signatures {
            match groups.last_mut() {
                Some((group, members)) if *group == block.group => members.push(block),
                _ => groups.push((block.group, vec![block])),
            }
        }
        groups
    }

    /// The document flattened to (role, text) lines in reading order. Renderers
    /// apply their own markup per role; the text itself is never re-derived.
    pub fn styled_lines(&self) -> Vec<StyledLine> {
        let mut lines = vec![StyledLine::new(TextRole::Title, self.title.clone())];

        for section in &self.sections {
            if let Some(heading) = &section.heading {
                lines.push(StyledLine::new(TextRole::Heading, heading.label()));
            }
            for block in &section.body {
                let role = match block {
                    Block::Paragraph { .. } => TextRole::Paragraph,
                    Block::Clause { .. } => TextRole::Clause,
                };
                lines.push(StyledLine::new(role, block.text()));
            }
        }

        for (group, blocks) in self.signature_groups() {
            lines.push(StyledLine::new(
                TextRole::SignatureHeading,
                group.heading().to_string(),
            ));
            for block in blocks {
                lines.push(StyledLine::new(TextRole::SignatureRole, block.role.clone()));
                lines.push(StyledLine::new(TextRole::SignatureName, block.name_line()));
                lines.push(StyledLine::new(
                    TextRole::SignatureLine,
                    SIGNATURE_LINE.to_string(),
                ));
            }
        }

        lines
    }

    /// Canonical plain-text lines. Every renderer emits exactly these strings, in this order.
    pub fn text_lines(&self) -> Vec<String> {
        self.styled_lines()
            .into_iter()
            .map(|line| line.text)
            .collect()
    }

    pub fn plain_text(&self) -> String {
        self.text_lines().join("\n")
    }

    pub fn has_section(&self, text: &str) -> bool {
        self.section(text).is_some()
    }

    pub fn section(&self, text: &str) -> Option<&Section> {
        self.sections.iter().find(|section| {
            section
                .heading
                .as_ref()
                .is_some_and(|heading| heading.text == text)
        })
    }
}
