//! Turns a record into a downloadable artifact in one of the supported formats.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::compose::compose;
use super::derived::is_blank;
use super::domain::AgreementRecord;
use super::render::{render_docx, render_html, render_pdf, HtmlOptions, RenderError};

/// Shown to the user whenever an export fails; the cause goes to the log.
pub const EXPORT_FAILURE_MESSAGE: &str = "Failed to generate document. Please try again.";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Docx,
    Pdf,
    Print,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Print => "html",
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            Self::Docx => DOCX_CONTENT_TYPE
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
            Self::Pdf => mime::APPLICATION_PDF,
            Self::Print => mime::TEXT_HTML_UTF_8,
        }
    }

    pub const fn disposition(self) -> Disposition {
        match self {
            Self::Docx | Self::Pdf => Disposition::Attachment,
            Self::Print => Disposition::Inline,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Print => "print",
        };
        f.write_str(label)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "docx" | "word" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            "print" | "html" => Ok(Self::Print),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Saved as a file by the browser.
    Attachment,
    /// Opened in place; the print page triggers the print dialog itself.
    Inline,
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub content_type: mime::Mime,
    pub disposition: Disposition,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// `filename` carries an ASCII stand-in for older clients; `filename*`
    /// carries the real UTF-8 name, percent-encoded.
    pub fn content_disposition(&self) -> String {
        let kind = match self.disposition {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        };
        let fallback: String = self
            .filename
            .chars()
            .map(|ch| match ch {
                ' '..='~' if ch != '"' && ch != '\\' => ch,
                _ => '_',
            })
            .collect();
        format!(
            "{kind}; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(&self.filename)
        )
    }

    /// Writes the artifact into `dir` and returns the final path.
    ///
    /// Bytes land in a scratch file that is renamed into place once complete.
    /// The scratch file is removed on every failure path. Print output is
    /// only ever shown, never saved.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if self.format == ExportFormat::Print {
            return Err(ExportError::NotPersistable(self.format));
        }

        fs::create_dir_all(dir)?;
        let target = dir.join(&self.filename);
        let scratch = ScratchFile::create(dir.join(format!(".{}.partial", self.filename)))?;
        scratch.write(&self.bytes)?;
        scratch.commit(&target)?;

        tracing::info!(path = %target.display(), bytes = self.bytes.len(), "export written");
        Ok(target)
    }
}

/// Temporary output removed on drop unless committed.
struct ScratchFile {
    path: PathBuf,
    file: Option<fs::File>,
    committed: bool,
}

impl ScratchFile {
    fn create(path: PathBuf) -> io::Result<Self> {
        let file = fs::File::create(&path)?;
        Ok(Self {
            path,
            file: Some(file),
            committed: false,
        })
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = self
            .file
            .as_ref()
            .ok_or_else(|| io::Error::other("scratch file already closed"))?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn commit(mut self, target: &Path) -> io::Result<()> {
        self.file.take();
        fs::rename(&self.path, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("unknown export format `{0}`")]
    UnknownFormat(String),
    #[error("{0} output cannot be saved to disk")]
    NotPersistable(ExportFormat),
    #[error("export task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ExportError {
    /// The message surfaced to users. Unknown formats are caller mistakes and
    /// say so; everything else collapses to the generic failure text.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownFormat(_) | Self::NotPersistable(_) => self.to_string(),
            Self::Render(_) | Self::Io(_) | Self::Task(_) => EXPORT_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// `{file stem}_{tenant or buyer}.{ext}`, with `Draft` standing in for a missing name.
pub fn export_filename(record: &AgreementRecord, format: ExportFormat) -> String {
    let party = record.primary_party();
    let party = if is_blank(party) {
        "Draft".to_string()
    } else {
        sanitize_filename_part(party)
    };
    format!(
        "{}_{}.{}",
        record.kind().file_stem(),
        party,
        format.extension()
    )
}

fn sanitize_filename_part(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "Draft".to_string()
    } else {
        cleaned
    }
}

/// Composes the record and renders it. Each call builds its own output from
/// scratch; nothing is shared between concurrent exports.
pub fn export(record: &AgreementRecord, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    let ir = compose(record);
    let bytes = match format {
        ExportFormat::Docx => render_docx(&ir)?,
        ExportFormat::Pdf => render_pdf(&ir)?,
        ExportFormat::Print => render_html(&ir, HtmlOptions { auto_print: true })?.into_bytes(),
    };

    Ok(ExportArtifact {
        format,
        filename: export_filename(record, format),
        content_type: format.content_type(),
        disposition: format.disposition(),
        bytes,
    })
}
