use crate::infra::{parse_date, parse_format, parse_kind, read_record, stamp_agreement_date};
use chrono::NaiveDate;
use clap::Args;
use legal_docs::config::AppConfig;
use legal_docs::documents::clauses::clause_library;
use legal_docs::documents::{compose, export, DocumentKind, ExportFormat};
use legal_docs::error::AppError;
use std::io::Write;
use std::path::PathBuf;
use tracing::error;

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Agreement kind: tenancy or vehicle-transfer
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: DocumentKind,
    /// JSON record to render (reads stdin when omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Output format: docx, pdf or print
    #[arg(long, value_parser = parse_format, default_value = "pdf")]
    pub(crate) format: ExportFormat,
    /// Directory for the generated file (defaults to APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
    /// Override the agreement date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_of_agreement: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Agreement kind: tenancy or vehicle-transfer
    #[arg(long, value_parser = parse_kind)]
    pub(crate) kind: DocumentKind,
    /// JSON record to preview (reads stdin when omitted)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

pub(crate) fn run_render(args: RenderArgs) -> Result<(), AppError> {
    let RenderArgs {
        kind,
        input,
        format,
        out_dir,
        date_of_agreement,
    } = args;

    let mut record = read_record(kind, input.as_deref())?;
    if let Some(date) = date_of_agreement {
        stamp_agreement_date(&mut record, date);
    }

    // users see `AppError`'s short message; the cause only goes to the log
    let artifact = export(&record, format).inspect_err(|err| {
        error!(kind = kind.slug(), %format, error = %err, "document export failed");
    })?;

    // print output is meant for a browser, never a file on disk
    if format == ExportFormat::Print {
        std::io::stdout().write_all(&artifact.bytes)?;
        return Ok(());
    }

    let out_dir = match out_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.storage.export_dir,
    };
    let path = artifact.persist(&out_dir).inspect_err(|err| {
        error!(dir = %out_dir.display(), error = %err, "failed to save export");
    })?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let record = read_record(args.kind, args.input.as_deref())?;
    println!("{}", compose(&record).plain_text());
    Ok(())
}

pub(crate) fn run_clauses() -> Result<(), AppError> {
    for category in clause_library() {
        println!("{}", category.name);
        for (index, clause) in category.clauses.iter().enumerate() {
            println!("  {}. {}", index + 1, clause);
        }
        println!();
    }
    Ok(())
}
