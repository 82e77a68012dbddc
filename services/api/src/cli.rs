use crate::commands::{run_clauses, run_preview, run_render, PreviewArgs, RenderArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use legal_docs::config::AppConfig;
use legal_docs::error::AppError;
use legal_docs::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Legal Document Generator",
    about = "Draft Ghanaian tenancy and vehicle transfer agreements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render an agreement from a JSON record to docx, pdf or print HTML
    Render(RenderArgs),
    /// Print the agreement text for a JSON record
    Preview(PreviewArgs),
    /// List the built-in clause library
    Clauses,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Render(args) => {
            init_cli_logging()?;
            run_render(args)
        }
        Command::Preview(args) => {
            init_cli_logging()?;
            run_preview(args)
        }
        Command::Clauses => run_clauses(),
    }
}

fn init_cli_logging() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use legal_docs::documents::{DocumentKind, ExportFormat};

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["legal-docs-api"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn render_arguments_parse() {
        let cli = Cli::try_parse_from([
            "legal-docs-api",
            "render",
            "--kind",
            "vehicle-transfer",
            "--format",
            "docx",
            "--input",
            "record.json",
            "--date-of-agreement",
            "2025-06-03",
        ])
        .expect("parse");

        match cli.command {
            Some(Command::Render(args)) => {
                assert_eq!(args.kind, DocumentKind::VehicleTransfer);
                assert_eq!(args.format, ExportFormat::Docx);
                assert!(args.out_dir.is_none());
                assert_eq!(
                    args.date_of_agreement.map(|date| date.to_string()),
                    Some("2025-06-03".to_string())
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["legal-docs-api", "preview", "--kind", "lease"]).is_err());
    }
}
