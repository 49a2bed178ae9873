use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use audit_spec::{
    FsImageSource, HtmlReportRenderer, PdfPrinter, ReportDocument, WidgetPackager, WidgetPosition,
};
use clap::{Args, Subcommand};
use time::OffsetDateTime;
use tracing::info;

use super::Context;
use crate::pdf::CommandPdfPrinter;

#[derive(Subcommand, Debug, Clone)]
pub enum ExportCommand {
    /// Write the printable HTML report
    Html(OutputArgs),
    /// Print the report to PDF with the configured pdf_command
    Pdf(OutputArgs),
    /// Package the report as an embeddable JavaScript widget
    Widget(WidgetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file (defaults to a timestamped file in the output directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct WidgetArgs {
    #[command(flatten)]
    pub output: OutputArgs,
    /// bottom-left, bottom-center, bottom-right or manual
    #[arg(long)]
    pub position: Option<WidgetPosition>,
}

pub fn run(ctx: &Context, command: ExportCommand) -> Result<()> {
    let document = ctx
        .session
        .build_report(&FsImageSource, ctx.config.gallery_cap())?;

    let written = match command {
        ExportCommand::Html(args) => {
            let path = output_path(ctx, args.output, "AccessibilityReport", "html");
            let html = render_html(&document)?;
            write(&path, &html)?;
            path
        }
        ExportCommand::Pdf(args) => {
            let argv = ctx.config.pdf_command.clone().ok_or_else(|| {
                anyhow!("no pdf_command configured; set it in config.toml or use `export html`")
            })?;
            let path = output_path(ctx, args.output, "AccessibilityForm", "pdf");
            let html = render_html(&document)?;
            CommandPdfPrinter::new(argv)?.print(&html, &path)?;
            path
        }
        ExportCommand::Widget(args) => {
            let position = args
                .position
                .unwrap_or_else(|| ctx.config.widget_position());
            let path = output_path(ctx, args.output.output, "AccessibilityWidget", "js");
            let script = WidgetPackager::new()?.package(&document, position)?;
            write(&path, &script)?;
            path
        }
    };

    info!(path = %written.display(), "export written");
    println!("{}", written.display());
    Ok(())
}

fn render_html(document: &ReportDocument) -> Result<String> {
    Ok(HtmlReportRenderer::new()?.render(document)?)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn output_path(ctx: &Context, explicit: Option<PathBuf>, stem: &str, extension: &str) -> PathBuf {
    explicit.unwrap_or_else(|| {
        ctx.config
            .output_dir()
            .join(timestamped_name(stem, extension, OffsetDateTime::now_utc()))
    })
}

/// `{stem}-{unix millis}.{extension}`.
pub fn timestamped_name(stem: &str, extension: &str, at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("{stem}-{millis}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn names_use_unix_milliseconds() {
        let at = datetime!(2026-10-15 12:00:00.250 UTC);
        assert_eq!(
            timestamped_name("AccessibilityForm", "pdf", at),
            "AccessibilityForm-1792065600250.pdf"
        );
    }
}
