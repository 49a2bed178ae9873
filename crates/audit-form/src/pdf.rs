use std::io::Write;
use std::path::Path;
use std::process::Command;

use audit_spec::{ExportError, PdfPrinter};
use tracing::{debug, info};

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Prints by running an external HTML to PDF converter.
#[derive(Debug, Clone)]
pub struct CommandPdfPrinter {
    argv: Vec<String>,
}

impl CommandPdfPrinter {
    pub fn new(argv: Vec<String>) -> Result<Self, ExportError> {
        if argv.is_empty() {
            return Err(ExportError::Print("pdf_command is empty".into()));
        }
        if !argv.iter().any(|arg| arg.contains(INPUT_PLACEHOLDER)) {
            return Err(ExportError::Print(format!(
                "pdf_command must reference {INPUT_PLACEHOLDER}"
            )));
        }
        Ok(Self { argv })
    }

    fn command_line(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.argv
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl PdfPrinter for CommandPdfPrinter {
    fn print(&self, html: &str, output: &Path) -> Result<(), ExportError> {
        let mut page = tempfile::Builder::new()
            .prefix("accessibility-report-")
            .suffix(".html")
            .tempfile()
            .map_err(|err| ExportError::io(std::env::temp_dir(), err))?;
        page.write_all(html.as_bytes())
            .and_then(|()| page.flush())
            .map_err(|err| ExportError::io(page.path(), err))?;

        let line = self.command_line(page.path(), output);
        let (program, args) = line
            .split_first()
            .ok_or_else(|| ExportError::Print("pdf_command is empty".into()))?;
        debug!(program = %program, "running pdf converter");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|err| ExportError::Print(format!("failed to start {program}: {err}")))?;
        if !status.success() {
            return Err(ExportError::Print(format!("{program} exited with {status}")));
        }
        info!(output = %output.display(), "printed pdf");
        Ok(())
    }
}
