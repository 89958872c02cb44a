//! Output formatting for compiled templates and errors.

use crate::cli::OutputFormat;
use crate::runner::{CompiledFile, Emitted, FileError, RunSummary};
use cml_markup::{LineCol, LineIndex};

/// Formatter for run output.
pub struct OutputFormatter {
    format: OutputFormat,
}

/// 1-based position of a failure inside its source, if it has one.
pub fn error_location(source: &str, error: &FileError) -> Option<LineCol> {
    let FileError::Compile(err) = error else {
        return None;
    };
    let span = err.span()?;
    if source.is_empty() {
        return None;
    }
    Some(LineIndex::new(source).line_col(span.start))
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the outcome of one file.
    pub fn print_file(&self, file: &CompiledFile) {
        match self.format {
            OutputFormat::Human => self.print_file_human(file),
            OutputFormat::Json => println!("{}", file_json(file)),
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, summary: &RunSummary) {
        match self.format {
            OutputFormat::Human => print_summary_human(summary),
            OutputFormat::Json => println!("{}", summary_json(summary)),
        }
    }

    // Human format

    fn print_file_human(&self, file: &CompiledFile) {
        match &file.outcome {
            Ok(Emitted::Written(target)) => {
                eprintln!("{} -> {}", file.path.display(), target.display());
            }
            Ok(Emitted::Output(compiled)) => {
                println!("{}", compiled);
            }
            Err(err) => {
                let location = match error_location(&file.source, err) {
                    Some(pos) => format!("{}:{}:{}", file.path.display(), pos.line, pos.col),
                    None => file.path.display().to_string(),
                };
                eprintln!(
                    "{}: \x1b[31merror\x1b[0m[{}]: {}",
                    location,
                    err.code(),
                    err
                );
            }
        }
    }
}

fn print_summary_human(summary: &RunSummary) {
    eprintln!();
    if summary.error_count == 0 {
        eprintln!(
            "\x1b[32m✓\x1b[0m Compiled {} file{} ({}ms)",
            summary.file_count,
            if summary.file_count == 1 { "" } else { "s" },
            summary.duration_ms
        );
    } else {
        eprintln!(
            "\x1b[31m✗\x1b[0m {} of {} file{} failed",
            summary.error_count,
            summary.file_count,
            if summary.file_count == 1 { "" } else { "s" }
        );
    }
}

// JSON format

fn file_json(file: &CompiledFile) -> serde_json::Value {
    let path = file.path.to_string_lossy();
    match &file.outcome {
        Ok(Emitted::Written(target)) => serde_json::json!({
            "type": "file",
            "file": path,
            "written": target.to_string_lossy(),
        }),
        Ok(Emitted::Output(compiled)) => serde_json::json!({
            "type": "file",
            "file": path,
            "output": compiled,
        }),
        Err(err) => {
            let location = error_location(&file.source, err);
            serde_json::json!({
                "type": "error",
                "file": path,
                "code": err.code(),
                "message": err.to_string(),
                "line": location.map(|pos| pos.line),
                "column": location.map(|pos| pos.col),
            })
        }
    }
}

fn summary_json(summary: &RunSummary) -> serde_json::Value {
    serde_json::json!({
        "type": "summary",
        "files": summary.file_count,
        "errors": summary.error_count,
        "duration_ms": summary.duration_ms,
    })
}
