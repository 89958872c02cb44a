//! File discovery and parallel compilation.

use crate::cli::Args;
use crate::config::Config;
use crate::output::OutputFormatter;
use cml_transform::{compile, TransformError};
use miette::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files compiled.
    pub file_count: usize,
    /// Number of files that failed.
    pub error_count: usize,
    /// Time taken.
    pub duration_ms: u64,
}

/// Why a single file failed.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] TransformError),
}

impl FileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read(_) => "read-failed",
            Self::Write { .. } => "write-failed",
            Self::Compile(err) => err.code(),
        }
    }
}

/// Where compiled text went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    /// Written to this path under the output directory.
    Written(PathBuf),
    /// Kept for printing.
    Output(String),
}

/// One compiled (or failed) file.
#[derive(Debug)]
pub struct CompiledFile {
    pub path: PathBuf,
    /// Template source; empty when it could not be read.
    pub source: String,
    pub outcome: Result<Emitted, FileError>,
}

/// A file to compile and the input root it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Input {
    path: PathBuf,
    root: PathBuf,
}

/// Runs one compilation of every input.
pub struct Runner {
    config: Config,
    out_dir: Option<PathBuf>,
    formatter: OutputFormatter,
}

impl Runner {
    pub fn new(args: &Args) -> Result<Self> {
        let config = Config::load(args)?;
        tracing::debug!(
            extensions = ?config.extensions,
            ignore = ?config.ignore_patterns,
            "loaded config"
        );
        Ok(Self {
            config,
            out_dir: args.out_dir.clone(),
            formatter: OutputFormatter::new(args.output),
        })
    }

    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();

        let inputs = self.find_inputs();
        tracing::info!(
            files = inputs.len(),
            platform = %self.config.options.target,
            "compiling templates"
        );

        let results: Vec<CompiledFile> = inputs
            .par_iter()
            .map(|input| self.compile_file(input))
            .collect();

        let mut error_count = 0;
        for file in &results {
            if file.outcome.is_err() {
                error_count += 1;
            }
            self.formatter.print_file(file);
        }

        let summary = RunSummary {
            file_count: results.len(),
            error_count,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        self.formatter.print_summary(&summary);
        Ok(summary)
    }

    /// Expand the configured inputs into template files.
    ///
    /// Files named directly are always compiled; directories are walked and
    /// filtered by extension and ignore patterns.
    fn find_inputs(&self) -> Vec<Input> {
        let mut files = Vec::new();

        for input in &self.config.inputs {
            if input.is_file() {
                let root = input.parent().map(Path::to_path_buf).unwrap_or_default();
                files.push(Input {
                    path: input.clone(),
                    root,
                });
                continue;
            }

            for entry in walkdir::WalkDir::new(input)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_dir() || !self.config.should_process(path) {
                    continue;
                }
                files.push(Input {
                    path: path.to_path_buf(),
                    root: input.clone(),
                });
            }
        }

        files
    }

    fn compile_file(&self, input: &Input) -> CompiledFile {
        let source = match std::fs::read_to_string(&input.path) {
            Ok(source) => source,
            Err(err) => {
                return CompiledFile {
                    path: input.path.clone(),
                    source: String::new(),
                    outcome: Err(FileError::Read(err)),
                }
            }
        };

        let outcome = compile(&source, &self.config.options)
            .map_err(FileError::from)
            .and_then(|compiled| self.emit(input, compiled));
        if let Err(err) = &outcome {
            tracing::debug!(file = %input.path.display(), code = err.code(), "compile failed");
        }

        CompiledFile {
            path: input.path.clone(),
            source,
            outcome,
        }
    }

    fn emit(&self, input: &Input, compiled: String) -> Result<Emitted, FileError> {
        let Some(out_dir) = &self.out_dir else {
            return Ok(Emitted::Output(compiled));
        };

        let relative = input
            .path
            .strip_prefix(&input.root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| input.path.file_name().map(PathBuf::from))
            .unwrap_or_else(|| input.path.clone());
        let target = out_dir.join(relative);

        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, compiled.as_bytes())
        };
        write(&target).map_err(|source| FileError::Write {
            path: target.clone(),
            source,
        })?;
        Ok(Emitted::Written(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn runner(extra: &[&str]) -> Runner {
        let args = Args::parse_from(std::iter::once("cml-tpl").chain(extra.iter().copied()));
        Runner::new(&args).unwrap()
    }

    #[test]
    fn test_compile_directory_into_out_dir() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("pages")).unwrap();
        std::fs::write(src.path().join("pages/index.cml"), r#"<view v-if="ok"></view>"#).unwrap();
        std::fs::write(src.path().join("readme.md"), "# not a template").unwrap();

        let runner = runner(&[
            src.path().to_str().unwrap(),
            "--target",
            "wx",
            "--out-dir",
            out.path().to_str().unwrap(),
            "--output",
            "json",
        ]);
        let summary = runner.run().unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.error_count, 0);

        let compiled = std::fs::read_to_string(out.path().join("pages/index.cml")).unwrap();
        assert_eq!(compiled, r#"<view wx:if="{{ok}}" class=" cml-base cml-view"></view>"#);
    }

    #[test]
    fn test_failed_file_is_counted() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("good.cml"), "<view></view>").unwrap();
        std::fs::write(src.path().join("bad.cml"), "<view v-else></view>").unwrap();

        let runner = runner(&[src.path().to_str().unwrap(), "--target", "baidu", "--output", "json"]);
        let summary = runner.run().unwrap();
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.error_count, 1);
    }

    #[test]
    fn test_explicit_file_and_ignore() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("legacy")).unwrap();
        std::fs::write(src.path().join("legacy/old.cml"), "<view>").unwrap();
        let file = src.path().join("page.html");
        std::fs::write(&file, "<text></text>").unwrap();

        let runner = runner(&[
            src.path().to_str().unwrap(),
            "--target",
            "web",
            "--ignore",
            "**/legacy/**",
        ]);
        let inputs = runner.find_inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].path, file);

        let compiled = runner.compile_file(&inputs[0]);
        assert_eq!(
            compiled.outcome.unwrap(),
            Emitted::Output(r#"<text class=" cml-base cml-text"></text>"#.to_string())
        );
    }
}
