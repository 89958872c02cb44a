//! Configuration loading and management.

use crate::cli::Args;
use cml_transform::{CompileOptions, StyleConfig, Target};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a JSON config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    /// Target platform identifier.
    pub target: Option<String>,
    /// Style options passed to the style proxy and normalizer.
    pub cmss: Option<StyleConfig>,
    /// File extensions to compile, with the leading dot.
    pub extensions: Option<Vec<String>>,
    /// Ignore patterns (glob).
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid config {}", path.display()))
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files and directories to compile.
    pub inputs: Vec<PathBuf>,
    pub options: CompileOptions,
    /// File extensions to process.
    pub extensions: Vec<String>,
    /// Ignore patterns.
    pub ignore_patterns: Vec<String>,
    ignore: GlobSet,
}

impl Config {
    /// Load configuration from CLI arguments and the optional config file.
    /// Flags win over file values.
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(args, file)
    }

    fn resolve(args: &Args, file: ConfigFile) -> Result<Self> {
        let target = args
            .target
            .clone()
            .or(file.target)
            .ok_or_else(|| miette::miette!("No target platform given; pass --target or set \"target\" in the config file"))?;
        let target: Target = target.parse().into_diagnostic()?;

        let extensions = file
            .extensions
            .unwrap_or_else(|| vec![".cml".to_string(), ".html".to_string()]);

        let mut ignore_patterns = vec![
            "**/node_modules/**".to_string(),
            "**/dist/**".to_string(),
            "**/.git/**".to_string(),
        ];
        ignore_patterns.extend(file.ignore);
        ignore_patterns.extend(args.ignore.iter().cloned());

        let mut builder = GlobSetBuilder::new();
        for pattern in &ignore_patterns {
            let glob = Glob::new(pattern)
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid ignore pattern `{}`", pattern))?;
            builder.add(glob);
        }
        let ignore = builder.build().into_diagnostic()?;

        Ok(Self {
            inputs: args.inputs.clone(),
            options: CompileOptions {
                target,
                style: file.cmss,
            },
            extensions,
            ignore_patterns,
            ignore,
        })
    }

    /// Check if a file should be processed.
    pub fn should_process(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        if !self.extensions.iter().any(|e| e == &ext) {
            return false;
        }

        !self.ignore.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("cml-tpl").chain(extra.iter().copied()))
    }

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "target": "alipay",
                "cmss": {{ "rem": true, "remOptions": {{ "rootValue": 75 }} }},
                "extensions": [".cml"],
                "ignore": ["**/legacy/**"]
            }}"#
        )
        .unwrap();

        let config = Config::load(&args(&["--config", file.path().to_str().unwrap()])).unwrap();
        assert_eq!(config.options.target, Target::Alipay);
        let style = config.options.style.unwrap();
        assert!(style.rem_enabled());
        assert_eq!(style.root_value(), 75.0);
        assert_eq!(config.extensions, vec![".cml".to_string()]);
        assert!(config.ignore_patterns.contains(&"**/legacy/**".to_string()));
    }

    #[test]
    fn test_flag_overrides_file_target() {
        let file = ConfigFile {
            target: Some("wx".into()),
            ..Default::default()
        };
        let config = Config::resolve(&args(&["--target", "baidu"]), file).unwrap();
        assert_eq!(config.options.target, Target::Baidu);
    }

    #[test]
    fn test_missing_and_unknown_target() {
        assert!(Config::resolve(&args(&[]), ConfigFile::default()).is_err());
        assert!(Config::resolve(&args(&["--target", "qq"]), ConfigFile::default()).is_err());
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        assert!(serde_json::from_str::<ConfigFile>(r#"{"platform": "wx"}"#).is_err());
    }

    #[test]
    fn test_should_process() {
        let config = Config::resolve(
            &args(&["--target", "web", "--ignore", "**/legacy/**"]),
            ConfigFile::default(),
        )
        .unwrap();
        assert!(config.should_process(Path::new("src/pages/index.cml")));
        assert!(config.should_process(Path::new("src/pages/index.html")));
        assert!(!config.should_process(Path::new("src/pages/index.js")));
        assert!(!config.should_process(Path::new("node_modules/pkg/index.cml")));
        assert!(!config.should_process(Path::new("src/legacy/old.cml")));
    }
}
