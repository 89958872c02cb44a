//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Compile cml templates for one target platform
#[derive(Parser, Debug, Clone)]
#[command(name = "cml-tpl")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Template files or directories to compile
    #[arg(default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Target platform: web, weex, wx, alipay or baidu
    #[arg(short, long)]
    pub target: Option<String>,

    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write compiled templates here instead of stdout
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Ignore patterns (glob)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for results and errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "cml-tpl",
            "src/pages",
            "--target",
            "wx",
            "--ignore",
            "**/legacy/**",
            "--output",
            "json",
        ]);
        assert_eq!(args.inputs, vec![PathBuf::from("src/pages")]);
        assert_eq!(args.target.as_deref(), Some("wx"));
        assert_eq!(args.ignore, vec!["**/legacy/**".to_string()]);
        assert_eq!(args.output, OutputFormat::Json);
        assert!(!args.verbose);
    }

    #[test]
    fn test_default_input() {
        let args = Args::parse_from(["cml-tpl"]);
        assert_eq!(args.inputs, vec![PathBuf::from(".")]);
        assert_eq!(args.output, OutputFormat::Human);
    }
}
