use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::detect::DetectionRule;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize telemetry records into one canonical schema", long_about = None)]
pub struct Args {
    /// `truthy` (a truthy `device` key means format B) or `strict`
    #[arg(long, default_value = "truthy")]
    pub rule: DetectionRule,

    #[arg(short, long, default_value = "stdout")]
    pub output: String,

    /// JSON documents, or `.jsonl`/`.ndjson` files with one record per line
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long, default_value = "100000")]
    pub batch_size: usize,

    /// Compare every converted record against the canonical record(s) in FILE
    #[arg(long, value_name = "FILE")]
    pub expect: Option<PathBuf>,

    /// Stop at the first record that fails to convert
    #[arg(long)]
    pub fail_fast: bool,

    #[arg(long)]
    pub benchmark: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rule: DetectionRule,
    pub output: String,
    pub files: Vec<PathBuf>,
    pub batch_size: usize,
    pub expect: Option<PathBuf>,
    pub fail_fast: bool,
    pub benchmark: bool,
}

impl RunConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        if args.batch_size == 0 {
            bail!("--batch-size must be at least 1");
        }
        if let Some(missing) = args.files.iter().find(|f| !f.is_file()) {
            bail!("input file not found: {}", missing.display());
        }
        Ok(Self {
            rule: args.rule,
            output: args.output,
            files: args.files,
            batch_size: args.batch_size,
            expect: args.expect,
            fail_fast: args.fail_fast,
            benchmark: args.benchmark,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = Args::try_parse_from(["telenorm", file.path().to_str().unwrap()]).unwrap();
        let config = RunConfig::from_args(args).unwrap();
        assert_eq!(config.rule, DetectionRule::Truthy);
        assert_eq!(config.output, "stdout");
        assert!(!config.fail_fast);
    }

    #[test]
    fn rule_flag_is_parsed() {
        let args = Args::try_parse_from(["telenorm", "--rule", "strict", "in.json"]).unwrap();
        assert_eq!(args.rule, DetectionRule::Strict);
        assert!(Args::try_parse_from(["telenorm", "--rule", "loose", "in.json"]).is_err());
    }

    #[test]
    fn rejects_zero_batch_and_missing_files() {
        let args = Args::try_parse_from(["telenorm", "--batch-size", "0", "in.json"]).unwrap();
        assert!(RunConfig::from_args(args).is_err());
        let args = Args::try_parse_from(["telenorm", "/definitely/not/here.json"]).unwrap();
        assert!(RunConfig::from_args(args).is_err());
    }

    #[test]
    fn requires_an_input() {
        assert!(Args::try_parse_from(["telenorm"]).is_err());
    }
}
