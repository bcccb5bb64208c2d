use super::files::{find_documents, load_document, registry};
use crate::config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use richtext_editor::EditorConfig;
use richtext_html::{from_html, to_html, HtmlOptions};
use richtext_styles::StyleRegistry;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document or directory of documents to check
    pub input: PathBuf,

    /// Show files without findings too
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Config file (defaults to richtext.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Findings for one document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    /// Content dropped on import
    pub warnings: Vec<String>,
    /// Whether the document survives a trip through HTML unchanged
    pub round_trip: bool,
    pub error: Option<String>,
}

impl FileReport {
    fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.round_trip && self.error.is_none()
    }
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<bool> {
    let config = config::load(cwd, args.config.as_deref())?;
    let registry = registry(&config)?;
    let files = find_documents(&args.input)?;

    let reports: Vec<FileReport> = files
        .iter()
        .map(|file| check_file(file, &config, &registry))
        .collect();

    if args.format == ReportFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(reports.iter().all(|r| r.error.is_none() && r.round_trip));
    }

    println!("🔍 {} Richtext Check", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let mut total_warnings = 0;
    let mut total_errors = 0;

    for report in &reports {
        if report.is_clean() {
            if args.verbose {
                println!("{} {}", "✓".green(), report.file);
            }
            continue;
        }

        println!("{}", report.file.bold());
        if let Some(error) = &report.error {
            total_errors += 1;
            println!("  {} {}", "error:".red().bold(), error);
        }
        if !report.round_trip {
            total_errors += 1;
            println!("  {} content changes when written as HTML", "error:".red().bold());
        }
        for warning in &report.warnings {
            total_warnings += 1;
            println!("  {} {}", "warning:".yellow().bold(), warning);
        }
    }

    println!();
    println!(
        "✨ {} Check complete!",
        if total_errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", reports.len());
    if total_errors > 0 {
        println!("   {} {}", "Errors:".red(), total_errors);
    }
    if total_warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), total_warnings);
    }
    if total_errors == 0 && total_warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    Ok(total_errors == 0)
}

fn check_file(file: &Path, config: &EditorConfig, registry: &StyleRegistry) -> FileReport {
    let name = file.display().to_string();
    match load_document(file, config, registry) {
        Ok((document, warnings)) => {
            let html = to_html(&document, registry, HtmlOptions::default());
            let round_trip = document.content_eq(&from_html(&html, registry));
            FileReport {
                file: name,
                warnings: warnings.iter().map(ToString::to_string).collect(),
                round_trip,
                error: None,
            }
        }
        Err(e) => FileReport {
            file: name,
            warnings: Vec::new(),
            round_trip: false,
            error: Some(format!("{:#}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_report_lists_dropped_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.html");
        fs::write(&file, r#"<p style="margin:0">x <marquee>y</marquee></p>"#).unwrap();
        let config = EditorConfig::default();

        let report = check_file(&file, &config, &registry(&config).unwrap());

        assert!(report.round_trip);
        assert!(report.error.is_none());
        assert_eq!(report.warnings.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_invalid_raw_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, "{ not json").unwrap();
        let config = EditorConfig::default();

        let report = check_file(&file, &config, &registry(&config).unwrap());
        assert!(report.error.is_some());
    }
}
