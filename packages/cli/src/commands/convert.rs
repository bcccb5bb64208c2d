use super::files::{find_documents, load_document, registry};
use crate::config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use richtext_editor::EditorConfig;
use richtext_html::{to_html, HtmlOptions};
use richtext_model::{to_raw, Document};
use richtext_styles::StyleRegistry;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Html,
    Raw,
}

impl Target {
    fn extension(self) -> &'static str {
        match self {
            Target::Html => "html",
            Target::Raw => "json",
        }
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Document or directory of documents (.html, .htm, .json)
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    pub to: Target,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: PathBuf,

    /// Indent the output
    #[arg(long)]
    pub pretty: bool,

    /// Config file (defaults to richtext.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn convert(args: ConvertArgs, cwd: &Path) -> Result<()> {
    let config = config::load(cwd, args.config.as_deref())?;
    let registry = registry(&config)?;
    let files = find_documents(&args.input)?;

    if files.is_empty() {
        println!("{}", "⚠️  No documents found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "🔨 Converting documents...".bright_blue().bold());
        println!("Found {} files", files.len());
    }

    let base = if args.input.is_dir() {
        args.input.clone()
    } else {
        args.input.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative = file.strip_prefix(&base).unwrap_or(file);
        match convert_file(file, relative, &args, &config, &registry, cwd) {
            Ok(destination) => {
                success_count += 1;
                if !args.stdout {
                    println!("  {} {} → {}", "✓".green(), relative.display(), destination);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} files failed to convert", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!("{} Converted {} files successfully", "✅".green(), success_count);
        Ok(())
    } else {
        println!(
            "{} Converted {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} files failed to convert", error_count))
    }
}

fn convert_file(
    file: &Path,
    relative: &Path,
    args: &ConvertArgs,
    config: &EditorConfig,
    registry: &StyleRegistry,
    cwd: &Path,
) -> Result<String> {
    let (document, warnings) = load_document(file, config, registry)?;
    for warning in &warnings {
        tracing::debug!(file = %file.display(), %warning, "Dropped content");
    }

    let output = render(&document, args.to, args.pretty, registry)?;

    if args.stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let output_file = cwd
        .join(&args.out_dir)
        .join(relative)
        .with_extension(args.to.extension());
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}

pub fn render(
    document: &Document,
    target: Target,
    pretty: bool,
    registry: &StyleRegistry,
) -> Result<String> {
    Ok(match target {
        Target::Html => {
            let options = if pretty {
                HtmlOptions::pretty()
            } else {
                HtmlOptions::default()
            };
            to_html(document, registry, options)
        }
        Target::Raw if pretty => to_raw(document).to_json_pretty()?,
        Target::Raw => to_raw(document).to_json()?,
    })
}
