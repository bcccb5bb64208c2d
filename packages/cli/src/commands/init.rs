use crate::config::{default_path, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use richtext_editor::{ContentFormat, EditorConfig};
use richtext_styles::{StyleVocabulary, VocabularyOverrides};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Content format for change notifications (raw, html)
    #[arg(short, long, default_value = "raw")]
    pub format: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = default_path(cwd);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let content_format = match args.format.as_str() {
        "html" => ContentFormat::Html,
        "raw" => ContentFormat::Raw,
        other => return Err(anyhow::anyhow!("Unknown format: {}. Use: raw or html", other)),
    };

    println!("{}", "📝 Writing richtext config...".bright_blue().bold());

    // Spell out the default vocabulary so it can be edited in place
    let defaults = StyleVocabulary::default();
    let config = EditorConfig {
        content_format,
        vocabulary: VocabularyOverrides {
            colors: Some(defaults.colors),
            font_sizes: Some(defaults.font_sizes),
            font_families: Some(defaults.font_families),
        },
        ..EditorConfig::default()
    };

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Edit the vocabulary in {}", DEFAULT_CONFIG_NAME);
    println!("  2. Run: richtext check <documents>");
    println!("  3. Run: richtext convert <documents> --to html");

    Ok(())
}
