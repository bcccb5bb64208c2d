//! Replays a script of editing steps through a live editor
//!
//! The host loop waits on input delays and the debounce deadline at the same
//! time, the way an interactive surface drives the editor.

use crate::config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use richtext_editor::{
    sleep_until_deadline, Content, Editor, Handled, InitialContent, ReturnModifiers, Subscriber,
};
use richtext_model::{BlockType, Selection, StyleTag};
use serde::Deserialize;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON file holding a list of steps
    pub script: PathBuf,

    /// Start from this document instead of the configured initial content
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Config file (defaults to richtext.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// One scripted input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Insert { text: String },
    Toggle { style: String },
    Select { block: usize, start: usize, end: usize },
    Paste {
        html: Option<String>,
        #[serde(default)]
        text: String,
    },
    Key { command: String },
    Return {
        #[serde(default)]
        shift: bool,
    },
    BlockType {
        #[serde(rename = "type")]
        block_type: String,
    },
    Undo,
    Redo,
    Wait { ms: u64 },
}

pub fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let mut config = config::load(cwd, args.config.as_deref())?;
    if let Some(path) = &args.document {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        config.initial_content = Some(InitialContent::Html(source));
    }

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read {}", args.script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid script {}", args.script.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(Editor::new(config)?, steps))
}

async fn run(mut editor: Editor, steps: Vec<Step>) -> Result<()> {
    let emissions = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&emissions);
    editor.subscribe(Subscriber::new().on_change(move |content| {
        counter.set(counter.get() + 1);
        let body = match content {
            Content::Html(html) => html.clone(),
            Content::Raw(raw) => raw.to_json().unwrap_or_default(),
        };
        println!("{} {}", format!("change #{}", counter.get()).cyan().bold(), body);
    }));

    println!("▶️  {} {} steps", "Replaying".green().bold(), steps.len());

    for (index, step) in steps.into_iter().enumerate() {
        match step {
            Step::Wait { ms } => wait(&mut editor, Duration::from_millis(ms)).await,
            step => {
                let handled = apply(&mut editor, &step)?;
                let marker = if handled.is_handled() {
                    "✓".green()
                } else {
                    "–".dimmed()
                };
                println!("  {} {:>3} {:?}", marker, index + 1, step);
            }
        }
    }

    // Let the last burst settle
    if editor.deadline().is_some() {
        sleep_until_deadline(editor.deadline()).await;
        editor.flush_due();
    }

    println!();
    println!(
        "✨ {} {} notifications",
        "Done".green().bold(),
        emissions.get()
    );
    Ok(())
}

/// Idle for `duration`, firing debounced notifications as they come due
async fn wait(editor: &mut Editor, duration: Duration) {
    let until = tokio::time::Instant::now() + duration;
    loop {
        tokio::select! {
            _ = sleep_until_deadline(editor.deadline()) => {
                editor.flush_due();
            }
            _ = tokio::time::sleep_until(until) => break,
        }
    }
}

fn apply(editor: &mut Editor, step: &Step) -> Result<Handled> {
    Ok(match step {
        Step::Insert { text } => {
            editor.insert_text(text);
            Handled::Yes
        }
        Step::Toggle { style } => editor.toggle_style(&StyleTag::new(style.as_str())),
        Step::Select { block, start, end } => {
            let key = editor
                .state()
                .document()
                .blocks()
                .get(*block)
                .map(|b| b.key().clone())
                .ok_or_else(|| anyhow!("No block at index {}", block))?;
            editor.set_selection(Selection::within(key, *start, *end));
            Handled::Yes
        }
        Step::Paste { html, text } => editor.handle_pasted_text(text, html.as_deref()),
        Step::Key { command } => editor.handle_key_command(command),
        Step::Return { shift } => editor.handle_return(ReturnModifiers { shift: *shift }),
        Step::BlockType { block_type } => {
            editor.toggle_block_type(&BlockType::from_name(block_type))
        }
        Step::Undo => editor.undo().into(),
        Step::Redo => editor.redo().into(),
        Step::Wait { .. } => Handled::No,
    })
}
