use anyhow::{anyhow, Context, Result};
use richtext_editor::EditorConfig;
use richtext_html::{ConversionWarning, HtmlImporter};
use richtext_model::{from_raw, Document, RawDocument};
use richtext_styles::StyleRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input document encoding, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Html,
    Raw,
}

impl SourceKind {
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("html" | "htm") => Some(SourceKind::Html),
            Some("json") => Some(SourceKind::Raw),
            _ => None,
        }
    }
}

/// Every convertible file under `path` (or `path` itself)
pub fn find_documents(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", path.display()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && SourceKind::of(p).is_some())
        .collect();
    files.sort();
    Ok(files)
}

pub fn registry(config: &EditorConfig) -> Result<StyleRegistry> {
    StyleRegistry::new(config.style_vocabulary(), &config.enabled_families())
        .map_err(|e| anyhow!("Invalid style vocabulary: {}", e))
}

/// Read and decode one document
pub fn load_document(
    path: &Path,
    config: &EditorConfig,
    registry: &StyleRegistry,
) -> Result<(Document, Vec<ConversionWarning>)> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;

    match SourceKind::of(path) {
        Some(SourceKind::Html) => {
            let importer = HtmlImporter::new(registry).with_media(config.media.filter());
            Ok(importer.parse_document(&source))
        }
        Some(SourceKind::Raw) => {
            let raw = RawDocument::from_json(&source)
                .with_context(|| format!("Invalid raw document {}", path.display()))?;
            Ok((from_raw(&raw)?, Vec::new()))
        }
        None => Err(anyhow!("Unsupported file type: {}", path.display())),
    }
}
