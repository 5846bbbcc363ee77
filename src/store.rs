use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};
use crate::tree::LocaleTree;

/// Locale files in one directory, one `<locale>.json` per language
///
/// ```json
/// {
///     "header": { "title": "Armbian Imager" },
///     "ok": "OK"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
}

impl LocaleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `locale`
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{}.json", locale))
    }

    /// Load and parse the tree for `locale`
    ///
    /// # Errors
    /// - File not found or unreadable
    /// - Invalid JSON
    /// - Root is not an object
    pub fn load(&self, locale: &str) -> SyncResult<LocaleTree> {
        load_tree_from_file(&self.path_for(locale))
    }

    /// Replace the file for `locale` with `tree`
    pub fn save(&self, locale: &str, tree: &LocaleTree) -> SyncResult<()> {
        let path = self.path_for(locale);
        let content = format_tree(tree).map_err(|e| SyncError::json(&path, e))?;
        fs::write(&path, content).map_err(|e| SyncError::io(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Locale codes of every `*.json` file in the directory, sorted
    ///
    /// The filename (without extension) is used as the locale code:
    /// `en.json` -> `"en"`, `zh-hans.json` -> `"zh-hans"`.
    pub fn discover_locales(&self) -> SyncResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(SyncError::io(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| SyncError::io(&self.dir, e))?;

        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SyncError::io(&self.dir, e))?.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => locales.push(stem.to_string()),
                None => warn!("Skipping file with non UTF-8 name: {}", path.display()),
            }
        }

        if locales.is_empty() {
            warn!("No JSON files found in directory {}", self.dir.display());
        }

        locales.sort();
        Ok(locales)
    }
}

/// Load a locale tree from a single JSON file
pub fn load_tree_from_file(path: &Path) -> SyncResult<LocaleTree> {
    let content = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    parse_tree(&content).map_err(|e| match e {
        ParseFailure::Json(source) => SyncError::json(path, source),
        ParseFailure::NotAnObject => SyncError::invalid_tree(path, "root must be an object"),
    })
}

enum ParseFailure {
    Json(serde_json::Error),
    NotAnObject,
}

fn parse_tree(content: &str) -> Result<LocaleTree, ParseFailure> {
    let tree: LocaleTree = serde_json::from_str(content).map_err(ParseFailure::Json)?;
    if !tree.is_node() {
        return Err(ParseFailure::NotAnObject);
    }
    Ok(tree)
}

/// Serialize a tree the way locale files are kept: two-space indentation
/// and a single trailing newline
pub fn format_tree(tree: &LocaleTree) -> Result<String, serde_json::Error> {
    let mut content = serde_json::to_string_pretty(tree)?;
    content.push('\n');
    Ok(content)
}
