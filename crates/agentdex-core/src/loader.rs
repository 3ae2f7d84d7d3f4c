use crate::error::{AgentdexError, ParseError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// A markdown file read from a collection directory, still undecoded.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SourceDocument {
    /// Build a document from in-memory text, stamped with the current time.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        let now = Utc::now();
        Self {
            path: path.into(),
            bytes: text.as_bytes().to_vec(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.bytes.clone()).map_err(AgentdexError::InvalidUtf8)
    }

    pub fn stem(&self) -> String {
        paths::file_stem(&self.path)
    }
}

/// Documents read from one collection plus the files that could not be read.
#[derive(Debug, Default)]
pub struct LoadedCollection {
    pub documents: Vec<SourceDocument>,
    pub errors: Vec<ParseError>,
}

/// Read every `*.md` file directly inside `dir`, in file-name order.
///
/// A missing or unreadable directory is logged and yields an empty
/// collection. Entries or files that fail to read become `ParseError`s.
pub fn load_collection(dir: &Path) -> LoadedCollection {
    let mut loaded = LoadedCollection::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable collection");
            return loaded;
        }
    };

    let (mut files, unreadable) = markdown_files(dir, entries.map(|e| e.map(|e| e.path())));
    loaded.errors.extend(unreadable);
    files.sort();

    for path in files {
        match read_document(&path) {
            Ok(Some(doc)) => loaded.documents.push(doc),
            Ok(None) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read document");
                loaded.errors.push(ParseError::new(&path, &e));
            }
        }
    }

    debug!(
        dir = %dir.display(),
        documents = loaded.documents.len(),
        errors = loaded.errors.len(),
        "loaded collection"
    );
    loaded
}

/// Split directory entries into markdown paths and entries that could not
/// be listed.
fn markdown_files(
    dir: &Path,
    entries: impl Iterator<Item = std::io::Result<PathBuf>>,
) -> (Vec<PathBuf>, Vec<ParseError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if paths::is_markdown(&path) => files.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                errors.push(ParseError::new(dir, &AgentdexError::from(e)));
            }
        }
    }
    (files, errors)
}

/// Returns `Ok(None)` for entries that are not regular files.
fn read_document(path: &Path) -> Result<Option<SourceDocument>> {
    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    let updated = meta.modified()?;
    let created = meta.created().unwrap_or(updated);
    Ok(Some(SourceDocument {
        path: path.to_path_buf(),
        bytes,
        created_at: to_utc(created),
        updated_at: to_utc(updated),
    }))
}

fn to_utc(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
