// Record source: posts.json and claims.json
//
// A missing or malformed document is a load failure for the whole session.
// Inside a well-formed array, bad records are dropped one at a time.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use claimdesk_review::{parse_claims, Claim, Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Posts,
    Claims,
}

impl SourceKind {
    /// User-facing message for a missing document.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Self::Posts => "No posts data found. Run collection first.",
            Self::Claims => "No claims data found. Run extraction first.",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posts => write!(f, "posts"),
            Self::Claims => write!(f, "claims"),
        }
    }
}

#[derive(Debug)]
pub enum SourceError {
    /// Document does not exist.
    Missing { kind: SourceKind, path: PathBuf },
    /// Document exists but could not be read.
    Unreadable { kind: SourceKind, path: PathBuf, message: String },
    /// Document is not a JSON array.
    Malformed { kind: SourceKind, path: PathBuf, message: String },
}

impl SourceError {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Missing { kind, .. }
            | Self::Unreadable { kind, .. }
            | Self::Malformed { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { kind, path } => {
                write!(f, "{} ({} not found)", kind.missing_message(), path.display())
            }
            Self::Unreadable { kind, path, message } => {
                write!(f, "cannot read {kind} from {}: {message}", path.display())
            }
            Self::Malformed { kind, path, message } => {
                write!(f, "{} is not a valid {kind} document: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {}

fn read_array(path: &Path, kind: SourceKind) -> Result<Vec<Value>, SourceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SourceError::Missing { kind, path: path.to_path_buf() })
        }
        Err(e) => {
            return Err(SourceError::Unreadable {
                kind,
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    serde_json::from_str::<Vec<Value>>(&content).map_err(|e| SourceError::Malformed {
        kind,
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn load_claims(path: &Path) -> Result<Vec<Claim>, SourceError> {
    let values = read_array(path, SourceKind::Claims)?;
    let (claims, dropped) = parse_claims(values);
    for err in &dropped {
        log::warn!("{}: skipping claim {err}", path.display());
    }
    log::debug!("loaded {} claims from {}", claims.len(), path.display());
    Ok(claims)
}

pub fn load_posts(path: &Path) -> Result<Vec<Post>, SourceError> {
    let values = read_array(path, SourceKind::Posts)?;
    let mut posts = Vec::with_capacity(values.len());
    for (position, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Post>(value) {
            Ok(post) => posts.push(post),
            Err(e) => log::warn!("{}: skipping post {position}: {e}", path.display()),
        }
    }
    log::debug!("loaded {} posts from {}", posts.len(), path.display());
    Ok(posts)
}
