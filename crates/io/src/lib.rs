// File I/O operations

pub mod atomic;
pub mod decisions;
pub mod json;
pub mod source;

pub use decisions::FileBackend;
pub use source::{load_claims, load_posts, SourceError, SourceKind};
