// JSON export of verified claims

use std::path::Path;

use claimdesk_review::export::{render, VerifiedClaim};

use crate::atomic::write_atomic;

/// Write the verified-claims document to `path`.
/// The file is replaced atomically, so a failed export leaves the previous one intact.
pub fn write_verified(path: &Path, verified: &[VerifiedClaim]) -> Result<(), String> {
    let document = render(verified).map_err(|e| e.to_string())?;
    write_atomic(path, &document).map_err(|e| format!("{}: {e}", path.display()))?;
    log::info!("exported {} verified claims to {}", verified.len(), path.display());
    Ok(())
}
