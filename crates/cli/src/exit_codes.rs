//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | Posts or claims data missing or unreadable           |
//! | 4    | Claim id not present in the loaded claims            |
//! | 5    | Export file could not be written                     |
//! | 6    | Review profile invalid                               |
//!
//! A decision store that cannot be written is not an error: the command
//! succeeds with a warning on stderr.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// posts.json or claims.json missing, unreadable, or not a JSON array.
pub const EXIT_LOAD_FAILED: u8 = 3;

/// accept/reject/note named a claim that is not in claims.json.
pub const EXIT_UNKNOWN_CLAIM: u8 = 4;

/// verified_claims.json could not be written.
pub const EXIT_EXPORT_FAILED: u8 = 5;

/// --profile file failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 6;
