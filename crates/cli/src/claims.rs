//! `claimdesk claims` - review buckets, decisions and the verified export.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use serde_json::{json, Value};

use claimdesk_io::json::write_verified;
use claimdesk_io::FileBackend;
use claimdesk_review::classify::bucket_for;
use claimdesk_review::export::render;
use claimdesk_review::thresholds::percent;
use claimdesk_review::{Bucket, ClaimIdentity, Decision, ReviewClaim, ReviewSession};

use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum ClaimsCommands {
    /// List claims grouped by review bucket
    #[command(after_help = "\
Examples:
  claimdesk claims list
  claimdesk claims list --bucket needs-review
  claimdesk claims list --json")]
    List {
        /// Only show one bucket
        #[arg(long)]
        bucket: Option<BucketArg>,

        #[arg(long)]
        json: bool,
    },

    /// Counts per bucket and per human decision
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Accept a claim
    #[command(after_help = "\
Examples:
  claimdesk claims accept 1890001 1
  claimdesk claims accept fb_pfbid_77 0 --note \"matches the official filing\"")]
    Accept {
        post_id: String,
        index: usize,

        /// Reviewer note stored with the decision
        #[arg(long)]
        note: Option<String>,
    },

    /// Reject a claim
    Reject {
        post_id: String,
        index: usize,

        #[arg(long)]
        note: Option<String>,
    },

    /// Set reviewer notes without changing the decision
    Note {
        post_id: String,
        index: usize,
        text: String,
    },

    /// Write verified_claims.json (auto-accepted and accepted claims)
    #[command(after_help = "\
Examples:
  claimdesk claims export
  claimdesk claims export --output out/verified.json
  claimdesk claims export --stdout | jq length")]
    Export {
        /// Output file (default from profile or settings)
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write the document to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BucketArg {
    NeedsReview,
    AutoAccepted,
    AutoRejected,
}

impl From<BucketArg> for Bucket {
    fn from(arg: BucketArg) -> Self {
        match arg {
            BucketArg::NeedsReview => Bucket::NeedsReview,
            BucketArg::AutoAccepted => Bucket::AutoAccepted,
            BucketArg::AutoRejected => Bucket::AutoRejected,
        }
    }
}

pub fn cmd_claims(ctx: &Context, cmd: ClaimsCommands) -> Result<(), CliError> {
    match cmd {
        ClaimsCommands::List { bucket, json } => cmd_list(ctx, bucket.map(Bucket::from), json),
        ClaimsCommands::Summary { json } => cmd_summary(ctx, json),
        ClaimsCommands::Accept { post_id, index, note } => {
            cmd_decide(ctx, identity(post_id, index)?, Decision::Accepted, note)
        }
        ClaimsCommands::Reject { post_id, index, note } => {
            cmd_decide(ctx, identity(post_id, index)?, Decision::Rejected, note)
        }
        ClaimsCommands::Note { post_id, index, text } => {
            cmd_note(ctx, identity(post_id, index)?, text)
        }
        ClaimsCommands::Export { output, stdout } => cmd_export(ctx, output, stdout),
    }
}

fn identity(post_id: String, index: usize) -> Result<ClaimIdentity, CliError> {
    if post_id.trim().is_empty() {
        return Err(CliError::args("post id must not be empty"));
    }
    Ok(ClaimIdentity::new(post_id, index))
}

/// The store keeps running in memory when its file cannot be written;
/// tell the user their change was not saved.
fn warn_if_degraded(session: &ReviewSession<FileBackend>) {
    if session.store().is_degraded() {
        eprintln!(
            "warning: could not write {}; this change was not saved",
            session.store().backend().path().display()
        );
    }
}

// ============================================================================
// list
// ============================================================================

fn claim_json(ctx: &Context, session: &ReviewSession<FileBackend>, rc: &ReviewClaim) -> Value {
    let record = session.store().get(&rc.identity);
    let confidence = rc.claim.display_confidence();
    json!({
        "id": rc.identity.to_string(),
        "post_id": rc.identity.post_id,
        "index": rc.identity.index,
        "bucket": bucket_for(&rc.claim, record),
        "status": session.effective_status(rc),
        "confidence": rc.claim.confidence,
        "band": ctx.thresholds.band(confidence).as_str(),
        "platform": rc.claim.platform,
        "category": rc.claim.category,
        "claim_text": rc.claim.claim_text,
        "notes": record.map(|r| r.notes.as_str()).unwrap_or(""),
    })
}

fn print_claim(ctx: &Context, session: &ReviewSession<FileBackend>, rc: &ReviewClaim) {
    let confidence = rc.claim.display_confidence();
    println!(
        "  {:<20} {:<13} {:>3}% {:<6} {:<10} {}",
        rc.identity.to_string(),
        session.effective_status(rc).as_str(),
        percent(confidence),
        ctx.thresholds.band(confidence).as_str(),
        rc.claim.platform.label(),
        rc.claim.claim_text,
    );
    if let Some(record) = session.store().get(&rc.identity) {
        if !record.notes.is_empty() {
            println!("  {:<20} note: {}", "", record.notes);
        }
    }
}

fn cmd_list(ctx: &Context, only: Option<Bucket>, json: bool) -> Result<(), CliError> {
    let session = ctx.open_session()?;

    if json {
        let items: Vec<Value> = match only {
            Some(bucket) => session
                .bucket(bucket)
                .into_iter()
                .map(|rc| claim_json(ctx, &session, rc))
                .collect(),
            None => session
                .claims()
                .iter()
                .map(|rc| claim_json(ctx, &session, rc))
                .collect(),
        };
        let out = serde_json::to_string_pretty(&items).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    let buckets = session.partition();
    let shown: Vec<Bucket> = match only {
        Some(bucket) => vec![bucket],
        None => Bucket::ALL.to_vec(),
    };
    for (i, bucket) in shown.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let members = buckets.get(*bucket);
        println!("{} ({})", bucket.label(), members.len());
        if members.is_empty() {
            println!("  (none)");
        }
        for rc in members {
            print_claim(ctx, &session, rc);
        }
    }

    if only.is_none() && buckets.placed() < session.claims().len() {
        println!();
        println!("Unclassified ({})", session.claims().len() - buckets.placed());
        for rc in session.claims() {
            if bucket_for(&rc.claim, session.store().get(&rc.identity)).is_none() {
                print_claim(ctx, &session, rc);
            }
        }
    }
    Ok(())
}

// ============================================================================
// summary
// ============================================================================

fn cmd_summary(ctx: &Context, json: bool) -> Result<(), CliError> {
    let session = ctx.open_session()?;
    let summary = session.summary();

    if json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("Claims:          {}", summary.total);
    println!("Needs review:    {}", summary.needs_review);
    println!("Auto-accepted:   {}", summary.auto_accepted);
    println!("Auto-rejected:   {}", summary.auto_rejected);
    println!("Human accepted:  {}", summary.human_accepted);
    println!("Human rejected:  {}", summary.human_rejected);
    if summary.unclassified > 0 {
        println!("Unclassified:    {}", summary.unclassified);
    }
    Ok(())
}

// ============================================================================
// accept / reject / note
// ============================================================================

fn cmd_decide(
    ctx: &Context,
    id: ClaimIdentity,
    decision: Decision,
    note: Option<String>,
) -> Result<(), CliError> {
    let mut session = ctx.open_session()?;
    if let Some(note) = note {
        session.record_notes(&id, note).map_err(CliError::review)?;
    }
    session
        .record_decision(&id, decision, Utc::now())
        .map_err(CliError::review)?;
    warn_if_degraded(&session);

    println!("{}: {}", id, decision);
    Ok(())
}

fn cmd_note(ctx: &Context, id: ClaimIdentity, text: String) -> Result<(), CliError> {
    let mut session = ctx.open_session()?;
    session.record_notes(&id, text).map_err(CliError::review)?;
    warn_if_degraded(&session);

    println!("{}: note saved", id);
    Ok(())
}

// ============================================================================
// export
// ============================================================================

fn cmd_export(ctx: &Context, output: Option<PathBuf>, stdout: bool) -> Result<(), CliError> {
    let session = ctx.open_session()?;
    let verified = session.export_verified();

    if stdout {
        let document = render(&verified).map_err(CliError::review)?;
        println!("{}", document);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| ctx.paths.export.clone());
    write_verified(&path, &verified).map_err(CliError::export)?;
    println!("Exported {} verified claims to {}", verified.len(), path.display());
    Ok(())
}
