//! `claimdesk posts` and `claimdesk platforms`.

use chrono::DateTime;
use serde_json::json;

use claimdesk_io::load_posts;
use claimdesk_review::posts::{filter_and_sort, platform_counts, PlatformFilter, PostSort};
use claimdesk_review::Post;

use crate::{CliError, Context};

const TEXT_WIDTH: usize = 60;

/// Calendar date for an RFC 3339 timestamp; other strings pass through.
fn display_date(post: &Post) -> String {
    match post.timestamp.as_deref() {
        None | Some("") => "-".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

fn truncate(text: &str, width: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub fn cmd_posts(
    ctx: &Context,
    platform: &str,
    sort: Option<PostSort>,
    json: bool,
) -> Result<(), CliError> {
    let posts = load_posts(&ctx.paths.posts).map_err(CliError::load)?;
    let filter = PlatformFilter::parse(platform);
    let sort = sort.unwrap_or(ctx.settings.default_sort);
    let shown = filter_and_sort(&posts, &filter, sort);

    if json {
        let out = serde_json::to_string_pretty(&shown).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No posts match.");
        return Ok(());
    }

    println!(
        "{:<10} {:<18} {:<10} {:>7} {:>7} {:>8}  {}",
        "PLATFORM", "AUTHOR", "DATE", "LIKES", "SHARES", "COMMENTS", "TEXT"
    );
    for post in &shown {
        println!(
            "{:<10} {:<18} {:<10} {:>7} {:>7} {:>8}  {}",
            post.platform.label(),
            truncate(&post.author, 18),
            display_date(post),
            post.likes(),
            post.shares(),
            post.comments(),
            truncate(&post.text, TEXT_WIDTH),
        );
    }
    println!();
    println!("{} of {} posts (sorted by {})", shown.len(), posts.len(), sort);
    Ok(())
}

pub fn cmd_platforms(ctx: &Context, json: bool) -> Result<(), CliError> {
    let posts = load_posts(&ctx.paths.posts).map_err(CliError::load)?;
    let counts = platform_counts(&posts);

    if json {
        let platforms: Vec<_> = counts
            .iter()
            .map(|(platform, count)| {
                json!({"platform": platform, "label": platform.label(), "count": count})
            })
            .collect();
        let out = serde_json::to_string_pretty(&json!({
            "total": posts.len(),
            "platforms": platforms,
        }))
        .map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    println!("{:<12} {:>5}", "All", posts.len());
    for (platform, count) in &counts {
        println!("{:<12} {:>5}", platform.label(), count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_flattens_and_cuts() {
        assert_eq!(truncate("a\n  b", 10), "a b");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn date_formats_rfc3339_only() {
        let mut post = Post::default();
        assert_eq!(display_date(&post), "-");
        post.timestamp = Some("2026-01-15T09:30:00Z".into());
        assert_eq!(display_date(&post), "2026-01-15");
        post.timestamp = Some("yesterday".into());
        assert_eq!(display_date(&post), "yesterday");
    }
}
