use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Platform, Post};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "all" => Self::All,
            other => Self::Only(Platform::parse(other)),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Only(platform) => &post.platform == platform,
        }
    }
}

/// Sort order for the posts table. All orders are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    /// Newest first; posts without a timestamp last.
    #[default]
    Date,
    Likes,
    Shares,
}

impl FromStr for PostSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            "likes" => Ok(Self::Likes),
            "shares" => Ok(Self::Shares),
            other => Err(format!("unknown sort '{other}' (expected date, likes or shares)")),
        }
    }
}

impl fmt::Display for PostSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Likes => write!(f, "likes"),
            Self::Shares => write!(f, "shares"),
        }
    }
}

/// Filter by platform, then sort. Ties keep source order.
pub fn filter_and_sort<'a>(posts: &'a [Post], filter: &PlatformFilter, sort: PostSort) -> Vec<&'a Post> {
    let mut selected: Vec<&Post> = posts.iter().filter(|p| filter.matches(p)).collect();
    match sort {
        // Missing timestamp compares as "", which is last under descending order.
        PostSort::Date => selected.sort_by(|a, b| {
            let a = a.timestamp.as_deref().unwrap_or("");
            let b = b.timestamp.as_deref().unwrap_or("");
            b.cmp(a)
        }),
        PostSort::Likes => selected.sort_by_key(|p| Reverse(p.likes())),
        PostSort::Shares => selected.sort_by_key(|p| Reverse(p.shares())),
    }
    selected
}

/// Distinct platforms with post counts, in first-seen order.
pub fn platform_counts(posts: &[Post]) -> Vec<(Platform, usize)> {
    let mut counts: Vec<(Platform, usize)> = Vec::new();
    for post in posts {
        match counts.iter_mut().find(|(p, _)| p == &post.platform) {
            Some((_, n)) => *n += 1,
            None => counts.push((post.platform.clone(), 1)),
        }
    }
    counts
}
