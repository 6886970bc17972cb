//! Remote listing grammar and template source selection.
//!
//! `git remote -v` prints one line per remote and direction:
//!
//! ```text
//! origin  https://example.com/acme/widget.git (fetch)
//! origin  https://example.com/acme/widget.git (push)
//! ```
//!
//! Partial clones may append a partial-clone filter such as `[blob:none]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{GitError, GitResult};

static LISTING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>\S+)\s+(?P<url>\S.*?)\s+\((?P<direction>fetch|push)\)(?:\s+\[[^\]]*\])?$")
        .expect("remote listing pattern is a valid regex")
});

static SCP_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:\S+$").expect("scp address pattern is a valid regex")
});

/// Remote preferred as the template source.
const PRIMARY_REMOTE: &str = "origin";

/// Direction of a listed remote URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `(fetch)` entry.
    Fetch,
    /// `(push)` entry.
    Push,
}

/// One entry of `git remote -v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    /// Remote name.
    pub name: String,
    /// Remote URL.
    pub url: String,
    /// Whether this is the fetch or push URL.
    pub direction: Direction,
}

/// The remote whose URL becomes the template URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSource {
    /// Name of the remote the URL came from.
    pub remote: String,
    /// Validated fetch URL.
    pub url: String,
    /// Whether a remote named like the template remote is already configured.
    pub template_remote_exists: bool,
}

/// Parse `git remote -v` output, skipping lines that do not fit the grammar.
pub fn parse_remote_listing(listing: &str) -> Vec<RemoteDescriptor> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match LISTING_LINE.captures(line) {
            Some(caps) => Some(RemoteDescriptor {
                name: caps["name"].to_string(),
                url: caps["url"].to_string(),
                direction: if &caps["direction"] == "fetch" {
                    Direction::Fetch
                } else {
                    Direction::Push
                },
            }),
            None => {
                debug!(line, "skipping unrecognized remote listing line");
                None
            }
        })
        .collect()
}

/// Pick the primary fetch entry and validate its URL.
///
/// `origin` wins when it has a fetch entry; otherwise the first fetch entry
/// in listing order. The template remote itself is never a candidate.
pub fn select_template_source(
    remotes: &[RemoteDescriptor],
    template_remote: &str,
) -> GitResult<TemplateSource> {
    let template_remote_exists = remotes.iter().any(|r| r.name == template_remote);

    let fetch_entries = || {
        remotes
            .iter()
            .filter(|r| r.direction == Direction::Fetch && r.name != template_remote)
    };

    let chosen = fetch_entries()
        .find(|r| r.name == PRIMARY_REMOTE)
        .or_else(|| fetch_entries().next());

    let Some(chosen) = chosen else {
        return Err(if template_remote_exists {
            GitError::OnlyTemplateRemote {
                name: template_remote.to_string(),
            }
        } else {
            GitError::NoFetchRemote
        });
    };

    validate_remote_url(chosen)?;

    Ok(TemplateSource {
        remote: chosen.name.clone(),
        url: chosen.url.clone(),
        template_remote_exists,
    })
}

/// Accept absolute URLs with a host (or `file:` URLs) and scp-style addresses.
fn validate_remote_url(remote: &RemoteDescriptor) -> GitResult<()> {
    let invalid = |reason: String| GitError::InvalidRemoteUrl {
        remote: remote.name.clone(),
        url: remote.url.clone(),
        reason,
    };

    if remote.url.chars().any(char::is_whitespace) {
        return Err(invalid("URL contains whitespace".to_string()));
    }

    match Url::parse(&remote.url) {
        Ok(url) if url.scheme() == "file" => Ok(()),
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        Ok(url) => Err(invalid(format!("'{}' URL has no host", url.scheme()))),
        Err(_) if SCP_ADDRESS.is_match(&remote.url) => Ok(()),
        Err(e) => Err(invalid(e.to_string())),
    }
}
