//! Repository listing over the paginated Bitbucket API.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use log::debug;
use serde::{Deserialize, Deserializer};

use crate::bitbucket::BitbucketClient;
use crate::error::Result;

/// One page of a repository listing.
///
/// Pagination is cursor based: `next` holds the full URL of the following
/// page and is absent on the last one. `previous` is decoded but never
/// followed.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub pagelen: u32,
    pub size: u64,
    pub values: Vec<Repository>,
    pub page: u32,
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// A single link under a repository's link relations.
///
/// The `name` labels the protocol for clone links ("ssh", "https").
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
    pub name: Option<String>,
}

/// Repository information from the Bitbucket API.
///
/// `owner` and `parent` are kept as opaque JSON; nothing here reads their
/// structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub scm: String,
    pub website: Option<String>,
    pub has_wiki: bool,
    pub name: String,
    #[serde(deserialize_with = "link_relations")]
    pub links: HashMap<String, Vec<Link>>,
    pub fork_policy: String,
    pub uuid: String,
    pub language: String,
    #[serde(default, deserialize_with = "offset_timestamp")]
    pub created_on: Option<DateTime<FixedOffset>>,
    pub full_name: String,
    pub has_issues: bool,
    pub owner: serde_json::Value,
    #[serde(default, deserialize_with = "offset_timestamp")]
    pub updated_on: Option<DateTime<FixedOffset>>,
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_private: bool,
    pub description: String,
    #[serde(default)]
    pub parent: Option<serde_json::Value>,
}

impl Repository {
    /// Links under the "clone" relation, empty if the relation is absent.
    pub fn clone_links(&self) -> &[Link] {
        self.links.get("clone").map(Vec::as_slice).unwrap_or(&[])
    }

    /// The href of the first clone link whose URL uses the given protocol.
    pub fn clone_url_for_protocol(&self, protocol: &str) -> Option<&str> {
        let prefix = format!("{protocol}:");
        self.clone_links()
            .iter()
            .map(|link| link.href.as_str())
            .find(|href| href.starts_with(&prefix))
    }

    /// The ssh clone URL, if the repository advertises one.
    pub fn ssh_clone_url(&self) -> Option<&str> {
        self.clone_url_for_protocol("ssh")
    }
}

/// Decode a link-relation map, accepting a bare link object wherever a list
/// of links is expected.
///
/// Bitbucket serializes most relations as a single object and the "clone"
/// relation as a list; the tolerance is scoped to this field so other shape
/// errors still fail the decode.
fn link_relations<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, Vec<Link>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<Link>),
        One(Link),
    }

    let raw: HashMap<String, OneOrMany> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(relation, links)| {
            let links = match links {
                OneOrMany::Many(links) => links,
                OneOrMany::One(link) => vec![link],
            };
            (relation, links)
        })
        .collect())
}

/// Decode an ISO-8601-with-offset timestamp, treating null and blank strings
/// as absent. Anything else that fails to parse is a decode error.
fn offset_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Repository listing operations.
pub trait RepoOps {
    /// List every repository the given account owns, across all pages.
    fn list_repositories(&self, owner: &str) -> Result<Vec<Repository>>;
}

impl RepoOps for BitbucketClient {
    fn list_repositories(&self, owner: &str) -> Result<Vec<Repository>> {
        let mut all_repos = Vec::new();
        let mut url = Some(format!("/2.0/repositories/{owner}"));

        while let Some(current) = url {
            let page: Page = self.get(&current)?;
            debug!(
                "page {} listed {} of {} repositories",
                page.page,
                page.values.len(),
                page.size
            );
            all_repos.extend(page.values);
            url = page.next;
        }

        Ok(all_repos)
    }
}
