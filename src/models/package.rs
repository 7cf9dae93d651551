// src/models/package.rs
// =============================================================================
// The full package document ("packument") returned by GET /<name>.
//
// Mirrors return the same shape, sometimes with fields missing, so every
// field is defaulted. Keys we don't model are kept in `other` instead of
// being dropped.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::people::{deprecation, string_or_vec, Bugs, License, Person, Repository};
use super::version::Version;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "dist-tags")]
    pub dist_tags: BTreeMap<String, String>,
    pub versions: BTreeMap<String, Version>,
    pub maintainers: Vec<Person>,
    /// `created`, `modified` and one timestamp per version. Values are kept
    /// raw because unpublished packages put an object under `unpublished`.
    pub time: BTreeMap<String, Value>,
    pub repository: Option<Repository>,
    pub readme: Option<String>,
    #[serde(rename = "readmeFilename")]
    pub readme_filename: Option<String>,
    pub homepage: Option<String>,
    pub bugs: Option<Bugs>,
    pub license: Option<License>,
    /// npm users who starred the package
    pub users: BTreeMap<String, bool>,
    #[serde(deserialize_with = "string_or_vec")]
    pub keywords: Vec<String>,
    pub author: Option<Person>,
    pub contributors: Vec<Person>,
    #[serde(deserialize_with = "deprecation", skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl Package {
    /// Version string the `latest` dist-tag points at
    pub fn latest_version(&self) -> Option<&str> {
        self.dist_tags.get("latest").map(String::as_str)
    }

    /// Manifest of the `latest` dist-tag
    pub fn latest(&self) -> Option<&Version> {
        self.latest_version().and_then(|v| self.versions.get(v))
    }

    /// Looks up a manifest by exact version or by dist-tag name
    pub fn resolve_version(&self, tag_or_version: &str) -> Option<&Version> {
        self.versions.get(tag_or_version).or_else(|| {
            self.dist_tags
                .get(tag_or_version)
                .and_then(|v| self.versions.get(v))
        })
    }

    /// Publish time of a version (or of `created` / `modified`)
    pub fn published_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.time.get(key)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.published_at("created")
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.published_at("modified")
    }

    /// The registry marks fully unpublished packages with `time.unpublished`
    pub fn is_unpublished(&self) -> bool {
        self.time.contains_key("unpublished")
    }
}
