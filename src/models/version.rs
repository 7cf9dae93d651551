// src/models/version.rs
// =============================================================================
// One published version of a package (a "manifest"), as returned by
// GET /<name>/<version> and embedded in the packument's `versions` map.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::people::{deprecation, string_or_vec, Bugs, License, Person, Repository};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub main: Option<String>,
    pub scripts: BTreeMap<String, String>,
    pub repository: Option<Repository>,
    #[serde(deserialize_with = "string_or_vec")]
    pub keywords: Vec<String>,
    pub author: Option<Person>,
    pub license: Option<License>,
    pub bugs: Option<Bugs>,
    pub homepage: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: BTreeMap<String, String>,
    #[serde(rename = "optionalDependencies")]
    pub optional_dependencies: BTreeMap<String, String>,
    /// Usually `name@version`
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub dist: Option<Dist>,
    #[serde(rename = "_from")]
    pub from: Option<String>,
    #[serde(rename = "_npmVersion")]
    pub npm_version: Option<String>,
    #[serde(rename = "_nodeVersion")]
    pub node_version: Option<String>,
    #[serde(rename = "_npmUser")]
    pub npm_user: Option<Person>,
    pub maintainers: Vec<Person>,
    /// Deprecation message; None when the version is not deprecated
    #[serde(deserialize_with = "deprecation", skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl Version {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }

    /// Runtime dependencies, plus devDependencies when `include_dev` is set
    pub fn dependency_map(&self, include_dev: bool) -> BTreeMap<String, String> {
        let mut deps = self.dependencies.clone();
        if include_dev {
            for (name, range) in &self.dev_dependencies {
                deps.entry(name.clone()).or_insert_with(|| range.clone());
            }
        }
        deps
    }
}

/// Where and how to download the tarball
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dist {
    /// SHA-1 of the tarball, hex
    pub shasum: Option<String>,
    pub tarball: Option<String>,
    /// Subresource-integrity string, e.g. `sha512-...`
    pub integrity: Option<String>,
    #[serde(rename = "fileCount", skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    #[serde(rename = "unpackedSize", skip_serializing_if = "Option::is_none")]
    pub unpacked_size: Option<u64>,
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub keyid: String,
    pub sig: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LODASH_MANIFEST: &str = r#"{
        "name": "lodash",
        "version": "4.17.21",
        "description": "Lodash modular utilities.",
        "keywords": ["modules", "stdlib", "util"],
        "homepage": "https://lodash.com/",
        "repository": {"type": "git", "url": "git+https://github.com/lodash/lodash.git"},
        "license": "MIT",
        "main": "lodash.js",
        "author": "John-David Dalton <john.david.dalton@gmail.com>",
        "scripts": {"test": "echo \"See https://travis-ci.org/lodash-archive/lodash-cli for testing details.\""},
        "_id": "lodash@4.17.21",
        "_npmVersion": "6.14.11",
        "_npmUser": {"name": "bnjmnt4n", "email": "benjamin@dev.ofcr.se"},
        "dist": {
            "shasum": "679591c564c3bffaae8454cf0b3df370c3d6911c",
            "tarball": "https://registry.npmjs.org/lodash/-/lodash-4.17.21.tgz",
            "integrity": "sha512-v2kDEe57lecTulaDIuNTPy3Ry4gLGJ6Z1O3vE1krgXZNrsQ+LFTGHVxVjcXPs17LhbZVGedAJv8XZ1tvj5FvSg==",
            "fileCount": 1054,
            "unpackedSize": 1412415,
            "signatures": [{"keyid": "SHA256:jl3bwswu80PjjokCgh0o2w5c2U4LhQAE57gj9cz1kzA", "sig": "MEUCIF"}]
        },
        "maintainers": [{"name": "mathias", "email": "mathias@qiwi.be"}],
        "directories": {}
    }"#;

    #[test]
    fn test_parse_manifest() {
        let version: Version = serde_json::from_str(LODASH_MANIFEST).unwrap();
        assert_eq!(version.name, "lodash");
        assert_eq!(version.version, "4.17.21");
        assert_eq!(version.id.as_deref(), Some("lodash@4.17.21"));
        assert_eq!(version.license.as_ref().map(|l| l.0.as_str()), Some("MIT"));
        assert_eq!(
            version.author.as_ref().and_then(|a| a.email.as_deref()),
            Some("john.david.dalton@gmail.com")
        );

        let dist = version.dist.as_ref().unwrap();
        assert_eq!(dist.file_count, Some(1054));
        assert_eq!(dist.signatures.len(), 1);
        assert!(dist.integrity.as_deref().unwrap().starts_with("sha512-"));
        assert!(!version.is_deprecated());
    }

    #[test]
    fn test_deprecated_forms() {
        let message: Version =
            serde_json::from_str(r#"{"name": "request", "version": "2.88.2", "deprecated": "request has been deprecated"}"#)
                .unwrap();
        assert!(message.is_deprecated());

        let flag: Version =
            serde_json::from_str(r#"{"name": "x", "version": "1.0.0", "deprecated": false}"#).unwrap();
        assert!(!flag.is_deprecated());
    }

    #[test]
    fn test_dependency_map_with_dev() {
        let version: Version = serde_json::from_str(
            r#"{
                "name": "app", "version": "1.0.0",
                "dependencies": {"a": "^1.0.0"},
                "devDependencies": {"a": "^2.0.0", "b": "~3.1.0"}
            }"#,
        )
        .unwrap();

        assert_eq!(version.dependency_map(false).len(), 1);

        let all = version.dependency_map(true);
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"], "^1.0.0");
        assert_eq!(all["b"], "~3.1.0");
    }

    #[test]
    fn test_keywords_as_string() {
        let version: Version =
            serde_json::from_str(r#"{"name": "old", "version": "0.0.1", "keywords": "parser, json"}"#).unwrap();
        assert_eq!(version.keywords, vec!["parser", "json"]);
    }
}
