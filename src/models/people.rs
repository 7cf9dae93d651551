// src/models/people.rs
// =============================================================================
// Small value types that npm writes in more than one shape.
//
// package.json lets authors write `"author": "Jane <jane@x.io> (https://x.io)"`
// or `"author": { "name": "Jane", ... }`, and the registry passes both
// through untouched. Same story for repository, bugs and license. Each type
// here deserializes through an untagged "repr" enum and normalizes into one
// struct, so the rest of the crate only ever sees the object form.
// =============================================================================

use serde::{Deserialize, Deserializer, Serialize};

/// Author, maintainer, contributor or publishing user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersonRepr")]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersonRepr {
    Text(String),
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl From<PersonRepr> for Person {
    fn from(repr: PersonRepr) -> Self {
        match repr {
            PersonRepr::Text(text) => Person::parse(&text),
            PersonRepr::Object { name, email, url } => Person { name, email, url },
        }
    }
}

impl Person {
    /// Parses the npm shorthand `Name <email> (url)`; every part is optional.
    pub fn parse(text: &str) -> Person {
        let email = between(text, '<', '>');
        let url = between(text, '(', ')');

        let name_end = text.find(['<', '(']).unwrap_or(text.len());
        let name = non_empty(&text[..name_end]);

        Person { name, email, url }
    }

    /// Name if present, otherwise email, otherwise "unknown"
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown")
    }
}

fn between(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)? + open.len_utf8();
    let len = text[start..].find(close)?;
    non_empty(&text[start..start + len])
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RepositoryRepr")]
pub struct Repository {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Subdirectory inside a monorepo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepositoryRepr {
    Text(String),
    Object {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        directory: Option<String>,
    },
}

impl From<RepositoryRepr> for Repository {
    fn from(repr: RepositoryRepr) -> Self {
        match repr {
            RepositoryRepr::Text(url) => Repository {
                kind: None,
                url: non_empty(&url),
                directory: None,
            },
            RepositoryRepr::Object { kind, url, directory } => Repository { kind, url, directory },
        }
    }
}

impl Repository {
    /// Browsable URL: drops the `git+` prefix and `.git` suffix and expands
    /// `github:user/repo` / `user/repo` shorthands.
    pub fn web_url(&self) -> Option<String> {
        let url = self.url.as_deref()?.trim();

        if let Some(path) = url.strip_prefix("github:") {
            return Some(format!("https://github.com/{}", path));
        }
        if !url.contains(':') && url.matches('/').count() == 1 {
            return Some(format!("https://github.com/{}", url));
        }

        let url = url.strip_prefix("git+").unwrap_or(url);
        let url = url.strip_suffix(".git").unwrap_or(url);
        let url = url.replacen("git://", "https://", 1);
        let url = url.replacen("ssh://git@", "https://", 1);
        Some(url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BugsRepr")]
pub struct Bugs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BugsRepr {
    Text(String),
    Object {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl From<BugsRepr> for Bugs {
    fn from(repr: BugsRepr) -> Self {
        match repr {
            BugsRepr::Text(url) => Bugs {
                url: non_empty(&url),
                email: None,
            },
            BugsRepr::Object { url, email } => Bugs { url, email },
        }
    }
}

/// SPDX expression; the legacy `{ "type": "MIT", "url": ... }` form is
/// reduced to its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LicenseRepr", into = "String")]
pub struct License(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum LicenseRepr {
    Text(String),
    Object {
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

impl From<LicenseRepr> for License {
    fn from(repr: LicenseRepr) -> Self {
        match repr {
            LicenseRepr::Text(text) => License(text),
            LicenseRepr::Object { kind } => License(kind.unwrap_or_default()),
        }
    }
}

impl From<License> for String {
    fn from(license: License) -> Self {
        license.0
    }
}

impl std::fmt::Display for License {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepts `["a", "b"]`, `"a, b"` or null. Old packages have all three.
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::List(items)) => items,
        Some(Repr::Text(text)) => text
            .split([',', ' '])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    })
}

/// `deprecated` is a message string, but some manifests carry `false`.
pub(crate) fn deprecation<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Message(String),
        Flag(bool),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Message(message)) => Some(message),
        Some(Repr::Flag(true)) => Some(String::new()),
        Some(Repr::Flag(false)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_from_shorthand() {
        let person: Person =
            serde_json::from_str(r#""Barney Rubble <b@rubble.com> (http://barnyrubble.tumblr.com/)""#)
                .unwrap();
        assert_eq!(person.name.as_deref(), Some("Barney Rubble"));
        assert_eq!(person.email.as_deref(), Some("b@rubble.com"));
        assert_eq!(person.url.as_deref(), Some("http://barnyrubble.tumblr.com/"));
    }

    #[test]
    fn test_person_name_only() {
        let person = Person::parse("sindresorhus");
        assert_eq!(person.name.as_deref(), Some("sindresorhus"));
        assert!(person.email.is_none());
        assert!(person.url.is_none());
    }

    #[test]
    fn test_person_from_object() {
        let person: Person =
            serde_json::from_str(r#"{"name": "gaearon", "email": "dan@example.com"}"#).unwrap();
        assert_eq!(person.display_name(), "gaearon");
        assert_eq!(person.email.as_deref(), Some("dan@example.com"));
    }

    #[test]
    fn test_repository_shapes() {
        let object: Repository = serde_json::from_str(
            r#"{"type": "git", "url": "git+https://github.com/facebook/react.git", "directory": "packages/react"}"#,
        )
        .unwrap();
        assert_eq!(object.kind.as_deref(), Some("git"));
        assert_eq!(object.directory.as_deref(), Some("packages/react"));
        assert_eq!(object.web_url().as_deref(), Some("https://github.com/facebook/react"));

        let shorthand: Repository = serde_json::from_str(r#""expressjs/express""#).unwrap();
        assert_eq!(shorthand.web_url().as_deref(), Some("https://github.com/expressjs/express"));

        let prefixed: Repository = serde_json::from_str(r#""github:lodash/lodash""#).unwrap();
        assert_eq!(prefixed.web_url().as_deref(), Some("https://github.com/lodash/lodash"));
    }

    #[test]
    fn test_license_shapes() {
        let text: License = serde_json::from_str(r#""MIT""#).unwrap();
        assert_eq!(text.0, "MIT");

        let legacy: License =
            serde_json::from_str(r#"{"type": "BSD-3-Clause", "url": "http://x"}"#).unwrap();
        assert_eq!(legacy.to_string(), "BSD-3-Clause");

        assert_eq!(serde_json::to_string(&legacy).unwrap(), r#""BSD-3-Clause""#);
    }

    #[test]
    fn test_bugs_shapes() {
        let text: Bugs = serde_json::from_str(r#""https://github.com/a/b/issues""#).unwrap();
        assert_eq!(text.url.as_deref(), Some("https://github.com/a/b/issues"));

        let object: Bugs = serde_json::from_str(r#"{"email": "bugs@a.b"}"#).unwrap();
        assert!(object.url.is_none());
        assert_eq!(object.email.as_deref(), Some("bugs@a.b"));
    }
}
