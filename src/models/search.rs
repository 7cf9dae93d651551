// src/models/search.rs
// =============================================================================
// Response of GET /-/v1/search?text=...&size=...
// =============================================================================

use serde::{Deserialize, Serialize};

use super::people::{string_or_vec, Person};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub objects: Vec<SearchObject>,
    /// Total number of matches, not just the ones returned
    pub total: u64,
    /// Server-side timestamp of the search
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchObject {
    pub package: SearchPackage,
    pub score: Score,
    #[serde(rename = "searchScore")]
    pub search_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPackage {
    pub name: String,
    /// `unscoped` for packages without an @scope
    pub scope: Option<String>,
    pub version: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub keywords: Vec<String>,
    pub date: Option<String>,
    pub links: Links,
    pub author: Option<Person>,
    pub publisher: Option<Person>,
    pub maintainers: Vec<Person>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub npm: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub bugs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Score {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub detail: ScoreDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreDetail {
    pub quality: f64,
    pub popularity: f64,
    pub maintenance: f64,
}

impl SearchResult {
    /// Names of the returned packages, best match first
    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.package.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let result: SearchResult = serde_json::from_str(
            r#"{
                "objects": [{
                    "package": {
                        "name": "react",
                        "scope": "unscoped",
                        "version": "18.2.0",
                        "description": "React is a JavaScript library for building user interfaces.",
                        "keywords": ["react"],
                        "date": "2022-06-14T19:46:38.369Z",
                        "links": {"npm": "https://www.npmjs.com/package/react", "homepage": "https://reactjs.org/"},
                        "publisher": {"username": "gnoff", "email": "jcs.gnoff@gmail.com"},
                        "maintainers": [{"username": "fb", "email": "opensource+npm@fb.com"}]
                    },
                    "score": {"final": 0.58, "detail": {"quality": 0.52, "popularity": 0.91, "maintenance": 0.33}},
                    "searchScore": 100000.59
                }],
                "total": 181402,
                "time": "Wed Jan 10 2024 08:00:00 GMT+0000 (Coordinated Universal Time)"
            }"#,
        )
        .unwrap();

        assert_eq!(result.total, 181402);
        assert_eq!(result.names(), vec!["react"]);

        let first = &result.objects[0];
        assert_eq!(first.package.links.npm.as_deref(), Some("https://www.npmjs.com/package/react"));
        assert_eq!(first.score.detail.popularity, 0.91);
        let publisher = first.package.publisher.as_ref().unwrap();
        assert_eq!(publisher.email.as_deref(), Some("jcs.gnoff@gmail.com"));
    }

    #[test]
    fn test_empty_result() {
        let result: SearchResult = serde_json::from_str(r#"{"objects": [], "total": 0}"#).unwrap();
        assert!(result.objects.is_empty());
        assert!(result.time.is_none());
    }
}
