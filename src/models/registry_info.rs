// src/models/registry_info.rs
// Root document of a registry (GET /). The official registry and its
// mirrors are CouchDB-flavoured, so this is the CouchDB database info.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryInformation {
    pub db_name: Option<String>,
    pub engine: Option<String>,
    pub doc_count: Option<u64>,
    pub doc_del_count: Option<u64>,
    pub update_seq: Option<Sequence>,
    pub purge_seq: Option<Sequence>,
    pub compact_running: bool,
    pub disk_size: Option<u64>,
    pub data_size: Option<u64>,
    pub instance_start_time: Option<String>,
    pub sizes: Option<Sizes>,
    pub disk_format_version: Option<u64>,
    pub committed_update_seq: Option<Sequence>,
    pub compacted_seq: Option<Sequence>,
    pub uuid: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    pub file: u64,
    pub active: u64,
    pub external: u64,
}

/// CouchDB 1.x reports sequences as numbers, 2.x as opaque strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sequence {
    Number(u64),
    Opaque(String),
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::Number(n) => write!(f, "{}", n),
            Sequence::Opaque(s) => f.write_str(s),
        }
    }
}
