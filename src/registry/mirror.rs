// src/registry/mirror.rs
// =============================================================================
// Well-known NPM registry mirrors, and a concurrent reachability probe.
//
// The probe works like the link checker: one future per mirror, run through
// buffer_unordered so a slow mirror does not hold up the others.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

use super::client::Registry;
use super::options::Options;
use crate::error::Error;

pub const REGISTRY_URL_NPM: &str = "https://registry.npmjs.org";
pub const REGISTRY_URL_YARN: &str = "https://registry.yarnpkg.com";
pub const REGISTRY_URL_CNPM: &str = "http://r.cnpmjs.org";
pub const REGISTRY_URL_TAOBAO: &str = "https://registry.npm.taobao.org";
pub const REGISTRY_URL_NPMJS_COM: &str = "https://skimdb.npmjs.com";
pub const REGISTRY_URL_TENCENT: &str = "http://mirrors.cloud.tencent.com/npm";
pub const REGISTRY_URL_NPM_MIRROR: &str = "https://registry.npmmirror.com";
pub const REGISTRY_URL_HUAWEI_CLOUD: &str = "https://mirrors.huaweicloud.com/repository/npm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mirror {
    /// The official registry
    Npm,
    Yarn,
    Cnpm,
    TaoBao,
    /// skimdb.npmjs.com, the CouchDB replica
    NpmjsCom,
    Tencent,
    NpmMirror,
    HuaWeiCloud,
}

impl Mirror {
    pub const ALL: [Mirror; 8] = [
        Mirror::Npm,
        Mirror::Yarn,
        Mirror::Cnpm,
        Mirror::TaoBao,
        Mirror::NpmjsCom,
        Mirror::Tencent,
        Mirror::NpmMirror,
        Mirror::HuaWeiCloud,
    ];

    pub fn url(self) -> &'static str {
        match self {
            Mirror::Npm => REGISTRY_URL_NPM,
            Mirror::Yarn => REGISTRY_URL_YARN,
            Mirror::Cnpm => REGISTRY_URL_CNPM,
            Mirror::TaoBao => REGISTRY_URL_TAOBAO,
            Mirror::NpmjsCom => REGISTRY_URL_NPMJS_COM,
            Mirror::Tencent => REGISTRY_URL_TENCENT,
            Mirror::NpmMirror => REGISTRY_URL_NPM_MIRROR,
            Mirror::HuaWeiCloud => REGISTRY_URL_HUAWEI_CLOUD,
        }
    }

    /// Name used on the command line and in config files
    pub fn name(self) -> &'static str {
        match self {
            Mirror::Npm => "npm",
            Mirror::Yarn => "yarn",
            Mirror::Cnpm => "cnpm",
            Mirror::TaoBao => "taobao",
            Mirror::NpmjsCom => "npmjs-com",
            Mirror::Tencent => "tencent",
            Mirror::NpmMirror => "npm-mirror",
            Mirror::HuaWeiCloud => "huawei-cloud",
        }
    }
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mirror {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mirror::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted || m.name().replace('-', "") == wanted)
            .ok_or_else(|| Error::UnknownMirror(s.to_string()))
    }
}

/// Outcome of probing one mirror
#[derive(Debug, Clone, Serialize)]
pub struct MirrorProbe {
    pub mirror: Mirror,
    pub url: String,
    pub reachable: bool,
    /// Round-trip time of the root request in milliseconds
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Requests every mirror's root document concurrently.
///
/// `base` supplies proxy, timeout and user agent; only the registry URL is
/// replaced per mirror. Results come back in the order of `mirrors`.
pub async fn probe_mirrors(mirrors: &[Mirror], base: &Options) -> Vec<MirrorProbe> {
    let futures = mirrors.iter().copied().enumerate().map(|(index, mirror)| {
        let options = base.clone().registry_url(mirror.url());
        async move { (index, probe_url(mirror, options).await) }
    });

    let mut results: Vec<(usize, MirrorProbe)> = stream::iter(futures)
        .buffer_unordered(mirrors.len().max(1))
        .collect()
        .await;

    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, probe)| probe).collect()
}

/// Probes a single registry URL, reported under `mirror`.
pub async fn probe_url(mirror: Mirror, options: Options) -> MirrorProbe {
    let url = options.registry_url.clone();
    let started = Instant::now();

    let outcome = match Registry::new(options) {
        Ok(registry) => registry.registry_information().await,
        Err(e) => Err(e),
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(info) => {
            debug!(%mirror, latency_ms, "mirror reachable");
            MirrorProbe {
                mirror,
                url,
                reachable: true,
                latency_ms,
                doc_count: info.doc_count,
                error: None,
            }
        }
        Err(e) => {
            debug!(%mirror, error = %e, "mirror unreachable");
            MirrorProbe {
                mirror,
                url,
                reachable: false,
                latency_ms,
                doc_count: None,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_urls() {
        assert_eq!(Mirror::Npm.url(), "https://registry.npmjs.org");
        assert_eq!(Mirror::Yarn.url(), REGISTRY_URL_YARN);
        assert_eq!(Mirror::Cnpm.url(), REGISTRY_URL_CNPM);
        assert_eq!(Mirror::TaoBao.url(), REGISTRY_URL_TAOBAO);
        assert_eq!(Mirror::NpmjsCom.url(), REGISTRY_URL_NPMJS_COM);
        assert_eq!(Mirror::Tencent.url(), REGISTRY_URL_TENCENT);
        assert_eq!(Mirror::NpmMirror.url(), REGISTRY_URL_NPM_MIRROR);
        assert_eq!(Mirror::HuaWeiCloud.url(), REGISTRY_URL_HUAWEI_CLOUD);
    }

    #[test]
    fn test_parse_mirror_names() {
        for mirror in Mirror::ALL {
            assert_eq!(mirror.name().parse::<Mirror>().unwrap(), mirror);
        }
        assert_eq!("NpmMirror".parse::<Mirror>().unwrap(), Mirror::NpmMirror);
        assert_eq!("huaweicloud".parse::<Mirror>().unwrap(), Mirror::HuaWeiCloud);
        assert!("gitee".parse::<Mirror>().is_err());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Mirror::ALL.iter().map(|m| m.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Mirror::ALL.len());
    }
}
