// src/registry/mod.rs
// =============================================================================
// NPM registry access.
//
// Submodules:
// - options: where to connect and how (registry URL, proxy, timeout)
// - mirror:  the well-known mirrors and a concurrent reachability probe
// - client:  the Registry type with one method per endpoint
// =============================================================================

mod client;
mod mirror;
mod options;

pub use client::{Registry, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
pub use mirror::{
    probe_mirrors, probe_url, Mirror, MirrorProbe, REGISTRY_URL_CNPM, REGISTRY_URL_HUAWEI_CLOUD,
    REGISTRY_URL_NPM, REGISTRY_URL_NPMJS_COM, REGISTRY_URL_NPM_MIRROR, REGISTRY_URL_TAOBAO,
    REGISTRY_URL_TENCENT, REGISTRY_URL_YARN,
};
pub use options::{
    Options, DEFAULT_DOWNLOADS_URL, DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
