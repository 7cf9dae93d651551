// src/models/mod.rs
// =============================================================================
// Typed views of the JSON documents the registry and downloads API return.
//
// All structs deserialize leniently (defaults for missing fields) because
// mirrors and very old packages omit or reshape fields freely.
// =============================================================================

mod downloads;
mod package;
mod people;
mod registry_info;
mod search;
mod version;

pub use downloads::{DailyDownloads, DownloadRangeStats, DownloadStats, Period};
pub use package::Package;
pub use people::{Bugs, License, Person, Repository};
pub use registry_info::{RegistryInformation, Sequence, Sizes};
pub use search::{Links, Score, ScoreDetail, SearchObject, SearchPackage, SearchResult};
pub use version::{Dist, Signature, Version};
