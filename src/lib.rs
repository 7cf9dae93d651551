//! NPM registry client with mirror and proxy support.
//!
//! ```no_run
//! use npm_crawler::registry::{Mirror, Registry};
//!
//! # async fn demo() -> npm_crawler::Result<()> {
//! let registry = Registry::for_mirror(Mirror::NpmMirror)?;
//! let react = registry.package_information("react").await?;
//! println!("{} {:?}", react.name, react.latest_version());
//! # Ok(())
//! # }
//! ```
//!
//! Besides the registry endpoints the crate can walk a package's dependency
//! graph ([`crawl`]) and validate the configuration of its documentation
//! site ([`site`]).

pub mod checker;
pub mod crawl;
pub mod error;
pub mod models;
pub mod registry;
pub mod settings;
pub mod site;

pub use error::{Error, Result};
