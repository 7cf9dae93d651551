// src/site/mod.rs
// =============================================================================
// The documentation site's configuration: loading it, validating its
// structure and making sure its links have pages.
//
// The site generator that renders the docs is an external tool; this
// module only treats its configuration as data.
// =============================================================================

mod config;
mod pages;
mod validate;

pub use config::{
    locale_base_path, DocFooter, EditLink, Footer, FormatOptions, LastUpdated, LocaleConfig,
    MarkdownConfig, MarkdownTheme, NavItem, Outline, SidebarGroup, SiteConfig, SocialLink,
    ThemeConfig, ROOT_LOCALE,
};
pub use pages::{check_pages, external_links, markdown_pages, page_path};
pub use validate::{validate, Issue, Severity};
