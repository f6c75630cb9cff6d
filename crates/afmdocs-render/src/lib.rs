//! afmdocs Render
//!
//! Turns converted fragments into a site: [`TemplateEngine`] frames a
//! fragment as a page, [`SiteBuilder`] walks the docs directory and
//! writes one page per Markdown file.

pub mod site;
pub mod template;

pub use site::{page_title, BuildReport, Page, SiteBuilder};
pub use template::{TemplateEngine, BASE_TEMPLATE, DEFAULT_TEMPLATE};
