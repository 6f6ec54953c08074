//! Title block metadata for rfcmark documents.
//!
//! The title block is a TOML document placed in a `+++` fenced metadata block
//! at the top of the markdown source:
//!
//! ```toml
//! title = "Using Markdown for RFCs"
//! abbrev = "Markdown for RFCs"
//! docName = "draft-gieben-markdown-rfc-00"
//! ipr = "trust200902"
//! category = "info"
//! area = "Internet"
//! workgroup = "Network Working Group"
//! keyword = ["markdown", "xml"]
//! date = 2014-12-10
//!
//! [[author]]
//! initials = "R."
//! surname = "Gieben"
//! fullname = "R. (Miek) Gieben"
//! ```
//!
//! Every field is optional; missing values are elided by the renderer.

mod date;

use serde::Deserialize;

pub use date::DocDate;

/// Title metadata error.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// TOML parsing error.
    #[error("Title block parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Document title block.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TitleMetadata {
    /// Full document title.
    pub title: String,
    /// Abbreviated title for running headers.
    pub abbrev: String,
    /// Document name, e.g. `draft-foo-bar-00`.
    #[serde(rename = "docName", alias = "doc_name")]
    pub doc_name: String,
    /// Document category (`std`, `info`, `exp`, ...).
    pub category: String,
    /// Intellectual property rights statement.
    pub ipr: String,
    /// IETF area.
    pub area: String,
    /// Working group.
    pub workgroup: String,
    /// Publication date.
    #[serde(deserialize_with = "date::deserialize_date")]
    pub date: DocDate,
    /// Keywords, in document order.
    #[serde(rename = "keyword", alias = "keywords")]
    pub keywords: Vec<String>,
    /// Authors, in document order.
    #[serde(rename = "author", alias = "authors")]
    pub authors: Vec<AuthorRecord>,
}

/// A single document author.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthorRecord {
    pub initials: String,
    pub surname: String,
    pub fullname: String,
    pub role: String,
    /// ASCII rendition of the full name, for non-ASCII names.
    pub ascii: String,
}

impl TitleMetadata {
    /// Parse a TOML title block.
    ///
    /// # Example
    ///
    /// ```
    /// use rfcmark_meta::TitleMetadata;
    ///
    /// let meta = TitleMetadata::from_toml(r#"title = "Hello""#).unwrap();
    /// assert_eq!(meta.title, "Hello");
    /// assert!(meta.authors.is_empty());
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, MetaError> {
        Ok(toml::from_str(source)?)
    }
}
