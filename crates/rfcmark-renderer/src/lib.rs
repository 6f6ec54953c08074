//! Markdown to RFC XML (xml2rfc v3) rendering.
//!
//! The core is [`Xml2Renderer`], a stateful visitor that receives structural
//! callbacks (headings, paragraphs, lists, emphasis, citations, ...) in
//! document order and appends RFC XML to an owned buffer. Besides plain tag
//! emission it tracks:
//!
//! - the open `<section>` containers, closed by shallower headings, matter
//!   transitions and the document footer,
//! - the matter container (`<front>`, `<middle>`, `<back>`),
//! - pending inline attribute lists for the next block,
//! - citations, emitted as `<references>` groups in the back matter.
//!
//! [`MarkdownConverter`] drives the renderer from markdown parsed with
//! pulldown-cmark.
//!
//! # Example
//!
//! ```
//! use rfcmark_renderer::MarkdownConverter;
//!
//! let result = MarkdownConverter::new().convert("{mainmatter}\n\n# Intro\n\nSee [@!RFC2119].\n");
//! assert!(result.xml.starts_with("<?xml"));
//! assert!(result.xml.contains("<xi:include href=\"reference.RFC.2119.xml\"/>"));
//! ```

mod blocks;
mod citation;
mod ial;
mod inline;
mod markdown;
mod naming;
mod renderer;
mod state;
mod util;

pub use blocks::{ListItemFlags, ListKind};
pub use citation::{CitationKind, CitationRecord, Citations};
pub use ial::{Ial, render_ial};
pub use inline::{AutolinkKind, BCP14_KEYWORDS, is_bcp14_keyword};
pub use markdown::{MarkdownConverter, RenderResult};
pub use naming::{BibxmlNaming, ReferenceNaming};
pub use renderer::Xml2Renderer;
pub use state::{Lifecycle, MatterPhase, RenderFlags};
pub use util::{escape_attr, escape_text, slugify};

/// Re-exported so callers can name table alignments without depending on
/// pulldown-cmark directly.
pub use pulldown_cmark::Alignment;
