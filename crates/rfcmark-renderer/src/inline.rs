//! Inline emitters.

use std::fmt::Write;

use crate::renderer::Xml2Renderer;
use crate::util::{escape_attr, escape_text};

/// Requirement keywords rendered as `<bcp14>` when strongly emphasized.
pub const BCP14_KEYWORDS: &[&str] = &[
    "MUST",
    "MUST NOT",
    "REQUIRED",
    "SHALL",
    "SHALL NOT",
    "SHOULD",
    "SHOULD NOT",
    "RECOMMENDED",
    "NOT RECOMMENDED",
    "MAY",
    "OPTIONAL",
];

/// Whether `text` is exactly one requirement keyword.
#[must_use]
pub fn is_bcp14_keyword(text: &str) -> bool {
    BCP14_KEYWORDS.contains(&text)
}

/// Kind of autolink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutolinkKind {
    Uri,
    Email,
}

impl Xml2Renderer {
    /// Escaped character data.
    pub fn normal_text(&mut self, text: &str) {
        self.out.push_str(&escape_text(text));
    }

    /// Entity reference, copied through.
    pub fn entity(&mut self, entity: &str) {
        self.out.push_str(entity);
    }

    /// RFC XML has no strikethrough; content is copied through.
    pub fn strikethrough(&mut self, content: &str) {
        self.out.push_str(content);
    }

    pub fn emphasis(&mut self, content: &str) {
        write!(self.out, "<em>{content}</em>").unwrap();
    }

    /// `<bcp14>` for a requirement keyword, `<strong>` otherwise.
    pub fn double_emphasis(&mut self, content: &str) {
        if is_bcp14_keyword(content) {
            write!(self.out, "<bcp14>{content}</bcp14>").unwrap();
        } else {
            write!(self.out, "<strong>{content}</strong>").unwrap();
        }
    }

    pub fn triple_emphasis(&mut self, content: &str) {
        write!(self.out, "<strong><em>{content}</em></strong>").unwrap();
    }

    /// `<tt>` with escaped text.
    pub fn code_span(&mut self, text: &str) {
        write!(self.out, "<tt>{}</tt>", escape_text(text)).unwrap();
    }

    /// Hyperlink; a `#anchor` destination becomes an internal reference.
    pub fn link(&mut self, dest: &str, content: &str) {
        if let Some(anchor) = dest.strip_prefix('#') {
            write!(
                self.out,
                r#"<xref target="{}">{content}</xref>"#,
                escape_attr(anchor)
            )
            .unwrap();
        } else {
            write!(
                self.out,
                r#"<eref target="{}">{content}</eref>"#,
                escape_attr(dest)
            )
            .unwrap();
        }
    }

    pub fn autolink(&mut self, link: &str, kind: AutolinkKind) {
        let scheme = match kind {
            AutolinkKind::Email if !link.starts_with("mailto:") => "mailto:",
            _ => "",
        };
        write!(self.out, r#"<eref target="{scheme}{}"/>"#, escape_attr(link)).unwrap();
    }

    /// Network images become links, anything else an embedded graphic.
    pub fn image(&mut self, link: &str, title: &str, alt: &str) {
        if link.starts_with("http://") || link.starts_with("https://") {
            let text = if alt.is_empty() { title } else { alt };
            write!(
                self.out,
                r#"<eref target="{}">{}</eref>"#,
                escape_attr(link),
                escape_text(text)
            )
            .unwrap();
            return;
        }
        write!(self.out, r#"<artwork src="{}""#, escape_attr(link)).unwrap();
        if !alt.is_empty() {
            write!(self.out, r#" alt="{}""#, escape_attr(alt)).unwrap();
        }
        self.out.push_str("/>");
    }

    pub fn cross_reference(&mut self, target: &str) {
        write!(self.out, r#"<xref target="{}"/>"#, escape_attr(target)).unwrap();
    }

    /// `<iref>`; an empty `secondary` omits the subitem.
    pub fn index_term(&mut self, primary: &str, secondary: &str) {
        write!(self.out, r#"<iref item="{}""#, escape_attr(primary)).unwrap();
        if !secondary.is_empty() {
            write!(self.out, r#" subitem="{}""#, escape_attr(secondary)).unwrap();
        }
        self.out.push_str("/>");
    }

    pub fn line_break(&mut self) {
        self.out.push_str("\n<vspace/>\n");
    }
}
