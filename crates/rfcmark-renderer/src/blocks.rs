//! Block-level emitters.
//!
//! Content arrives pre-rendered, except for paragraphs and lists whose inner
//! closure decides whether anything is emitted at all.

use std::fmt::Write;

use pulldown_cmark::Alignment;

use crate::ial::render_ial;
use crate::renderer::Xml2Renderer;
use crate::util::escape_attr;

/// Kind of list container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Numbered list starting at `start`.
    Ordered { start: u64 },
    Unordered,
    Definition,
}

/// Position of an item within its list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListItemFlags {
    /// The item belongs to a definition list.
    pub definition_list: bool,
    /// The item is a definition term.
    pub term: bool,
}

impl Xml2Renderer {
    /// `<blockquote>`, carrying the pending IALs.
    pub fn block_quote(&mut self, content: &str) {
        let attrs = render_ial(&self.take_ial());
        writeln!(self.out, "<blockquote{attrs}>\n{content}</blockquote>").unwrap();
    }

    pub fn abstract_block(&mut self, content: &str) {
        self.wrap_block("abstract", content);
    }

    pub fn aside(&mut self, content: &str) {
        self.wrap_block("aside", content);
    }

    pub fn note(&mut self, content: &str) {
        self.wrap_block("note", content);
    }

    pub fn figure(&mut self, content: &str) {
        self.wrap_block("figure", content);
    }

    /// Verbatim block, e.g. raw HTML already escaped by the caller.
    pub fn raw_block(&mut self, content: &str) {
        self.wrap_block("artwork", content);
    }

    fn wrap_block(&mut self, tag: &str, content: &str) {
        writeln!(self.out, "<{tag}>\n{content}</{tag}>").unwrap();
    }

    /// `<sourcecode>` with the pending IALs and an optional language.
    ///
    /// Content is copied verbatim.
    pub fn code_block(&mut self, lang: Option<&str>, content: &str) {
        let attrs = render_ial(&self.take_ial());
        match lang.filter(|l| !l.is_empty()) {
            Some(lang) => writeln!(
                self.out,
                "\n<sourcecode{attrs} type=\"{}\">",
                escape_attr(lang)
            )
            .unwrap(),
            None => writeln!(self.out, "<sourcecode{attrs}>").unwrap(),
        }
        self.out.push_str(content);
        self.out.push_str("</sourcecode>\n");
    }

    /// `<t>` paragraph, discarded when `inner` reports no content.
    pub fn paragraph<F>(&mut self, inner: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        self.render_or_discard("<t>", inner, "</t>\n")
    }

    /// List container, discarded when `inner` reports no content.
    pub fn list<F>(&mut self, kind: ListKind, inner: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let (open, close) = match kind {
            ListKind::Ordered { start } if start > 1 => {
                (format!("<ol start=\"{start}\">\n"), "</ol>\n")
            }
            ListKind::Ordered { .. } => ("<ol>\n".to_owned(), "</ol>\n"),
            ListKind::Unordered => ("<ul>\n".to_owned(), "</ul>\n"),
            ListKind::Definition => ("<dl>\n".to_owned(), "</dl>\n"),
        };
        self.render_or_discard(&open, inner, close)
    }

    /// `<li>`, `<dt>` or `<dd>` depending on `flags`.
    pub fn list_item(&mut self, content: &str, flags: ListItemFlags) {
        let tag = if flags.term {
            "dt"
        } else if flags.definition_list {
            "dd"
        } else {
            "li"
        };
        writeln!(self.out, "<{tag}>{content}</{tag}>").unwrap();
    }

    pub fn table(&mut self, header: &str, body: &str) {
        writeln!(self.out, "<table>\n<thead>\n{header}</thead>\n{body}</table>").unwrap();
    }

    pub fn table_row(&mut self, content: &str) {
        writeln!(self.out, "<tr>{content}</tr>").unwrap();
    }

    /// `<th>` with an explicit alignment; unaligned columns are centered.
    pub fn table_header_cell(&mut self, content: &str, align: Alignment) {
        let align = match align {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center | Alignment::None => "center",
        };
        write!(self.out, "<th align=\"{align}\">{content}</th>").unwrap();
    }

    pub fn table_cell(&mut self, content: &str) {
        write!(self.out, "<td>{content}</td>").unwrap();
    }
}
