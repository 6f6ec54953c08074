//! Stateful RFC XML visitor.
//!
//! [`Xml2Renderer`] receives structural callbacks in document order and
//! appends RFC XML to an owned buffer. Most callbacks are one-shot tag
//! emission; the state carried between them covers:
//!
//! - the stack of open `<section>` containers,
//! - which matter container (`<front>`, `<middle>`, `<back>`) is open,
//! - whether the document wrapper and the references were already emitted,
//! - IALs waiting for the next block,
//! - citations collected for the references section.

use std::fmt::Write;

use rfcmark_meta::TitleMetadata;

use crate::citation::{CitationKind, CitationRecord, Citations};
use crate::ial::Ial;
use crate::naming::{BibxmlNaming, ReferenceNaming};
use crate::state::{Lifecycle, MatterPhase, RenderFlags};
use crate::util::{escape_attr, escape_text};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const XINCLUDE_NS: &str = "http://www.w3.org/2001/XInclude";

/// RFC XML renderer state and output buffer.
///
/// One instance renders one document. Inner content is supplied either
/// pre-rendered (`&str`) or as a closure that renders into `self` and
/// reports whether it produced anything.
///
/// # Example
///
/// ```
/// use rfcmark_renderer::{RenderFlags, Xml2Renderer};
///
/// let mut r = Xml2Renderer::new(RenderFlags::fragment());
/// r.heading(1, "intro", false, |r| {
///     r.normal_text("Introduction");
///     true
/// });
/// r.paragraph(|r| {
///     r.normal_text("Hello");
///     true
/// });
/// r.close_sections();
/// assert_eq!(
///     r.output(),
///     "\n<section anchor=\"intro\">\n<name>Introduction</name>\n<t>Hello</t>\n</section>\n"
/// );
/// ```
pub struct Xml2Renderer {
    pub(crate) out: String,
    flags: RenderFlags,
    /// Heading levels of the open sections, outermost first.
    sections: Vec<u8>,
    matter: MatterPhase,
    lifecycle: Lifecycle,
    references_emitted: bool,
    pending_ial: Vec<Ial>,
    title: Option<TitleMetadata>,
    citations: Citations,
    naming: Box<dyn ReferenceNaming>,
    warnings: Vec<String>,
}

impl Xml2Renderer {
    /// Create a renderer with the bibxml naming convention.
    #[must_use]
    pub fn new(flags: RenderFlags) -> Self {
        Self {
            out: String::with_capacity(4096),
            flags,
            sections: Vec::new(),
            matter: MatterPhase::Front,
            lifecycle: Lifecycle::NotStarted,
            references_emitted: false,
            pending_ial: Vec::new(),
            title: None,
            citations: Citations::default(),
            naming: Box::new(BibxmlNaming::default()),
            warnings: Vec::new(),
        }
    }

    /// Replace the naming convention used for citations without a filename.
    #[must_use]
    pub fn with_naming<N: ReferenceNaming + 'static>(mut self, naming: N) -> Self {
        self.naming = Box::new(naming);
        self
    }

    #[must_use]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    /// Rendered output so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.out
    }

    /// Byte length of the output so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Consume the renderer and return the output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.out
    }

    /// Number of currently open `<section>` containers.
    #[must_use]
    pub fn section_depth(&self) -> usize {
        self.sections.len()
    }

    /// Heading level of the innermost open section, 0 when none is open.
    #[must_use]
    pub fn section_level(&self) -> u8 {
        self.sections.last().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn matter(&self) -> MatterPhase {
        self.matter
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Title block captured by [`title_block`](Self::title_block).
    #[must_use]
    pub fn title(&self) -> Option<&TitleMetadata> {
        self.title.as_ref()
    }

    #[must_use]
    pub fn citations(&self) -> &Citations {
        &self.citations
    }

    /// Warnings about degraded input (skipped heading levels, unknown
    /// reference identifiers, unexpected matter transitions).
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub(crate) fn push_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Render into a scratch buffer and return what was produced.
    ///
    /// State changes made by `f` (sections, citations, IALs) are kept.
    pub fn capture<F>(&mut self, f: F) -> String
    where
        F: FnOnce(&mut Self),
    {
        let saved = self.begin_capture();
        f(self);
        self.end_capture(saved)
    }

    /// Redirect output into a fresh buffer, returning the previous one.
    pub(crate) fn begin_capture(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Restore the buffer saved by [`begin_capture`](Self::begin_capture)
    /// and return what was captured since.
    pub(crate) fn end_capture(&mut self, saved: String) -> String {
        std::mem::replace(&mut self.out, saved)
    }

    /// Append already rendered XML.
    pub(crate) fn push_rendered(&mut self, xml: &str) {
        self.out.push_str(xml);
    }

    /// Render `open`, the inner content and `close`, or nothing at all when
    /// `inner` reports no output.
    pub(crate) fn render_or_discard<F>(&mut self, open: &str, inner: F, close: &str) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let saved = self.begin_capture();
        self.out.push_str(open);
        let produced = inner(self);
        let scratch = self.end_capture(saved);
        if produced {
            self.out.push_str(&scratch);
            self.out.push_str(close);
        }
        produced
    }

    /// Queue IALs for the next block that consumes attributes.
    pub fn set_ial(&mut self, ials: impl IntoIterator<Item = Ial>) {
        self.pending_ial.extend(ials);
    }

    /// Take and clear the queued IALs.
    pub fn take_ial(&mut self) -> Vec<Ial> {
        std::mem::take(&mut self.pending_ial)
    }

    /// Whether IALs are waiting for a block.
    #[must_use]
    pub fn has_pending_ial(&self) -> bool {
        !self.pending_ial.is_empty()
    }

    /// Handle a heading.
    ///
    /// A `quoted` heading (inside a figure, note or other container) only
    /// becomes a `<name>`. Otherwise every open section at the same or a
    /// deeper level is closed and a new `<section>` is opened. Skipped levels
    /// produce a warning but no intermediate sections.
    pub fn heading<F>(&mut self, level: u8, anchor: &str, quoted: bool, title: F)
    where
        F: FnOnce(&mut Self) -> bool,
    {
        if quoted {
            self.out.push_str("<name>");
            title(self);
            self.out.push_str("</name>\n");
            return;
        }

        let level = level.max(1);
        let previous = self.section_level();
        if level > previous.saturating_add(1) {
            tracing::warn!(level, previous, anchor, "Heading level skipped");
            self.push_warning(format!(
                "heading '{anchor}' jumps from level {previous} to level {level}"
            ));
        }

        while self.sections.last().is_some_and(|&open| open >= level) {
            self.sections.pop();
            self.out.push_str("</section>\n");
        }

        write!(self.out, "\n<section anchor=\"{}\">\n<name>", escape_attr(anchor)).unwrap();
        title(self);
        self.out.push_str("</name>\n");
        self.sections.push(level);
    }

    /// Close every open section.
    ///
    /// The footer does this for standalone documents; fragments call it
    /// directly to balance their sections.
    pub fn close_sections(&mut self) {
        while self.sections.pop().is_some() {
            self.out.push_str("</section>\n");
        }
    }

    /// Emit the XML declaration. Fires once, in standalone mode only.
    pub fn document_header(&mut self) {
        if !self.flags.standalone || self.lifecycle != Lifecycle::NotStarted {
            return;
        }
        self.out.push_str(XML_DECLARATION);
        self.lifecycle = Lifecycle::HeaderEmitted;
    }

    /// Open `<rfc>` and `<front>` and render the title block.
    ///
    /// Fires once, in standalone mode only; empty fields are left out.
    pub fn title_block(&mut self, meta: TitleMetadata) {
        if !self.flags.standalone || self.title.is_some() {
            return;
        }

        write!(self.out, r#"<rfc xmlns:xi="{XINCLUDE_NS}""#).unwrap();
        push_attr(&mut self.out, "ipr", &meta.ipr);
        push_attr(&mut self.out, "category", &meta.category);
        push_attr(&mut self.out, "docName", &meta.doc_name);
        self.out.push_str(">\n");
        self.out.push_str(MatterPhase::Front.open_tag());

        if !meta.title.is_empty() || !meta.abbrev.is_empty() {
            self.out.push_str("<title");
            push_attr(&mut self.out, "abbrev", &meta.abbrev);
            write!(self.out, ">{}</title>\n\n", escape_text(&meta.title)).unwrap();
        }

        self.out.push_str("<date");
        if let Some(year) = meta.date.year {
            write!(self.out, r#" year="{year}""#).unwrap();
        }
        if let Some(month) = meta.date.month_name() {
            write!(self.out, r#" month="{month}""#).unwrap();
        }
        if let Some(day) = meta.date.day {
            write!(self.out, r#" day="{day}""#).unwrap();
        }
        self.out.push_str("/>\n\n");

        push_element(&mut self.out, "area", &meta.area);
        push_element(&mut self.out, "workgroup", &meta.workgroup);
        for keyword in &meta.keywords {
            push_element(&mut self.out, "keyword", keyword);
        }
        for author in &meta.authors {
            self.out.push_str("<author>\n");
            push_element(&mut self.out, "initials", &author.initials);
            push_element(&mut self.out, "surname", &author.surname);
            push_element(&mut self.out, "fullname", &author.fullname);
            push_element(&mut self.out, "role", &author.role);
            push_element(&mut self.out, "ascii", &author.ascii);
            self.out.push_str("</author>\n");
        }
        self.out.push('\n');

        self.title = Some(meta);
    }

    /// Move to another matter container.
    ///
    /// Open sections are closed first. Front→Main, Main→Back and Front→Back
    /// are honoured; moving back to an earlier matter is ignored.
    pub fn matter_transition(&mut self, phase: MatterPhase) {
        if !self.flags.standalone || phase == self.matter {
            return;
        }
        if phase == MatterPhase::Front || self.matter == MatterPhase::Back {
            tracing::warn!(from = ?self.matter, to = ?phase, "Ignoring matter transition");
            self.push_warning(format!(
                "cannot move from {:?} matter back to {phase:?} matter",
                self.matter
            ));
            return;
        }

        self.close_sections();
        self.out.push_str(self.matter.close_tag());
        self.out.push_str(phase.open_tag());
        self.matter = phase;
    }

    /// Close open sections, the open matter and the `<rfc>` element.
    /// Fires once, in standalone mode only.
    pub fn document_footer(&mut self) {
        if !self.flags.standalone || self.lifecycle == Lifecycle::FooterEmitted {
            return;
        }
        self.close_sections();
        self.out.push_str(self.matter.close_tag());
        self.out.push_str("</rfc>\n");
        self.lifecycle = Lifecycle::FooterEmitted;
    }

    /// Record a citation and emit an `<xref>` to it.
    pub fn citation(&mut self, record: CitationRecord) {
        write!(self.out, r#"<xref target="{}"/>"#, escape_attr(&record.target)).unwrap();
        self.citations.insert(record);
    }

    /// Emit the references section.
    ///
    /// Fires once, in standalone mode only. Closes open sections and the
    /// current matter, opens `<back>`, then emits one `<references>` group
    /// per citation kind that has citations: informative first, normative
    /// second.
    pub fn references(&mut self) {
        if !self.flags.standalone || self.references_emitted {
            return;
        }
        self.references_emitted = true;

        self.close_sections();
        if self.matter != MatterPhase::Back {
            self.out.push_str(self.matter.close_tag());
            self.out.push_str(MatterPhase::Back.open_tag());
            self.matter = MatterPhase::Back;
        }

        tracing::debug!(citations = self.citations.len(), "Emitting references");

        for kind in [CitationKind::Informative, CitationKind::Normative] {
            let entries: Vec<(String, Option<String>)> = self
                .citations
                .of_kind(kind)
                .map(|c| {
                    let file = c
                        .filename
                        .clone()
                        .or_else(|| self.naming.filename(&c.target));
                    (c.target.clone(), file)
                })
                .collect();
            let mut files = Vec::with_capacity(entries.len());
            for (target, file) in entries {
                match file {
                    Some(file) => files.push(file),
                    None => {
                        tracing::warn!(citation = %target, "No reference file for citation");
                        self.push_warning(format!(
                            "no reference file known for citation '{target}'"
                        ));
                    }
                }
            }
            if files.is_empty() {
                continue;
            }

            writeln!(self.out, r#"<references title="{}">"#, kind.group_title()).unwrap();
            for file in files {
                writeln!(self.out, "\t<xi:include href=\"{}\"/>", escape_attr(&file)).unwrap();
            }
            self.out.push_str("</references>\n");
        }
    }
}

/// Append ` name="value"` unless `value` is empty.
fn push_attr(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        write!(out, r#" {name}="{}""#, escape_attr(value)).unwrap();
    }
}

/// Append `<name>value</name>\n` unless `value` is empty.
fn push_element(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        writeln!(out, "<{name}>{}</{name}>", escape_text(value)).unwrap();
    }
}
