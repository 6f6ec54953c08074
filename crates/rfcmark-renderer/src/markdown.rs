//! Markdown driver.
//!
//! [`MarkdownConverter`] parses markdown with pulldown-cmark and drives an
//! [`Xml2Renderer`]. Container content is rendered into a capture buffer per
//! open element (a frame) and handed to the matching emitter when the element
//! ends.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{
    Alignment, BlockQuoteKind, CodeBlockKind, Event, LinkType, Options, Parser, Tag,
    TextMergeStream,
};
use regex::Regex;
use rfcmark_meta::TitleMetadata;

use crate::blocks::{ListItemFlags, ListKind};
use crate::citation::CitationRecord;
use crate::ial::Ial;
use crate::inline::AutolinkKind;
use crate::naming::ReferenceNaming;
use crate::renderer::Xml2Renderer;
use crate::state::{MatterPhase, RenderFlags};
use crate::util::{escape_text, heading_level_to_num, slugify};

/// Citations `[@id]`, `[@?id]`, `[@!id]`, cross references `(#anchor)` and
/// index terms `(!!primary, secondary)` inside text.
static INLINE_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[@([!?]?)([^\[\]\s]+)\]|\(#([A-Za-z_][\w.:-]*)\)|\(!!([^()]+)\)")
        .expect("invalid inline syntax regex")
});

/// Result of converting a markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered RFC XML.
    pub xml: String,
    /// Title from the title block, else the first level 1 heading.
    pub title: Option<String>,
    /// Warnings about degraded input.
    pub warnings: Vec<String>,
}

/// Markdown to RFC XML converter.
///
/// # Example
///
/// ```
/// use rfcmark_renderer::{MarkdownConverter, RenderFlags};
///
/// let result = MarkdownConverter::new()
///     .with_flags(RenderFlags::fragment())
///     .convert("Implementations **MUST** comply.");
/// assert_eq!(result.xml, "<t>Implementations <bcp14>MUST</bcp14> comply.</t>\n");
/// ```
pub struct MarkdownConverter {
    flags: RenderFlags,
    naming: Option<Box<dyn ReferenceNaming>>,
}

impl MarkdownConverter {
    /// Create a converter producing standalone documents.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: RenderFlags::standalone(),
            naming: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: RenderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Use `naming` for citations without an explicit filename.
    #[must_use]
    pub fn with_naming<N: ReferenceNaming + 'static>(mut self, naming: N) -> Self {
        self.naming = Some(Box::new(naming));
        self
    }

    /// Parser options: tables, strikethrough, heading attributes, definition
    /// lists, GFM alerts and `+++` title blocks.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM
            | Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS
    }

    /// Convert a markdown document.
    #[must_use]
    pub fn convert(self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, Self::parser_options());

        let filenames = parser
            .reference_definitions()
            .iter()
            .filter_map(|(label, def)| {
                parse_citation_label(label).map(|record| {
                    (
                        record.target.to_lowercase(),
                        (record.target, def.dest.to_string()),
                    )
                })
            })
            .collect();

        let mut renderer = Xml2Renderer::new(self.flags);
        if let Some(naming) = self.naming {
            renderer = renderer.with_naming(naming);
        }

        Driver::new(renderer, filenames).run(TextMergeStream::new(parser))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `@id`, `@?id` or `@!id` link label into a citation.
fn parse_citation_label(label: &str) -> Option<CitationRecord> {
    let label = label.strip_prefix('@')?;
    let record = if let Some(target) = label.strip_prefix('!') {
        CitationRecord::normative(target)
    } else {
        CitationRecord::informative(label.strip_prefix('?').unwrap_or(label))
    };
    if record.target.is_empty() || record.target.contains(char::is_whitespace) {
        return None;
    }
    Some(record)
}

#[derive(Debug)]
struct TableFrame {
    alignments: Vec<Alignment>,
    header: String,
    cell: usize,
}

#[derive(Debug)]
enum FrameKind {
    Paragraph,
    Heading {
        level: u8,
        id: Option<String>,
        classes: Vec<String>,
    },
    BlockQuote(Option<BlockQuoteKind>),
    CodeBlock(Option<String>),
    HtmlBlock,
    Metadata,
    List(ListKind),
    Item(ListItemFlags),
    Table(TableFrame),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Passthrough,
    Link(String),
    Autolink(String, AutolinkKind),
    Citation(CitationRecord),
    Image {
        dest: String,
        title: String,
    },
    /// Blocks after an `{.abstract}` heading.
    Abstract,
    /// Blocks after a `{.note}` heading.
    NoteSection,
    Ignored,
}

impl FrameKind {
    /// Scopes opened by a heading and closed by the next one.
    fn is_section_scope(&self) -> bool {
        matches!(self, Self::Abstract | Self::NoteSection)
    }

    /// Whether text inside the frame is rendered, or only collected.
    fn renders_text(&self) -> bool {
        !matches!(
            self,
            Self::CodeBlock(_)
                | Self::HtmlBlock
                | Self::Metadata
                | Self::Image { .. }
                | Self::Citation(_)
                | Self::Autolink(..)
        )
    }
}

/// Inner content of an emphasis nested as the sole child of an emphasis of
/// the other strength, for `***text***`.
#[derive(Debug)]
struct Nested {
    inner: String,
    rendered: String,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    saved: String,
    /// Plain text of the frame and its descendants.
    text: String,
    /// Plain text directly inside the frame.
    direct_text: String,
    children: usize,
    images: usize,
    nested: Option<Nested>,
}

struct Driver {
    r: Xml2Renderer,
    frames: Vec<Frame>,
    /// Reference definitions by lowercased label: defined target and file.
    filenames: HashMap<String, (String, String)>,
    anchors: HashMap<String, usize>,
    front_opened: bool,
    title: Option<String>,
    first_heading: Option<String>,
}

impl Driver {
    fn new(r: Xml2Renderer, filenames: HashMap<String, (String, String)>) -> Self {
        Self {
            r,
            frames: Vec::new(),
            filenames,
            anchors: HashMap::new(),
            front_opened: false,
            title: None,
            first_heading: None,
        }
    }

    fn run<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        self.r.document_header();
        for event in events {
            self.process_event(event);
        }
        self.ensure_front();
        while !self.frames.is_empty() {
            self.end_frame();
        }

        if !self.r.citations().is_empty() {
            self.r.references();
        }
        if self.r.flags().standalone {
            self.r.document_footer();
        } else {
            self.r.close_sections();
        }

        let warnings = self.r.take_warnings();
        RenderResult {
            xml: self.r.into_output(),
            title: self.title.or(self.first_heading),
            warnings,
        }
    }

    /// Open `<rfc>` and `<front>` with an empty title block if the document
    /// has none.
    fn ensure_front(&mut self) {
        if !self.front_opened {
            self.front_opened = true;
            self.r.title_block(TitleMetadata::default());
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        if !self.front_opened
            && !matches!(event, Event::Start(Tag::MetadataBlock(_)))
            && !self
                .frames
                .last()
                .is_some_and(|f| matches!(f.kind, FrameKind::Metadata))
        {
            self.ensure_front();
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_frame(),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.children += 1;
                    frame.text.push_str(&code);
                }
                self.r.code_span(&code);
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.r.line_break(),
            Event::Rule
            | Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading {
                level, id, classes, ..
            } => {
                if !self.in_container() {
                    self.close_section_scopes();
                }
                FrameKind::Heading {
                    level: heading_level_to_num(level),
                    id: id.map(|id| id.to_string()),
                    classes: classes.iter().map(ToString::to_string).collect(),
                }
            }
            Tag::BlockQuote(kind) => FrameKind::BlockQuote(kind),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(ToOwned::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                FrameKind::CodeBlock(lang)
            }
            Tag::HtmlBlock => FrameKind::HtmlBlock,
            Tag::MetadataBlock(_) => FrameKind::Metadata,
            Tag::List(start) => FrameKind::List(match start {
                Some(start) => ListKind::Ordered { start },
                None => ListKind::Unordered,
            }),
            Tag::Item => FrameKind::Item(ListItemFlags::default()),
            Tag::DefinitionList => FrameKind::List(ListKind::Definition),
            Tag::DefinitionListTitle => FrameKind::Item(ListItemFlags {
                definition_list: true,
                term: true,
            }),
            Tag::DefinitionListDefinition => FrameKind::Item(ListItemFlags {
                definition_list: true,
                term: false,
            }),
            Tag::Table(alignments) => FrameKind::Table(TableFrame {
                alignments,
                header: String::new(),
                cell: 0,
            }),
            Tag::TableHead => {
                self.reset_table_cell();
                FrameKind::TableHead
            }
            Tag::TableRow => {
                self.reset_table_cell();
                FrameKind::TableRow
            }
            Tag::TableCell => FrameKind::TableCell,
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Strikethrough => FrameKind::Strikethrough,
            Tag::Superscript | Tag::Subscript => FrameKind::Passthrough,
            Tag::Link {
                link_type,
                dest_url,
                id,
                ..
            } => match link_type {
                LinkType::Autolink => FrameKind::Autolink(dest_url.to_string(), AutolinkKind::Uri),
                LinkType::Email => FrameKind::Autolink(dest_url.to_string(), AutolinkKind::Email),
                _ => match parse_citation_label(&id) {
                    Some(record) => FrameKind::Citation(self.resolve_citation(record)),
                    None => FrameKind::Link(dest_url.to_string()),
                },
            },
            Tag::Image {
                dest_url, title, ..
            } => FrameKind::Image {
                dest: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::FootnoteDefinition(_) => FrameKind::Ignored,
        };
        self.push_frame(kind);
    }

    fn push_frame(&mut self, kind: FrameKind) {
        if let Some(parent) = self.frames.last_mut() {
            parent.children += 1;
            if matches!(kind, FrameKind::Image { .. }) {
                parent.images += 1;
            }
        }
        let saved = self.r.begin_capture();
        self.frames.push(Frame {
            kind,
            saved,
            text: String::new(),
            direct_text: String::new(),
            children: 0,
            images: 0,
            nested: None,
        });
    }

    #[allow(clippy::too_many_lines)]
    fn end_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let content = self.r.end_capture(frame.saved);
        if let Some(parent) = self.frames.last_mut() {
            parent.text.push_str(&frame.text);
        }

        match frame.kind {
            FrameKind::Paragraph => {
                self.end_paragraph(&frame.direct_text, frame.children, frame.images, &content);
            }
            FrameKind::Heading { level, id, classes } => {
                self.end_heading(level, id, &classes, &frame.text, &content);
            }
            FrameKind::BlockQuote(None) => self.r.block_quote(&content),
            FrameKind::BlockQuote(Some(BlockQuoteKind::Note)) => self.r.note(&content),
            FrameKind::BlockQuote(Some(_)) => self.r.aside(&content),
            FrameKind::CodeBlock(lang) => {
                self.r.code_block(lang.as_deref(), &escape_text(&frame.text));
            }
            FrameKind::HtmlBlock => self.r.raw_block(&escape_text(&frame.text)),
            FrameKind::Metadata => self.end_metadata(&frame.text),
            FrameKind::List(kind) => {
                self.r.list(kind, |r| {
                    r.push_rendered(&content);
                    !content.is_empty()
                });
            }
            FrameKind::Item(flags) => self.r.list_item(&content, flags),
            FrameKind::Table(table) => self.r.table(&table.header, &content),
            FrameKind::TableHead => {
                let row = self.r.capture(|r| r.table_row(&content));
                if let Some(table) = self.table_mut() {
                    table.header = row;
                }
            }
            FrameKind::TableRow => self.r.table_row(&content),
            FrameKind::TableCell => {
                let in_head = self
                    .frames
                    .last()
                    .is_some_and(|f| matches!(f.kind, FrameKind::TableHead));
                let align = self.table_mut().map_or(Alignment::None, |table| {
                    let align = table
                        .alignments
                        .get(table.cell)
                        .copied()
                        .unwrap_or(Alignment::None);
                    table.cell += 1;
                    align
                });
                if in_head {
                    self.r.table_header_cell(&content, align);
                } else {
                    self.r.table_cell(&content);
                }
            }
            FrameKind::Emphasis => {
                let rendered = match frame.nested {
                    Some(nested) if nested.rendered == content => {
                        self.r.capture(|r| r.triple_emphasis(&nested.inner))
                    }
                    _ => self.r.capture(|r| r.emphasis(&content)),
                };
                self.push_emphasis(rendered, content, |kind| matches!(kind, FrameKind::Strong));
            }
            FrameKind::Strong => {
                let rendered = match frame.nested {
                    Some(nested) if nested.rendered == content => {
                        self.r.capture(|r| r.triple_emphasis(&nested.inner))
                    }
                    _ => self.r.capture(|r| r.double_emphasis(&content)),
                };
                self.push_emphasis(rendered, content, |kind| {
                    matches!(kind, FrameKind::Emphasis)
                });
            }
            FrameKind::Strikethrough => self.r.strikethrough(&content),
            FrameKind::Passthrough => self.r.push_rendered(&content),
            FrameKind::Link(dest) => self.r.link(&dest, &content),
            FrameKind::Autolink(dest, kind) => self.r.autolink(&dest, kind),
            FrameKind::Citation(record) => self.r.citation(record),
            FrameKind::Image { dest, title } => self.r.image(&dest, &title, &frame.text),
            FrameKind::Abstract => self.r.abstract_block(&content),
            FrameKind::NoteSection => self.r.note(&content),
            FrameKind::Ignored => {}
        }
    }

    /// Emit a rendered emphasis and offer it to a parent emphasis of the
    /// other strength.
    fn push_emphasis(
        &mut self,
        rendered: String,
        inner: String,
        is_complement: impl Fn(&FrameKind) -> bool,
    ) {
        self.r.push_rendered(&rendered);
        if let Some(parent) = self.frames.last_mut()
            && is_complement(&parent.kind)
            && parent.children == 1
        {
            parent.nested = Some(Nested { inner, rendered });
        }
    }

    fn end_paragraph(&mut self, direct_text: &str, children: usize, images: usize, content: &str) {
        if children == 0 {
            if !self.in_container()
                && let Some(phase) = MatterPhase::from_marker(direct_text)
            {
                self.close_section_scopes();
                if phase == MatterPhase::Back && self.r.flags().standalone {
                    self.r.references();
                } else {
                    self.r.matter_transition(phase);
                }
                return;
            }
            if let Some(ial) = Ial::parse(direct_text) {
                self.r.set_ial([ial]);
                return;
            }
        }

        if children == 1 && images == 1 && direct_text.trim().is_empty() {
            self.r.figure(content);
            return;
        }

        self.r.paragraph(|r| {
            r.push_rendered(content);
            !content.trim().is_empty()
        });
    }

    fn end_heading(
        &mut self,
        level: u8,
        id: Option<String>,
        classes: &[String],
        text: &str,
        content: &str,
    ) {
        let anchor = id.unwrap_or_else(|| self.unique_anchor(text));
        if level == 1 && self.first_heading.is_none() {
            self.first_heading = Some(text.trim().to_owned());
        }
        let title = |r: &mut Xml2Renderer| {
            r.push_rendered(content);
            true
        };

        if self.in_container() {
            self.r.heading(level, &anchor, true, title);
        } else if classes.iter().any(|c| c == "abstract") {
            self.push_frame(FrameKind::Abstract);
        } else if classes.iter().any(|c| c == "note") {
            self.push_frame(FrameKind::NoteSection);
            self.r.heading(level, &anchor, true, title);
        } else {
            self.r.heading(level, &anchor, false, title);
        }
    }

    fn end_metadata(&mut self, source: &str) {
        self.front_opened = true;
        let meta = match TitleMetadata::from_toml(source) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid title block");
                self.r.push_warning(e.to_string());
                TitleMetadata::default()
            }
        };
        if !meta.title.is_empty() {
            self.title = Some(meta.title.clone());
        }
        self.r.title_block(meta);
    }

    fn text(&mut self, text: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.text.push_str(text);
            frame.direct_text.push_str(text);
            if !frame.kind.renders_text() {
                return;
            }
        }
        self.inline_text(text);
    }

    fn soft_break(&mut self) {
        match self.frames.last_mut() {
            Some(frame) if !frame.kind.renders_text() => frame.text.push('\n'),
            Some(frame) => {
                frame.text.push(' ');
                frame.direct_text.push(' ');
                self.r.normal_text("\n");
            }
            None => self.r.normal_text("\n"),
        }
    }

    /// Render text, expanding citations, cross references and index terms.
    fn inline_text(&mut self, text: &str) {
        let mut last = 0;
        for caps in INLINE_SYNTAX.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            self.r.normal_text(&text[last..whole.start()]);
            last = whole.end();

            if let Some(target) = caps.get(2) {
                let target = target.as_str();
                let record = match caps.get(1).map(|m| m.as_str()) {
                    Some("!") => CitationRecord::normative(target),
                    _ => CitationRecord::informative(target),
                };
                let record = self.resolve_citation(record);
                self.r.citation(record);
            } else if let Some(anchor) = caps.get(3) {
                self.r.cross_reference(anchor.as_str());
            } else if let Some(term) = caps.get(4) {
                let (primary, secondary) = term.as_str().split_once(',').unwrap_or((term.as_str(), ""));
                self.r.index_term(primary.trim(), secondary.trim());
            }
        }
        self.r.normal_text(&text[last..]);
    }

    /// Match a citation against the reference definitions.
    ///
    /// Labels match case-insensitively; a match takes the defined spelling
    /// as its target and the defined file.
    fn resolve_citation(&self, record: CitationRecord) -> CitationRecord {
        match self.filenames.get(&record.target.to_lowercase()) {
            Some((target, file)) => CitationRecord {
                target: target.clone(),
                ..record
            }
            .with_filename(file.clone()),
            None => record,
        }
    }

    /// Whether a non-section block (quote, list, table, ...) is open.
    fn in_container(&self) -> bool {
        self.frames.iter().any(|f| !f.kind.is_section_scope())
    }

    fn close_section_scopes(&mut self) {
        while self
            .frames
            .last()
            .is_some_and(|f| f.kind.is_section_scope())
        {
            self.end_frame();
        }
    }

    fn table_mut(&mut self) -> Option<&mut TableFrame> {
        self.frames.iter_mut().rev().find_map(|f| match &mut f.kind {
            FrameKind::Table(table) => Some(table),
            _ => None,
        })
    }

    fn reset_table_cell(&mut self) {
        if let Some(table) = self.table_mut() {
            table.cell = 0;
        }
    }

    /// Slug of the heading text, made unique with a numeric suffix.
    fn unique_anchor(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_owned();
        }
        let count = self.anchors.entry(base.clone()).or_default();
        let anchor = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        anchor
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::naming::BibxmlNaming;

    fn fragment(markdown: &str) -> String {
        MarkdownConverter::new()
            .with_flags(RenderFlags::fragment())
            .convert(markdown)
            .xml
    }

    fn standalone(markdown: &str) -> RenderResult {
        MarkdownConverter::new().convert(markdown)
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            fragment("# Intro\n\nHello **MUST** world.\n"),
            concat!(
                "\n<section anchor=\"intro\">\n<name>Intro</name>\n",
                "<t>Hello <bcp14>MUST</bcp14> world.</t>\n",
                "</section>\n",
            )
        );
    }

    #[test]
    fn test_strong_non_keyword() {
        assert_eq!(
            fragment("**Important**\n"),
            "<t><strong>Important</strong></t>\n"
        );
    }

    #[test]
    fn test_triple_emphasis() {
        assert_eq!(fragment("***x***\n"), "<t><strong><em>x</em></strong></t>\n");
    }

    #[test]
    fn test_nested_emphasis_with_other_text() {
        assert_eq!(
            fragment("*a **b***\n"),
            "<t><em>a <strong>b</strong></em></t>\n"
        );
    }

    #[test]
    fn test_heading_anchor_dedup() {
        let xml = fragment("# Setup\n\n# Setup\n\n## Setup\n");
        assert!(xml.contains(r#"<section anchor="setup">"#));
        assert!(xml.contains(r#"<section anchor="setup-1">"#));
        assert!(xml.contains(r#"<section anchor="setup-2">"#));
    }

    #[test]
    fn test_heading_explicit_anchor() {
        let xml = fragment("# Introduction {#sec-intro}\n");
        assert!(xml.contains("<section anchor=\"sec-intro\">\n<name>Introduction</name>"));
    }

    #[test]
    fn test_level_skip_warns() {
        let result = MarkdownConverter::new()
            .with_flags(RenderFlags::fragment())
            .convert("# A\n\n### C\n");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.xml.matches("</section>").count(), 2);
    }

    #[test]
    fn test_code_block_escaped() {
        assert_eq!(
            fragment("```c\na < b && c\n```\n"),
            "\n<sourcecode type=\"c\">\na &lt; b &amp;&amp; c\n</sourcecode>\n"
        );
    }

    #[test]
    fn test_indented_code_block() {
        assert_eq!(
            fragment("    x = 1\n"),
            "<sourcecode>\nx = 1\n</sourcecode>\n"
        );
    }

    #[test]
    fn test_html_block_escaped() {
        assert_eq!(
            fragment("<div>\nhi\n</div>\n"),
            "<artwork>\n&lt;div&gt;\nhi\n&lt;/div&gt;\n</artwork>\n"
        );
    }

    #[test]
    fn test_ial_applies_to_block_quote() {
        assert_eq!(
            fragment("{#q1}\n\n> quoted\n"),
            "<blockquote anchor=\"q1\">\n<t>quoted</t>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_ial_applies_to_code_block() {
        assert_eq!(
            fragment("{: #abnf markers=\"true\"}\n\n```abnf\nrule\n```\n"),
            "\n<sourcecode anchor=\"abnf\" markers=\"true\" type=\"abnf\">\nrule\n</sourcecode>\n"
        );
    }

    #[test]
    fn test_braced_text_is_not_ial() {
        assert_eq!(fragment("{ hello }\n"), "<t>{ hello }</t>\n");
    }

    #[test]
    fn test_gfm_note_alert() {
        assert_eq!(
            fragment("> [!NOTE]\n> Be careful.\n"),
            "<note>\n<t>Be careful.</t>\n</note>\n"
        );
    }

    #[test]
    fn test_gfm_warning_alert_is_aside() {
        assert_eq!(
            fragment("> [!WARNING]\n> Danger.\n"),
            "<aside>\n<t>Danger.</t>\n</aside>\n"
        );
    }

    #[test]
    fn test_heading_in_block_quote_is_quoted() {
        assert_eq!(
            fragment("> # Title\n>\n> text\n"),
            "<blockquote>\n<name>Title</name>\n<t>text</t>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_image_paragraph_is_figure() {
        assert_eq!(
            fragment("![Arch](arch.svg)\n"),
            "<figure>\n<artwork src=\"arch.svg\" alt=\"Arch\"/></figure>\n"
        );
    }

    #[test]
    fn test_inline_image_stays_in_paragraph() {
        assert_eq!(
            fragment("See ![logo](https://example.com/l.png) here.\n"),
            "<t>See <eref target=\"https://example.com/l.png\">logo</eref> here.</t>\n"
        );
    }

    #[test]
    fn test_cross_reference_and_index_term() {
        assert_eq!(
            fragment("See (#intro) (!!DNS, resolver).\n"),
            concat!(
                "<t>See <xref target=\"intro\"/> ",
                "<iref item=\"DNS\" subitem=\"resolver\"/>.</t>\n",
            )
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            fragment("[site](https://example.org) and [intro](#intro)\n"),
            concat!(
                "<t><eref target=\"https://example.org\">site</eref> and ",
                "<xref target=\"intro\">intro</xref></t>\n",
            )
        );
        assert_eq!(
            fragment("<https://example.org>\n"),
            "<t><eref target=\"https://example.org\"/></t>\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            fragment("- a\n- b\n"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
        );
        assert_eq!(fragment("3. x\n"), "<ol start=\"3\">\n<li>x</li>\n</ol>\n");
    }

    #[test]
    fn test_definition_list() {
        let xml = fragment("Term\n: Meaning\n");
        assert!(xml.starts_with("<dl>\n<dt>Term</dt>\n<dd>"));
        assert!(xml.contains("Meaning"));
        assert!(xml.ends_with("</dd>\n</dl>\n"));
    }

    #[test]
    fn test_table() {
        assert_eq!(
            fragment("| A | B |\n|:--|--:|\n| 1 | 2 |\n"),
            concat!(
                "<table>\n<thead>\n",
                "<tr><th align=\"left\">A</th><th align=\"right\">B</th></tr>\n",
                "</thead>\n",
                "<tr><td>1</td><td>2</td></tr>\n",
                "</table>\n",
            )
        );
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(fragment("a  \nb\n"), "<t>a\n<vspace/>\nb</t>\n");
    }

    #[test]
    fn test_fragment_has_no_wrapper() {
        let xml = fragment("{mainmatter}\n\nUse [@!RFC2119].\n");
        assert_eq!(xml, "<t>Use <xref target=\"RFC2119\"/>.</t>\n");
    }

    #[test]
    fn test_standalone_document() {
        let result = standalone(concat!(
            "+++\ntitle = \"Test\"\n+++\n\n",
            "{mainmatter}\n\n",
            "# Intro\n\n",
            "Use [@!RFC2119].\n",
        ));
        assert_eq!(
            result.xml,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<rfc xmlns:xi=\"http://www.w3.org/2001/XInclude\">\n",
                "<front>\n",
                "<title>Test</title>\n\n",
                "<date/>\n\n",
                "\n",
                "</front>\n",
                "<middle>\n",
                "\n<section anchor=\"intro\">\n<name>Intro</name>\n",
                "<t>Use <xref target=\"RFC2119\"/>.</t>\n",
                "</section>\n",
                "</middle>\n",
                "<back>\n",
                "<references title=\"Normative References\">\n",
                "\t<xi:include href=\"reference.RFC.2119.xml\"/>\n",
                "</references>\n",
                "</back>\n",
                "</rfc>\n",
            )
        );
        assert_eq!(result.title.as_deref(), Some("Test"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_standalone_without_title_block() {
        let result = standalone("# Intro\n");
        assert!(result.xml.starts_with(concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<rfc xmlns:xi=\"http://www.w3.org/2001/XInclude\">\n<front>\n",
        )));
        assert!(result.xml.ends_with("</section>\n</front>\n</rfc>\n"));
        assert_eq!(result.title.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_invalid_title_block_warns() {
        let result = standalone("+++\ntitle = \n+++\n\nText\n");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.xml.contains("<front>\n"));
        assert!(result.xml.contains("<t>Text</t>\n"));
    }

    #[test]
    fn test_citation_groups_and_order() {
        let result = standalone(concat!(
            "{mainmatter}\n\n",
            "See [@!RFC1034], [@?RFC1035] and [@RFC2119].\n",
        ));
        let xml = &result.xml;
        let informative = xml.find("Informative References").unwrap();
        let normative = xml.find("Normative References").unwrap();
        assert!(informative < normative);
        let rfc1035 = xml.find("reference.RFC.1035.xml").unwrap();
        let rfc2119 = xml.find("reference.RFC.2119.xml").unwrap();
        assert!(rfc1035 < rfc2119);
        assert!(rfc2119 < normative);
        assert!(xml.find("reference.RFC.1034.xml").unwrap() > normative);
    }

    #[test]
    fn test_citation_explicit_filename() {
        let result = standalone(concat!(
            "Cited [@RFC7511] and [@!RFC7511].\n\n",
            "[@RFC7511]: bib/rfc7511.xml\n",
        ));
        assert!(result.xml.contains("\t<xi:include href=\"bib/rfc7511.xml\"/>\n"));
        assert!(!result.xml.contains("reference.RFC.7511.xml"));
        assert!(result.xml.contains("<references title=\"Normative References\">"));
        assert!(!result.xml.contains("Informative References"));
    }

    #[test]
    fn test_citation_labels_match_case_insensitively() {
        let result = standalone(concat!(
            "{mainmatter}\n\n",
            "See [@rfc2119] and [@!RFC2119].\n\n",
            "[@RFC2119]: custom.xml\n",
        ));
        let xml = &result.xml;
        assert_eq!(xml.matches("custom.xml").count(), 1);
        assert_eq!(xml.matches("<xref target=\"RFC2119\"/>").count(), 2);
        assert!(!xml.contains("Informative References"));
        assert!(xml.contains(concat!(
            "<references title=\"Normative References\">\n",
            "\t<xi:include href=\"custom.xml\"/>\n",
            "</references>\n",
        )));
    }

    #[test]
    fn test_references_precede_back_matter_sections() {
        let result = standalone(concat!(
            "{mainmatter}\n\n",
            "# Intro\n\n",
            "See [@!RFC2119].\n\n",
            "{backmatter}\n\n",
            "# Appendix\n\n",
            "Text.\n",
        ));
        assert!(result.xml.ends_with(concat!(
            "</section>\n",
            "</middle>\n",
            "<back>\n",
            "<references title=\"Normative References\">\n",
            "\t<xi:include href=\"reference.RFC.2119.xml\"/>\n",
            "</references>\n",
            "\n<section anchor=\"appendix\">\n<name>Appendix</name>\n",
            "<t>Text.</t>\n",
            "</section>\n",
            "</back>\n",
            "</rfc>\n",
        )));
    }

    #[test]
    fn test_unresolvable_citation_emits_no_group() {
        let result = standalone("{mainmatter}\n\nSee [@W3C.REC-xml].\n");
        assert!(!result.xml.contains("<references"));
        assert!(result.xml.ends_with("</middle>\n<back>\n</back>\n</rfc>\n"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_custom_naming() {
        let result = MarkdownConverter::new()
            .with_naming(BibxmlNaming::with_directory("refs"))
            .convert("[@RFC8174]\n");
        assert!(result.xml.contains("href=\"refs/reference.RFC.8174.xml\""));
    }

    #[test]
    fn test_abstract_and_matter() {
        let result = standalone(concat!(
            "# Abstract {.abstract}\n\n",
            "This is it.\n\n",
            "{mainmatter}\n\n",
            "# Intro\n\n",
            "{backmatter}\n\n",
            "# Appendix\n",
        ));
        let xml = &result.xml;
        assert!(xml.contains(concat!(
            "<abstract>\n<t>This is it.</t>\n</abstract>\n",
            "</front>\n<middle>\n",
            "\n<section anchor=\"intro\">\n<name>Intro</name>\n",
            "</section>\n</middle>\n<back>\n",
            "\n<section anchor=\"appendix\">\n<name>Appendix</name>\n",
            "</section>\n</back>\n</rfc>\n",
        )));
        assert!(!xml.contains("anchor=\"abstract\""));
    }

    #[test]
    fn test_note_section() {
        let xml = fragment("# Remark {.note}\n\nSomething.\n\n# Next\n");
        assert!(xml.starts_with(
            "<note>\n<name>Remark</name>\n<t>Something.</t>\n</note>\n\n<section anchor=\"next\">"
        ));
    }

    #[test]
    fn test_abstract_closed_at_end_of_document() {
        let xml = fragment("# Abstract {.abstract}\n\nOnly this.\n");
        assert_eq!(xml, "<abstract>\n<t>Only this.</t>\n</abstract>\n");
    }

    #[test]
    fn test_balanced_sections() {
        let result = standalone("{mainmatter}\n\n# A\n\n## B\n\n### C\n\n## D\n\n# E\n\n### F\n");
        assert_eq!(
            result.xml.matches("<section ").count(),
            result.xml.matches("</section>").count()
        );
    }

    #[test]
    fn test_parse_citation_label() {
        assert_eq!(
            parse_citation_label("@!RFC2119"),
            Some(CitationRecord::normative("RFC2119"))
        );
        assert_eq!(
            parse_citation_label("@?RFC1035"),
            Some(CitationRecord::informative("RFC1035"))
        );
        assert_eq!(parse_citation_label("RFC1035"), None);
        assert_eq!(parse_citation_label("@"), None);
    }
}
