//! State enums tracked by the renderer across callbacks.

/// Top-level division of an RFC document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatterPhase {
    /// Metadata: title, authors, abstract, notes. Open from the title block on.
    #[default]
    Front,
    /// Body sections.
    Main,
    /// Appendices and references.
    Back,
}

impl MatterPhase {
    /// Closing tag of the container that holds this matter.
    #[must_use]
    pub fn close_tag(self) -> &'static str {
        match self {
            Self::Front => "</front>\n",
            Self::Main => "</middle>\n",
            Self::Back => "</back>\n",
        }
    }

    /// Opening tag of the container that holds this matter.
    #[must_use]
    pub fn open_tag(self) -> &'static str {
        match self {
            Self::Front => "<front>\n",
            Self::Main => "<middle>\n",
            Self::Back => "<back>\n",
        }
    }

    /// Parse a `{frontmatter}` / `{mainmatter}` / `{backmatter}` marker.
    ///
    /// ```
    /// use rfcmark_renderer::MatterPhase;
    ///
    /// assert_eq!(MatterPhase::from_marker("{mainmatter}"), Some(MatterPhase::Main));
    /// assert_eq!(MatterPhase::from_marker("mainmatter"), None);
    /// ```
    #[must_use]
    pub fn from_marker(text: &str) -> Option<Self> {
        match text.trim() {
            "{frontmatter}" => Some(Self::Front),
            "{mainmatter}" => Some(Self::Main),
            "{backmatter}" => Some(Self::Back),
            _ => None,
        }
    }
}

/// Progress of the document-level wrapper.
///
/// Replaces per-call "first pass" flags: each boundary fires at most once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    NotStarted,
    HeaderEmitted,
    FooterEmitted,
}

/// Renderer configuration flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderFlags {
    /// Emit a complete document instead of a bare fragment.
    pub standalone: bool,
}

impl RenderFlags {
    /// Flags for a complete, self-contained document.
    #[must_use]
    pub fn standalone() -> Self {
        Self { standalone: true }
    }

    /// Flags for a bare content fragment.
    #[must_use]
    pub fn fragment() -> Self {
        Self { standalone: false }
    }
}
