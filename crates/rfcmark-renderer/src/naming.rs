//! Reference filename conventions.
//!
//! Citations without an explicit filename are turned into an `xi:include`
//! path by a [`ReferenceNaming`] implementation. The default,
//! [`BibxmlNaming`], follows the file layout of the xml2rfc bibxml
//! reference libraries.

/// Maps a citation target to the file that holds its reference entry.
pub trait ReferenceNaming {
    /// Return the inclusion path for `target`, or `None` if the identifier
    /// scheme is not recognised.
    fn filename(&self, target: &str) -> Option<String>;
}

impl<T: ReferenceNaming + ?Sized> ReferenceNaming for Box<T> {
    fn filename(&self, target: &str) -> Option<String> {
        (**self).filename(target)
    }
}

/// Naming convention of the xml2rfc bibxml libraries.
///
/// - `RFC2119` → `reference.RFC.2119.xml`
/// - `I-D.ietf-foo-bar` → `reference.I-D.draft-ietf-foo-bar.xml`
///
/// ```
/// use rfcmark_renderer::{BibxmlNaming, ReferenceNaming};
///
/// let naming = BibxmlNaming::default();
/// assert_eq!(naming.filename("RFC2119").as_deref(), Some("reference.RFC.2119.xml"));
/// assert_eq!(naming.filename("BCP14"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BibxmlNaming {
    directory: Option<String>,
}

impl BibxmlNaming {
    /// Prepend `directory` to every derived filename.
    #[must_use]
    pub fn with_directory(directory: impl Into<String>) -> Self {
        let directory = directory.into();
        let directory = directory.trim_end_matches('/').to_owned();
        Self {
            directory: Some(directory),
        }
    }

    fn base_name(target: &str) -> Option<String> {
        if let Some(number) = strip_prefix_ignore_case(target, "rfc") {
            let number = number.trim_start_matches(['.', ' ']);
            let parsed: u32 = number.parse().ok()?;
            return Some(format!("reference.RFC.{parsed:04}.xml"));
        }
        if let Some(name) = strip_prefix_ignore_case(target, "i-d.") {
            if name.is_empty() {
                return None;
            }
            let draft = if name.starts_with("draft-") {
                name.to_owned()
            } else {
                format!("draft-{name}")
            };
            return Some(format!("reference.I-D.{draft}.xml"));
        }
        None
    }
}

impl ReferenceNaming for BibxmlNaming {
    fn filename(&self, target: &str) -> Option<String> {
        let name = Self::base_name(target)?;
        Some(match &self.directory {
            Some(dir) if !dir.is_empty() => format!("{dir}/{name}"),
            _ => name,
        })
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
