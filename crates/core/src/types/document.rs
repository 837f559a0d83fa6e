//! Document name and content kind types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`DocumentName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentNameError {
    /// The input is empty after trimming.
    #[error("document name is required")]
    Required,
    /// The input is longer than the allowed maximum.
    #[error("document name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a path separator or parent-directory sequence.
    #[error("document name contains path components: {0}")]
    InvalidCharacters(String),
}

impl DocumentNameError {
    /// Message shown to the user when this error is surfaced as a flash.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Required => "A name is required.".to_owned(),
            Self::TooLong { max } => format!("A name must be between 1 and {max} characters."),
            Self::InvalidCharacters(name) => format!("{name} is not a valid document name."),
        }
    }
}

/// How a document's content is handled, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// `.txt` documents, served verbatim as `text/plain`.
    PlainText,
    /// `.md` documents, rendered to HTML before serving.
    Markdown,
    /// Any other extension. Cannot be displayed.
    Unsupported,
}

impl ContentKind {
    /// Derive the content kind from a filename.
    ///
    /// The match is on the literal extension, so `notes.TXT` is unsupported.
    #[must_use]
    pub fn from_filename(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((stem, "txt")) if !stem.is_empty() => Self::PlainText,
            Some((stem, "md")) if !stem.is_empty() => Self::Markdown,
            _ => Self::Unsupported,
        }
    }

    /// HTTP `Content-Type` used when serving a document of this kind.
    ///
    /// Unsupported documents are never served; they report `text/plain` so
    /// callers that ignore the kind do not end up rendering HTML.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Markdown => "text/html; charset=utf-8",
            Self::PlainText | Self::Unsupported => "text/plain; charset=utf-8",
        }
    }

    /// Short label for listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlainText => "plain-text",
            Self::Markdown => "markdown",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The name of a document in the store directory.
///
/// A `DocumentName` is always safe to join onto the store directory: it never
/// contains a path separator or a NUL byte, and it is never `.` or `..`.
///
/// ## Constraints
///
/// - Names built with [`DocumentName::parse`] (the create path) are trimmed and
///   must be 1-100 characters long.
/// - Names built with [`DocumentName::from_request`] (every other path) are
///   taken as-is; existing documents are not re-validated for length.
///
/// ## Examples
///
/// ```
/// use flatfile_cms_core::{ContentKind, DocumentName};
///
/// let name = DocumentName::parse("  about.md ").unwrap();
/// assert_eq!(name.as_str(), "about.md");
/// assert_eq!(name.kind(), ContentKind::Markdown);
///
/// assert!(DocumentName::parse("   ").is_err());
/// assert!(DocumentName::from_request("../users.yml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentName(String);

impl DocumentName {
    /// Maximum length, in characters, of a newly created document name.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a name for a document that is about to be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input:
    /// - Is empty
    /// - Is longer than 100 characters
    /// - Contains a path separator or NUL, or is `.` or `..`
    pub fn parse(input: &str) -> Result<Self, DocumentNameError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(DocumentNameError::Required);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(DocumentNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Self::from_request(trimmed)
    }

    /// Accept a name coming from a request path or an existing directory entry.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentNameError::InvalidCharacters`] if the name would
    /// escape the store directory, and [`DocumentNameError::Required`] if it
    /// is empty.
    pub fn from_request(input: &str) -> Result<Self, DocumentNameError> {
        if input.is_empty() {
            return Err(DocumentNameError::Required);
        }

        let escapes = input.contains(['/', '\\', '\0']) || input == "." || input == "..";
        if escapes {
            return Err(DocumentNameError::InvalidCharacters(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Content kind derived from the extension.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        ContentKind::from_filename(&self.0)
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentName {
    type Err = DocumentNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_request(s)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for DocumentName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_request(&raw).map_err(serde::de::Error::custom)
    }
}
