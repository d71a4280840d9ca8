//! Extension filter parsing.
//!
//! Turns user input like `"photo, .pdf"` into the lower-cased, dot-stripped
//! extension set the finder filters on.
//!
//! # Grammar
//!
//! Comma-separated tokens, each trimmed and case-insensitive:
//! - `.ext` - a literal extension
//! - `photo`, `photos`, `image`, `images` - common image formats
//! - `video`, `videos` - common video formats
//! - `audio`, `sound` - common audio formats
//! - `text` - common text formats
//! - `all` - no filter at all
//!
//! Blank input and empty tokens between commas are ignored.
//!
//! # Example
//!
//! ```
//! use dupesearch::formats::parse_file_formats;
//!
//! let formats = parse_file_formats("photo, .PDF").unwrap().unwrap();
//! assert!(formats.contains("jpg"));
//! assert!(formats.contains("pdf"));
//!
//! assert!(parse_file_formats("all").unwrap().is_none());
//! assert!(parse_file_formats("fotos").is_err());
//! ```

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 2;

/// Named set of related extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatGroup {
    /// Still images
    Image,
    /// Video containers
    Video,
    /// Audio files
    Audio,
    /// Plain and markup text
    Text,
}

impl FormatGroup {
    /// Every group, in display order.
    pub const ALL: [FormatGroup; 4] = [Self::Image, Self::Video, Self::Audio, Self::Text];

    /// Resolve a (lower-cased) group name or alias.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.aliases().contains(&name))
    }

    /// Names accepted for this group.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Image => &["photo", "photos", "image", "images"],
            Self::Video => &["video", "videos"],
            Self::Audio => &["audio", "sound"],
            Self::Text => &["text"],
        }
    }

    /// Extensions (lower-case, no dot) in this group.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &[
                "jpg", "jpeg", "jpe", "png", "gif", "bmp", "tif", "tiff", "ico", "svg", "webp",
                "heic", "heif", "avif", "ief", "ras", "pnm", "pbm", "pgm", "ppm", "rgb", "xbm",
                "xpm", "xwd",
            ],
            Self::Video => &[
                "mp4", "m4v", "mpeg", "mpg", "mpe", "m1v", "mov", "qt", "avi", "movie", "webm",
                "mkv", "wmv", "flv", "3gp", "ts",
            ],
            Self::Audio => &[
                "mp3", "mp2", "wav", "aac", "flac", "ogg", "oga", "opus", "m4a", "wma", "aif",
                "aifc", "aiff", "au", "snd", "ra", "mid", "midi",
            ],
            Self::Text => &[
                "txt", "text", "md", "csv", "tsv", "html", "htm", "css", "js", "json", "xml",
                "rtx", "etx", "sgml", "srt", "vtt", "log", "conf", "ini", "bat", "asc", "c",
                "h", "py",
            ],
        }
    }
}

impl fmt::Display for FormatGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aliases()[0])
    }
}

/// Errors raised while parsing a format filter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The token is neither an extension nor a known group.
    #[error("'{token}' is not a valid file format{}", did_you_mean(.suggestion))]
    UnknownToken {
        /// Offending token (trimmed, lower-cased)
        token: String,
        /// Closest valid spelling, if any is near
        suggestion: Option<String>,
    },

    /// A lone `.` with no extension after it.
    #[error("'{0}' does not name an extension")]
    EmptyExtension(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Parse a comma-separated format filter.
///
/// Returns `Ok(None)` when nothing should be filtered: blank input, only
/// empty tokens, or an `all` token.
///
/// # Errors
///
/// Returns [`FormatError`] for the first token that cannot be understood.
pub fn parse_file_formats(raw: &str) -> Result<Option<HashSet<String>>, FormatError> {
    let mut formats = HashSet::new();

    for token in raw.split(',') {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }

        if token == "all" {
            return Ok(None);
        }

        if let Some(group) = FormatGroup::from_name(&token) {
            formats.extend(group.extensions().iter().map(|ext| (*ext).to_string()));
            continue;
        }

        if let Some(ext) = token.strip_prefix('.') {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                return Err(FormatError::EmptyExtension(token));
            }
            formats.insert(ext.to_string());
            continue;
        }

        let suggestion = suggest(&token);
        return Err(FormatError::UnknownToken { token, suggestion });
    }

    Ok(if formats.is_empty() { None } else { Some(formats) })
}

/// Closest valid spelling for an unrecognized token.
fn suggest(token: &str) -> Option<String> {
    // A bare extension is almost certainly missing its dot
    if FormatGroup::ALL
        .iter()
        .any(|group| group.extensions().contains(&token))
    {
        return Some(format!(".{token}"));
    }

    FormatGroup::ALL
        .iter()
        .flat_map(|group| group.aliases().iter().copied())
        .chain(std::iter::once("all"))
        .map(|name| (strsim::levenshtein(token, name), name))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.to_string())
}
