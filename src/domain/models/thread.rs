use serde::{Deserialize, Serialize};

/// Number of posts a thread is asked to contain. Replies with a different
/// count are accepted as-is.
pub const INTENDED_SEGMENT_COUNT: usize = 7;

/// Ordered posts of a social-media thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadSegments {
    segments: Vec<String>,
}

impl ThreadSegments {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_intended_length(&self) -> bool {
        self.segments.len() == INTENDED_SEGMENT_COUNT
    }

    /// All segments separated by blank lines.
    pub fn joined(&self) -> String {
        self.segments.join("\n\n")
    }
}

/// Main title and subtitle printed on a thread's cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverTitle {
    #[serde(alias = "主标题")]
    main_title: String,
    #[serde(alias = "副标题")]
    subtitle: String,
}

impl CoverTitle {
    pub fn new(main_title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            main_title: main_title.into(),
            subtitle: subtitle.into(),
        }
    }

    pub fn main_title(&self) -> &str {
        &self.main_title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }
}
