//! Feedback items and their aggregation into the per-frame message list.

use serde::Serialize;

use crate::pose::KeypointIndex;

/// Priority reserved for the rep-completion announcement
pub const REP_COMPLETED_PRIORITY: u8 = 0;

pub const REP_COMPLETED_MESSAGE: &str = "🎉 REP COMPLETED! Great work!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackItem {
    pub message: String,
    pub severity: Severity,
    /// Lower sorts first
    pub priority: u8,
}

impl FeedbackItem {
    pub fn new(message: impl Into<String>, severity: Severity, priority: u8) -> Self {
        Self {
            message: message.into(),
            severity,
            priority,
        }
    }

    pub fn good(message: impl Into<String>, priority: u8) -> Self {
        Self::new(message, Severity::Good, priority)
    }

    pub fn info(message: impl Into<String>, priority: u8) -> Self {
        Self::new(message, Severity::Info, priority)
    }

    pub fn warning(message: impl Into<String>, priority: u8) -> Self {
        Self::new(message, Severity::Warning, priority)
    }

    pub fn error(message: impl Into<String>, priority: u8) -> Self {
        Self::new(message, Severity::Error, priority)
    }

    pub fn rep_completed() -> Self {
        Self::good(REP_COMPLETED_MESSAGE, REP_COMPLETED_PRIORITY)
    }
}

/// Ordered feedback for one frame.
///
/// Items are kept sorted by ascending priority; equal priorities keep the
/// order in which they were pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeedbackList {
    items: Vec<FeedbackItem>,
}

impl FeedbackList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(item: FeedbackItem) -> Self {
        Self { items: vec![item] }
    }

    /// Append during analysis; call `finish` once all checks have run.
    pub fn push(&mut self, item: FeedbackItem) {
        self.items.push(item);
    }

    /// Stable sort by priority
    pub fn finish(mut self) -> Self {
        self.items.sort_by_key(|item| item.priority);
        self
    }

    /// Put the rep-completion announcement ahead of everything else
    pub fn announce_rep(&mut self) {
        self.items.insert(0, FeedbackItem::rep_completed());
    }

    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedbackItem> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&FeedbackItem> {
        self.items.first()
    }

    pub fn contains_message(&self, needle: &str) -> bool {
        self.items.iter().any(|item| item.message.contains(needle))
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.items.iter().filter(|item| item.severity == severity).count()
    }
}

impl<'a> IntoIterator for &'a FeedbackList {
    type Item = &'a FeedbackItem;
    type IntoIter = std::slice::Iter<'a, FeedbackItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Status line shown next to the feedback, derived from tracked point count
pub fn status_line(visible_keypoints: usize) -> String {
    format!(
        "✅ Tracking {}/{} body points",
        visible_keypoints,
        KeypointIndex::COUNT
    )
}

pub const NO_PERSON_STATUS: &str = "⚠️ No person detected - step into frame";
pub const NO_PERSON_MESSAGE: &str = "⚠️ No person detected in frame";

/// Coarse quality band for a form score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreGrade {
    Excellent,
    Good,
    Average,
    NeedsWork,
}

impl ScoreGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Average,
            _ => Self::NeedsWork,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Average => "AVERAGE",
            Self::NeedsWork => "NEEDS WORK",
        }
    }
}
