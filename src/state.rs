//! Wizard State Types
//!
//! Defines the position in the flow, the visitor's accumulating answers and
//! the append-only transcript of one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::labels::LabelKey;
use crate::quote::Quote;

/// Position in the questionnaire. Strictly linear, no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardState {
    AwaitPackage,
    AwaitRoom,
    AwaitHotel,
    AwaitTransport,
    AwaitName,
    AwaitPhone,
    Summary,
}

impl WizardState {
    /// All states in flow order
    pub const ALL: [WizardState; 7] = [
        WizardState::AwaitPackage,
        WizardState::AwaitRoom,
        WizardState::AwaitHotel,
        WizardState::AwaitTransport,
        WizardState::AwaitName,
        WizardState::AwaitPhone,
        WizardState::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitPackage => "await_package",
            Self::AwaitRoom => "await_room",
            Self::AwaitHotel => "await_hotel",
            Self::AwaitTransport => "await_transport",
            Self::AwaitName => "await_name",
            Self::AwaitPhone => "await_phone",
            Self::Summary => "summary",
        }
    }

    /// The state that follows this one, `None` at the terminal state
    pub fn next(&self) -> Option<WizardState> {
        match self {
            Self::AwaitPackage => Some(Self::AwaitRoom),
            Self::AwaitRoom => Some(Self::AwaitHotel),
            Self::AwaitHotel => Some(Self::AwaitTransport),
            Self::AwaitTransport => Some(Self::AwaitName),
            Self::AwaitName => Some(Self::AwaitPhone),
            Self::AwaitPhone => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// Progress percentage shown while in this state
    pub fn progress(&self) -> u8 {
        match self {
            Self::AwaitPackage => 10,
            Self::AwaitRoom => 25,
            Self::AwaitHotel => 40,
            Self::AwaitTransport => 60,
            Self::AwaitName => 75,
            Self::AwaitPhone => 90,
            Self::Summary => 100,
        }
    }

    /// Level badge derived from progress
    pub fn level(&self) -> u8 {
        self.progress() / 15 + 1
    }

    /// The prompt issued on entering this state. The terminal state renders a
    /// summary block instead.
    pub fn prompt(&self) -> Option<LabelKey> {
        match self {
            Self::AwaitPackage => Some(LabelKey::AskPackage),
            Self::AwaitRoom => Some(LabelKey::AskRoom),
            Self::AwaitHotel => Some(LabelKey::AskHotel),
            Self::AwaitTransport => Some(LabelKey::AskTransport),
            Self::AwaitName => Some(LabelKey::AskName),
            Self::AwaitPhone => Some(LabelKey::AskPhone),
            Self::Summary => None,
        }
    }

    /// States answered by picking one of the enumerated options
    pub fn is_selectable(&self) -> bool {
        matches!(
            self,
            Self::AwaitPackage | Self::AwaitRoom | Self::AwaitHotel | Self::AwaitTransport
        )
    }

    /// States answered with free text
    pub fn is_free_text(&self) -> bool {
        matches!(self, Self::AwaitName | Self::AwaitPhone)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summary)
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::AwaitPackage
    }
}

impl std::fmt::Display for WizardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The visitor's answers for one session, filled in wizard order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSelection {
    pub package_id: Option<String>,
    pub room_id: Option<String>,
    pub hotel_id: Option<String>,
    pub transport_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl WizardSelection {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record the answer given while in `state`
    pub(crate) fn record(&mut self, state: WizardState, value: String) {
        let slot = match state {
            WizardState::AwaitPackage => &mut self.package_id,
            WizardState::AwaitRoom => &mut self.room_id,
            WizardState::AwaitHotel => &mut self.hotel_id,
            WizardState::AwaitTransport => &mut self.transport_id,
            WizardState::AwaitName => &mut self.name,
            WizardState::AwaitPhone => &mut self.phone,
            WizardState::Summary => return,
        };
        *slot = Some(value);
    }

    /// Number of answers recorded so far
    pub fn answered(&self) -> usize {
        [
            &self.package_id,
            &self.room_id,
            &self.hotel_id,
            &self.transport_id,
            &self.name,
            &self.phone,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Who authored a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The wizard (prompts and the summary block)
    Assistant,
    /// The visitor (echoed choices and typed text)
    Visitor,
}

/// Body of a transcript line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum EntryContent {
    Text(String),
    Summary(Box<Quote>),
}

impl EntryContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Summary(_) => None,
        }
    }
}

/// One line of the visible conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub role: Role,
    pub content: EntryContent,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, EntryContent::Text(text.into()))
    }

    pub fn visitor(text: impl Into<String>) -> Self {
        Self::new(Role::Visitor, EntryContent::Text(text.into()))
    }
}

/// Append-only list of transcript entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Drop everything. Only a session reset does this.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order() {
        let mut state = WizardState::AwaitPackage;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            assert!(next > state);
            state = next;
            visited.push(state);
        }
        assert_eq!(visited, WizardState::ALL.to_vec());
        assert!(state.is_terminal());
    }

    #[test]
    fn test_progress_table() {
        let progress: Vec<u8> = WizardState::ALL.iter().map(|s| s.progress()).collect();
        assert_eq!(progress, vec![10, 25, 40, 60, 75, 90, 100]);
    }

    #[test]
    fn test_level_badge() {
        assert_eq!(WizardState::AwaitPackage.level(), 1);
        assert_eq!(WizardState::AwaitRoom.level(), 2);
        assert_eq!(WizardState::Summary.level(), 7);
    }

    #[test]
    fn test_state_kinds() {
        assert!(WizardState::AwaitHotel.is_selectable());
        assert!(!WizardState::AwaitHotel.is_free_text());
        assert!(WizardState::AwaitPhone.is_free_text());
        assert!(WizardState::Summary.prompt().is_none());
        assert_eq!(WizardState::AwaitName.prompt(), Some(LabelKey::AskName));
    }

    #[test]
    fn test_selection_record() {
        let mut selection = WizardSelection::default();
        assert!(selection.is_empty());
        selection.record(WizardState::AwaitPackage, "eco".into());
        selection.record(WizardState::AwaitRoom, "quad".into());
        selection.record(WizardState::Summary, "ignored".into());
        assert_eq!(selection.package_id.as_deref(), Some("eco"));
        assert_eq!(selection.room_id.as_deref(), Some("quad"));
        assert_eq!(selection.answered(), 2);
    }

    #[test]
    fn test_transcript_entries_have_unique_ids() {
        let mut transcript = Transcript::default();
        transcript.push(TranscriptEntry::assistant("hello"));
        transcript.push(TranscriptEntry::visitor("hi"));
        assert_eq!(transcript.len(), 2);
        assert_ne!(transcript.entries()[0].id, transcript.entries()[1].id);
        assert_eq!(transcript.last().unwrap().role, Role::Visitor);
    }
}
