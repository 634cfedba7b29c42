//! Wizard Engine
//!
//! Drives the fixed-order questionnaire: offers the options valid for the
//! current state, records the visitor's answer, advances exactly one state
//! and, on reaching the summary, derives the quote.
//!
//! Assistant lines are either appended on the spot ([`Delivery::Immediate`])
//! or queued as [`PendingPrompt`]s tagged with the session id
//! ([`Delivery::Deferred`]). A queued prompt is only accepted back by
//! [`WizardEngine::deliver`] while its session is still the current one, so a
//! reset can never be followed by a prompt from the session it replaced.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, Package};
use crate::config::{Delays, WizardConfig};
use crate::error::WizardError;
use crate::handoff::{Handoff, HandoffTarget};
use crate::labels::{LabelKey, LabelTable};
use crate::language::{Direction, Language};
use crate::quote::{Quote, SummaryCard};
use crate::state::{EntryContent, Role, Transcript, TranscriptEntry, WizardSelection, WizardState};

/// How assistant lines reach the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Appended as soon as they are produced
    Immediate,
    /// Queued with a delay; the host calls [`WizardEngine::deliver`]
    Deferred(Delays),
}

/// An assistant line waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPrompt {
    pub session_id: Uuid,
    /// Delay after the previous line of the same batch
    pub delay: Duration,
    pub entry: TranscriptEntry,
}

/// One choice offered in a selectable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionItem {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    /// Price preview, for hotels once a room is chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
}

impl OptionItem {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: None,
            glyph: None,
            price: None,
            stars: None,
        }
    }
}

/// Engine settings that are not part of the catalog
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub currency_label: String,
    pub delivery: Delivery,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            currency_label: "DHS".to_string(),
            delivery: Delivery::Immediate,
        }
    }
}

impl EngineOptions {
    /// Options taken from a config, deferred with its delays
    pub fn paced(config: &WizardConfig) -> Self {
        Self {
            currency_label: config.currency_label.clone(),
            delivery: Delivery::Deferred(config.delays),
        }
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub language: Language,
    pub direction: Direction,
    pub state: WizardState,
    pub progress: u8,
    pub level: u8,
    /// False while assistant lines of this session are still pending
    pub ready: bool,
    pub selection: WizardSelection,
    pub transcript: Vec<TranscriptEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
}

/// The package configuration wizard for one visitor
pub struct WizardEngine {
    catalog: Arc<Catalog>,
    labels: Arc<LabelTable>,
    settings: EngineOptions,
    language: Language,

    session_id: Uuid,
    state: WizardState,
    selection: WizardSelection,
    transcript: Transcript,
    quote: Option<Quote>,

    outbox: VecDeque<PendingPrompt>,
    undelivered: usize,
}

impl WizardEngine {
    /// Start a session with immediate delivery
    pub fn new(catalog: Arc<Catalog>, labels: Arc<LabelTable>, language: Language) -> Self {
        Self::with_options(catalog, labels, language, EngineOptions::default())
    }

    /// Start a session
    pub fn with_options(
        catalog: Arc<Catalog>,
        labels: Arc<LabelTable>,
        language: Language,
        options: EngineOptions,
    ) -> Self {
        let mut engine = Self {
            catalog,
            labels,
            settings: options,
            language,
            session_id: Uuid::nil(),
            state: WizardState::AwaitPackage,
            selection: WizardSelection::default(),
            transcript: Transcript::default(),
            quote: None,
            outbox: VecDeque::new(),
            undelivered: 0,
        };
        engine.start_session();
        engine
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    fn start_session(&mut self) {
        self.session_id = Uuid::new_v4();
        self.state = WizardState::AwaitPackage;
        self.selection = WizardSelection::default();
        self.transcript.clear();
        self.quote = None;
        self.outbox.clear();
        self.undelivered = 0;

        info!(
            session_id = %self.session_id,
            language = %self.language,
            "wizard session started"
        );

        let delays = self.delays();
        self.emit(self.text(LabelKey::Welcome), delays.welcome());
        self.emit(self.text(LabelKey::AskPackage), delays.first_prompt());
    }

    /// Reset to the first question in the current language
    pub fn restart(&mut self) {
        debug!(session_id = %self.session_id, "wizard restart requested");
        self.start_session();
    }

    /// Switch language. A change restarts the session; returns whether it did.
    pub fn set_language(&mut self, language: Language) -> bool {
        if language == self.language {
            return false;
        }
        info!(from = %self.language, to = %language, "language changed, restarting wizard");
        self.language = language;
        self.start_session();
        true
    }

    // ------------------------------------------------------------------
    // Visitor input
    // ------------------------------------------------------------------

    /// Options valid in the current state. Empty for free-text and terminal states.
    pub fn options(&self) -> Vec<OptionItem> {
        let lang = self.language;
        match self.state {
            WizardState::AwaitPackage => self
                .catalog
                .packages()
                .iter()
                .map(|p| OptionItem {
                    description: Some(p.description.get(lang).to_string()),
                    stars: Some(p.stars),
                    ..OptionItem::new(&p.id, p.label.get(lang))
                })
                .collect(),
            WizardState::AwaitRoom => self
                .chosen_package()
                .map(|p| {
                    p.rooms
                        .iter()
                        .map(|r| OptionItem {
                            glyph: Some(r.glyph.clone()).filter(|g| !g.is_empty()),
                            ..OptionItem::new(&r.id, r.label.get(lang))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            WizardState::AwaitHotel => {
                let room_id = self.selection.room_id.as_deref().unwrap_or_default();
                self.chosen_package()
                    .map(|p| {
                        p.hotels
                            .iter()
                            .map(|h| OptionItem {
                                price: h.price_for(room_id),
                                ..OptionItem::new(&h.id, &h.label)
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            }
            WizardState::AwaitTransport => self
                .catalog
                .transports()
                .iter()
                .map(|t| OptionItem::new(&t.id, t.label.get(lang)))
                .collect(),
            WizardState::AwaitName | WizardState::AwaitPhone | WizardState::Summary => Vec::new(),
        }
    }

    /// Answer a selectable state with one of its option ids
    pub fn select(&mut self, id: &str) -> Result<(), WizardError> {
        if !self.state.is_selectable() {
            return Err(WizardError::NotSelectable(self.state));
        }

        let Some(option) = self.options().into_iter().find(|o| o.id == id) else {
            warn!(state = %self.state, id, "refused unknown option");
            return Err(WizardError::UnknownOption {
                state: self.state,
                id: id.to_string(),
            });
        };

        self.advance(option.id, option.label);
        Ok(())
    }

    /// Whether `text` would be accepted by [`submit_text`](Self::submit_text)
    pub fn can_submit(&self, text: &str) -> bool {
        self.state.is_free_text() && !text.trim().is_empty()
    }

    /// Answer a free-text state. Blank input is ignored and returns `Ok(false)`.
    pub fn submit_text(&mut self, text: &str) -> Result<bool, WizardError> {
        if !self.state.is_free_text() {
            return Err(WizardError::NotFreeText(self.state));
        }

        let value = text.trim();
        if value.is_empty() {
            return Ok(false);
        }

        self.advance(value.to_string(), value.to_string());
        Ok(true)
    }

    /// Record an answer and move one state forward
    fn advance(&mut self, value: String, echo: String) {
        let from = self.state;
        let Some(to) = from.next() else {
            return;
        };

        self.transcript.push(TranscriptEntry::visitor(echo));
        self.selection.record(from, value);
        self.state = to;

        debug!(
            session_id = %self.session_id,
            from = %from,
            to = %to,
            progress = to.progress(),
            "wizard transition"
        );

        match to.prompt() {
            Some(key) => {
                let delay = self.delays().prompt();
                self.emit(self.text(key), delay);
            }
            None => self.enter_summary(),
        }
    }

    fn enter_summary(&mut self) {
        self.quote = Quote::derive(
            &self.catalog,
            &self.selection,
            self.language,
            &self.settings.currency_label,
        );

        match &self.quote {
            Some(quote) => {
                info!(
                    session_id = %self.session_id,
                    package = %quote.package_id,
                    total = quote.total_price,
                    "wizard summary ready"
                );
                let entry = TranscriptEntry::new(
                    Role::Assistant,
                    EntryContent::Summary(Box::new(quote.clone())),
                );
                let delay = self.delays().summary();
                self.emit_entry(entry, delay);
            }
            None => warn!(session_id = %self.session_id, "summary skipped, selection not in catalog"),
        }
    }

    // ------------------------------------------------------------------
    // Delivery
    // ------------------------------------------------------------------

    fn delays(&self) -> Delays {
        match self.settings.delivery {
            Delivery::Immediate => Delays::NONE,
            Delivery::Deferred(delays) => delays,
        }
    }

    fn emit(&mut self, text: String, delay: Duration) {
        self.emit_entry(TranscriptEntry::assistant(text), delay);
    }

    fn emit_entry(&mut self, entry: TranscriptEntry, delay: Duration) {
        match self.settings.delivery {
            Delivery::Immediate => self.transcript.push(entry),
            Delivery::Deferred(_) => {
                self.undelivered += 1;
                self.outbox.push_back(PendingPrompt {
                    session_id: self.session_id,
                    delay,
                    entry,
                });
            }
        }
    }

    /// Hand over queued assistant lines, oldest first
    pub fn take_pending(&mut self) -> Vec<PendingPrompt> {
        self.outbox.drain(..).collect()
    }

    /// Append a queued line. Lines from a replaced session are dropped.
    pub fn deliver(&mut self, prompt: PendingPrompt) -> bool {
        if prompt.session_id != self.session_id {
            debug!(
                stale = %prompt.session_id,
                current = %self.session_id,
                "dropping prompt from replaced session"
            );
            return false;
        }
        self.undelivered = self.undelivered.saturating_sub(1);
        self.transcript.push(prompt.entry);
        true
    }

    /// True once every assistant line of this session is in the transcript
    pub fn is_ready(&self) -> bool {
        self.undelivered == 0
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    /// Rendering data for the summary block
    pub fn summary_card(&self) -> Option<SummaryCard> {
        let quote = self.quote.as_ref()?;
        let name = self.selection.name.as_deref().unwrap_or_default();
        Some(SummaryCard::new(quote, name, &self.labels))
    }

    /// The WhatsApp handoff for a finished session
    pub fn handoff(&self, target: &HandoffTarget) -> Result<Handoff, WizardError> {
        let quote = self
            .quote
            .as_ref()
            .filter(|_| self.state.is_terminal())
            .ok_or(WizardError::NoQuote(self.state))?;

        Ok(Handoff::build(
            quote,
            self.selection.name.as_deref().unwrap_or_default(),
            self.selection.phone.as_deref().unwrap_or_default(),
            &self.labels,
            target,
        ))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.state.progress()
    }

    pub fn level(&self) -> u8 {
        self.state.level()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    pub fn selection(&self) -> &WizardSelection {
        &self.selection
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve a label in the session language
    pub fn text(&self, key: LabelKey) -> String {
        self.labels.get(key, self.language).to_string()
    }

    /// Input hint for free-text states
    pub fn placeholder(&self) -> Option<String> {
        match self.state {
            WizardState::AwaitName => Some(self.text(LabelKey::PlaceholderName)),
            WizardState::AwaitPhone => Some(self.text(LabelKey::PlaceholderPhone)),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            language: self.language,
            direction: self.direction(),
            state: self.state,
            progress: self.progress(),
            level: self.level(),
            ready: self.is_ready(),
            selection: self.selection.clone(),
            transcript: self.transcript.entries().to_vec(),
            quote: self.quote.clone(),
        }
    }

    fn chosen_package(&self) -> Option<&Package> {
        self.selection
            .package_id
            .as_deref()
            .and_then(|id| self.catalog.package(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(language: Language) -> WizardEngine {
        WizardEngine::new(
            Arc::new(Catalog::builtin()),
            Arc::new(LabelTable::builtin()),
            language,
        )
    }

    fn texts(engine: &WizardEngine) -> Vec<String> {
        engine
            .transcript()
            .entries()
            .iter()
            .filter_map(|e| e.content.as_text().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_session_starts_with_welcome_and_first_prompt() {
        let engine = engine(Language::Fr);
        assert_eq!(engine.state(), WizardState::AwaitPackage);
        assert_eq!(engine.progress(), 10);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.transcript().len(), 2);
        assert_eq!(
            texts(&engine),
            vec![
                engine.text(LabelKey::Welcome),
                engine.text(LabelKey::AskPackage)
            ]
        );
        assert!(engine
            .transcript()
            .entries()
            .iter()
            .all(|e| e.role == Role::Assistant));
    }

    #[test]
    fn test_selection_appends_echo_and_prompt() {
        let mut engine = engine(Language::Fr);
        engine.select("eco").unwrap();

        assert_eq!(engine.state(), WizardState::AwaitRoom);
        assert_eq!(engine.transcript().len(), 4);
        let entries = engine.transcript().entries();
        assert_eq!(entries[2].role, Role::Visitor);
        assert_eq!(entries[2].content.as_text(), Some("Économique"));
        assert_eq!(entries[3].content.as_text(), Some(engine.text(LabelKey::AskRoom).as_str()));
        assert_eq!(engine.selection().package_id.as_deref(), Some("eco"));
    }

    #[test]
    fn test_options_follow_state() {
        let mut engine = engine(Language::En);
        let packages: Vec<String> = engine.options().into_iter().map(|o| o.id).collect();
        assert_eq!(packages, vec!["eco", "premium"]);

        engine.select("premium").unwrap();
        let rooms: Vec<String> = engine.options().into_iter().map(|o| o.label).collect();
        assert_eq!(rooms, vec!["Quadruple", "Triple", "Double"]);

        engine.select("triple").unwrap();
        let hotels = engine.options();
        assert_eq!(hotels.len(), 5);
        assert_eq!(hotels[0].id, "fokoo");
        assert_eq!(hotels[0].price, Some(38500));

        engine.select("fokoo").unwrap();
        let transports: Vec<String> = engine.options().into_iter().map(|o| o.id).collect();
        assert_eq!(transports, vec!["bus", "car", "train"]);

        engine.select("car").unwrap();
        assert!(engine.options().is_empty());
        assert_eq!(engine.placeholder().as_deref(), Some("Full name"));
    }

    #[test]
    fn test_invalid_selection_changes_nothing() {
        let mut engine = engine(Language::Fr);
        engine.select("eco").unwrap();
        let before = engine.snapshot();

        let err = engine.select("fokoo").unwrap_err();
        assert_eq!(
            err,
            WizardError::UnknownOption {
                state: WizardState::AwaitRoom,
                id: "fokoo".into()
            }
        );
        assert_eq!(engine.state(), before.state);
        assert_eq!(engine.transcript().len(), before.transcript.len());
        assert_eq!(engine.selection(), &before.selection);

        assert_eq!(
            engine.submit_text("Amina"),
            Err(WizardError::NotFreeText(WizardState::AwaitRoom))
        );
    }

    #[test]
    fn test_blank_text_is_inert() {
        let mut engine = engine(Language::Fr);
        for id in ["eco", "quad", "kadi", "bus"] {
            engine.select(id).unwrap();
        }
        assert_eq!(engine.state(), WizardState::AwaitName);
        assert!(!engine.can_submit("   "));

        let len = engine.transcript().len();
        assert_eq!(engine.submit_text(""), Ok(false));
        assert_eq!(engine.submit_text(" \t\n"), Ok(false));
        assert_eq!(engine.state(), WizardState::AwaitName);
        assert_eq!(engine.transcript().len(), len);
        assert!(engine.selection().name.is_none());

        assert_eq!(engine.select("bus"), Err(WizardError::NotSelectable(WizardState::AwaitName)));
    }

    #[test]
    fn test_full_flow_to_summary() {
        let mut engine = engine(Language::Fr);
        for id in ["eco", "quad", "kadi", "train"] {
            engine.select(id).unwrap();
        }
        assert!(engine.handoff(&HandoffTarget::new("212661631160").unwrap()).is_err());

        assert_eq!(engine.submit_text("  Amina Benali  "), Ok(true));
        assert_eq!(engine.selection().name.as_deref(), Some("Amina Benali"));
        assert_eq!(engine.submit_text("0612345678"), Ok(true));

        assert_eq!(engine.state(), WizardState::Summary);
        assert_eq!(engine.progress(), 100);
        assert_eq!(engine.quote().unwrap().total_price, 29500);

        // 2 initial + 6 answers x (echo + prompt/summary)
        assert_eq!(engine.transcript().len(), 14);
        let last = engine.transcript().last().unwrap();
        assert!(matches!(last.content, EntryContent::Summary(_)));

        let card = engine.summary_card().unwrap();
        assert_eq!(card.rows[0].1, "Amina Benali");

        let handoff = engine
            .handoff(&HandoffTarget::new("212661631160").unwrap())
            .unwrap();
        assert!(handoff.message.contains("AMINA BENALI"));
        assert!(handoff.message.contains("0612345678"));
    }

    #[test]
    fn test_language_change_resets() {
        let mut engine = engine(Language::Fr);
        engine.select("premium").unwrap();
        engine.select("double").unwrap();
        let old_session = engine.session_id();

        assert!(!engine.set_language(Language::Fr));
        assert_eq!(engine.state(), WizardState::AwaitHotel);

        assert!(engine.set_language(Language::Ar));
        assert_ne!(engine.session_id(), old_session);
        assert_eq!(engine.state(), WizardState::AwaitPackage);
        assert!(engine.selection().is_empty());
        assert_eq!(engine.direction(), Direction::Rtl);
        assert_eq!(
            texts(&engine),
            vec![
                LabelTable::builtin().get(LabelKey::Welcome, Language::Ar).to_string(),
                LabelTable::builtin().get(LabelKey::AskPackage, Language::Ar).to_string(),
            ]
        );
    }

    #[test]
    fn test_deferred_delivery_and_stale_prompts() {
        let options = EngineOptions {
            currency_label: "DHS".into(),
            delivery: Delivery::Deferred(Delays::default()),
        };
        let mut engine = WizardEngine::with_options(
            Arc::new(Catalog::builtin()),
            Arc::new(LabelTable::builtin()),
            Language::Fr,
            options,
        );

        assert!(engine.transcript().is_empty());
        assert!(!engine.is_ready());
        let pending = engine.take_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].delay, Duration::from_millis(500));

        engine.restart();
        for prompt in pending {
            assert!(!engine.deliver(prompt));
        }
        assert!(engine.transcript().is_empty());

        for prompt in engine.take_pending() {
            assert!(engine.deliver(prompt));
        }
        assert_eq!(engine.transcript().len(), 2);
        assert!(engine.is_ready());
    }
}
