//! Manasik Package Wizard
//!
//! A guided questionnaire that walks a visitor through the choices of an Omra
//! package, derives the per-person price from a static catalog and hands the
//! result off to a human agent over WhatsApp.
//!
//! # Architecture
//!
//! ```text
//!   Catalog (built-in or YAML)      LabelTable (fr / ar / en)
//!          │                               │
//!          └──────────────┬────────────────┘
//!                         ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  WizardEngine                                           │
//! │  AwaitPackage → AwaitRoom → AwaitHotel → AwaitTransport │
//! │    → AwaitName → AwaitPhone → Summary                   │
//! └─────────────────────────────────────────────────────────┘
//!          │                    │                  │
//!          ▼                    ▼                  ▼
//!     Transcript          Quote / SummaryCard   Handoff (wa.me link)
//!          │
//!          ▼
//!   PacedSession (tokio): delayed delivery + watch snapshots
//! ```
//!
//! The flow is strictly linear. Changing language or restarting replaces the
//! session wholesale.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod labels;
pub mod language;
pub mod pacing;
pub mod quote;
pub mod state;

pub use catalog::{Catalog, HotelOption, Package, RoomOption, TransportOption};
pub use config::{Delays, WizardConfig};
pub use engine::{
    Delivery, EngineOptions, OptionItem, PendingPrompt, SessionSnapshot, WizardEngine,
};
pub use error::{CatalogError, ConfigError, LabelError, WizardError};
pub use handoff::{Handoff, HandoffTarget};
pub use labels::{LabelKey, LabelTable};
pub use language::{Direction, Language, Localized};
pub use pacing::{PacedSession, SessionWatcher};
pub use quote::{format_price, Quote, SummaryCard};
pub use state::{EntryContent, Role, Transcript, TranscriptEntry, WizardSelection, WizardState};
