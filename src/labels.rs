//! Prompt and Summary Labels
//!
//! Every piece of wizard text is addressed by a typed [`LabelKey`] and stored
//! once per [`Language`]. A table is only usable after [`LabelTable::validate`]
//! has confirmed that every key is translated into every language.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LabelError;
use crate::language::{Language, Localized};

/// Typed key set for wizard text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKey {
    // Prompts
    Welcome,
    AskPackage,
    AskRoom,
    AskHotel,
    AskTransport,
    AskName,
    AskPhone,

    // Summary block
    SummaryTitle,
    Client,
    MakkahHotel,
    MadinaHotel,
    Room,
    Transport,
    Budget,
    PerPerson,
    ServicesIncluded,
    ServiceAirline,
    ServiceVisa,
    ServiceBaggage,
    ServiceSupervision,
    AgentVerify,
    BookWhatsApp,

    // Chrome around the conversation
    Assistant,
    Expert,
    Progression,
    Level,
    ChooseOption,
    PlaceholderName,
    PlaceholderPhone,
    Confirm,

    // Handoff message
    HandoffTitle,
    HandoffPackage,
    HandoffBudget,
    HandoffPerPerson,
    HandoffValidation,
}

impl LabelKey {
    pub const ALL: [LabelKey; 35] = [
        LabelKey::Welcome,
        LabelKey::AskPackage,
        LabelKey::AskRoom,
        LabelKey::AskHotel,
        LabelKey::AskTransport,
        LabelKey::AskName,
        LabelKey::AskPhone,
        LabelKey::SummaryTitle,
        LabelKey::Client,
        LabelKey::MakkahHotel,
        LabelKey::MadinaHotel,
        LabelKey::Room,
        LabelKey::Transport,
        LabelKey::Budget,
        LabelKey::PerPerson,
        LabelKey::ServicesIncluded,
        LabelKey::ServiceAirline,
        LabelKey::ServiceVisa,
        LabelKey::ServiceBaggage,
        LabelKey::ServiceSupervision,
        LabelKey::AgentVerify,
        LabelKey::BookWhatsApp,
        LabelKey::Assistant,
        LabelKey::Expert,
        LabelKey::Progression,
        LabelKey::Level,
        LabelKey::ChooseOption,
        LabelKey::PlaceholderName,
        LabelKey::PlaceholderPhone,
        LabelKey::Confirm,
        LabelKey::HandoffTitle,
        LabelKey::HandoffPackage,
        LabelKey::HandoffBudget,
        LabelKey::HandoffPerPerson,
        LabelKey::HandoffValidation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::AskPackage => "ask_package",
            Self::AskRoom => "ask_room",
            Self::AskHotel => "ask_hotel",
            Self::AskTransport => "ask_transport",
            Self::AskName => "ask_name",
            Self::AskPhone => "ask_phone",
            Self::SummaryTitle => "summary_title",
            Self::Client => "client",
            Self::MakkahHotel => "makkah_hotel",
            Self::MadinaHotel => "madina_hotel",
            Self::Room => "room",
            Self::Transport => "transport",
            Self::Budget => "budget",
            Self::PerPerson => "per_person",
            Self::ServicesIncluded => "services_included",
            Self::ServiceAirline => "service_airline",
            Self::ServiceVisa => "service_visa",
            Self::ServiceBaggage => "service_baggage",
            Self::ServiceSupervision => "service_supervision",
            Self::AgentVerify => "agent_verify",
            Self::BookWhatsApp => "book_whatsapp",
            Self::Assistant => "assistant",
            Self::Expert => "expert",
            Self::Progression => "progression",
            Self::Level => "level",
            Self::ChooseOption => "choose_option",
            Self::PlaceholderName => "placeholder_name",
            Self::PlaceholderPhone => "placeholder_phone",
            Self::Confirm => "confirm",
            Self::HandoffTitle => "handoff_title",
            Self::HandoffPackage => "handoff_package",
            Self::HandoffBudget => "handoff_budget",
            Self::HandoffPerPerson => "handoff_per_person",
            Self::HandoffValidation => "handoff_validation",
        }
    }
}

impl std::fmt::Display for LabelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Language-indexed label table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelTable {
    entries: BTreeMap<LabelKey, Localized>,
}

impl LabelTable {
    /// Build a table from raw entries, checking completeness
    pub fn from_entries(entries: BTreeMap<LabelKey, Localized>) -> Result<Self, LabelError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Check that every key is present and translated into every language
    pub fn validate(&self) -> Result<(), LabelError> {
        for key in LabelKey::ALL {
            match self.entries.get(&key) {
                Some(text) => text.validate(key.as_str())?,
                None => {
                    return Err(LabelError::MissingTranslation {
                        key: key.as_str().to_string(),
                        language: Language::Fr,
                    })
                }
            }
        }
        debug!(keys = self.entries.len(), "label table validated");
        Ok(())
    }

    /// Resolve a label. Keys absent from an unvalidated table yield their key name.
    pub fn get(&self, key: LabelKey, language: Language) -> &str {
        self.entries
            .get(&key)
            .map(|text| text.get(language))
            .unwrap_or(key.as_str())
    }

    /// Override or add a single entry
    pub fn with_entry(mut self, key: LabelKey, text: Localized) -> Self {
        self.entries.insert(key, text);
        self
    }

    /// The built-in wizard text
    pub fn builtin() -> Self {
        let entries = [
            (
                LabelKey::Welcome,
                Localized::new(
                    "Salam ! Je suis votre guide Manasik. Prêt à configurer votre mission Omra Ramadan 2026 ? 🕋",
                    "السلام عليكم! أنا مرشدكم لمناسك. هل أنتم مستعدون لتصميم مهمة عمرة رمضان 2026؟ 🕋",
                    "Salam! I am your Manasik guide. Ready to configure your Ramadan 2026 Umrah mission? 🕋",
                ),
            ),
            (
                LabelKey::AskPackage,
                Localized::new(
                    "Choisissez votre camp : Package Économique ou Premium ?",
                    "اختر نوع البرنامج: البرنامج الاقتصادي أم المتميز؟",
                    "Pick your camp: Economy or Premium package?",
                ),
            ),
            (
                LabelKey::AskRoom,
                Localized::new(
                    "Excellent ! Quelle configuration de chambre pour l'équipe ?",
                    "ممتاز! ما هو نوع الغرفة الذي تفضلونه؟",
                    "Excellent! Which room configuration for the team?",
                ),
            ),
            (
                LabelKey::AskHotel,
                Localized::new(
                    "Parfait. Quel hôtel à La Mecque (27 nuits) servira de quartier général ? 🏨",
                    "رائع. أي فندق بمكة (27 ليلة) سيكون مقراً لإقامتكم؟ 🏨",
                    "Perfect. Which Makkah hotel (27 nights) will be your headquarters? 🏨",
                ),
            ),
            (
                LabelKey::AskTransport,
                Localized::new(
                    "Dernière étape technique : Quel transport pour vos déplacements ? 🚗",
                    "الخطوة الأخيرة: ما هي وسيلة النقل التي تفضلونها؟ 🚗",
                    "Last technical step: which transport for your journeys? 🚗",
                ),
            ),
            (
                LabelKey::AskName,
                Localized::new(
                    "Mission presque complète ! Votre Nom et Prénom ? ✍️",
                    "المهمة شارفت على الانتهاء! ما هو اسمك الكامل؟ ✍️",
                    "Mission almost complete! Your full name? ✍️",
                ),
            ),
            (
                LabelKey::AskPhone,
                Localized::new(
                    "Et votre WhatsApp pour recevoir les ordres de mission ? 📱",
                    "ورقم الواتساب الخاص بك لتلقي تفاصيل المهمة؟ 📱",
                    "And your WhatsApp number to receive the mission orders? 📱",
                ),
            ),
            (
                LabelKey::SummaryTitle,
                Localized::new(
                    "Dossier de Mission Prêt !",
                    "ملف المهمة جاهز!",
                    "Mission File Ready!",
                ),
            ),
            (LabelKey::Client, Localized::new("Pèlerin", "المعتمر", "Pilgrim")),
            (
                LabelKey::MakkahHotel,
                Localized::new("Hôtel Makkah", "فندق مكة", "Makkah Hotel"),
            ),
            (
                LabelKey::MadinaHotel,
                Localized::new("Hôtel Madina", "فندق المدينة", "Madina Hotel"),
            ),
            (
                LabelKey::Room,
                Localized::new("Hébergement", "نوع الغرفة", "Room"),
            ),
            (
                LabelKey::Transport,
                Localized::new("Navigation", "وسيلة النقل", "Transport"),
            ),
            (
                LabelKey::Budget,
                Localized::new(
                    "Budget total estimé",
                    "الميزانية الإجمالية التقديرية",
                    "Estimated total budget",
                ),
            ),
            (
                LabelKey::PerPerson,
                Localized::new("DHS / personne", "درهم / للشخص", "DHS / person"),
            ),
            (
                LabelKey::ServicesIncluded,
                Localized::new("Services Inclus", "الخدمات المدرجة", "Included Services"),
            ),
            (
                LabelKey::ServiceAirline,
                Localized::new("Saudia Airlines", "الخطوط السعودية", "Saudia Airlines"),
            ),
            (
                LabelKey::ServiceVisa,
                Localized::new("Visa Omra", "تأشيرة العمرة", "Umrah Visa"),
            ),
            (
                LabelKey::ServiceBaggage,
                Localized::new("Baggage 10+46kg", "حقيبة 10+2×23", "Baggage 10+46kg"),
            ),
            (
                LabelKey::ServiceSupervision,
                Localized::new("Encadrement", "التأطير الديني", "Religious supervision"),
            ),
            (
                LabelKey::AgentVerify,
                Localized::new(
                    "\"Prix tout compris (Vol, Visa, Hôtels, Encadrement). Un expert va vous appeler.\"",
                    "\"السعر يشمل (الطائرة، التأشيرة، الفنادق، التأطير). سيقوم خبير بالاتصال بكم.\"",
                    "\"All-inclusive price (Flight, Visa, Hotels, Supervision). An expert will call you.\"",
                ),
            ),
            (
                LabelKey::BookWhatsApp,
                Localized::new(
                    "Lancer la quête sur WhatsApp",
                    "بدء المهمة عبر واتساب",
                    "Start the quest on WhatsApp",
                ),
            ),
            (
                LabelKey::Assistant,
                Localized::new("Guide Virtuel", "المرشد الافتراضي", "Virtual Guide"),
            ),
            (
                LabelKey::Expert,
                Localized::new("Agent Manasik", "عميل مناسك", "Manasik Agent"),
            ),
            (
                LabelKey::Progression,
                Localized::new(
                    "Progression de la Mission",
                    "تقدم التخصيص",
                    "Mission Progress",
                ),
            ),
            (LabelKey::Level, Localized::new("NIVEAU", "المستوى", "LEVEL")),
            (
                LabelKey::ChooseOption,
                Localized::new(
                    "CHOISISSEZ UNE OPTION",
                    "يرجى اختيار خيار",
                    "CHOOSE AN OPTION",
                ),
            ),
            (
                LabelKey::PlaceholderName,
                Localized::new("Nom complet", "الاسم الكامل", "Full name"),
            ),
            (
                LabelKey::PlaceholderPhone,
                Localized::new("Numéro de téléphone", "رقم الهاتف", "Phone number"),
            ),
            (
                LabelKey::Confirm,
                Localized::new("Confirmer", "تأكيد المهمة", "Confirm"),
            ),
            (
                LabelKey::HandoffTitle,
                Localized::new(
                    "QUÊTE OMRA RAMADAN 2026",
                    "مهمة عمرة رمضان 2026",
                    "RAMADAN 2026 UMRAH QUEST",
                ),
            ),
            (
                LabelKey::HandoffPackage,
                Localized::new("PACK", "العرض", "PACKAGE"),
            ),
            (
                LabelKey::HandoffBudget,
                Localized::new("BUDGET", "الميزانية", "BUDGET"),
            ),
            (
                LabelKey::HandoffPerPerson,
                Localized::new("PERSONNE", "للشخص", "PERSON"),
            ),
            (
                LabelKey::HandoffValidation,
                Localized::new(
                    "Je valide ma configuration et attend l'appel d'un expert.",
                    "أؤكد اختياراتي وأنتظر اتصال الخبير.",
                    "I confirm my configuration and await an expert's call.",
                ),
            ),
        ];

        Self {
            entries: entries.into_iter().collect(),
        }
    }
}
