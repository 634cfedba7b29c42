//! Quote Derivation
//!
//! Walks the catalog (package -> hotel -> room price) for a completed
//! selection and resolves every label the summary and the handoff need.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::labels::{LabelKey, LabelTable};
use crate::language::Language;
use crate::state::WizardSelection;

/// Derived price and labels shown at the terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub package_id: String,
    pub package_label: String,
    pub room_label: String,
    pub hotel_label: String,
    pub secondary_hotel_label: String,
    pub transport_label: String,
    pub total_price: u32,
    pub currency_label: String,
    pub makkah_nights: u32,
    pub madina_nights: u32,
    pub language: Language,
}

impl Quote {
    /// Derive the quote for a selection.
    ///
    /// Returns `None` when the package or hotel id is not in the catalog.
    /// Ids only ever come from the catalog, so this is an invariant violation
    /// and the caller skips the summary. A missing room price yields 0.
    pub fn derive(
        catalog: &Catalog,
        selection: &WizardSelection,
        language: Language,
        currency_label: &str,
    ) -> Option<Self> {
        let package_id = selection.package_id.as_deref()?;
        let Some(package) = catalog.package(package_id) else {
            warn!(package_id, "quote aborted: package not in catalog");
            return None;
        };

        let hotel_id = selection.hotel_id.as_deref().unwrap_or_default();
        let Some(hotel) = package.hotel(hotel_id) else {
            warn!(package_id, hotel_id, "quote aborted: hotel not in package");
            return None;
        };

        let room_id = selection.room_id.as_deref().unwrap_or_default();
        let total_price = hotel.price_for(room_id).unwrap_or_else(|| {
            warn!(package_id, hotel_id, room_id, "no price for room, quoting 0");
            0
        });

        let room_label = package
            .room(room_id)
            .map(|r| r.label.get(language).to_string())
            .unwrap_or_else(|| room_id.to_string());

        let transport_id = selection.transport_id.as_deref().unwrap_or_default();

        let quote = Self {
            package_id: package.id.clone(),
            package_label: package.label.get(language).to_string(),
            room_label,
            hotel_label: hotel.label.clone(),
            secondary_hotel_label: package.secondary_hotel.get(language).to_string(),
            transport_label: catalog.transport_label(transport_id, language),
            total_price,
            currency_label: currency_label.to_string(),
            makkah_nights: package.makkah_nights,
            madina_nights: package.madina_nights,
            language,
        };

        debug!(
            package_id,
            hotel_id,
            room_id,
            total_price,
            "quote derived"
        );

        Some(quote)
    }

    /// Total with currency, e.g. `29 500 DHS`
    pub fn display_price(&self) -> String {
        format!("{} {}", format_price(self.total_price), self.currency_label)
    }
}

/// Group thousands the way `fr-FR` does, with a narrow no-break space
pub fn format_price(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(c);
    }
    out
}

/// Rendering data for the summary block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub badge: String,
    pub title: String,
    /// (caption, value) rows in display order
    pub rows: Vec<(String, String)>,
    pub budget_caption: String,
    pub per_person: String,
    pub price: String,
    pub services_caption: String,
    pub services: Vec<String>,
    pub note: String,
    pub action: String,
}

impl SummaryCard {
    pub fn new(quote: &Quote, name: &str, labels: &LabelTable) -> Self {
        let lang = quote.language;
        let label = |key| labels.get(key, lang).to_string();

        let rows = vec![
            (label(LabelKey::Client), name.to_string()),
            (
                format!("{} ({}n)", label(LabelKey::MadinaHotel), quote.madina_nights),
                quote.secondary_hotel_label.clone(),
            ),
            (
                format!("{} ({}n)", label(LabelKey::MakkahHotel), quote.makkah_nights),
                quote.hotel_label.clone(),
            ),
            (label(LabelKey::Room), quote.room_label.clone()),
            (label(LabelKey::Transport), quote.transport_label.clone()),
        ];

        Self {
            badge: quote.package_label.clone(),
            title: label(LabelKey::SummaryTitle),
            rows,
            budget_caption: label(LabelKey::Budget),
            per_person: label(LabelKey::PerPerson),
            price: quote.display_price(),
            services_caption: label(LabelKey::ServicesIncluded),
            services: vec![
                label(LabelKey::ServiceAirline),
                label(LabelKey::ServiceVisa),
                label(LabelKey::ServiceBaggage),
                label(LabelKey::ServiceSupervision),
            ],
            note: label(LabelKey::AgentVerify),
            action: label(LabelKey::BookWhatsApp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(package: &str, room: &str, hotel: &str) -> WizardSelection {
        WizardSelection {
            package_id: Some(package.into()),
            room_id: Some(room.into()),
            hotel_id: Some(hotel.into()),
            transport_id: Some("train".into()),
            name: Some("Amina".into()),
            phone: Some("0600000000".into()),
        }
    }

    #[test]
    fn test_eco_quad_kadi() {
        let catalog = Catalog::builtin();
        let quote = Quote::derive(
            &catalog,
            &selection("eco", "quad", "kadi"),
            Language::Fr,
            "DHS",
        )
        .unwrap();
        assert_eq!(quote.total_price, 29500);
        assert_eq!(quote.package_label, "Économique");
        assert_eq!(quote.room_label, "Quadruple");
        assert_eq!(quote.hotel_label, "Kadi Tours (كدي تورز)");
        assert_eq!(quote.secondary_hotel_label, "Rehab Al-Misk");
        assert_eq!(quote.transport_label, "Train Al-Haramain");
        assert_eq!(quote.display_price(), "29\u{202f}500 DHS");
    }

    #[test]
    fn test_labels_follow_language() {
        let catalog = Catalog::builtin();
        let quote = Quote::derive(
            &catalog,
            &selection("premium", "double", "nadi"),
            Language::Ar,
            "DHS",
        )
        .unwrap();
        assert_eq!(quote.total_price, 58500);
        assert_eq!(quote.room_label, "ثنائية");
        assert_eq!(quote.secondary_hotel_label, "أنصار غولدن توليب");
        assert_eq!(quote.transport_label, "قطار الحرمين السريع");
    }

    #[test]
    fn test_unknown_ids_abort() {
        let catalog = Catalog::builtin();
        assert!(Quote::derive(&catalog, &selection("vip", "quad", "kadi"), Language::Fr, "DHS").is_none());
        assert!(Quote::derive(&catalog, &selection("eco", "quad", "fokoo"), Language::Fr, "DHS").is_none());
        assert!(Quote::derive(&catalog, &WizardSelection::default(), Language::Fr, "DHS").is_none());
    }

    #[test]
    fn test_missing_room_price_quotes_zero() {
        let catalog = Catalog::builtin();
        let quote = Quote::derive(
            &catalog,
            &selection("eco", "suite", "kadi"),
            Language::En,
            "DHS",
        )
        .unwrap();
        assert_eq!(quote.total_price, 0);
        assert_eq!(quote.room_label, "suite");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(950), "950");
        assert_eq!(format_price(1000), "1\u{202f}000");
        assert_eq!(format_price(62500), "62\u{202f}500");
        assert_eq!(format_price(1234567), "1\u{202f}234\u{202f}567");
    }

    #[test]
    fn test_summary_card() {
        let catalog = Catalog::builtin();
        let labels = LabelTable::builtin();
        let quote = Quote::derive(
            &catalog,
            &selection("eco", "quad", "kadi"),
            Language::Fr,
            "DHS",
        )
        .unwrap();
        let card = SummaryCard::new(&quote, "Amina", &labels);
        assert_eq!(card.badge, "Économique");
        assert_eq!(card.rows[0], ("Pèlerin".to_string(), "Amina".to_string()));
        assert_eq!(card.rows[1].0, "Hôtel Madina (6n)");
        assert_eq!(card.rows[2].0, "Hôtel Makkah (27n)");
        assert_eq!(card.services.len(), 4);
        assert_eq!(card.price, "29\u{202f}500 DHS");
    }
}
