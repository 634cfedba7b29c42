//! WhatsApp Handoff
//!
//! Turns a finished quote into the prefilled message a human agent receives,
//! and the `wa.me` deep link that carries it. Building the link is the only
//! outbound action; opening it is up to the host.

use serde::Serialize;
use url::Url;

use crate::error::ConfigError;
use crate::labels::{LabelKey, LabelTable};
use crate::quote::{format_price, Quote};

/// Default agency number
pub const DEFAULT_HANDOFF_NUMBER: &str = "212661631160";

const WA_BASE: &str = "https://wa.me/";

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Fixed destination of the handoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffTarget {
    number: String,
    base: Url,
}

impl HandoffTarget {
    /// Build a target for an international number (digits only, `+` and
    /// spaces are stripped)
    pub fn new(number: &str) -> Result<Self, ConfigError> {
        let digits: String = number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '+')
            .collect();

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Invalid {
                key: "handoff_number".to_string(),
                message: format!("'{}' is not an international phone number", number),
            });
        }

        let base = Url::parse(WA_BASE)
            .and_then(|u| u.join(&digits))
            .map_err(|e| ConfigError::Invalid {
                key: "handoff_number".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            number: digits,
            base,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Deep link carrying `message` as the prefilled text
    pub fn link(&self, message: &str) -> Url {
        let mut url = self.base.clone();
        url.set_query(Some(&format!("text={}", urlencoding::encode(message))));
        url
    }
}

/// The handoff payload: message text plus the link to open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub message: String,
    pub url: Url,
}

impl Handoff {
    pub fn build(
        quote: &Quote,
        name: &str,
        phone: &str,
        labels: &LabelTable,
        target: &HandoffTarget,
    ) -> Self {
        let message = format_message(quote, name, phone, labels);
        let url = target.link(&message);
        Self { message, url }
    }
}

/// Render the handoff text. Section order is fixed for every language:
/// title, client, phone, package, Makkah hotel, Madina hotel, room,
/// transport, budget, validation line.
pub fn format_message(quote: &Quote, name: &str, phone: &str, labels: &LabelTable) -> String {
    let lang = quote.language;
    let upper = |key| labels.get(key, lang).to_uppercase();

    let mut lines = Vec::with_capacity(15);
    lines.push(format!("✨ *{}* ✨", upper(LabelKey::HandoffTitle)));
    lines.push(SEPARATOR.to_string());
    lines.push(format!("👤 *{}:* {}", upper(LabelKey::Client), name.to_uppercase()));
    lines.push(format!("📞 *TEL:* {}", phone));
    lines.push(String::new());
    lines.push(format!(
        "📦 *{}:* {}",
        upper(LabelKey::HandoffPackage),
        quote.package_label.to_uppercase()
    ));
    lines.push(format!("🏨 *MAKKAH:* {}", quote.hotel_label.to_uppercase()));
    lines.push(format!(
        "🕌 *MADINA:* {}",
        quote.secondary_hotel_label.to_uppercase()
    ));
    lines.push(format!(
        "👥 *{}:* {}",
        upper(LabelKey::Room),
        quote.room_label.to_uppercase()
    ));
    lines.push(format!(
        "🚗 *{}:* {}",
        upper(LabelKey::Transport),
        quote.transport_label.to_uppercase()
    ));
    lines.push(String::new());
    lines.push(format!(
        "💰 *{}:* {} {} / {}",
        upper(LabelKey::HandoffBudget),
        format_price(quote.total_price),
        quote.currency_label,
        upper(LabelKey::HandoffPerPerson)
    ));
    lines.push(SEPARATOR.to_string());
    lines.push(format!("🚀 {}", labels.get(LabelKey::HandoffValidation, lang)));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::language::Language;
    use crate::state::WizardSelection;

    fn quote(language: Language) -> Quote {
        let selection = WizardSelection {
            package_id: Some("eco".into()),
            room_id: Some("quad".into()),
            hotel_id: Some("kadi".into()),
            transport_id: Some("bus".into()),
            name: Some("Youssef Alami".into()),
            phone: Some("+212 600 000 000".into()),
        };
        Quote::derive(&Catalog::builtin(), &selection, language, "DHS").unwrap()
    }

    #[test]
    fn test_target_normalizes_number() {
        let target = HandoffTarget::new("+212 661 631 160").unwrap();
        assert_eq!(target.number(), "212661631160");
        assert_eq!(target, HandoffTarget::new(DEFAULT_HANDOFF_NUMBER).unwrap());
        assert!(HandoffTarget::new("call-me").is_err());
        assert!(HandoffTarget::new("   ").is_err());
    }

    #[test]
    fn test_message_sections_in_order() {
        let labels = LabelTable::builtin();
        let message = format_message(&quote(Language::Fr), "Youssef Alami", "0600", &labels);
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(lines[0], "✨ *QUÊTE OMRA RAMADAN 2026* ✨");
        assert_eq!(lines[2], "👤 *PÈLERIN:* YOUSSEF ALAMI");
        assert_eq!(lines[3], "📞 *TEL:* 0600");
        assert_eq!(lines[5], "📦 *PACK:* ÉCONOMIQUE");
        assert_eq!(lines[6], "🏨 *MAKKAH:* KADI TOURS (كدي تورز)");
        assert_eq!(lines[7], "🕌 *MADINA:* REHAB AL-MISK");
        assert_eq!(lines[8], "👥 *HÉBERGEMENT:* QUADRUPLE");
        assert_eq!(lines[9], "🚗 *NAVIGATION:* BUS CLIMATISÉ");
        assert_eq!(lines[11], "💰 *BUDGET:* 29\u{202f}500 DHS / PERSONNE");
        assert!(lines[13].starts_with("🚀 "));
    }

    #[test]
    fn test_arabic_message_keeps_order() {
        let labels = LabelTable::builtin();
        let message = format_message(&quote(Language::Ar), "Youssef", "0600", &labels);
        let positions: Vec<usize> = ["YOUSSEF", "0600", "البرنامج الاقتصادي", "KADI TOURS", "رحاب المسك", "رباعية", "حافلة مكيفة", "29\u{202f}500"]
            .iter()
            .map(|needle| message.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(message.contains("*العرض:*"));
    }

    #[test]
    fn test_link_is_percent_encoded() {
        let labels = LabelTable::builtin();
        let handoff = Handoff::build(
            &quote(Language::En),
            "Sara",
            "0611",
            &labels,
            &HandoffTarget::new(DEFAULT_HANDOFF_NUMBER).unwrap(),
        );
        let url = handoff.url.as_str();
        assert!(url.starts_with("https://wa.me/212661631160?text="));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));

        let (_, text) = handoff.url.query_pairs().next().unwrap();
        assert_eq!(text, handoff.message);
    }
}
