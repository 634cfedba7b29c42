//! Package Catalog
//!
//! Pure data: packages, their room configurations and hotel choices, and the
//! transport modes offered with every package. A [`Catalog`] can only be
//! obtained through a constructor that checks its integrity, so the engine may
//! rely on every hotel pricing every room of its package.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CatalogError;
use crate::language::{Language, Localized};

/// Nights spent in Makkah by default
pub const DEFAULT_MAKKAH_NIGHTS: u32 = 27;

/// Nights spent in Madina by default
pub const DEFAULT_MADINA_NIGHTS: u32 = 6;

fn default_makkah_nights() -> u32 {
    DEFAULT_MAKKAH_NIGHTS
}

fn default_madina_nights() -> u32 {
    DEFAULT_MADINA_NIGHTS
}

/// One room-occupancy choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOption {
    pub id: String,
    pub label: Localized,
    /// Glyph shown next to the label
    #[serde(default)]
    pub glyph: String,
}

/// One lodging choice within a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelOption {
    pub id: String,
    /// Hotel names are shown as-is in every language
    pub label: String,
    /// Room id -> price per person
    pub prices: BTreeMap<String, u32>,
}

impl HotelOption {
    pub fn price_for(&self, room_id: &str) -> Option<u32> {
        self.prices.get(room_id).copied()
    }
}

/// A travel-program tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub label: Localized,
    pub description: Localized,
    #[serde(default)]
    pub stars: u8,
    pub rooms: Vec<RoomOption>,
    pub hotels: Vec<HotelOption>,
    /// Hotel used in the secondary city (Madina), fixed per package
    pub secondary_hotel: Localized,
    #[serde(default = "default_makkah_nights")]
    pub makkah_nights: u32,
    #[serde(default = "default_madina_nights")]
    pub madina_nights: u32,
}

impl Package {
    pub fn room(&self, id: &str) -> Option<&RoomOption> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn hotel(&self, id: &str) -> Option<&HotelOption> {
        self.hotels.iter().find(|h| h.id == id)
    }

    /// Check ids, prices and labels of this package
    fn validate(&self) -> Result<(), CatalogError> {
        if self.rooms.is_empty() {
            return Err(CatalogError::NoRooms(self.id.clone()));
        }
        if self.hotels.is_empty() {
            return Err(CatalogError::NoHotels(self.id.clone()));
        }

        self.label.validate(&format!("{}.label", self.id))?;
        self.description
            .validate(&format!("{}.description", self.id))?;
        self.secondary_hotel
            .validate(&format!("{}.secondary_hotel", self.id))?;

        ensure_unique("room", self.rooms.iter().map(|r| r.id.as_str()))?;
        ensure_unique("hotel", self.hotels.iter().map(|h| h.id.as_str()))?;

        for room in &self.rooms {
            room.label
                .validate(&format!("{}.rooms.{}", self.id, room.id))?;
        }

        for hotel in &self.hotels {
            for room in &self.rooms {
                if !hotel.prices.contains_key(&room.id) {
                    return Err(CatalogError::MissingPrice {
                        package: self.id.clone(),
                        hotel: hotel.id.clone(),
                        room: room.id.clone(),
                    });
                }
            }
            if let Some(stray) = hotel.prices.keys().find(|r| self.room(r).is_none()) {
                return Err(CatalogError::UnknownPricedRoom {
                    package: self.id.clone(),
                    hotel: hotel.id.clone(),
                    room: stray.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A transportation mode, offered with every package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOption {
    pub id: String,
    pub label: Localized,
}

/// The full, validated catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    packages: Vec<Package>,
    transports: Vec<TransportOption>,
}

/// Unvalidated catalog as found in a YAML file
#[derive(Debug, Deserialize)]
struct RawCatalog {
    packages: Vec<Package>,
    transports: Vec<TransportOption>,
}

impl Catalog {
    /// Build a catalog, checking its integrity
    pub fn new(
        packages: Vec<Package>,
        transports: Vec<TransportOption>,
    ) -> Result<Self, CatalogError> {
        if packages.is_empty() {
            return Err(CatalogError::Empty);
        }
        if transports.is_empty() {
            return Err(CatalogError::NoTransport);
        }

        ensure_unique("package", packages.iter().map(|p| p.id.as_str()))?;
        ensure_unique("transport", transports.iter().map(|t| t.id.as_str()))?;

        for package in &packages {
            package.validate()?;
        }
        for transport in &transports {
            transport
                .label
                .validate(&format!("transport.{}", transport.id))?;
        }

        Ok(Self {
            packages,
            transports,
        })
    }

    /// Parse and validate a catalog from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_yaml::from_str(content)?;
        Self::new(raw.packages, raw.transports)
    }

    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        info!("Loading catalog from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&content)?;
        info!(
            packages = catalog.packages.len(),
            transports = catalog.transports.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn transports(&self) -> &[TransportOption] {
        &self.transports
    }

    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn transport(&self, id: &str) -> Option<&TransportOption> {
        self.transports.iter().find(|t| t.id == id)
    }

    /// Localized label of a transport, falling back to its id
    pub fn transport_label(&self, id: &str, language: Language) -> String {
        self.transport(id)
            .map(|t| t.label.get(language).to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// The Ramadan 2026 catalog shipped with the wizard
    pub fn builtin() -> Self {
        let rooms = || {
            vec![
                room("quad", Localized::new("Quadruple", "رباعية", "Quadruple"), "👥👥"),
                room("triple", Localized::new("Triple", "ثلاثية", "Triple"), "👨‍👩‍👦"),
                room("double", Localized::new("Double", "ثنائية", "Double"), "👫"),
            ]
        };

        let packages = vec![
            Package {
                id: "eco".into(),
                label: Localized::new("Économique", "البرنامج الاقتصادي", "Economy"),
                description: Localized::new(
                    "Hôtels 3-4★ avec Hôtels Rehab à Médine",
                    "فنادق 3-4 نجوم + فندق رحاب المسك بالمدينة",
                    "3-4★ hotels with Rehab hotels in Madina",
                ),
                stars: 3,
                rooms: rooms(),
                hotels: vec![
                    hotel("kadi", "Kadi Tours (كدي تورز)", [29500, 31500, 35500]),
                    hotel("abraj-kaswah", "Abraj Al-Kaswah (أبراج الكسوة)", [32500, 35500, 37500]),
                    hotel("abraj-tayseer", "Abraj Al-Tayseer (أبراج التيسير)", [32500, 34500, 38500]),
                    hotel("nawazi", "Nawazi Tours (نوازي تورز)", [34500, 38500, 42500]),
                    hotel("kauthar", "Kauthar Marbouth (كوطيار مريوت)", [35500, 39500, 46500]),
                ],
                secondary_hotel: Localized::new("Rehab Al-Misk", "رحاب المسك", "Rehab Al-Misk"),
                makkah_nights: DEFAULT_MAKKAH_NIGHTS,
                madina_nights: DEFAULT_MADINA_NIGHTS,
            },
            Package {
                id: "premium".into(),
                label: Localized::new("Premium Confort", "البرنامج المتميز", "Premium Comfort"),
                description: Localized::new(
                    "Hôtels 4-5★ avec Ansar Golden Tulip à Médine",
                    "فنادق 4-5 نجوم + فندق أنصار غولدن توليب بالمدينة",
                    "4-5★ hotels with Ansar Golden Tulip in Madina",
                ),
                stars: 5,
                rooms: rooms(),
                hotels: vec![
                    hotel("fokoo", "Fokoo Makkah (فوكو مكة)", [34500, 38500, 45500]),
                    hotel("al-unwan", "Al-Unwan Ajyad (العنوان أجياد)", [35500, 39500, 45500]),
                    hotel("badr", "Badr Al-Massa (بدر الماسة)", [35500, 39500, 46500]),
                    hotel("nadi", "Nadi Ajyad (ندي أجياد)", [38500, 43500, 58500]),
                    hotel("makkah-ajyad", "Makkat Ajyad (مكات أجياد)", [41500, 49500, 62500]),
                ],
                secondary_hotel: Localized::new(
                    "Ansar Golden Tulip",
                    "أنصار غولدن توليب",
                    "Ansar Golden Tulip",
                ),
                makkah_nights: DEFAULT_MAKKAH_NIGHTS,
                madina_nights: DEFAULT_MADINA_NIGHTS,
            },
        ];

        let transports = vec![
            TransportOption {
                id: "bus".into(),
                label: Localized::new("Bus Climatisé", "حافلة مكيفة", "Air-conditioned bus"),
            },
            TransportOption {
                id: "car".into(),
                label: Localized::new("Privé GMC", "خدمة GMC خاصة", "Private GMC"),
            },
            TransportOption {
                id: "train".into(),
                label: Localized::new(
                    "Train Al-Haramain",
                    "قطار الحرمين السريع",
                    "Haramain high-speed train",
                ),
            },
        ];

        Self {
            packages,
            transports,
        }
    }
}

fn room(id: &str, label: Localized, glyph: &str) -> RoomOption {
    RoomOption {
        id: id.to_string(),
        label,
        glyph: glyph.to_string(),
    }
}

/// Hotel priced as [quad, triple, double]
fn hotel(id: &str, label: &str, [quad, triple, double]: [u32; 3]) -> HotelOption {
    HotelOption {
        id: id.to_string(),
        label: label.to_string(),
        prices: BTreeMap::from([
            ("quad".to_string(), quad),
            ("triple".to_string(), triple),
            ("double".to_string(), double),
        ]),
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(
            builtin.packages().to_vec(),
            builtin.transports().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, builtin);
    }

    #[test]
    fn test_every_hotel_prices_every_room() {
        let catalog = Catalog::builtin();
        for package in catalog.packages() {
            for hotel in &package.hotels {
                for room in &package.rooms {
                    assert!(
                        hotel.price_for(&room.id).is_some(),
                        "{}/{} has no price for {}",
                        package.id,
                        hotel.id,
                        room.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_price_lookup() {
        let catalog = Catalog::builtin();
        let eco = catalog.package("eco").unwrap();
        assert_eq!(eco.hotel("kadi").unwrap().price_for("quad"), Some(29500));
        let premium = catalog.package("premium").unwrap();
        assert_eq!(
            premium.hotel("makkah-ajyad").unwrap().price_for("double"),
            Some(62500)
        );
        assert_eq!(eco.hotel("kadi").unwrap().price_for("suite"), None);
    }

    #[test]
    fn test_missing_price_rejected() {
        let mut packages = Catalog::builtin().packages().to_vec();
        packages[0].hotels[2].prices.remove("triple");
        let err = Catalog::new(packages, Catalog::builtin().transports().to_vec()).unwrap_err();
        match err {
            CatalogError::MissingPrice {
                package,
                hotel,
                room,
            } => {
                assert_eq!(package, "eco");
                assert_eq!(hotel, "abraj-tayseer");
                assert_eq!(room, "triple");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stray_price_rejected() {
        let mut packages = Catalog::builtin().packages().to_vec();
        packages[1].hotels[0].prices.insert("suite".into(), 90000);
        let err = Catalog::new(packages, Catalog::builtin().transports().to_vec()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPricedRoom { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut packages = Catalog::builtin().packages().to_vec();
        packages[1].id = "eco".into();
        let err = Catalog::new(packages, Catalog::builtin().transports().to_vec()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "package", .. }));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::new(vec![], Catalog::builtin().transports().to_vec()),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            Catalog::new(Catalog::builtin().packages().to_vec(), vec![]),
            Err(CatalogError::NoTransport)
        ));
    }

    #[test]
    fn test_yaml_catalog() {
        let yaml = r#"
packages:
  - id: solo
    label: { fr: Solo, ar: فردي, en: Solo }
    description: { fr: Un, ar: واحد, en: One }
    rooms:
      - id: single
        label: { fr: Simple, ar: فردية, en: Single }
    hotels:
      - id: h1
        label: Hotel One
        prices: { single: 50000 }
    secondary_hotel: { fr: Médine, ar: المدينة, en: Madina }
transports:
  - id: bus
    label: { fr: Bus, ar: حافلة, en: Bus }
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        let solo = catalog.package("solo").unwrap();
        assert_eq!(solo.makkah_nights, DEFAULT_MAKKAH_NIGHTS);
        assert_eq!(solo.madina_nights, DEFAULT_MADINA_NIGHTS);
        assert_eq!(solo.hotel("h1").unwrap().price_for("single"), Some(50000));
        assert_eq!(catalog.transport_label("bus", Language::Ar), "حافلة");
    }

    #[test]
    fn test_yaml_catalog_missing_translation() {
        let yaml = r#"
packages:
  - id: solo
    label: { fr: Solo, en: Solo }
    description: { fr: Un, ar: واحد, en: One }
    rooms:
      - id: single
        label: { fr: Simple, ar: فردية, en: Single }
    hotels:
      - id: h1
        label: Hotel One
        prices: { single: 50000 }
    secondary_hotel: { fr: Médine, ar: المدينة, en: Madina }
transports:
  - id: bus
    label: { fr: Bus, ar: حافلة, en: Bus }
"#;
        let err = Catalog::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Label(_)));
    }
}
