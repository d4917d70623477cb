//! Pricing domain models and database rows.
//!
//! Database rows use sqlx's FromRow derive for direct deserialization.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{debug, warn};
use uuid::Uuid;

use super::currency::Currency;

/// Currency fixed expenses are entered in.
pub const FIXED_EXPENSE_CURRENCY: Currency = Currency::Try;

/// Upper bound for any per-head tariff price
pub const MAX_TARIFF_PRICE: Decimal = dec!(1000000);

/// Room category selecting the per-adult tariff price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCategory {
    Single,
    #[default]
    Double,
    Triple,
}

impl RoomCategory {
    /// Parse a category label. Unknown labels price as `Double`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "single" => RoomCategory::Single,
            "double" => RoomCategory::Double,
            "triple" => RoomCategory::Triple,
            other => {
                debug!(category = other, "Unknown room category, pricing as double");
                RoomCategory::Double
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomCategory::Single => "single",
            RoomCategory::Double => "double",
            RoomCategory::Triple => "triple",
        }
    }
}

/// Hotel tariff, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelTariff {
    pub name: String,
    #[serde(default = "default_tariff_currency")]
    pub currency: Currency,
    /// Per-adult package price by room category
    pub single: Decimal,
    pub double: Decimal,
    pub triple: Decimal,
    /// Flat price per child, any category
    pub child: Decimal,
    #[serde(default)]
    pub infant: Decimal,
    /// Maximum occupants per room
    pub capacity: u32,
}

fn default_tariff_currency() -> Currency {
    Currency::Eur
}

impl Default for HotelTariff {
    fn default() -> Self {
        Self {
            name: "Cave Hotel".to_string(),
            currency: Currency::Eur,
            single: dec!(570),
            double: dec!(590),
            triple: dec!(580),
            child: dec!(540),
            infant: Decimal::ZERO,
            capacity: 3,
        }
    }
}

impl HotelTariff {
    /// Per-adult price for a room category.
    pub fn price_for(&self, category: RoomCategory) -> Decimal {
        match category {
            RoomCategory::Single => self.single,
            RoomCategory::Double => self.double,
            RoomCategory::Triple => self.triple,
        }
    }

    /// Load a tariff from a JSON file.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let tariff: HotelTariff = serde_json::from_str(&raw)?;
        tariff.check_prices()?;
        Ok(tariff)
    }

    /// Every price must lie in `0..=MAX_TARIFF_PRICE`.
    pub fn check_prices(&self) -> anyhow::Result<()> {
        for (field, price) in [
            ("single", self.single),
            ("double", self.double),
            ("triple", self.triple),
            ("child", self.child),
            ("infant", self.infant),
        ] {
            anyhow::ensure!(
                !price.is_sign_negative() && price <= MAX_TARIFF_PRICE,
                "Tariff {} price must be between 0 and {}, got {}",
                field,
                MAX_TARIFF_PRICE,
                price
            );
        }
        Ok(())
    }
}

/// A trip-wide cost apportioned across all occupants.
///
/// Amounts are in [`FIXED_EXPENSE_CURRENCY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedExpense {
    #[serde(alias = "tip")]
    pub label: String,
    #[serde(alias = "fiyat")]
    pub amount: Decimal,
}

impl FixedExpense {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Expenses used when neither the request nor the tour supplies any.
pub fn default_fixed_expenses() -> Vec<FixedExpense> {
    vec![
        FixedExpense::new("vehicle", dec!(5000)),
        FixedExpense::new("boat", dec!(2000)),
    ]
}

/// Occupants of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomOccupant {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub category: RoomCategory,
}

impl RoomOccupant {
    pub fn occupants(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    /// Occupant distribution, e.g. "2 yetiskin + 1 cocuk + 0 bebek"
    pub fn label(&self) -> String {
        occupant_label(self.adults, self.children, self.infants)
    }
}

pub fn occupant_label(adults: u32, children: u32, infants: u32) -> String {
    format!("{} yetiskin + {} cocuk + {} bebek", adults, children, infants)
}

/// Validated aggregate-mode pricing input.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRequest {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub room_category: RoomCategory,
    pub fixed_expenses: Vec<FixedExpense>,
    pub extra_rooms: u32,
    pub target_currency: Currency,
}

/// Tour from tours
#[derive(Debug, Clone, FromRow)]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
}

/// Fixed expense line from tour_expenses
#[derive(Debug, Clone, FromRow)]
pub struct TourExpense {
    pub label: String,
    pub amount: Decimal,
}

impl From<TourExpense> for FixedExpense {
    fn from(row: TourExpense) -> Self {
        FixedExpense::new(row.label, row.amount)
    }
}

/// Room occupancy record from tour_rooms
#[derive(Debug, Clone, FromRow)]
pub struct TourRoom {
    pub room_number: i32,
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
    pub room_type: String,
}

impl From<TourRoom> for RoomOccupant {
    fn from(row: TourRoom) -> Self {
        let count = |field: &str, value: i32| {
            u32::try_from(value).unwrap_or_else(|_| {
                warn!(
                    room_number = row.room_number,
                    field, value, "Negative occupant count in tour_rooms, using 0"
                );
                0
            })
        };
        RoomOccupant {
            adults: count("adults", row.adults),
            children: count("children", row.children),
            infants: count("infants", row.infants),
            category: RoomCategory::parse(&row.room_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_falls_back_to_double() {
        assert_eq!(RoomCategory::parse("suite"), RoomCategory::Double);
        assert_eq!(RoomCategory::parse(""), RoomCategory::Double);
        assert_eq!(RoomCategory::parse("Triple"), RoomCategory::Triple);
    }

    #[test]
    fn test_default_tariff_prices() {
        let tariff = HotelTariff::default();
        assert_eq!(tariff.price_for(RoomCategory::Single), dec!(570));
        assert_eq!(tariff.price_for(RoomCategory::Double), dec!(590));
        assert_eq!(tariff.price_for(RoomCategory::Triple), dec!(580));
        assert_eq!(tariff.infant, Decimal::ZERO);
        assert_eq!(tariff.currency, Currency::Eur);
    }

    #[test]
    fn test_tariff_json_keeps_infant_configurable() {
        let tariff: HotelTariff = serde_json::from_str(
            r#"{"name":"Test","single":100,"double":"120.50","triple":110,"child":60,"infant":15,"capacity":4}"#,
        )
        .unwrap();
        assert_eq!(tariff.double, dec!(120.50));
        assert_eq!(tariff.infant, dec!(15));
        assert_eq!(tariff.currency, Currency::Eur);
        assert_eq!(tariff.capacity, 4);
    }

    #[test]
    fn test_tariff_price_limits() {
        assert!(HotelTariff::default().check_prices().is_ok());

        let tariff = HotelTariff {
            double: dec!(10000001),
            ..HotelTariff::default()
        };
        let err = tariff.check_prices().unwrap_err();
        assert!(err.to_string().contains("double"));

        let tariff = HotelTariff {
            child: dec!(-1),
            ..HotelTariff::default()
        };
        assert!(tariff.check_prices().is_err());
    }

    #[test]
    fn test_tariff_file_out_of_range_is_rejected() {
        let path = std::env::temp_dir().join(format!("tariff-{}.json", Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"{"name":"Huge","single":"50000000000000000000000000000","double":1,"triple":1,"child":1,"capacity":3}"#,
        )
        .unwrap();
        let result = HotelTariff::from_json_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_fixed_expense_accepts_turkish_field_names() {
        let expense: FixedExpense = serde_json::from_str(r#"{"tip":"arac","fiyat":5000}"#).unwrap();
        assert_eq!(expense, FixedExpense::new("arac", dec!(5000)));
    }

    #[test]
    fn test_tour_room_row_conversion() {
        let room: RoomOccupant = TourRoom {
            room_number: 1,
            adults: 2,
            children: -1,
            infants: 1,
            room_type: "triple".to_string(),
        }
        .into();
        assert_eq!(room.adults, 2);
        assert_eq!(room.children, 0);
        assert_eq!(room.category, RoomCategory::Triple);
        assert_eq!(room.label(), "2 yetiskin + 0 cocuk + 1 bebek");
    }
}
