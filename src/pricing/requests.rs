//! Request DTOs for pricing API endpoints.
//!
//! Field names follow the English form; the Turkish names are
//! accepted as aliases. Absent or null optional fields take their defaults
//! during validation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use uuid::Uuid;

use super::currency::Currency;
use super::models::{FixedExpense, RoomCategory, RoomOccupant};
use super::services::PricingError;

pub const DEFAULT_TOUR_NAME: &str = "Vito Kapadokya Turu";

const DEFAULT_ADULTS: u32 = 3;
const DEFAULT_CHILDREN: u32 = 1;

/// Upper bound for any single head or extra-room count
pub const MAX_COUNT: u32 = 10_000;
/// Upper bound for the number of rooms in one request
pub const MAX_ROOMS: usize = 1_000;
/// Upper bound for the number of fixed expense lines
pub const MAX_EXPENSES: usize = 200;
/// Upper bound for one fixed expense amount
pub const MAX_EXPENSE_AMOUNT: Decimal = dec!(1000000000000);

/// Request to price one aggregate group
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PackagePriceRequest {
    #[serde(alias = "yetiskin")]
    pub adults: Option<i64>,
    #[serde(alias = "cocuk")]
    pub children: Option<i64>,
    #[serde(alias = "bebek")]
    pub infants: Option<i64>,
    #[serde(alias = "oda_tipi")]
    pub room_type: Option<String>,
    #[serde(alias = "sabit_giderler")]
    pub fixed_expenses: Option<Vec<FixedExpense>>,
    #[serde(alias = "ek_oda_sayisi")]
    pub extra_rooms: Option<i64>,
    #[serde(alias = "hedef_para_birimi")]
    pub target_currency: Option<String>,
    #[serde(alias = "tur_adi")]
    pub tour_name: Option<String>,
    pub tour_id: Option<Uuid>,
}

/// One room in a per-room request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomRequest {
    #[serde(alias = "yetiskin")]
    pub adults: Option<i64>,
    #[serde(alias = "cocuk")]
    pub children: Option<i64>,
    #[serde(alias = "bebek")]
    pub infants: Option<i64>,
    #[serde(alias = "oda_tipi")]
    pub room_type: Option<String>,
}

/// Request to price an explicit room list
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoomsPriceRequest {
    #[serde(alias = "odalar")]
    pub rooms: Option<Vec<RoomRequest>>,
    #[serde(alias = "sabit_giderler")]
    pub fixed_expenses: Option<Vec<FixedExpense>>,
    #[serde(alias = "hedef_para_birimi")]
    pub target_currency: Option<String>,
    #[serde(alias = "tur_adi")]
    pub tour_name: Option<String>,
    pub tour_id: Option<Uuid>,
}

/// Aggregate request after validation; expenses may still need resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPackage {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub room_category: RoomCategory,
    pub extra_rooms: u32,
    pub target_currency: Currency,
    pub fixed_expenses: Option<Vec<FixedExpense>>,
    pub tour_name: Option<String>,
    pub tour_id: Option<Uuid>,
}

/// Per-room request after validation; rooms and expenses may still need resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRooms {
    pub rooms: Option<Vec<RoomOccupant>>,
    pub target_currency: Currency,
    pub fixed_expenses: Option<Vec<FixedExpense>>,
    pub tour_name: Option<String>,
    pub tour_id: Option<Uuid>,
}

impl PackagePriceRequest {
    /// Apply defaults and reject negative counts.
    pub fn validate(self) -> Result<ValidatedPackage, PricingError> {
        let mut errors = Vec::new();

        let adults = count("adults", self.adults, DEFAULT_ADULTS, &mut errors);
        let children = count("children", self.children, DEFAULT_CHILDREN, &mut errors);
        let infants = count("infants", self.infants, 0, &mut errors);
        let extra_rooms = count("extra_rooms", self.extra_rooms, 0, &mut errors);
        if let Some(expenses) = &self.fixed_expenses {
            errors.extend(expense_errors(expenses));
        }

        if !errors.is_empty() {
            return Err(PricingError::InvalidInput {
                message: "Invalid package pricing request".to_string(),
                errors,
            });
        }

        Ok(ValidatedPackage {
            adults,
            children,
            infants,
            room_category: room_category(self.room_type.as_deref()),
            extra_rooms,
            target_currency: target_currency(self.target_currency.as_deref()),
            fixed_expenses: self.fixed_expenses,
            tour_name: self.tour_name,
            tour_id: self.tour_id,
        })
    }
}

impl RoomsPriceRequest {
    /// Apply defaults and reject negative counts in any room.
    pub fn validate(self) -> Result<ValidatedRooms, PricingError> {
        let mut errors = Vec::new();

        let rooms = self.rooms.map(|rooms| {
            rooms
                .into_iter()
                .enumerate()
                .map(|(index, room)| {
                    let number = index + 1;
                    RoomOccupant {
                        adults: count(&format!("rooms[{}].adults", number), room.adults, 0, &mut errors),
                        children: count(&format!("rooms[{}].children", number), room.children, 0, &mut errors),
                        infants: count(&format!("rooms[{}].infants", number), room.infants, 0, &mut errors),
                        category: room_category(room.room_type.as_deref()),
                    }
                })
                .collect::<Vec<_>>()
        });
        if let Some(rooms) = &rooms {
            if rooms.len() > MAX_ROOMS {
                errors.push(format!("rooms must hold at most {} entries, got {}", MAX_ROOMS, rooms.len()));
            }
        }
        if let Some(expenses) = &self.fixed_expenses {
            errors.extend(expense_errors(expenses));
        }

        if !errors.is_empty() {
            return Err(PricingError::InvalidInput {
                message: "Invalid room pricing request".to_string(),
                errors,
            });
        }

        Ok(ValidatedRooms {
            rooms,
            target_currency: target_currency(self.target_currency.as_deref()),
            fixed_expenses: self.fixed_expenses,
            tour_name: self.tour_name,
            tour_id: self.tour_id,
        })
    }
}

fn count(field: &str, value: Option<i64>, default: u32, errors: &mut Vec<String>) -> u32 {
    match value {
        None => default,
        Some(value) => match u32::try_from(value) {
            Ok(value) if value <= MAX_COUNT => value,
            _ => {
                errors.push(format!("{} must be between 0 and {}, got {}", field, MAX_COUNT, value));
                0
            }
        },
    }
}

/// Range problems in an expense list, whether supplied or loaded for a tour.
pub fn expense_errors(expenses: &[FixedExpense]) -> Vec<String> {
    let mut errors = Vec::new();
    if expenses.len() > MAX_EXPENSES {
        errors.push(format!(
            "fixed_expenses must hold at most {} entries, got {}",
            MAX_EXPENSES,
            expenses.len()
        ));
    }
    for (index, expense) in expenses.iter().enumerate() {
        if expense.amount.is_sign_negative() || expense.amount > MAX_EXPENSE_AMOUNT {
            errors.push(format!(
                "fixed_expenses[{}].amount must be between 0 and {}, got {}",
                index + 1,
                MAX_EXPENSE_AMOUNT,
                expense.amount
            ));
        }
    }
    errors
}

/// Range problems in a room layout loaded for a tour.
pub fn room_errors(rooms: &[RoomOccupant]) -> Vec<String> {
    let mut errors = Vec::new();
    if rooms.len() > MAX_ROOMS {
        errors.push(format!("rooms must hold at most {} entries, got {}", MAX_ROOMS, rooms.len()));
    }
    for (index, room) in rooms.iter().enumerate() {
        for (field, value) in [
            ("adults", room.adults),
            ("children", room.children),
            ("infants", room.infants),
        ] {
            if value > MAX_COUNT {
                errors.push(format!(
                    "rooms[{}].{} must be between 0 and {}, got {}",
                    index + 1,
                    field,
                    MAX_COUNT,
                    value
                ));
            }
        }
    }
    errors
}

fn room_category(label: Option<&str>) -> RoomCategory {
    label.map(RoomCategory::parse).unwrap_or_default()
}

fn target_currency(code: Option<&str>) -> Currency {
    code.map(Currency::parse).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_defaults() {
        let request: PackagePriceRequest = serde_json::from_str("{}").unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.adults, 3);
        assert_eq!(validated.children, 1);
        assert_eq!(validated.infants, 0);
        assert_eq!(validated.extra_rooms, 0);
        assert_eq!(validated.room_category, RoomCategory::Double);
        assert_eq!(validated.target_currency, Currency::Try);
        assert!(validated.fixed_expenses.is_none());
        assert!(validated.tour_name.is_none());
    }

    #[test]
    fn test_package_nulls_take_defaults() {
        let request: PackagePriceRequest =
            serde_json::from_str(r#"{"adults":null,"room_type":null,"target_currency":null}"#).unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.adults, 3);
        assert_eq!(validated.room_category, RoomCategory::Double);
        assert_eq!(validated.target_currency, Currency::Try);
    }

    #[test]
    fn test_package_accepts_turkish_field_names() {
        let request: PackagePriceRequest = serde_json::from_str(
            r#"{
                "yetiskin": 2,
                "cocuk": 0,
                "bebek": 1,
                "oda_tipi": "triple",
                "sabit_giderler": [{"tip": "arac", "fiyat": 4000}],
                "ek_oda_sayisi": 1,
                "hedef_para_birimi": "eur",
                "tur_adi": "Kapadokya"
            }"#,
        )
        .unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.adults, 2);
        assert_eq!(validated.children, 0);
        assert_eq!(validated.infants, 1);
        assert_eq!(validated.room_category, RoomCategory::Triple);
        assert_eq!(validated.extra_rooms, 1);
        assert_eq!(validated.target_currency, Currency::Eur);
        assert_eq!(
            validated.fixed_expenses,
            Some(vec![FixedExpense::new("arac", dec!(4000))])
        );
        assert_eq!(validated.tour_name.as_deref(), Some("Kapadokya"));
    }

    #[test]
    fn test_package_rejects_negative_counts() {
        let request: PackagePriceRequest =
            serde_json::from_str(r#"{"adults":-1,"extra_rooms":-2}"#).unwrap();
        match request.validate() {
            Err(PricingError::InvalidInput { errors, .. }) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].starts_with("adults"));
                assert!(errors[1].starts_with("extra_rooms"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_currency_is_kept() {
        let request: PackagePriceRequest =
            serde_json::from_str(r#"{"target_currency":"gbp"}"#).unwrap();
        let validated = request.validate().unwrap();
        assert_eq!(validated.target_currency, Currency::Other("GBP".to_string()));
    }

    #[test]
    fn test_rooms_validation() {
        let request: RoomsPriceRequest = serde_json::from_str(
            r#"{"odalar":[{"yetiskin":2,"oda_tipi":"single"},{"adults":1,"children":1}]}"#,
        )
        .unwrap();
        let validated = request.validate().unwrap();
        let rooms = validated.rooms.unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].adults, 2);
        assert_eq!(rooms[0].children, 0);
        assert_eq!(rooms[0].category, RoomCategory::Single);
        assert_eq!(rooms[1].category, RoomCategory::Double);
        assert_eq!(rooms[1].occupants(), 2);
    }

    #[test]
    fn test_rooms_rejects_negative_counts() {
        let request: RoomsPriceRequest =
            serde_json::from_str(r#"{"rooms":[{"adults":1},{"infants":-1}]}"#).unwrap();
        match request.validate() {
            Err(PricingError::InvalidInput { errors, .. }) => {
                assert_eq!(errors, vec!["rooms[2].infants must be between 0 and 10000, got -1"]);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_rooms_absent_stays_unresolved() {
        let request: RoomsPriceRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().unwrap().rooms.is_none());
    }

    #[test]
    fn test_package_rejects_counts_above_limit() {
        let request: PackagePriceRequest =
            serde_json::from_str(r#"{"adults":4294967295,"children":1,"extra_rooms":10001}"#).unwrap();
        match request.validate() {
            Err(PricingError::InvalidInput { errors, .. }) => {
                assert_eq!(
                    errors,
                    vec![
                        "adults must be between 0 and 10000, got 4294967295",
                        "extra_rooms must be between 0 and 10000, got 10001",
                    ]
                );
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_package_accepts_counts_at_limit() {
        let request: PackagePriceRequest =
            serde_json::from_str(r#"{"adults":10000,"children":10000,"infants":10000,"extra_rooms":10000}"#)
                .unwrap();
        assert_eq!(request.validate().unwrap().adults, MAX_COUNT);
    }

    #[test]
    fn test_package_rejects_expense_amounts_out_of_range() {
        let request: PackagePriceRequest = serde_json::from_str(
            r#"{"fixed_expenses":[
                {"label":"a","amount":"50000000000000000000000000000"},
                {"label":"b","amount":"50000000000000000000000000000"},
                {"label":"c","amount":-5}
            ]}"#,
        )
        .unwrap();
        match request.validate() {
            Err(PricingError::InvalidInput { errors, .. }) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].starts_with("fixed_expenses[1].amount"));
                assert!(errors[2].starts_with("fixed_expenses[3].amount"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_rooms_rejects_oversized_counts() {
        let request: RoomsPriceRequest =
            serde_json::from_str(r#"{"rooms":[{"adults":4294967295},{"adults":1}]}"#).unwrap();
        match request.validate() {
            Err(PricingError::InvalidInput { errors, .. }) => {
                assert_eq!(errors, vec!["rooms[1].adults must be between 0 and 10000, got 4294967295"]);
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_room_errors_flag_stored_layouts() {
        let rooms = vec![
            RoomOccupant {
                adults: 2,
                ..RoomOccupant::default()
            },
            RoomOccupant {
                children: u32::MAX,
                ..RoomOccupant::default()
            },
        ];
        assert_eq!(
            room_errors(&rooms),
            vec!["rooms[2].children must be between 0 and 10000, got 4294967295"]
        );
        assert!(room_errors(&rooms[..1]).is_empty());
    }

    #[test]
    fn test_expense_errors_limit_line_count() {
        let expenses = vec![FixedExpense::new("fee", dec!(1)); MAX_EXPENSES + 1];
        assert_eq!(expense_errors(&expenses).len(), 1);
        assert!(expense_errors(&expenses[..MAX_EXPENSES]).is_empty());
    }
}
