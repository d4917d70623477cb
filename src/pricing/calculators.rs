//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database or network access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{FixedExpense, HotelTariff, RoomCategory};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use tour_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Round to cents and pin the scale at 2, so 1180 reads as 1180.00.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded = round_money(amount, 2);
    rounded.rescale(2);
    rounded
}

/// Number of rooms needed to seat `persons` at `capacity` per room.
///
/// Ceiling division; zero persons need zero rooms. A zero capacity is treated
/// as unusable and also yields zero.
pub fn auto_room_count(persons: u32, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    persons.div_ceil(capacity)
}

/// Hotel cost in the tariff currency for one set of occupants.
///
/// Adults pay the category price; children and infants pay the flat tariff
/// prices regardless of category.
pub fn hotel_cost(
    tariff: &HotelTariff,
    category: RoomCategory,
    adults: u32,
    children: u32,
    infants: u32,
) -> Decimal {
    Decimal::from(adults) * tariff.price_for(category)
        + Decimal::from(children) * tariff.child
        + Decimal::from(infants) * tariff.infant
}

/// Sum of all fixed expense amounts.
pub fn sum_expenses(expenses: &[FixedExpense]) -> Decimal {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Even per-person share of `total`, or zero when nobody is travelling.
pub fn per_person_share(total: Decimal, persons: u32) -> Decimal {
    if persons == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(persons)
}
