//! Package pricing in aggregate and per-room modes.
//!
//! Both modes are pure: tariff, request and a rate snapshot in, breakdown out.
//! Every displayed amount is rounded to 2 places where it is computed, so line
//! items may not sum to the displayed grand total in aggregate mode. Per-room
//! mode sums the already-rounded room totals instead.
//!
//! Inputs are range-checked before they get here (see `requests::MAX_COUNT`
//! and friends), which keeps the `u32` and `Decimal` arithmetic from overflowing.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{auto_room_count, hotel_cost, per_person_share, round_cents, sum_expenses};
use super::currency::{convert, Currency, ExchangeRateTable};
use super::models::{
    AggregateRequest, FixedExpense, HotelTariff, RoomCategory, RoomOccupant,
    FIXED_EXPENSE_CURRENCY,
};
use super::services::PricingError;

/// One fixed expense in the aggregate breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseLine {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub per_person: Decimal,
}

/// Result of aggregate-mode pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBreakdown {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub room_category: RoomCategory,
    pub total_persons: u32,
    pub auto_room_count: u32,
    pub extra_rooms: u32,
    pub total_room_count: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub hotel_total: Decimal,
    pub expenses: Vec<ExpenseLine>,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_per_person: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
    pub currency: Currency,
    pub rates: ExchangeRateTable,
}

/// One priced room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLine {
    pub number: u32,
    pub category: RoomCategory,
    pub occupants: String,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub hotel_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Result of per-room pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomsBreakdown {
    pub rooms: Vec<RoomLine>,
    pub total_persons: u32,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_per_person: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
    pub currency: Currency,
    pub rates: ExchangeRateTable,
}

/// Price one occupant group sharing a nominal room category.
///
/// Rooms are derived from the tariff capacity; `extra_rooms` are added on top
/// and each is charged at the adult price. Zero travellers is a valid request
/// and yields a zero per-person share.
pub fn price_aggregate(
    tariff: &HotelTariff,
    request: &AggregateRequest,
    rates: &ExchangeRateTable,
) -> AggregateBreakdown {
    let target = &request.target_currency;
    let adult_price = tariff.price_for(request.room_category);

    let total_persons = request.adults + request.children + request.infants;
    let auto_room_count = auto_room_count(total_persons, tariff.capacity);
    let total_room_count = auto_room_count + request.extra_rooms;

    let hotel_source = hotel_cost(
        tariff,
        request.room_category,
        request.adults,
        request.children,
        request.infants,
    ) + Decimal::from(request.extra_rooms) * adult_price;
    let hotel_target = convert(hotel_source, &tariff.currency, target, rates);

    let fixed_target = convert(
        sum_expenses(&request.fixed_expenses),
        &FIXED_EXPENSE_CURRENCY,
        target,
        rates,
    );
    let fixed_per_person = per_person_share(fixed_target, total_persons);

    // Each line's share is taken from its own source amount, not from the
    // aggregate share above.
    let expenses = request
        .fixed_expenses
        .iter()
        .map(|expense| ExpenseLine {
            label: expense.label.clone(),
            total: round_cents(convert(expense.amount, &FIXED_EXPENSE_CURRENCY, target, rates)),
            per_person: round_cents(convert(
                per_person_share(expense.amount, total_persons),
                &FIXED_EXPENSE_CURRENCY,
                target,
                rates,
            )),
        })
        .collect();

    AggregateBreakdown {
        adults: request.adults,
        children: request.children,
        infants: request.infants,
        room_category: request.room_category,
        total_persons,
        auto_room_count,
        extra_rooms: request.extra_rooms,
        total_room_count,
        hotel_total: round_cents(hotel_target),
        expenses,
        fixed_total: round_cents(fixed_target),
        fixed_per_person: round_cents(fixed_per_person),
        grand_total: round_cents(hotel_target + fixed_target),
        currency: target.clone(),
        rates: *rates,
    }
}

/// Price an explicit list of rooms.
///
/// Fixed expenses are split per head across every room. Rooms keep input
/// order and are numbered from 1.
///
/// # Errors
/// `PricingError::InvalidOccupancy` when the rooms hold nobody, including an
/// empty room list.
pub fn price_by_rooms(
    tariff: &HotelTariff,
    rooms: &[RoomOccupant],
    fixed_expenses: &[FixedExpense],
    target: &Currency,
    rates: &ExchangeRateTable,
) -> Result<RoomsBreakdown, PricingError> {
    let total_persons: u32 = rooms.iter().map(RoomOccupant::occupants).sum();
    if total_persons == 0 {
        return Err(PricingError::InvalidOccupancy { rooms: rooms.len() });
    }

    let fixed_target = convert(
        sum_expenses(fixed_expenses),
        &FIXED_EXPENSE_CURRENCY,
        target,
        rates,
    );
    let fixed_per_person = fixed_target / Decimal::from(total_persons);

    let lines: Vec<RoomLine> = rooms
        .iter()
        .zip(1u32..)
        .map(|(room, number)| {
            let hotel = convert(
                hotel_cost(tariff, room.category, room.adults, room.children, room.infants),
                &tariff.currency,
                target,
                rates,
            );
            let fixed = Decimal::from(room.occupants()) * fixed_per_person;

            RoomLine {
                number,
                category: room.category,
                occupants: room.label(),
                adults: room.adults,
                children: room.children,
                infants: room.infants,
                hotel_cost: round_cents(hotel),
                fixed_cost: round_cents(fixed),
                total: round_cents(hotel + fixed),
            }
        })
        .collect();

    let grand_total = lines.iter().map(|line| line.total).sum();

    Ok(RoomsBreakdown {
        total_persons,
        adults: rooms.iter().map(|room| room.adults).sum(),
        children: rooms.iter().map(|room| room.children).sum(),
        infants: rooms.iter().map(|room| room.infants).sum(),
        rooms: lines,
        fixed_total: round_cents(fixed_target),
        fixed_per_person: round_cents(fixed_per_person),
        grand_total,
        currency: target.clone(),
        rates: *rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::default_fixed_expenses;
    use rust_decimal_macros::dec;

    fn rates() -> ExchangeRateTable {
        ExchangeRateTable::fallback()
    }

    fn aggregate(
        adults: u32,
        children: u32,
        infants: u32,
        category: RoomCategory,
        fixed_expenses: Vec<FixedExpense>,
        extra_rooms: u32,
        target: Currency,
    ) -> AggregateRequest {
        AggregateRequest {
            adults,
            children,
            infants,
            room_category: category,
            fixed_expenses,
            extra_rooms,
            target_currency: target,
        }
    }

    fn room(adults: u32, children: u32, infants: u32, category: RoomCategory) -> RoomOccupant {
        RoomOccupant {
            adults,
            children,
            infants,
            category,
        }
    }

    // ==================== aggregate mode ====================

    #[test]
    fn test_aggregate_room_count_is_ceiling_of_capacity() {
        let request = aggregate(3, 1, 0, RoomCategory::Double, vec![], 0, Currency::Try);
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());
        assert_eq!(breakdown.total_persons, 4);
        assert_eq!(breakdown.auto_room_count, 2);
        assert_eq!(breakdown.total_room_count, 2);
    }

    #[test]
    fn test_aggregate_zero_persons_is_degenerate_not_error() {
        let request = aggregate(
            0,
            0,
            0,
            RoomCategory::Double,
            default_fixed_expenses(),
            0,
            Currency::Try,
        );
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());
        assert_eq!(breakdown.total_persons, 0);
        assert_eq!(breakdown.auto_room_count, 0);
        assert_eq!(breakdown.fixed_per_person, Decimal::ZERO);
        assert_eq!(breakdown.fixed_total, dec!(7000));
        assert!(breakdown.expenses.iter().all(|line| line.per_person.is_zero()));
    }

    #[test]
    fn test_aggregate_hotel_total_in_eur() {
        let request = aggregate(2, 0, 0, RoomCategory::Double, vec![], 0, Currency::Eur);
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());
        assert_eq!(breakdown.hotel_total, dec!(1180.0));
        assert_eq!(breakdown.grand_total, dec!(1180));
    }

    #[test]
    fn test_aggregate_unknown_category_prices_as_double() {
        let suite = aggregate(2, 1, 0, RoomCategory::parse("suite"), vec![], 0, Currency::Try);
        let double = aggregate(2, 1, 0, RoomCategory::Double, vec![], 0, Currency::Try);
        let tariff = HotelTariff::default();
        assert_eq!(
            price_aggregate(&tariff, &suite, &rates()),
            price_aggregate(&tariff, &double, &rates())
        );
    }

    #[test]
    fn test_aggregate_full_breakdown_in_try() {
        let request = aggregate(
            3,
            1,
            0,
            RoomCategory::Double,
            default_fixed_expenses(),
            0,
            Currency::Try,
        );
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());

        // Hotel: 3 * 590 + 540 = 2310 EUR * 48.72
        assert_eq!(breakdown.hotel_total, dec!(112543.20));
        assert_eq!(breakdown.fixed_total, dec!(7000));
        assert_eq!(breakdown.fixed_per_person, dec!(1750));
        assert_eq!(breakdown.grand_total, dec!(119543.20));
        assert_eq!(breakdown.expenses.len(), 2);
        assert_eq!(breakdown.expenses[0].label, "vehicle");
        assert_eq!(breakdown.expenses[0].total, dec!(5000));
        assert_eq!(breakdown.expenses[0].per_person, dec!(1250));
        assert_eq!(breakdown.expenses[1].per_person, dec!(500));
    }

    #[test]
    fn test_aggregate_extra_rooms_charged_at_adult_price() {
        let request = aggregate(2, 0, 0, RoomCategory::Single, vec![], 1, Currency::Eur);
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());
        assert_eq!(breakdown.auto_room_count, 1);
        assert_eq!(breakdown.total_room_count, 2);
        assert_eq!(breakdown.hotel_total, dec!(1710));
    }

    #[test]
    fn test_aggregate_expense_share_computed_from_raw_amount() {
        let request = aggregate(
            3,
            0,
            0,
            RoomCategory::Double,
            vec![
                FixedExpense::new("guide", dec!(1000)),
                FixedExpense::new("guide", dec!(1000)),
            ],
            0,
            Currency::Eur,
        );
        let breakdown = price_aggregate(&HotelTariff::default(), &request, &rates());

        // Duplicate labels are both listed
        assert_eq!(breakdown.expenses.len(), 2);
        // 1000 / 3 TRY -> EUR = 6.8418...
        assert_eq!(breakdown.expenses[0].per_person, dec!(6.84));
        // 2000 TRY -> EUR = 41.0509... / 3 = 13.6836...
        assert_eq!(breakdown.fixed_per_person, dec!(13.68));
        assert_eq!(breakdown.fixed_total, dec!(41.05));
    }

    // ==================== per-room mode ====================

    #[test]
    fn test_rooms_empty_list_is_invalid_occupancy() {
        let result = price_by_rooms(
            &HotelTariff::default(),
            &[],
            &default_fixed_expenses(),
            &Currency::Try,
            &rates(),
        );
        assert!(matches!(result, Err(PricingError::InvalidOccupancy { rooms: 0 })));
    }

    #[test]
    fn test_rooms_all_empty_is_invalid_occupancy() {
        let rooms = [room(0, 0, 0, RoomCategory::Double), room(0, 0, 0, RoomCategory::Single)];
        let result = price_by_rooms(
            &HotelTariff::default(),
            &rooms,
            &[],
            &Currency::Eur,
            &rates(),
        );
        assert!(matches!(result, Err(PricingError::InvalidOccupancy { rooms: 2 })));
    }

    #[test]
    fn test_rooms_apportion_fixed_costs_per_head() {
        let rooms = [
            room(2, 1, 0, RoomCategory::Triple),
            room(1, 0, 0, RoomCategory::Single),
        ];
        let breakdown = price_by_rooms(
            &HotelTariff::default(),
            &rooms,
            &default_fixed_expenses(),
            &Currency::Try,
            &rates(),
        )
        .unwrap();

        assert_eq!(breakdown.total_persons, 4);
        assert_eq!(breakdown.fixed_per_person, dec!(1750));

        let first = &breakdown.rooms[0];
        assert_eq!(first.number, 1);
        assert_eq!(first.category, RoomCategory::Triple);
        assert_eq!(first.occupants, "2 yetiskin + 1 cocuk + 0 bebek");
        // (2 * 580 + 540) * 48.72
        assert_eq!(first.hotel_cost, dec!(82824));
        assert_eq!(first.fixed_cost, dec!(5250));
        assert_eq!(first.total, dec!(88074));

        let second = &breakdown.rooms[1];
        assert_eq!(second.number, 2);
        assert_eq!(second.hotel_cost, dec!(27770.40));
        assert_eq!(second.total, dec!(29520.40));

        assert_eq!(breakdown.grand_total, dec!(117594.40));
    }

    #[test]
    fn test_rooms_grand_total_is_sum_of_rounded_room_totals() {
        let rooms = [
            room(1, 0, 0, RoomCategory::Double),
            room(1, 0, 0, RoomCategory::Double),
            room(1, 0, 0, RoomCategory::Single),
        ];
        let expenses = [FixedExpense::new("transfer", dec!(1000))];
        let breakdown =
            price_by_rooms(&HotelTariff::default(), &rooms, &expenses, &Currency::Usd, &rates())
                .unwrap();

        let summed: Decimal = breakdown.rooms.iter().map(|line| line.total).sum();
        assert_eq!(breakdown.grand_total, summed);
        for line in &breakdown.rooms {
            assert_eq!(line.total.scale(), 2);
        }
    }

    #[test]
    fn test_rooms_unknown_category_priced_as_double() {
        let tariff = HotelTariff::default();
        let suite = [room(2, 0, 0, RoomCategory::parse("suite"))];
        let double = [room(2, 0, 0, RoomCategory::Double)];
        let a = price_by_rooms(&tariff, &suite, &[], &Currency::Eur, &rates()).unwrap();
        let b = price_by_rooms(&tariff, &double, &[], &Currency::Eur, &rates()).unwrap();
        assert_eq!(a.grand_total, b.grand_total);
        assert_eq!(a.grand_total, dec!(1180));
    }
}
