//! XML rendering of price breakdowns.
//!
//! Element names, attribute placement and child order are fixed; consumers
//! address nodes by position as well as by name.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;

use crate::error::{AppError, Result};

use super::calculators::round_money;
use super::currency::{Currency, ExchangeRateTable};
use super::engine::{AggregateBreakdown, RoomsBreakdown};
use super::models::occupant_label;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Render an aggregate breakdown.
pub fn aggregate_to_xml(breakdown: &AggregateBreakdown, tour_name: &str) -> Result<String> {
    let currency = &breakdown.currency;
    let persons = format!(
        "{} (ücretsiz)",
        occupant_label(breakdown.adults, breakdown.children, breakdown.infants)
    );

    render(
        TourHeader {
            name: tour_name,
            total_price: breakdown.grand_total,
            currency,
            total_persons: breakdown.total_persons,
            persons: &persons,
            rates: &breakdown.rates,
        },
        |w| {
            write_text(
                w,
                "component",
                &[("type", "otel")],
                &format!(
                    "{} {} ({} oda, {} ek)",
                    money(breakdown.hotel_total),
                    currency,
                    breakdown.total_room_count,
                    breakdown.extra_rooms
                ),
            )?;

            for line in &breakdown.expenses {
                write_text(
                    w,
                    "component",
                    &[("type", line.label.as_str())],
                    &format!(
                        "{} {} (kişi başı {} {})",
                        money(line.total),
                        currency,
                        money(line.per_person),
                        currency
                    ),
                )?;
            }
            Ok(())
        },
    )
}

/// Render a per-room breakdown.
pub fn rooms_to_xml(breakdown: &RoomsBreakdown, tour_name: &str) -> Result<String> {
    let persons = occupant_label(breakdown.adults, breakdown.children, breakdown.infants);

    render(
        TourHeader {
            name: tour_name,
            total_price: breakdown.grand_total,
            currency: &breakdown.currency,
            total_persons: breakdown.total_persons,
            persons: &persons,
            rates: &breakdown.rates,
        },
        |w| {
            for room in &breakdown.rooms {
                let number = room.number.to_string();
                let mut start = BytesStart::new("room");
                start.push_attribute(("number", number.as_str()));
                start.push_attribute(("type", room.category.as_str()));
                w.write_event(Event::Start(start))?;

                write_text(w, "occupants", &[], &room.occupants)?;
                write_text(w, "hotel_cost", &[], &money(room.hotel_cost))?;
                write_text(w, "fixed_cost", &[], &money(room.fixed_cost))?;
                write_text(w, "total", &[], &money(room.total))?;

                w.write_event(Event::End(BytesEnd::new("room")))?;
            }
            write_text(w, "fixed_per_person", &[], &money(breakdown.fixed_per_person))
        },
    )
}

/// Fields shared by both document shapes
struct TourHeader<'a> {
    name: &'a str,
    total_price: Decimal,
    currency: &'a Currency,
    total_persons: u32,
    persons: &'a str,
    rates: &'a ExchangeRateTable,
}

fn render<F>(header: TourHeader<'_>, write_breakdown: F) -> Result<String>
where
    F: FnOnce(&mut XmlWriter) -> quick_xml::Result<()>,
{
    let mut w = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(BytesStart::new("tours")))?;

    let mut tour = BytesStart::new("tour");
    tour.push_attribute(("id", "1"));
    w.write_event(Event::Start(tour))?;

    write_text(&mut w, "name", &[], header.name)?;
    write_text(&mut w, "total_price", &[], &money(header.total_price))?;
    write_text(&mut w, "currency", &[], header.currency.code())?;
    write_text(&mut w, "total_persons", &[], &header.total_persons.to_string())?;
    write_text(&mut w, "persons", &[], header.persons)?;

    w.write_event(Event::Start(BytesStart::new("breakdown")))?;
    write_breakdown(&mut w)?;
    w.write_event(Event::End(BytesEnd::new("breakdown")))?;

    w.write_event(Event::Start(BytesStart::new("exchange_rates")))?;
    for (pair, rate) in header.rates.pairs() {
        write_text(&mut w, "rate", &[("pair", pair)], &format!("{:.4}", round_money(rate, 4)))?;
    }
    w.write_event(Event::End(BytesEnd::new("exchange_rates")))?;

    w.write_event(Event::End(BytesEnd::new("tour")))?;
    w.write_event(Event::End(BytesEnd::new("tours")))?;

    String::from_utf8(w.into_inner().into_inner())
        .map_err(|e| AppError::Internal(format!("XML output is not UTF-8: {}", e)))
}

fn write_text(
    w: &mut XmlWriter,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> quick_xml::Result<()> {
    let mut start = BytesStart::new(name);
    for attribute in attributes {
        start.push_attribute(*attribute);
    }
    w.write_event(Event::Start(start))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Two-decimal money text
fn money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount, 2))
}
