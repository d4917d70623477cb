//! Pricing engine module for tour packages.
//!
//! Converts EUR hotel tariffs and TRY fixed expenses into one target currency,
//! apportions fixed costs per person and renders the result as XML or JSON.

pub mod calculators;
pub mod currency;
pub mod engine;
pub mod models;
pub mod queries;
pub mod rates;
pub mod repository;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod xml;

// Re-export commonly used items
pub use calculators::round_money;
pub use currency::{convert, Currency, ExchangeRateTable};
pub use engine::{price_aggregate, price_by_rooms, AggregateBreakdown, RoomsBreakdown};
pub use rates::{HttpRateSource, OfflineRateSource, RateFetch, RateSource, StaticRateSource};
pub use repository::{DefaultTourRepository, PgTourRepository, TourRepository};
pub use routes::router;
pub use services::{PricingError, PricingService, Quote};
