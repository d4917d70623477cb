//! Pricing service: resolves request inputs, fetches rates and runs the engine.
//!
//! Each quote fetches a fresh rate snapshot and passes it by value into the
//! engine, so concurrent quotes never share a rate table.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::currency::Currency;
use super::engine::{self, AggregateBreakdown, RoomsBreakdown};
use super::models::{default_fixed_expenses, AggregateRequest, FixedExpense, HotelTariff, RoomOccupant};
use super::rates::{RateFetch, RateSource};
use super::repository::TourRepository;
use super::requests::{
    expense_errors, room_errors, PackagePriceRequest, RoomsPriceRequest, DEFAULT_TOUR_NAME,
};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// The priced rooms hold no travellers at all
    InvalidOccupancy { rooms: usize },
    /// Request failed boundary validation
    InvalidInput { message: String, errors: Vec<String> },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidOccupancy { rooms } => {
                write!(f, "No occupants across {} room(s); at least one person is required", rooms)
            }
            PricingError::InvalidInput { message, errors } => {
                write!(f, "{}: {}", message, errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// A computed breakdown together with the tour name to display it under
#[derive(Debug, Clone)]
pub struct Quote<B> {
    pub breakdown: B,
    pub tour_name: String,
    pub rates_fresh: bool,
}

/// Entry point for pricing requests
pub struct PricingService {
    tariff: HotelTariff,
    rates: Arc<dyn RateSource>,
    tours: Arc<dyn TourRepository>,
    rates_base: Currency,
}

impl PricingService {
    pub fn new(
        tariff: HotelTariff,
        rates: Arc<dyn RateSource>,
        tours: Arc<dyn TourRepository>,
        rates_base: Currency,
    ) -> Self {
        Self {
            tariff,
            rates,
            tours,
            rates_base,
        }
    }

    pub fn tariff(&self) -> &HotelTariff {
        &self.tariff
    }

    pub fn rates_base(&self) -> &Currency {
        &self.rates_base
    }

    /// Fetch a rate snapshot for one request.
    pub async fn current_rates(&self) -> RateFetch {
        self.rates.fetch_rates(&self.rates_base).await
    }

    /// Price an aggregate group.
    pub async fn quote_aggregate(
        &self,
        request: PackagePriceRequest,
    ) -> Result<Quote<AggregateBreakdown>, PricingError> {
        let package = request.validate()?;
        let fetch = self.current_rates().await;

        let fixed_expenses = self
            .resolve_fixed_expenses(package.fixed_expenses, package.tour_id)
            .await;
        let tour_name = self.resolve_tour_name(package.tour_name, package.tour_id).await;

        let aggregate = AggregateRequest {
            adults: package.adults,
            children: package.children,
            infants: package.infants,
            room_category: package.room_category,
            fixed_expenses,
            extra_rooms: package.extra_rooms,
            target_currency: package.target_currency,
        };
        let breakdown = engine::price_aggregate(&self.tariff, &aggregate, &fetch.table());

        info!(
            tour = %tour_name,
            persons = breakdown.total_persons,
            rooms = breakdown.total_room_count,
            total = %breakdown.grand_total,
            currency = %breakdown.currency,
            rates_fresh = fetch.is_fresh(),
            "Priced aggregate package"
        );

        Ok(Quote {
            breakdown,
            tour_name,
            rates_fresh: fetch.is_fresh(),
        })
    }

    /// Price an explicit room list.
    ///
    /// # Errors
    /// `InvalidInput` for negative counts, `InvalidOccupancy` when the
    /// resolved rooms hold nobody.
    pub async fn quote_rooms(
        &self,
        request: RoomsPriceRequest,
    ) -> Result<Quote<RoomsBreakdown>, PricingError> {
        let request = request.validate()?;
        let fetch = self.current_rates().await;

        let rooms = self.resolve_rooms(request.rooms, request.tour_id).await;
        let fixed_expenses = self
            .resolve_fixed_expenses(request.fixed_expenses, request.tour_id)
            .await;
        let tour_name = self.resolve_tour_name(request.tour_name, request.tour_id).await;

        let breakdown = engine::price_by_rooms(
            &self.tariff,
            &rooms,
            &fixed_expenses,
            &request.target_currency,
            &fetch.table(),
        )?;

        info!(
            tour = %tour_name,
            persons = breakdown.total_persons,
            rooms = breakdown.rooms.len(),
            total = %breakdown.grand_total,
            currency = %breakdown.currency,
            rates_fresh = fetch.is_fresh(),
            "Priced room list"
        );

        Ok(Quote {
            breakdown,
            tour_name,
            rates_fresh: fetch.is_fresh(),
        })
    }

    /// Request expenses win; then the tour's stored expenses; then the defaults.
    async fn resolve_fixed_expenses(
        &self,
        supplied: Option<Vec<FixedExpense>>,
        tour_id: Option<Uuid>,
    ) -> Vec<FixedExpense> {
        if let Some(expenses) = supplied {
            return expenses;
        }

        if let Some(tour_id) = tour_id {
            match self.tours.load_fixed_expenses(tour_id).await {
                Ok(expenses) if !expenses.is_empty() => {
                    let errors = expense_errors(&expenses);
                    if errors.is_empty() {
                        return expenses;
                    }
                    warn!(?errors, "Stored expenses for tour {} out of range, using defaults", tour_id);
                }
                Ok(_) => debug!("No stored expenses for tour {}, using defaults", tour_id),
                Err(e) => warn!("Failed to load expenses for tour {}: {}", tour_id, e),
            }
        }

        default_fixed_expenses()
    }

    /// Request rooms win; otherwise the tour's stored layout, if any.
    async fn resolve_rooms(
        &self,
        supplied: Option<Vec<RoomOccupant>>,
        tour_id: Option<Uuid>,
    ) -> Vec<RoomOccupant> {
        if let Some(rooms) = supplied {
            return rooms;
        }

        let Some(tour_id) = tour_id else {
            return Vec::new();
        };
        match self.tours.load_rooms(tour_id).await {
            Ok(rooms) => {
                let errors = room_errors(&rooms);
                if errors.is_empty() {
                    return rooms;
                }
                warn!(?errors, "Stored rooms for tour {} out of range, ignoring them", tour_id);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to load rooms for tour {}: {}", tour_id, e);
                Vec::new()
            }
        }
    }

    async fn resolve_tour_name(&self, supplied: Option<String>, tour_id: Option<Uuid>) -> String {
        if let Some(name) = supplied {
            return name;
        }

        if let Some(tour_id) = tour_id {
            match self.tours.tour_name(tour_id).await {
                Ok(Some(name)) => return name,
                Ok(None) => debug!("Unknown tour {}, using default name", tour_id),
                Err(e) => warn!("Failed to load name for tour {}: {}", tour_id, e),
            }
        }

        DEFAULT_TOUR_NAME.to_string()
    }
}
