//! Pricing route handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::engine::{AggregateBreakdown, RoomsBreakdown};
use super::models::HotelTariff;
use super::requests::{PackagePriceRequest, RoomsPriceRequest};
use super::responses::RatesResponse;
use super::xml;

/// Pricing endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hesapla-paket-xml", post(package_xml))
        .route("/hesapla-oda-xml", post(rooms_xml))
        .route("/api/pricing/aggregate", post(package_json))
        .route("/api/pricing/rooms", post(rooms_json))
        .route("/api/rates", get(rates))
        .route("/api/tariff", get(tariff))
}

/// Aggregate package priced as an XML document
async fn package_xml(
    State(state): State<AppState>,
    Json(request): Json<PackagePriceRequest>,
) -> Result<Response> {
    let quote = state.pricing.quote_aggregate(request).await?;
    let document = xml::aggregate_to_xml(&quote.breakdown, &quote.tour_name)?;
    Ok(xml_response(document))
}

/// Room list priced as an XML document
async fn rooms_xml(
    State(state): State<AppState>,
    Json(request): Json<RoomsPriceRequest>,
) -> Result<Response> {
    let quote = state.pricing.quote_rooms(request).await?;
    let document = xml::rooms_to_xml(&quote.breakdown, &quote.tour_name)?;
    Ok(xml_response(document))
}

async fn package_json(
    State(state): State<AppState>,
    Json(request): Json<PackagePriceRequest>,
) -> Result<Json<AggregateBreakdown>> {
    let quote = state.pricing.quote_aggregate(request).await?;
    Ok(Json(quote.breakdown))
}

async fn rooms_json(
    State(state): State<AppState>,
    Json(request): Json<RoomsPriceRequest>,
) -> Result<Json<RoomsBreakdown>> {
    let quote = state.pricing.quote_rooms(request).await?;
    Ok(Json(quote.breakdown))
}

/// Fetch rates now and report whether the live source answered
async fn rates(State(state): State<AppState>) -> Json<RatesResponse> {
    let fetch = state.pricing.current_rates().await;
    Json(RatesResponse::from_fetch(state.pricing.rates_base().clone(), fetch))
}

async fn tariff(State(state): State<AppState>) -> Json<HotelTariff> {
    Json(state.pricing.tariff().clone())
}

fn xml_response(document: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], document).into_response()
}
