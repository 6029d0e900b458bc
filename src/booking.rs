// Booking operator: seat capacity check and decrement
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Route;

// Error types for booking
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Flight not found")]
    FlightNotFound,

    #[error("Not enough seats available")]
    InsufficientCapacity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub flight_id: String,
    pub num_seats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub name: String,
    pub flight_id: String,
    pub num_seats: u32,
    pub total_price: f64,
    pub departure: String,
    pub arrival: String,
    pub departure_time: String,
    pub arrival_time: String,
}

// Book seats on a flight. The scan covers every flight of every route
// without short-circuiting, so the last flight carrying the id wins when
// ids are duplicated. The caller is responsible for holding the store
// write lock across the whole call.
pub fn book_seats(
    routes: &mut [Route],
    request: &BookingRequest,
) -> Result<BookingConfirmation, BookingError> {
    let mut found = None;
    for (route_idx, route) in routes.iter().enumerate() {
        for (flight_idx, flight) in route.itineraries.iter().enumerate() {
            if flight.flight_id == request.flight_id {
                found = Some((route_idx, flight_idx));
            }
        }
    }
    let (route_idx, flight_idx) = found.ok_or(BookingError::FlightNotFound)?;

    {
        let flight = &mut routes[route_idx].itineraries[flight_idx];
        if flight.available_seats < request.num_seats {
            return Err(BookingError::InsufficientCapacity);
        }
        flight.available_seats -= request.num_seats;
    }

    let route = &routes[route_idx];
    let flight = &route.itineraries[flight_idx];

    Ok(BookingConfirmation {
        name: request.name.clone(),
        flight_id: flight.flight_id.clone(),
        num_seats: request.num_seats,
        // Bookings are priced at the adult rate only; the child rate is
        // carried in the schedule but takes no part in the total.
        total_price: f64::from(request.num_seats) * flight.prices.adult,
        departure: route.departure_destination.clone(),
        arrival: route.arrival_destination.clone(),
        departure_time: flight.departure_at.clone(),
        arrival_time: flight.arrival_at.clone(),
    })
}
