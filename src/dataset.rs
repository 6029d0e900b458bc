// Flight dataset: data model and JSON loader
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Error types for dataset loading
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

// A route between two destinations, with its scheduled flights.
// Route membership is fixed after load; only seat counts ever change.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub departure_destination: String,
    pub arrival_destination: String,
    pub itineraries: Vec<Flight>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_id: String,
    // Timestamps stay as strings: the connection matcher compares them
    // lexicographically and the arrival-time hint is an exact string match.
    pub departure_at: String,
    pub arrival_at: String,
    pub available_seats: u32,
    pub prices: PriceSchedule,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSchedule {
    pub currency: String,
    pub adult: f64,
    pub child: f64,
}

// Load the route dataset from a JSON file. The file holds an ordered array
// of routes; ordering is preserved all the way into the store.
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<Route>, DatasetError> {
    let content = std::fs::read_to_string(path)?;
    let routes: Vec<Route> = serde_json::from_str(&content)?;
    Ok(routes)
}

// A small sample for inline testing
pub const SAMPLE_ROUTES_JSON: &str = r#"
[
  {
    "id": "route-osl-sto",
    "departureDestination": "Oslo",
    "arrivalDestination": "Stockholm",
    "itineraries": [
      {
        "flightId": "OSL-STO-1",
        "departureAt": "2024-06-01T08:00:00Z",
        "arrivalAt": "2024-06-01T09:00:00Z",
        "availableSeats": 100,
        "prices": { "currency": "EUR", "adult": 120.0, "child": 60.0 }
      },
      {
        "flightId": "OSL-STO-2",
        "departureAt": "2024-06-01T18:00:00Z",
        "arrivalAt": "2024-06-01T19:00:00Z",
        "availableSeats": 0,
        "prices": { "currency": "EUR", "adult": 95.5, "child": 47.75 }
      }
    ]
  },
  {
    "id": "route-sto-hel",
    "departureDestination": "Stockholm",
    "arrivalDestination": "Helsinki",
    "itineraries": [
      {
        "flightId": "STO-HEL-1",
        "departureAt": "2024-06-01T10:00:00Z",
        "arrivalAt": "2024-06-01T11:30:00Z",
        "availableSeats": 42,
        "prices": { "currency": "EUR", "adult": 80.0, "child": 40.0 }
      }
    ]
  }
]
"#;
