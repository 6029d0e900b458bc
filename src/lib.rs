// Main library file for the flight booking service

// Export modules for each component of the service
pub mod booking;
pub mod dataset;
pub mod search;
pub mod server;
pub mod store;

// Re-export key types for convenience
pub use booking::{book_seats, BookingConfirmation, BookingError, BookingRequest};
pub use dataset::{load_routes, DatasetError, Flight, PriceSchedule, Route};
pub use search::{
    connection_matches, direct_matches, ConnectionMatch, ConnectionQuery, DirectQuery, RouteLeg,
    RoutePair,
};
pub use server::{router, serve, ApiError, Config};
pub use store::FlightStore;
