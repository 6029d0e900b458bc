// In-memory flight store shared across request handlers
use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::info;

use crate::booking::{self, BookingConfirmation, BookingError, BookingRequest};
use crate::dataset::{Flight, Route};
use crate::search::{self, ConnectionMatch, ConnectionQuery, DirectQuery};

// Routes in insertion order plus a keyed index over them.
struct RouteTable {
    routes: Vec<Route>,
    by_id: HashMap<String, usize>,
}

// The process-wide dataset. Built once at startup and handed to the server
// behind an Arc; queries take the read lock, bookings the write lock.
pub struct FlightStore {
    inner: RwLock<RouteTable>,
}

impl FlightStore {
    pub fn from_routes(routes: Vec<Route>) -> Self {
        let mut table = RouteTable {
            routes: Vec::new(),
            by_id: HashMap::new(),
        };
        for route in routes {
            match table.by_id.get(&route.id) {
                // Duplicate id: the later record wins, keeping the slot of
                // the earlier one (mapping insertion semantics).
                Some(&slot) => table.routes[slot] = route,
                None => {
                    table.by_id.insert(route.id.clone(), table.routes.len());
                    table.routes.push(route);
                }
            }
        }
        info!(routes = table.routes.len(), "flight store initialized");
        Self {
            inner: RwLock::new(table),
        }
    }

    // All routes in insertion order.
    pub fn routes(&self) -> Vec<Route> {
        self.inner.read().routes.clone()
    }

    pub fn route(&self, id: &str) -> Option<Route> {
        let table = self.inner.read();
        table.by_id.get(id).map(|&slot| table.routes[slot].clone())
    }

    pub fn find_direct(&self, query: &DirectQuery) -> Vec<Flight> {
        search::direct_matches(&self.inner.read().routes, query)
    }

    pub fn find_connections(&self, query: &ConnectionQuery) -> Vec<ConnectionMatch> {
        search::connection_matches(&self.inner.read().routes, query)
    }

    // The whole scan-check-decrement sequence runs under the write lock,
    // so two bookings can never both pass the capacity check.
    pub fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation, BookingError> {
        let mut table = self.inner.write();
        let confirmation = booking::book_seats(&mut table.routes, request)?;
        info!(
            flight_id = %confirmation.flight_id,
            num_seats = confirmation.num_seats,
            total_price = confirmation.total_price,
            "booking confirmed"
        );
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{PriceSchedule, SAMPLE_ROUTES_JSON};
    use std::sync::Arc;
    use std::thread;

    fn sample_store() -> FlightStore {
        let routes: Vec<Route> = serde_json::from_str(SAMPLE_ROUTES_JSON).unwrap();
        FlightStore::from_routes(routes)
    }

    fn route_with_seats(id: &str, flight_id: &str, seats: u32) -> Route {
        Route {
            id: id.to_string(),
            departure_destination: "Oslo".to_string(),
            arrival_destination: "Stockholm".to_string(),
            itineraries: vec![Flight {
                flight_id: flight_id.to_string(),
                departure_at: "2024-06-01T08:00:00Z".to_string(),
                arrival_at: "2024-06-01T09:00:00Z".to_string(),
                available_seats: seats,
                prices: PriceSchedule {
                    currency: "EUR".to_string(),
                    adult: 100.0,
                    child: 50.0,
                },
            }],
        }
    }

    #[test]
    fn test_routes_keep_insertion_order() {
        let store = sample_store();
        let routes = store.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].id, "route-osl-sto");
        assert_eq!(routes[1].id, "route-sto-hel");
    }

    #[test]
    fn test_route_lookup_by_id() {
        let store = sample_store();
        assert_eq!(
            store.route("route-sto-hel").unwrap().departure_destination,
            "Stockholm"
        );
        assert!(store.route("route-nowhere").is_none());
    }

    #[test]
    fn test_duplicate_route_id_last_write_wins_in_place() {
        let store = FlightStore::from_routes(vec![
            route_with_seats("r1", "f1", 10),
            route_with_seats("r2", "f2", 10),
            route_with_seats("r1", "f1-replacement", 20),
        ]);

        let routes = store.routes();
        assert_eq!(routes.len(), 2);
        // r1 keeps its original slot but carries the later record
        assert_eq!(routes[0].id, "r1");
        assert_eq!(routes[0].itineraries[0].flight_id, "f1-replacement");
        assert_eq!(routes[1].id, "r2");
    }

    #[test]
    fn test_booking_through_store_decrements_seats() {
        let store = sample_store();
        let request = BookingRequest {
            name: "Ada".to_string(),
            flight_id: "OSL-STO-1".to_string(),
            num_seats: 4,
        };

        let confirmation = store.book(&request).unwrap();
        assert_eq!(confirmation.total_price, 480.0);

        let route = store.route("route-osl-sto").unwrap();
        assert_eq!(route.itineraries[0].available_seats, 96);
    }

    // Hammer one flight from many threads; the write lock must keep the
    // seat count exact and never oversold.
    #[test]
    fn test_concurrent_bookings_never_oversell() {
        let store = Arc::new(FlightStore::from_routes(vec![route_with_seats(
            "r1", "f1", 50,
        )]));

        let threads_count = 10;
        let attempts_per_thread = 10;

        let mut handles = vec![];
        for _ in 0..threads_count {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let mut booked = 0u32;
                for _ in 0..attempts_per_thread {
                    let request = BookingRequest {
                        name: "load".to_string(),
                        flight_id: "f1".to_string(),
                        num_seats: 1,
                    };
                    if store.book(&request).is_ok() {
                        booked += 1;
                    }
                }
                booked
            }));
        }

        let total_booked: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total_booked, 50, "exactly the available seats are sold");
        let route = store.route("r1").unwrap();
        assert_eq!(route.itineraries[0].available_seats, 0);
    }
}
