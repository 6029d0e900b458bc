// Direct and connecting flight matchers
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dataset::{Flight, Route};

const DAY_MS: i64 = 86_400_000;
const MINUTE_MS: i64 = 60_000;

// Criteria for a direct-flight search
#[derive(Debug, Clone)]
pub struct DirectQuery {
    pub departure: String,
    pub arrival: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

// Criteria for a connecting-flight search
#[derive(Debug, Clone)]
pub struct ConnectionQuery {
    pub departure: String,
    pub arrival: String,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

// One leg of a synthesized connection route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub departure_destination: String,
    pub arrival_destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePair {
    pub departure_route: RouteLeg,
    pub arrival_route: RouteLeg,
}

// A valid pairing of a departing and an arriving flight over a shared
// layover point. Built per query, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMatch {
    pub departure_flight: Flight,
    pub arrival_flight: Flight,
    pub layover_time: String,
    pub route: RoutePair,
}

// Find direct flights between two destinations. Location matching is exact
// and case-sensitive; only flights with seats left qualify. Each optional
// hint keeps flights within 24 hours (inclusive) of the hinted time.
pub fn direct_matches(routes: &[Route], query: &DirectQuery) -> Vec<Flight> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for route in routes.iter().filter(|route| {
        route.departure_destination == query.departure
            && route.arrival_destination == query.arrival
    }) {
        for flight in &route.itineraries {
            if flight.available_seats == 0 {
                continue;
            }

            if !query
                .departure_time
                .as_ref()
                .map_or(true, |hint| within_day_window(&flight.departure_at, hint))
            {
                continue;
            }

            if !query
                .arrival_time
                .as_ref()
                .map_or(true, |hint| within_day_window(&flight.arrival_at, hint))
            {
                continue;
            }

            // The same flight can surface through several matching routes;
            // keep the first discovery only.
            if seen.insert(flight.flight_id.clone()) {
                matches.push(flight.clone());
            }
        }
    }

    matches
}

// Pair flights from routes departing the origin with flights from routes
// arriving at the destination, through a shared layover point. Seat
// availability is deliberately not checked here, unlike direct matching.
pub fn connection_matches(routes: &[Route], query: &ConnectionQuery) -> Vec<ConnectionMatch> {
    let departing: Vec<&Route> = routes
        .iter()
        .filter(|route| route.departure_destination == query.departure)
        .collect();
    let arriving: Vec<&Route> = routes
        .iter()
        .filter(|route| route.arrival_destination == query.arrival)
        .collect();

    let mut matches = Vec::new();

    for d in &departing {
        for a in &arriving {
            if d.arrival_destination != a.departure_destination {
                continue;
            }

            for fd in &d.itineraries {
                for fa in &a.itineraries {
                    // Arrival must not come after the next departure; the
                    // timestamps are ordered as strings here.
                    if fd.arrival_at.as_str() > fa.departure_at.as_str() {
                        continue;
                    }

                    let Some(gap_ms) = layover_gap_ms(&fd.arrival_at, &fa.departure_at) else {
                        continue;
                    };
                    if gap_ms >= DAY_MS {
                        continue;
                    }

                    if !query
                        .departure_time
                        .as_ref()
                        .map_or(true, |hint| departs_by(&fd.departure_at, hint))
                    {
                        continue;
                    }

                    // The arrival hint is an exact string match, not a window.
                    if !query
                        .arrival_time
                        .as_ref()
                        .map_or(true, |hint| fa.arrival_at == *hint)
                    {
                        continue;
                    }

                    matches.push(ConnectionMatch {
                        departure_flight: fd.clone(),
                        arrival_flight: fa.clone(),
                        layover_time: format!("{} minutes", gap_ms / MINUTE_MS),
                        route: RoutePair {
                            departure_route: RouteLeg {
                                departure_destination: d.departure_destination.clone(),
                                arrival_destination: d.arrival_destination.clone(),
                            },
                            // The second leg ends at the requested arrival
                            // parameter, not the arriving route's own field.
                            arrival_route: RouteLeg {
                                departure_destination: d.arrival_destination.clone(),
                                arrival_destination: query.arrival.clone(),
                            },
                        },
                    });
                }
            }
        }
    }

    matches
}

// Epoch milliseconds for a timestamp or query hint. Accepts RFC 3339, a
// bare date-time, or a bare date; anything else fails the filter that
// asked for it.
fn parse_millis(value: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

fn within_day_window(timestamp: &str, hint: &str) -> bool {
    match (parse_millis(timestamp), parse_millis(hint)) {
        (Some(ts), Some(hint)) => (ts - hint).abs() <= DAY_MS,
        _ => false,
    }
}

// Upper bound only: a flight departing arbitrarily early still qualifies.
fn departs_by(departure: &str, hint: &str) -> bool {
    match (parse_millis(departure), parse_millis(hint)) {
        (Some(dep), Some(hint)) => dep <= hint + DAY_MS,
        _ => false,
    }
}

fn layover_gap_ms(arrival: &str, next_departure: &str) -> Option<i64> {
    Some(parse_millis(next_departure)? - parse_millis(arrival)?)
}
