// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synthetic sample data for the read-only flight tools.
//!
//! Search results, flight status, and seat maps are randomized samples --
//! nothing here touches persistence.

use rand::Rng;
use serde::{Deserialize, Serialize};

const AIRLINES: &[(&str, &str)] = &[
    ("BA", "British Airways"),
    ("AA", "American Airlines"),
    ("DL", "Delta Air Lines"),
    ("UA", "United Airlines"),
    ("LH", "Lufthansa"),
    ("AF", "Air France"),
];

const STATUSES: &[&str] = &["on time", "delayed", "boarding", "departed", "landed"];

/// A single flight in a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOption {
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: u32,
    pub price_usd: u32,
    pub cabin_class: String,
}

/// Status report for a single flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatus {
    pub flight_number: String,
    pub date: String,
    pub status: String,
    pub departure_gate: String,
    pub arrival_gate: String,
    pub scheduled_departure: String,
    pub estimated_departure: String,
}

/// One seat in a cabin seat map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatOption {
    /// Seat in `[row][A-F]` format, e.g. `12A`.
    pub seat: String,
    pub available: bool,
    pub price_usd: u32,
}

/// Seat map for a flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub flight_number: String,
    pub seats: Vec<SeatOption>,
}

/// Boarding pass fields issued after a verified payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingPass {
    pub boarding_pass_id: String,
    pub reservation_id: String,
    pub gate_number: String,
    pub terminal: String,
    pub boarding_time: String,
    pub gate_close_time: String,
}

/// Generates a sample list of flights between two airports.
pub fn generate_flight_search_results(
    origin: &str,
    destination: &str,
    cabin_class: Option<&str>,
) -> Vec<FlightOption> {
    let mut rng = rand::thread_rng();
    let cabin = cabin_class.unwrap_or("economy");

    (0..4)
        .map(|i| {
            let (code, airline) = AIRLINES[rng.gen_range(0..AIRLINES.len())];
            let depart_hour = 6 + i * 4 + rng.gen_range(0..3);
            let duration = rng.gen_range(90..420);
            let arrive_minutes = depart_hour as u32 * 60 + duration;
            FlightOption {
                flight_number: format!("{code}{}", rng.gen_range(100..999)),
                airline: airline.to_string(),
                origin: origin.to_uppercase(),
                destination: destination.to_uppercase(),
                departure_time: format!("{depart_hour:02}:00"),
                arrival_time: format!(
                    "{:02}:{:02}",
                    (arrive_minutes / 60) % 24,
                    arrive_minutes % 60
                ),
                duration_minutes: duration,
                price_usd: rng.gen_range(150..1200),
                cabin_class: cabin.to_string(),
            }
        })
        .collect()
}

/// Generates a sample status for a flight.
pub fn generate_flight_status(flight_number: &str, date: &str) -> FlightStatus {
    let mut rng = rand::thread_rng();
    let hour = rng.gen_range(6..22);
    FlightStatus {
        flight_number: flight_number.to_uppercase(),
        date: date.to_string(),
        status: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
        departure_gate: format!("{}{}", ['A', 'B', 'C'][rng.gen_range(0..3)], rng.gen_range(1..30)),
        arrival_gate: format!("{}{}", ['A', 'B', 'C'][rng.gen_range(0..3)], rng.gen_range(1..30)),
        scheduled_departure: format!("{hour:02}:00"),
        estimated_departure: format!("{hour:02}:{:02}", rng.gen_range(0..45)),
    }
}

/// Generates a sample seat map for rows 10-14, letters A-F.
pub fn generate_seat_map(flight_number: &str) -> SeatMap {
    let mut rng = rand::thread_rng();
    let mut seats = Vec::with_capacity(30);
    for row in 10..15 {
        for letter in ['A', 'B', 'C', 'D', 'E', 'F'] {
            seats.push(SeatOption {
                seat: format!("{row}{letter}"),
                available: rng.gen_bool(0.7),
                price_usd: rng.gen_range(20..80),
            });
        }
    }
    SeatMap {
        flight_number: flight_number.to_uppercase(),
        seats,
    }
}

/// Computes a reservation price in whole USD. Always positive.
pub fn generate_reservation_price() -> u32 {
    rand::thread_rng().gen_range(200..700)
}

/// Issues sample boarding pass fields for a reservation.
pub fn generate_boarding_pass(reservation_id: &str) -> BoardingPass {
    let mut rng = rand::thread_rng();
    let board_hour = rng.gen_range(6..21);
    let board_minute = rng.gen_range(0..40);
    BoardingPass {
        boarding_pass_id: format!("bp_{}", uuid::Uuid::new_v4()),
        reservation_id: reservation_id.to_string(),
        gate_number: format!("{}{}", ['A', 'B', 'C'][rng.gen_range(0..3)], rng.gen_range(1..30)),
        terminal: format!("{}", rng.gen_range(1..4)),
        boarding_time: format!("{board_hour:02}:{board_minute:02}"),
        gate_close_time: format!("{board_hour:02}:{:02}", board_minute + 20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_results_are_non_empty_and_uppercased() {
        let flights = generate_flight_search_results("jfk", "lax", None);
        assert_eq!(flights.len(), 4);
        for flight in &flights {
            assert_eq!(flight.origin, "JFK");
            assert_eq!(flight.destination, "LAX");
            assert!(flight.price_usd > 0);
            assert_eq!(flight.cabin_class, "economy");
        }
    }

    #[test]
    fn search_results_respect_cabin_class() {
        let flights = generate_flight_search_results("JFK", "LAX", Some("business"));
        assert!(flights.iter().all(|f| f.cabin_class == "business"));
    }

    #[test]
    fn flight_status_echoes_flight_and_date() {
        let status = generate_flight_status("ba142", "2025-06-01");
        assert_eq!(status.flight_number, "BA142");
        assert_eq!(status.date, "2025-06-01");
        assert!(STATUSES.contains(&status.status.as_str()));
    }

    #[test]
    fn seat_map_covers_rows_and_letters() {
        let map = generate_seat_map("BA142");
        assert_eq!(map.seats.len(), 30);
        assert_eq!(map.seats[0].seat, "10A");
        assert_eq!(map.seats[29].seat, "14F");
        for seat in &map.seats {
            assert!(seat.price_usd > 0);
        }
    }

    #[test]
    fn reservation_price_is_in_range() {
        for _ in 0..50 {
            let price = generate_reservation_price();
            assert!((200..700).contains(&price));
        }
    }

    #[test]
    fn boarding_pass_has_gate_and_times() {
        let pass = generate_boarding_pass("res-1");
        assert!(pass.boarding_pass_id.starts_with("bp_"));
        assert_eq!(pass.reservation_id, "res-1");
        assert!(!pass.gate_number.is_empty());
        assert!(pass.boarding_time.contains(':'));
    }
}
