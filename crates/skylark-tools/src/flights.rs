// SPDX-FileCopyrightText: 2026 Skylark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only flight tools: search, status, and seat selection.
//!
//! All three return synthetic samples and touch no persistence.

use async_trait::async_trait;
use serde::Deserialize;
use skylark_core::SkylarkError;

use crate::actions;
use crate::tool::{Tool, ToolContext, ToolOutput};

/// Searches for flights between two airports.
pub struct FindFlightsTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindFlightsParams {
    origin: String,
    destination: String,
    #[allow(dead_code)]
    date: String,
    #[serde(default)]
    #[allow(dead_code)]
    return_date: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    passengers: Option<u32>,
    #[serde(default)]
    cabin_class: Option<String>,
}

#[async_trait]
impl Tool for FindFlightsTool {
    fn name(&self) -> &str {
        "findFlights"
    }

    fn description(&self) -> &str {
        "Searches for flights based on the origin, destination, and date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "origin": {
                    "type": "string",
                    "description": "Origin airport code (3 letters) or city name"
                },
                "destination": {
                    "type": "string",
                    "description": "Destination airport code (3 letters) or city name"
                },
                "date": {
                    "type": "string",
                    "description": "Date of travel (YYYY-MM-DD)"
                },
                "returnDate": {
                    "type": "string",
                    "description": "Return date (YYYY-MM-DD) for round trip flights"
                },
                "passengers": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of passengers"
                },
                "cabinClass": {
                    "type": "string",
                    "description": "Cabin class (economy, premium, business, first)"
                }
            },
            "required": ["origin", "destination", "date"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: FindFlightsParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;
        let flights = actions::generate_flight_search_results(
            &params.origin,
            &params.destination,
            params.cabin_class.as_deref(),
        );
        Ok(ToolOutput::json(&serde_json::json!({ "flights": flights })))
    }
}

/// Reports the status of a flight by number and date.
pub struct GetFlightStatusTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetFlightStatusParams {
    flight_number: String,
    date: String,
}

#[async_trait]
impl Tool for GetFlightStatusTool {
    fn name(&self) -> &str {
        "getFlightStatus"
    }

    fn description(&self) -> &str {
        "Gets the status of a flight by flight number and date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "flightNumber": {
                    "type": "string",
                    "description": "Flight number, including airline code and number (e.g., BA142)"
                },
                "date": {
                    "type": "string",
                    "description": "Date of the flight (YYYY-MM-DD)"
                }
            },
            "required": ["flightNumber", "date"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: GetFlightStatusParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;
        let status = actions::generate_flight_status(&params.flight_number, &params.date);
        Ok(ToolOutput::json(&serde_json::to_value(status).map_err(
            |e| SkylarkError::Internal(e.to_string()),
        )?))
    }
}

/// Selects seats for passengers on a flight.
///
/// Seat uniqueness across passengers is not checked -- the model may assign
/// the same seat twice and the sample data will echo it back.
pub struct SelectSeatsTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectSeatsParams {
    flight_number: String,
    #[allow(dead_code)]
    date: String,
    passengers: Vec<SeatAssignment>,
}

#[derive(Debug, Deserialize, serde::Serialize)]
struct SeatAssignment {
    name: String,
    seat: String,
}

#[async_trait]
impl Tool for SelectSeatsTool {
    fn name(&self) -> &str {
        "selectSeats"
    }

    fn description(&self) -> &str {
        "Selects seats for passengers on a particular flight. Returns available and selected seats."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "flightNumber": {
                    "type": "string",
                    "description": "Flight number, including airline code and number (e.g., BA142)"
                },
                "date": {
                    "type": "string",
                    "description": "Date of the flight (YYYY-MM-DD)"
                },
                "passengers": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Passenger name"
                            },
                            "seat": {
                                "type": "string",
                                "pattern": "^[0-9]+[A-F]$",
                                "description": "Seat number (e.g., 12A, 12B). Format is [row number][seat letter]."
                            }
                        },
                        "required": ["name", "seat"]
                    },
                    "description": "Array of passengers and their selected seats"
                }
            },
            "required": ["flightNumber", "date", "passengers"]
        })
    }

    async fn invoke(
        &self,
        input: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, SkylarkError> {
        let params: SelectSeatsParams = serde_json::from_value(input)
            .map_err(|e| SkylarkError::MalformedInput(e.to_string()))?;
        let map = actions::generate_seat_map(&params.flight_number);
        Ok(ToolOutput::json(&serde_json::json!({
            "flightNumber": map.flight_number,
            "selected": params.passengers,
            "seats": map.seats,
        })))
    }
}
