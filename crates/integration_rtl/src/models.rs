//! RTL booking API data models
//!
//! Typed representations of routes, stops, live coordinates, products,
//! bookings and payments as returned by the RTL mobile backend. Field names
//! follow the backend's camelCase JSON.

use std::fmt;

use domain::{GeoLocation, LiveVehicle, VehicleType};
use serde::{Deserialize, Serialize};

/// Response of `GET /booking/v2/bus/routedetails`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusRoutes {
    /// All bus lines
    #[serde(default)]
    pub route_response: Vec<BusRoute>,
}

/// A bus line with its ordered stops
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusRoute {
    /// Backend identifier
    pub id: i64,
    /// Route code used by product and live-coordinate lookups
    pub code: String,
    /// Display name
    pub name: String,
    /// Public route number
    pub route_number: String,
    /// Stops in travel order
    #[serde(default)]
    pub bus_route_stop_list: Vec<BusStop>,
}

impl fmt::Display for BusRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.route_number, self.name, self.code)
    }
}

/// A bus stop and its timetable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusStop {
    /// Backend identifier
    pub id: i64,
    /// Position of the stop along the route
    pub order: i64,
    /// Stop name
    pub name: String,
    /// Latitude as sent by the backend (string-typed)
    pub latitude: String,
    /// Longitude as sent by the backend (string-typed)
    pub longitude: String,
    /// Scheduled passing times
    #[serde(default)]
    pub timings: Vec<StopTiming>,
}

impl BusStop {
    /// Parsed stop location, if the coordinates are numeric
    #[must_use]
    pub fn location(&self) -> Option<GeoLocation> {
        GeoLocation::from_strings(&self.latitude, &self.longitude)
    }
}

/// A scheduled passing time at a stop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopTiming {
    /// Trip order
    pub order: i64,
    /// Time of day as sent by the backend (e.g., "06:30")
    pub timing: String,
}

/// Response of `GET /booking/v2/vessel/routedetails`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VesselRoutes {
    /// All ferry lines
    #[serde(default)]
    pub route_response: Vec<VesselRoute>,
}

/// A ferry line with its ordered stops
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VesselRoute {
    /// Backend identifier
    pub id: i64,
    /// Route code
    pub code: String,
    /// Display name
    pub name: String,
    /// Public route number
    pub route_number: String,
    /// Base fare in MVR
    pub fare: f64,
    /// Stops in travel order
    #[serde(default)]
    pub stop_list: Vec<VesselStop>,
}

impl fmt::Display for VesselRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}) MVR {:.2}",
            self.route_number, self.name, self.code, self.fare
        )
    }
}

/// A ferry terminal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VesselStop {
    /// Backend identifier
    pub id: i64,
    /// Position of the stop along the route
    pub order: i64,
    /// Terminal code
    pub code: String,
    /// Terminal name
    pub name: String,
    /// Latitude (string-typed)
    pub latitude: String,
    /// Longitude (string-typed)
    pub longitude: String,
}

impl VesselStop {
    /// Parsed terminal location, if the coordinates are numeric
    #[must_use]
    pub fn location(&self) -> Option<GeoLocation> {
        GeoLocation::from_strings(&self.latitude, &self.longitude)
    }
}

/// Response of `POST /booking/v1/{type}/livecoordinates`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveCoordinates {
    /// Vehicles currently reporting on the route
    #[serde(default)]
    pub bus_list: Vec<LiveBus>,
}

impl LiveCoordinates {
    /// Convert the feed into domain vehicles
    #[must_use]
    pub fn into_vehicles(self) -> Vec<LiveVehicle> {
        self.bus_list.into_iter().map(LiveBus::into_vehicle).collect()
    }
}

/// One live vehicle entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveBus {
    /// Operator vehicle code
    pub bus_code: String,
    /// Registration plate
    #[serde(default)]
    pub plate_number: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LiveBus {
    /// Convert into a domain vehicle (coordinates accepted unchecked)
    #[must_use]
    pub fn into_vehicle(self) -> LiveVehicle {
        let location = GeoLocation::new_unchecked(self.latitude, self.longitude);
        let vehicle = LiveVehicle::new(self.bus_code, location);
        match self.plate_number {
            Some(plate) if !plate.is_empty() => vehicle.with_plate_number(plate),
            _ => vehicle,
        }
    }
}

/// Response of `POST /booking/v1/{type}/productdetails`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    /// Route identifier
    pub id: i64,
    /// Route code the products belong to
    pub code: String,
    /// Route name
    pub name: String,
    /// Public route number
    pub route_number: String,
    /// Purchasable ticket products
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductDetails {
    /// Find a product by its code
    #[must_use]
    pub fn find_product(&self, code: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.code == code)
    }
}

/// A ticket product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier
    pub id: i64,
    /// Product code used for booking
    pub code: String,
    /// Display label
    pub label: String,
    /// Validity in minutes
    pub validity_time: i64,
    /// Backend product type
    pub product_type: i64,
    /// QR ticket type
    pub qr_ticket_type: i64,
    /// Smart card ticket type
    #[serde(default)]
    pub csc_ticket_type: Option<String>,
    /// 1 if the ticket is limited to `trip_count` trips
    pub is_trip_finite: i64,
    /// Number of trips included
    pub trip_count: i64,
    /// Backend vehicle type code
    pub vehicle_type: i64,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Price in MVR
    pub fare: f64,
    /// 1 if priced by distance
    #[serde(default)]
    pub is_distance_fare_type: Option<i64>,
    /// Distance fare component
    #[serde(default)]
    pub distance_fare_component: Option<String>,
    /// Routes on which the ticket is valid
    #[serde(default)]
    pub valid_routes: Vec<ValidRoute>,
}

impl Product {
    /// Whether the ticket is limited to a number of trips
    #[must_use]
    pub const fn is_trip_finite(&self) -> bool {
        self.is_trip_finite != 0
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} MVR {:.2}", self.code, self.label, self.fare)?;
        if self.is_trip_finite() {
            write!(f, " ({} trips)", self.trip_count)?;
        }
        Ok(())
    }
}

/// A route on which a product is valid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidRoute {
    /// Backend identifier
    pub id: i64,
    /// Route code
    pub code: String,
    /// Route name
    pub name: String,
    /// Public route number
    pub route_number: String,
}

/// Response of `POST /booking/v1/vessel/bookticket`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookTicketResult {
    /// Backend status message
    pub message: String,
    /// Booking identifier used for payment
    pub booking_id: String,
    /// Booking timestamp as sent by the backend
    pub booking_date: String,
    /// Tokenization flag
    pub is_tokenized: i64,
    /// Wallet status flag
    pub wallet_status: i64,
    /// Wallet balance, if any
    #[serde(default)]
    pub wallet_balance: Option<String>,
    /// Saved cards available for payment
    #[serde(default)]
    pub padded_card_numbers: Vec<CardNumber>,
}

impl BookTicketResult {
    /// First saved card, used when no card is chosen explicitly
    #[must_use]
    pub fn first_card(&self) -> Option<&CardNumber> {
        self.padded_card_numbers.first()
    }
}

/// A saved, masked card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardNumber {
    /// Card identifier for payment
    pub card_id: i64,
    /// Masked card number
    pub card_number: String,
}

/// Response of `POST /booking/v1/vessel/payment`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentResult {
    /// Payment gateway URL (may use an app-only scheme)
    pub url: String,
}

/// Result of a complete book-and-pay purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    /// The booking that was created
    pub booking: BookTicketResult,
    /// The payment that was initiated
    pub payment: PaymentResult,
}

/// Request body for live coordinates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteCodeRequest<'a> {
    pub route_code: &'a str,
}

/// Request body for product details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDetailsRequest<'a> {
    pub route_code: &'a str,
    pub device_type: u8,
}

/// Request body for booking
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookTicketRequest<'a> {
    pub route_code: &'a str,
    pub product_code: &'a str,
    pub ticket_count: u32,
    pub email: &'a str,
    pub device_type: u8,
}

/// Request body for payment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentRequest<'a> {
    pub booking_id: &'a str,
    pub card_id: i64,
    pub payment_type: u8,
    pub tokenize: u8,
}

/// Plaintext login body (encrypted before sending)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub channel_id: u8,
    pub version_name: &'a str,
}

/// Login response
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub jwt: Option<String>,
}

/// Map a vehicle type to the route-details path
pub(crate) const fn route_details_path(vehicle_type: VehicleType) -> &'static str {
    match vehicle_type {
        VehicleType::Bus => "/booking/v2/bus/routedetails",
        VehicleType::Vessel => "/booking/v2/vessel/routedetails",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bus_routes() {
        let json = r#"{
            "routeResponse": [{
                "id": 1,
                "code": "M1",
                "name": "Malé City Loop",
                "routeNumber": "1",
                "busRouteStopList": [{
                    "id": 10,
                    "order": 1,
                    "name": "Jumhooree Maidhaan",
                    "latitude": "4.1755",
                    "longitude": "73.5093",
                    "timings": [{ "order": 1, "timing": "06:30" }]
                }]
            }]
        }"#;

        let routes: BusRoutes = serde_json::from_str(json).unwrap();
        assert_eq!(routes.route_response.len(), 1);
        let route = &routes.route_response[0];
        assert_eq!(route.code, "M1");
        assert_eq!(route.to_string(), "[1] Malé City Loop (M1)");

        let stop = &route.bus_route_stop_list[0];
        assert_eq!(stop.timings[0].timing, "06:30");
        let location = stop.location().unwrap();
        assert!((location.latitude() - 4.1755).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_vessel_routes() {
        let json = r#"{
            "routeResponse": [{
                "id": 7,
                "code": "F1",
                "name": "Malé - Villingili",
                "routeNumber": "301",
                "fare": 5.0,
                "stopList": [
                    { "id": 1, "order": 1, "code": "MLE", "name": "Malé", "latitude": "4.17", "longitude": "73.50" },
                    { "id": 2, "order": 2, "code": "VIL", "name": "Villingili", "latitude": "bad", "longitude": "73.48" }
                ]
            }]
        }"#;

        let routes: VesselRoutes = serde_json::from_str(json).unwrap();
        let route = &routes.route_response[0];
        assert_eq!(route.stop_list.len(), 2);
        assert!(route.stop_list[0].location().is_some());
        assert!(route.stop_list[1].location().is_none());
        assert_eq!(route.to_string(), "[301] Malé - Villingili (F1) MVR 5.00");
    }

    #[test]
    fn test_live_coordinates_into_vehicles() {
        let json = r#"{
            "busList": [
                { "busCode": "BUS1", "plateNumber": "P1234", "latitude": 4.1755, "longitude": 73.5094 },
                { "busCode": "BUS2", "plateNumber": "", "latitude": 4.20, "longitude": 73.55 }
            ]
        }"#;

        let live: LiveCoordinates = serde_json::from_str(json).unwrap();
        let vehicles = live.into_vehicles();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].vehicle_id, "BUS1");
        assert_eq!(vehicles[0].plate_number.as_deref(), Some("P1234"));
        assert!(vehicles[1].plate_number.is_none());
    }

    #[test]
    fn test_empty_live_coordinates() {
        let live: LiveCoordinates = serde_json::from_str("{}").unwrap();
        assert!(live.into_vehicles().is_empty());
    }

    #[test]
    fn test_parse_product_details() {
        let json = r#"{
            "id": 1,
            "code": "M1",
            "name": "Malé City Loop",
            "routeNumber": "1",
            "products": [{
                "id": 100,
                "code": "SINGLE",
                "label": "Single trip",
                "validityTime": 60,
                "productType": 1,
                "qrTicketType": 2,
                "cscTicketType": null,
                "isTripFinite": 1,
                "tripCount": 1,
                "vehicleType": 0,
                "description": null,
                "fare": 10.0,
                "isDistanceFareType": null,
                "distanceFareComponent": null,
                "validRoutes": [{ "id": 1, "code": "M1", "name": "Malé City Loop", "routeNumber": "1" }]
            }]
        }"#;

        let details: ProductDetails = serde_json::from_str(json).unwrap();
        let product = details.find_product("SINGLE").unwrap();
        assert!(product.is_trip_finite());
        assert_eq!(product.valid_routes[0].code, "M1");
        assert_eq!(product.to_string(), "SINGLE Single trip MVR 10.00 (1 trips)");
        assert!(details.find_product("MONTHLY").is_none());
    }

    #[test]
    fn test_parse_booking_result() {
        let json = r#"{
            "message": "Booked",
            "bookingId": "BK-1",
            "bookingDate": "2026-10-19 08:00",
            "isTokenized": 1,
            "walletStatus": 0,
            "walletBalance": null,
            "paddedCardNumbers": [
                { "cardId": 42, "cardNumber": "**** 1111" },
                { "cardId": 43, "cardNumber": "**** 2222" }
            ]
        }"#;

        let booking: BookTicketResult = serde_json::from_str(json).unwrap();
        assert_eq!(booking.booking_id, "BK-1");
        assert_eq!(booking.first_card().map(|c| c.card_id), Some(42));
    }

    #[test]
    fn test_request_bodies_are_camel_case() {
        let body = serde_json::to_value(BookTicketRequest {
            route_code: "M1",
            product_code: "SINGLE",
            ticket_count: 1,
            email: "a@b.mv",
            device_type: 0,
        })
        .unwrap();
        assert_eq!(body["routeCode"], "M1");
        assert_eq!(body["productCode"], "SINGLE");
        assert_eq!(body["ticketCount"], 1);
        assert_eq!(body["deviceType"], 0);

        let login = serde_json::to_string(&LoginRequest {
            email: "a@b.mv",
            password: "pw",
            channel_id: 0,
            version_name: "0.9.93",
        })
        .unwrap();
        assert_eq!(
            login,
            r#"{"email":"a@b.mv","password":"pw","channelId":0,"versionName":"0.9.93"}"#
        );
    }

    #[test]
    fn test_route_details_path() {
        assert_eq!(route_details_path(VehicleType::Bus), "/booking/v2/bus/routedetails");
        assert_eq!(
            route_details_path(VehicleType::Vessel),
            "/booking/v2/vessel/routedetails"
        );
    }
}
