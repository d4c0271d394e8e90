//! RTL mobile booking backend integration
//!
//! Client for the RTL (Maldives public transport) booking API: encrypted login
//! with a cached JWT, bus and ferry route listings, live vehicle coordinates,
//! ticket products, booking and card payment.
//!
//! # Architecture
//!
//! [`RtlClient`] defines the interface, implemented over HTTP by
//! [`HttpRtlClient`]. The login payload cipher lives in [`encrypt_login_payload`]
//! and the token cache in [`TokenStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::VehicleType;
//! use integration_rtl::{HttpRtlClient, RtlClient, RtlConfig};
//!
//! let config = RtlConfig::default().with_credentials("me@example.mv", "secret");
//! let client = HttpRtlClient::new(&config)?;
//! client.login_if_expired().await?;
//!
//! let live = client.live_coordinates("M1", VehicleType::Bus).await?;
//! for bus in live.bus_list {
//!     println!("{} at {}, {}", bus.bus_code, bus.latitude, bus.longitude);
//! }
//! ```

mod client;
mod config;
mod crypto;
mod error;
mod models;
mod token;

pub use client::{HttpRtlClient, RtlClient};
pub use config::{DEFAULT_LOGIN_IV, DEFAULT_LOGIN_KEY, RtlConfig};
pub use crypto::encrypt_login_payload;
pub use error::RtlError;
pub use models::{
    BookTicketResult, BusRoute, BusRoutes, BusStop, CardNumber, LiveBus, LiveCoordinates,
    PaymentResult, Product, ProductDetails, PurchaseOutcome, StopTiming, ValidRoute, VesselRoute,
    VesselRoutes, VesselStop,
};
pub use token::{TokenStore, is_token_expired};
