//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod vehicle_type;

pub use geo_location::{EARTH_RADIUS_KM, GeoLocation, InvalidCoordinates, haversine_km};
pub use vehicle_type::VehicleType;
