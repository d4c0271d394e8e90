//! Domain entities - Objects with identity and lifecycle

mod live_vehicle;

pub use live_vehicle::LiveVehicle;
