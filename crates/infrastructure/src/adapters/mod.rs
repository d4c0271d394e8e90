//! Adapters implementing application ports

mod live_position_adapter;

pub use live_position_adapter::LivePositionAdapter;
