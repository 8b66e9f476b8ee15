pub mod coerce;
pub mod collab;
pub mod error;
pub mod hints;
pub mod models;
pub mod wire;
