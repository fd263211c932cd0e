mod availability;
mod models;

pub use availability::AvailabilityLevel;
pub use models::*;
