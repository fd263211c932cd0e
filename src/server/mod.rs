pub mod dto;
mod extract;
mod pages;
mod render;
pub mod response;
mod router;
mod schedules;

pub use extract::JsonOrForm;
pub use router::{AppState, create_router};
pub use schedules::schedules_router;
