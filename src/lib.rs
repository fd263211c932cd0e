//! # Arranger
//!
//! A group scheduling server: someone proposes a schedule with candidate
//! dates, everyone marks which candidates work for them and leaves a
//! comment. Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use arranger::auth::FixedIdentity;
//! use arranger::server::{AppState, create_router};
//! use arranger::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/arranger.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     Arc::new(FixedIdentity::user(1, "dev")),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `arranger` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod schedule;
pub mod server;
pub mod store;
pub mod types;
