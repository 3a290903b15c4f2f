//! Patient and provider web portal for the clinic scheduling API.
//!
//! The portal keeps per-browser client state (token, user, page state) on the
//! server side, calls the REST API on the browser's behalf and answers every
//! screen with a JSON view model or a redirect.

pub mod browser;
pub mod domain;
pub mod error;
pub mod guard;
pub mod infra;
pub mod middleware;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

pub use error::ApiError;
