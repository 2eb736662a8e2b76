//! # smarthome-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over homes, zones, appliances and users
//!   (`/api/homes`, `/api/users/{id}/zone`, …)
//! - Stream rules engine decisions as **Server-Sent Events**
//!   (`/api/events/stream`)
//! - Hash sign-up passwords before they reach the application layer
//! - Map application results and policy denials into HTTP responses
//!
//! ## Dependency rule
//! Depends on `smarthome-app` (for port traits and services) and
//! `smarthome-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod credentials;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;
