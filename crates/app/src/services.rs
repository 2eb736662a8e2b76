//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod appliance_service;
pub mod home_service;
pub mod user_service;
pub mod zone_service;
