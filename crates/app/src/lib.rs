//! # smarthome-app
//!
//! Application layer: rules engine, use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HomeRepository`, `ZoneRepository`, `OpeningRepository`,
//!     `ApplianceRepository`, `UserRepository`: the entity store
//!   - `EventPublisher`: broadcast of domain events
//! - Run the **rules engine**:
//!   - `OccupancyTracker`: is anybody inside a home?
//!   - `AlarmStateMachine`: arming gated by occupancy
//!   - `ZoneAutomationEngine`: alarm trigger and automatic lights on zone entry
//! - Expose **use-case services** (`HomeService`, `UserService`, `ZoneService`,
//!   `ApplianceService`) to driving adapters
//! - Serialize read-check-write sequences per home (`HomeLocks`)
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `smarthome-domain` only (plus `tokio::sync` for channels and locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod alarm;
pub mod event_bus;
pub mod locks;
pub mod occupancy;
pub mod ports;
pub mod services;
pub mod zone_automation;

#[cfg(test)]
mod testing;
