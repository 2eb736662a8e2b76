//! # smarthome-domain
//!
//! Pure domain model for the smart home simulator.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Homes** (security level, automatic mode, outside conditions)
//! - Define **Zones** (rooms of a home) and the "outside" sentinel
//! - Define **Openings** (doors, windows) and **Appliances** (lights, …)
//! - Define **Users** (role, home and zone assignment)
//! - Define **Outcomes** (success, notices and policy denials)
//! - Define **Events** (records of what the rules engine decided)
//! - Parse **zone layouts** into zone/opening blueprints
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod appliance;
pub mod event;
pub mod home;
pub mod layout;
pub mod opening;
pub mod outcome;
pub mod user;
pub mod zone;
