//! Orbit CLI library
//!
//! This crate provides core functionality for the Orbit command-line
//! interface. It includes modules for talking to the Orbit API, resolving the
//! project's owning account, and formatting registered Apple devices.
//!
//! # Architecture
//!
//! The CLI is designed as a library with a terminal frontend:
//!
//! - **Library modules** (`api`, `project`, `team`, `device`) contain the core logic
//! - **Terminal frontend** (`cli/src/terminal/`) provides the user interface
//!
//! ## Key Concepts
//!
//! - **`Account`** - The account owning the current project, read from `Orbit.toml`
//! - **`AppleTeam`** - A provisioning team the account has registered devices under
//! - **`TeamSelection`** - The decision of how a single team gets picked
//! - **`DeviceQueries`** - The seam between command flow and the remote API

#![allow(missing_docs)]

pub mod api;
pub mod device;
pub mod project;
pub mod team;

pub const ORBIT_VERSION: &str = env!("CARGO_PKG_VERSION");
