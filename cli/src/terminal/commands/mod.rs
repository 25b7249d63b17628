//! Terminal command implementations.

pub mod device;
