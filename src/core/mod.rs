//! Shared constants: on-disk names, config keys, routes, protocol parameters.

pub mod paths;
pub mod protocol;
