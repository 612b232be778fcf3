//! Lectern binary support: bootstrap (config, tracing, wiring) and the
//! command-line surfaces.

pub mod bootstrap;
pub mod cli;
