//! Endpoint configuration for Dial and Listen.
//!
//! Configuration is built per call from a list of options; there is no
//! process-wide session configuration. Option application is atomic: the
//! first failing option aborts the whole step and the partially applied
//! value is discarded.

mod client;
pub(crate) mod defaults;
mod server;

pub use client::{ClientConfig, DialOption};
pub use server::{ServerConfig, ServerOption};
