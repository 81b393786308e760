/*!
 * Core Module
 * Shared primitives used across the engine
 */

pub mod types;

pub use types::*;
