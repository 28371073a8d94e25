//! # cangen Core
//!
//! Core frame types and traits for schema-generated CAN messages.
//!
//! This crate provides:
//! - [`StandardId`] and [`CanFrame`] for 11-bit identifier, 8-byte frames
//! - The [`CanMessage`] trait implemented by generated message structs
//! - Error types for frame construction and decoding

pub mod error;
pub mod frame;
pub mod message;

pub use error::{Error, Result};
pub use frame::{CanFrame, MAX_DLC, MAX_STANDARD_ID, StandardId};
pub use message::CanMessage;
