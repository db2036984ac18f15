//! Engine module housing the audio domain.
//!
//! This module exposes trait-based backends (`backend`) and the
//! `SynthEngine` lifecycle layer (`core`) that owns one of them.

pub mod backend;
pub mod core;

#[cfg(feature = "cpal_backend")]
pub use backend::CpalBackend;
pub use backend::{AudioBackend, OfflineBackend};
pub use core::SynthEngine;
