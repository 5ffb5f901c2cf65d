//! Core use-case services.
//!
//! # Responsibility
//! - Pair the entity store with a backend for form-style submissions.
//! - Keep CLI callers decoupled from storage details.

pub mod crm_service;
