//! Bookkeeping resources.
//!
//! This module provides the business logic behind the resources API:
//! - Input validation and sanitization
//! - Caller scoping and per-resource authorization
//! - Orchestration of account resolution, VAT and document encryption
//! - The storage seam and an in-memory store

mod error;
mod memory;
mod policy;
mod repository;
mod service;
mod types;
mod validation;


pub use error::ResourceError;
pub use memory::InMemoryResourceRepository;
pub use policy::{Action, Caller};
pub use repository::ResourceRepository;
pub use service::ResourceService;
pub use types::{Resource, ResourceFilter, ResourceListParams, parse_resource_id};
pub use validation::{DonePatch, DoneValue, ResourceDraft, ValidatedResource};
