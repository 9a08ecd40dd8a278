//! `coursegate-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the tenant partition, the course and log entities and the
//! shared domain error model.

pub mod course;
pub mod entity;
pub mod error;
pub mod id;
pub mod log;
pub mod tenant;

pub use course::Course;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CourseId, LogId, SubjectId};
pub use log::LogEntry;
pub use tenant::Tenant;
