//! Infrastructure layer: persistence ports and their adapters.

pub mod repository;

pub use repository::{
    CourseRepository, InMemoryCourseRepository, InMemoryLogRepository, InMemoryUserRepository,
    LogRepository, StoreError, UserRecord, UserRepository,
};
