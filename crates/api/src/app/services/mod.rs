//! Service wiring: persistence ports, token issuing and password hashing
//! plugged into the four resource services.

use std::sync::Arc;

use coursegate_auth::{PasswordHasher, TokenService};
use coursegate_infra::{
    CourseRepository, InMemoryCourseRepository, InMemoryLogRepository, InMemoryUserRepository,
    LogRepository, UserRepository,
};

pub mod auth;
pub mod courses;
pub mod logs;
pub mod users;

pub use auth::{AuthService, Session};
pub use courses::CourseService;
pub use logs::LogService;
pub use users::UserService;

/// Storage handles shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub logs: Arc<dyn LogRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            courses: Arc::new(InMemoryCourseRepository::new()),
            logs: Arc::new(InMemoryLogRepository::new()),
        }
    }
}

/// Everything the HTTP handlers need, shared via `Extension<Arc<AppServices>>`.
pub struct AppServices {
    pub auth: AuthService,
    pub courses: CourseService,
    pub logs: LogService,
    pub users: UserService,
}

impl AppServices {
    pub fn new(
        repos: Repositories,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn PasswordHasher>,
        min_password_len: usize,
    ) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), tokens, hasher, min_password_len),
            courses: CourseService::new(repos.courses.clone(), repos.users.clone(), repos.logs.clone()),
            logs: LogService::new(repos.logs, repos.courses, repos.users.clone()),
            users: UserService::new(repos.users),
        }
    }
}
