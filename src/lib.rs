//! Core library surface for the campus admin TUI.
//!
//! The application is a terminal client for a campus REST backend: three
//! record kinds (students, courses, enrollments) managed through uniform
//! list, form, and search screens. The modules exposed here keep the API
//! intentionally small so the `bin` target and the integration tests reuse
//! the same pieces.
pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod query;
pub mod ui;

/// The configured HTTP client every resource request flows through, and its
/// error taxonomy.
pub use api::{ApiClient, ApiError};

/// Runtime configuration resolution (base URL, log file).
pub use config::Config;

/// The three record kinds other layers manipulate.
pub use models::{Course, Enrollment, EnrollmentStatus, Student};

/// Search filter state and its query-string mapping.
pub use query::{SearchFilters, SearchKind};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
