//! # SchoolHub API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for running a school:
//! teachers, students, courses, enrollments and daily attendance, with JWT
//! authentication and role-based authorization.
//!
//! ## Overview
//!
//! - **Authentication**: JWT access tokens bound to login sessions
//! - **Presence**: an identity is online while one of its sessions is open
//! - **Course registry**: courses owned by a teacher, with a capacity
//! - **Enrollment ledger**: one enrollment per student and course, capacity
//!   enforced against Active enrollments
//! - **Attendance journal**: one mark per student, course and day
//! - **Statistics**: occupancy, averages, grade reports and attendance
//!   percentages, computed per request
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors and role checks
//! ├── modules/          # Feature modules
//! │   ├── auth/         # Login, logout, presence
//! │   ├── teachers/     # Teacher records
//! │   ├── students/     # Student records
//! │   ├── courses/      # Course registry
//! │   ├── enrollments/  # Enrollment ledger and statistics
//! │   └── attendance/   # Attendance journal and statistics
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── router.rs         # Main router
//! ├── state.rs          # Shared state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Each feature module has a `controller.rs` (handlers), `service.rs`
//! (queries and rules) and `router.rs`. Domain types live in the
//! `schoolhub-models` crate.
//!
//! ## Roles
//!
//! | Role | Source | Can |
//! |------|--------|-----|
//! | Admin | Teacher with role `admin` | Everything |
//! | Teacher | Teacher with role `teacher` | Read |
//! | Student | Any student | Read |
//!
//! Admins are bootstrapped with `schoolhub-cli create-admin`.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use schoolhub_auth;
pub use schoolhub_config;
pub use schoolhub_core;
pub use schoolhub_db;
pub use schoolhub_models;
