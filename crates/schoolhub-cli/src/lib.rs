//! # SchoolHub CLI
//!
//! Administrative tools for SchoolHub: bootstrapping the first admin and
//! filling a development database with fake teachers, students, courses and
//! enrollments.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhub_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(8).with_students(120);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
