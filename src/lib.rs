//! Class Manager - student, course and fee tracking for a small class business
//!
//! Core modules:
//! - `model`: Students, courses, fee records and their typed ids
//! - `repository`: In-memory collections, id assignment, change notification
//! - `views`: Derived read-only views (totals, trend, filtered fee list)
//! - `storage`: LocalStorage / in-memory key-value backends, JSON load/save
//! - `app`: Session wiring for a front-end (forms in, views out)
//! - `web`: wasm-bindgen surface for the browser page

pub mod app;
pub mod clock;
pub mod error;
pub mod model;
pub mod repository;
pub mod settings;
pub mod storage;
pub mod ui;
pub mod views;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::App;
pub use error::{StorageError, ValidationError};
pub use model::{Course, CourseId, FeeId, FeeRecord, PaymentMethod, Student, StudentId};
pub use repository::{Collections, Repository};
pub use settings::Settings;
