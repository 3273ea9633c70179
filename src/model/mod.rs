//! Domain records
//!
//! Field names serialize in camelCase to match the LocalStorage layout
//! the web front-end already writes.

pub mod course;
pub mod fee;
pub mod ids;
pub mod student;

pub use course::Course;
pub use fee::{FeeForm, FeeRecord, Month, NewFee, PaymentMethod, parse_amount};
pub use ids::{CourseId, FeeId, MAX_ID, StudentId};
pub use student::{NewStudent, Student, StudentForm};
