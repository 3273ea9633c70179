//! Course catalogue entries

use serde::{Deserialize, Serialize};

use super::CourseId;
use super::fee::deserialize_amount;

/// A course students can enrol in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Fee per month
    #[serde(deserialize_with = "deserialize_amount")]
    pub fee: f64,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, fee: f64) -> Self {
        Self {
            id,
            name: name.into(),
            fee,
        }
    }

    /// Catalogue written on first run, when nothing has been stored yet
    pub fn defaults() -> Vec<Course> {
        vec![
            Course::new(CourseId(1), "Mathematics", 500.0),
            Course::new(CourseId(2), "Science", 450.0),
        ]
    }
}
