//! Enrolled students

use serde::{Deserialize, Serialize};

use super::ids::deserialize_optional_id;
use super::{CourseId, StudentId};
use crate::error::ValidationError;

/// A student record. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Loose reference; may be unset or name a course that does not exist
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub course_id: Option<CourseId>,
    pub phone: String,
    /// Local calendar date the student was added
    pub joined_date: String,
}

/// Validated input for a new student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub course_id: Option<CourseId>,
    pub phone: String,
}

impl NewStudent {
    pub fn new(
        name: impl Into<String>,
        course_id: impl Into<Option<CourseId>>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            course_id: course_id.into(),
            phone: phone.into(),
        }
    }

    /// Trim text fields and reject blanks
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if phone.is_empty() {
            return Err(ValidationError::EmptyPhone);
        }
        Ok(Self {
            name,
            course_id: self.course_id,
            phone,
        })
    }
}

/// Raw text as submitted by the "Add Student" form.
/// A blank course (empty catalogue) means no course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub course_id: String,
    pub phone: String,
}

impl StudentForm {
    pub fn parse(&self) -> Result<NewStudent, ValidationError> {
        let course_id = if self.course_id.trim().is_empty() {
            None
        } else {
            Some(self.course_id.parse()?)
        };
        NewStudent {
            name: self.name.clone(),
            course_id,
            phone: self.phone.clone(),
        }
        .normalized()
    }
}
