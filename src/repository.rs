//! In-memory entity repository
//!
//! Holds the three append-only collections and is the single source of truth
//! for the session. Mutations validate their input, assign ids and notify
//! subscribers; persistence is just one subscriber (see [`Repository::persist_to`]).

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{StorageError, ValidationError};
use crate::model::{
    Course, CourseId, FeeId, FeeRecord, MAX_ID, NewFee, NewStudent, Student, StudentId,
};
use crate::storage::{self, COURSES_KEY, FEES_KEY, KeyValueStore, STUDENTS_KEY};

/// Display name for a fee whose student cannot be found
pub const UNKNOWN_STUDENT: &str = "Unknown";

/// The full persisted state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub fees: Vec<FeeRecord>,
}

impl Collections {
    /// Load all collections, seeding default courses when none are stored
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let students = storage::load(store, STUDENTS_KEY).unwrap_or_default();
        let courses = storage::load(store, COURSES_KEY).unwrap_or_else(|| {
            log::info!("No stored courses, seeding defaults");
            Course::defaults()
        });
        let fees = storage::load(store, FEES_KEY).unwrap_or_default();
        Self {
            students,
            courses,
            fees,
        }
    }

    /// Write every collection, overwriting what is stored
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        storage::save(store, STUDENTS_KEY, &self.students)?;
        storage::save(store, COURSES_KEY, &self.courses)?;
        storage::save(store, FEES_KEY, &self.fees)?;
        log::info!(
            "Saved {} students, {} courses, {} fees",
            self.students.len(),
            self.courses.len(),
            self.fees.len()
        );
        Ok(())
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Student whose id prints exactly as `key`; `"01"` or `" 1"` match nothing
    pub fn student_by_key(&self, key: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id.to_string() == key)
    }

    pub fn student_name(&self, id: StudentId) -> Option<&str> {
        self.student(id).map(|s| s.name.as_str())
    }

    /// Student name, or [`UNKNOWN_STUDENT`] for an unset or dangling reference
    pub fn display_name(&self, id: impl Into<Option<StudentId>>) -> &str {
        id.into()
            .and_then(|id| self.student_name(id))
            .unwrap_or(UNKNOWN_STUDENT)
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn course_name(&self, id: CourseId) -> Option<&str> {
        self.course(id).map(|c| c.name.as_str())
    }
}

/// What a mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    StudentAdded(StudentId),
    FeeAdded(FeeId),
}

type Listener = Box<dyn FnMut(&Change, &Collections)>;

/// Session repository over students, courses and fees
pub struct Repository {
    data: Collections,
    clock: Box<dyn Clock>,
    listeners: Vec<Listener>,
}

impl Repository {
    pub fn new(data: Collections) -> Self {
        Self::with_clock(data, SystemClock)
    }

    pub fn with_clock(data: Collections, clock: impl Clock + 'static) -> Self {
        Self {
            data,
            clock: Box::new(clock),
            listeners: Vec::new(),
        }
    }

    /// Load from `store` and keep it in sync after every change.
    ///
    /// Only freshly seeded courses are written up front. A blob that was
    /// discarded as malformed stays in the store until the first change.
    pub fn open<S: KeyValueStore + 'static>(store: S) -> Self {
        let data = Collections::load(&store);
        if store.get_item(COURSES_KEY).is_none() {
            if let Err(e) = storage::save(&store, COURSES_KEY, &data.courses) {
                log::warn!("Saving seeded courses failed: {}", e);
            }
        }
        let mut repo = Self::new(data);
        repo.persist_to(store);
        repo
    }

    /// Register a callback run after every successful mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&Change, &Collections) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Write the full state to `store` after every change.
    ///
    /// Save failures are logged; the session keeps running from memory.
    pub fn persist_to<S: KeyValueStore + 'static>(&mut self, store: S) {
        self.subscribe(move |change, data| {
            if let Err(e) = data.save(&store) {
                log::warn!("Save after {:?} failed: {}", change, e);
            }
        });
    }

    pub fn collections(&self) -> &Collections {
        &self.data
    }

    pub fn students(&self) -> &[Student] {
        &self.data.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.data.courses
    }

    pub fn fees(&self) -> &[FeeRecord] {
        &self.data.fees
    }

    pub fn student_name(&self, id: StudentId) -> Option<&str> {
        self.data.student_name(id)
    }

    pub fn display_name(&self, id: impl Into<Option<StudentId>>) -> &str {
        self.data.display_name(id)
    }

    pub fn course_name(&self, id: CourseId) -> Option<&str> {
        self.data.course_name(id)
    }

    /// Append a student, stamped with a fresh id and today's date
    pub fn add_student(&mut self, input: NewStudent) -> Result<Student, ValidationError> {
        let input = input.normalized()?;
        let last = self.data.students.iter().map(|s| s.id.value()).max();
        let student = Student {
            id: StudentId(self.next_id(last)?),
            name: input.name,
            course_id: input.course_id,
            phone: input.phone,
            joined_date: self.clock.today(),
        };
        log::debug!("Adding student {} ({})", student.id, student.name);
        self.data.students.push(student.clone());
        self.notify(Change::StudentAdded(student.id));
        Ok(student)
    }

    /// Append a fee record, stamped with a fresh id and today's date.
    ///
    /// The student reference is not checked; fees for unknown students are kept.
    pub fn add_fee(&mut self, input: NewFee) -> Result<FeeRecord, ValidationError> {
        if !input.amount.is_finite() {
            return Err(ValidationError::InvalidAmount(input.amount.to_string()));
        }
        let last = self.data.fees.iter().map(|f| f.id.value()).max();
        let fee = FeeRecord {
            id: FeeId(self.next_id(last)?),
            student_id: Some(input.student_id),
            amount: input.amount,
            month: input.month,
            method: input.method,
            date: self.clock.today(),
        };
        log::debug!(
            "Adding fee {} for student {}: {} ({})",
            fee.id,
            input.student_id,
            fee.amount,
            fee.method
        );
        self.data.fees.push(fee.clone());
        self.notify(Change::FeeAdded(fee.id));
        Ok(fee)
    }

    /// Current time in ms, bumped past `last` so ids stay strictly increasing.
    ///
    /// Fails once the next id would leave the range a JavaScript number holds.
    fn next_id(&self, last: Option<i64>) -> Result<i64, ValidationError> {
        let now = self.clock.now_millis();
        let next = match last {
            Some(last) if now <= last => last.checked_add(1).filter(|id| *id <= MAX_ID),
            _ => Some(now).filter(|id| *id <= MAX_ID),
        };
        next.ok_or(ValidationError::IdExhausted(last.unwrap_or(now)))
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change, &self.data);
        }
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("data", &self.data)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
