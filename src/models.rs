//! Domain models that mirror the REST API's JSON representations and get
//! passed throughout the TUI. These types stay light-weight data holders so
//! other layers can focus on presentation and transport logic. The server is
//! the authority for every record; identifiers arrive as `_id` strings and
//! field names on the wire are camelCase.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A student record as returned by the API.
pub struct Student {
    /// Server-assigned identifier. Kept around even when a view only needs
    /// display information because edit/delete flows bubble the id back to
    /// the client layer.
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Whole years; the API stores this as a JSON number.
    pub age: i64,
    /// Short free-form grade label such as "A" or "11".
    pub grade: String,
}

impl Student {
    /// Label used by the enrollment selector: `name - email`.
    pub fn select_label(&self) -> String {
        format!("{} - {}", self.name, self.email)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A course record as returned by the API.
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Short course code such as "CS101".
    pub code: String,
    /// Credit count, a JSON number between 1 and 10.
    pub credits: i64,
    pub description: String,
}

impl Course {
    /// Label used by the enrollment selector: `code - title`.
    pub fn select_label(&self) -> String {
        format!("{} - {}", self.code, self.title)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Lifecycle state of an enrollment. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    /// All statuses, in the order the selector cycles through them.
    pub const ALL: [EnrollmentStatus; 3] = [
        EnrollmentStatus::Active,
        EnrollmentStatus::Completed,
        EnrollmentStatus::Dropped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        }
    }

    /// The next status in selector order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            EnrollmentStatus::Active => EnrollmentStatus::Completed,
            EnrollmentStatus::Completed => EnrollmentStatus::Dropped,
            EnrollmentStatus::Dropped => EnrollmentStatus::Active,
        }
    }

    /// The previous status in selector order, wrapping around.
    pub fn previous(&self) -> Self {
        match self {
            EnrollmentStatus::Active => EnrollmentStatus::Dropped,
            EnrollmentStatus::Completed => EnrollmentStatus::Active,
            EnrollmentStatus::Dropped => EnrollmentStatus::Completed,
        }
    }
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        EnrollmentStatus::Active
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            _ => Err(format!("invalid enrollment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// An enrollment as returned by the list endpoint. The student and course
/// references arrive populated as embedded objects, never as bare ids; the
/// client does not resolve them itself.
pub struct Enrollment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "studentId")]
    pub student: Student,
    #[serde(rename = "courseId")]
    pub course: Course,
    pub status: EnrollmentStatus,
    /// Server-assigned at creation time; read-only on the client.
    #[serde(rename = "enrollmentDate")]
    pub enrolled_at: DateTime<Utc>,
}

/// Request body for creating or updating a student. Numeric fields are sent
/// as JSON numbers, not strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub age: i64,
    pub grade: String,
}

/// Request body for creating or updating a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDraft {
    pub title: String,
    pub code: String,
    pub credits: i64,
    pub description: String,
}

/// Request body for creating an enrollment. Unlike the read shape, the
/// references here are bare identifier strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentDraft {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub status: EnrollmentStatus,
}
