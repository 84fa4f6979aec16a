//! REST resource client split across logical submodules.

mod client;
mod courses;
mod enrollments;
mod students;

pub use client::{ApiClient, ApiError};
pub use courses::{create_course, delete_course, fetch_course, fetch_courses, update_course};
pub use enrollments::{create_enrollment, delete_enrollment, fetch_enrollments};
pub use students::{
    create_student, delete_student, fetch_student, fetch_students, search_students,
    update_student,
};
