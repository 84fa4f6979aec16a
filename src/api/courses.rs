use crate::models::{Course, CourseDraft};

use super::client::{ApiClient, ApiError};

/// Retrieve every course.
pub fn fetch_courses(client: &ApiClient) -> Result<Vec<Course>, ApiError> {
    client.get_json("/courses", &[])
}

/// Fetch a single course, used to populate the edit form.
pub fn fetch_course(client: &ApiClient, id: &str) -> Result<Course, ApiError> {
    client.get_json(&format!("/courses/{id}"), &[])
}

/// Create a course.
pub fn create_course(client: &ApiClient, draft: &CourseDraft) -> Result<Course, ApiError> {
    client.post_json("/courses", draft)
}

/// Replace the editable fields of an existing course.
pub fn update_course(
    client: &ApiClient,
    id: &str,
    draft: &CourseDraft,
) -> Result<Course, ApiError> {
    client.put_json(&format!("/courses/{id}"), draft)
}

/// Remove a course.
pub fn delete_course(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/courses/{id}"))
}
