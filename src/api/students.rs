use crate::models::{Student, StudentDraft};

use super::client::{ApiClient, ApiError};

/// Retrieve every student. The list endpoint is also what the search screen
/// queries, optionally refined via [`search_students`].
pub fn fetch_students(client: &ApiClient) -> Result<Vec<Student>, ApiError> {
    client.get_json("/students", &[])
}

/// Retrieve students with the server-side refinements the API understands:
/// a minimum age and an exact grade label. Both are optional and are passed
/// through verbatim as query parameters.
pub fn search_students(
    client: &ApiClient,
    min_age: Option<&str>,
    grade: Option<&str>,
) -> Result<Vec<Student>, ApiError> {
    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some(min_age) = min_age {
        params.push(("minAge", min_age));
    }
    if let Some(grade) = grade {
        params.push(("grade", grade));
    }
    client.get_json("/students", &params)
}

/// Fetch a single student, used to populate the edit form.
pub fn fetch_student(client: &ApiClient, id: &str) -> Result<Student, ApiError> {
    client.get_json(&format!("/students/{id}"), &[])
}

/// Create a student. The server echoes the stored representation back so the
/// caller could use it without re-querying.
pub fn create_student(client: &ApiClient, draft: &StudentDraft) -> Result<Student, ApiError> {
    client.post_json("/students", draft)
}

/// Replace the editable fields of an existing student.
pub fn update_student(
    client: &ApiClient,
    id: &str,
    draft: &StudentDraft,
) -> Result<Student, ApiError> {
    client.put_json(&format!("/students/{id}"), draft)
}

/// Remove a student. Whether the backend also cleans up enrollments that
/// reference the student is its own concern; the client issues exactly this
/// one request.
pub fn delete_student(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/students/{id}"))
}
