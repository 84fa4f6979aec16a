use crate::models::{Enrollment, EnrollmentDraft};

use super::client::{ApiClient, ApiError};

/// Retrieve every enrollment. The response embeds the full student and
/// course objects in place of bare identifiers.
pub fn fetch_enrollments(client: &ApiClient) -> Result<Vec<Enrollment>, ApiError> {
    client.get_json("/enrollments", &[])
}

/// Create an enrollment from bare student/course identifiers. There is no
/// update path for enrollments; records are created and deleted only. The
/// response body is not decoded into an [`Enrollment`]: only the list
/// endpoint populates the embedded references, and callers re-fetch the
/// list after creating anyway.
pub fn create_enrollment(client: &ApiClient, draft: &EnrollmentDraft) -> Result<(), ApiError> {
    client
        .post_json::<_, serde_json::Value>("/enrollments", draft)
        .map(|_| ())
}

/// Remove an enrollment.
pub fn delete_enrollment(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/enrollments/{id}"))
}
