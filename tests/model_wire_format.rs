use campus_admin::models::{
    Course, Enrollment, EnrollmentDraft, EnrollmentStatus, Student, StudentDraft,
};
use serde_json::json;

#[test]
fn student_records_decode_the_underscore_id_field() {
    let value = json!(
        {"_id": "s1", "name": "Ada Lovelace", "email": "ada@example.com", "age": 21, "grade": "A"}
    );
    let student: Student = serde_json::from_value(value).expect("decode student");
    assert_eq!(student.id, "s1");
    assert_eq!(student.age, 21);
    assert_eq!(student.select_label(), "Ada Lovelace - ada@example.com");
}

#[test]
fn enrollment_list_items_decode_embedded_references() {
    let value = json!({
        "_id": "e1",
        "studentId": {
            "_id": "s1", "name": "Ada Lovelace", "email": "ada@example.com", "age": 21, "grade": "A"
        },
        "courseId": {
            "_id": "c1", "title": "Intro to CS", "code": "CS101", "credits": 3, "description": "Basics"
        },
        "status": "completed",
        "enrollmentDate": "2026-01-15T09:30:00Z"
    });
    let enrollment: Enrollment = serde_json::from_value(value).expect("decode enrollment");
    assert_eq!(enrollment.id, "e1");
    assert_eq!(enrollment.student.name, "Ada Lovelace");
    assert_eq!(enrollment.course.code, "CS101");
    assert_eq!(enrollment.status, EnrollmentStatus::Completed);
    assert_eq!(
        enrollment.enrolled_at.to_rfc3339(),
        "2026-01-15T09:30:00+00:00"
    );
}

#[test]
fn enrollment_status_serializes_lowercase_and_parses_back() {
    for status in EnrollmentStatus::ALL {
        let encoded = serde_json::to_value(status).expect("encode status");
        assert_eq!(encoded, json!(status.as_str()));
        let parsed: EnrollmentStatus = status.as_str().parse().expect("parse status");
        assert_eq!(parsed, status);
    }
    assert!("enrolled".parse::<EnrollmentStatus>().is_err());
    assert_eq!(EnrollmentStatus::default(), EnrollmentStatus::Active);
}

#[test]
fn status_selector_order_wraps_in_both_directions() {
    assert_eq!(EnrollmentStatus::Active.next(), EnrollmentStatus::Completed);
    assert_eq!(EnrollmentStatus::Dropped.next(), EnrollmentStatus::Active);
    assert_eq!(
        EnrollmentStatus::Active.previous(),
        EnrollmentStatus::Dropped
    );
}

#[test]
fn student_draft_serializes_editable_fields_only() {
    let draft = StudentDraft {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        age: 18,
        grade: "A".to_string(),
    };
    let value = serde_json::to_value(&draft).expect("encode draft");
    assert_eq!(
        value,
        json!({"name": "Ada Lovelace", "email": "ada@example.com", "age": 18, "grade": "A"})
    );
    assert!(value["age"].is_i64());
    assert!(value.get("_id").is_none());
}

#[test]
fn enrollment_draft_serializes_camel_case_reference_ids() {
    let draft = EnrollmentDraft {
        student_id: "s1".to_string(),
        course_id: "c1".to_string(),
        status: EnrollmentStatus::Dropped,
    };
    let value = serde_json::to_value(&draft).expect("encode draft");
    assert_eq!(
        value,
        json!({"studentId": "s1", "courseId": "c1", "status": "dropped"})
    );
}

#[test]
fn course_select_label_uses_code_then_title() {
    let course = Course {
        id: "c1".to_string(),
        title: "Intro to CS".to_string(),
        code: "CS101".to_string(),
        credits: 3,
        description: "Basics".to_string(),
    };
    assert_eq!(course.select_label(), "CS101 - Intro to CS");
}
