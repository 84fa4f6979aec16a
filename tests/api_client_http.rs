
use std::net::TcpListener;

use campus_admin::api::{self, ApiClient, ApiError};
use campus_admin::models::{CourseDraft, EnrollmentDraft, EnrollmentStatus, StudentDraft};
use serde_json::{json, Value};
use test_support::{spawn_stub, StubResponse};

#[test]
fn fetch_students_issues_get_and_decodes_the_collection() {
    let students = json!([
        {"_id": "s1", "name": "Ada Lovelace", "email": "ada@example.com", "age": 21, "grade": "A"},
        {"_id": "s2", "name": "Alan Turing", "email": "alan@example.com", "age": 24, "grade": "B"},
    ]);
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::ok(students.to_string())]);
    let client = ApiClient::new(base_url).expect("client");

    let fetched = api::fetch_students(&client).expect("fetch students");

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].id, "s1");
    assert_eq!(fetched[0].age, 21);

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/students");
    handle.join().unwrap();
}

#[test]
fn search_students_passes_refinements_as_query_parameters() {
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::ok("[]")]);
    let client = ApiClient::new(base_url).expect("client");

    api::search_students(&client, Some("18"), Some("A")).expect("search students");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/students?minAge=18&grade=A");
    handle.join().unwrap();
}

#[test]
fn search_students_omits_unset_refinements() {
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::ok("[]")]);
    let client = ApiClient::new(base_url).expect("client");

    api::search_students(&client, None, None).expect("search students");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.target, "/api/students");
    handle.join().unwrap();
}

#[test]
fn create_student_sends_age_as_a_json_number() {
    let echoed = json!(
        {"_id": "s9", "name": "Ada Lovelace", "email": "ada@example.com", "age": 18, "grade": "A"}
    );
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::ok(echoed.to_string())]);
    let client = ApiClient::new(base_url).expect("client");

    let draft = StudentDraft {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        age: 18,
        grade: "A".to_string(),
    };
    let created = api::create_student(&client, &draft).expect("create student");
    assert_eq!(created.id, "s9");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/students");
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert!(body["age"].is_i64(), "age must be a number, not a string");
    assert_eq!(body["age"], json!(18));
    handle.join().unwrap();
}

#[test]
fn update_course_puts_to_the_record_path() {
    let echoed = json!(
        {"_id": "c1", "title": "Intro to CS", "code": "CS101", "credits": 4, "description": "Basics"}
    );
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::ok(echoed.to_string())]);
    let client = ApiClient::new(base_url).expect("client");

    let draft = CourseDraft {
        title: "Intro to CS".to_string(),
        code: "CS101".to_string(),
        credits: 4,
        description: "Basics".to_string(),
    };
    api::update_course(&client, "c1", &draft).expect("update course");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "PUT");
    assert_eq!(request.target, "/api/courses/c1");
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(body["credits"], json!(4));
    handle.join().unwrap();
}

#[test]
fn delete_student_issues_delete_and_tolerates_an_empty_body() {
    let (base_url, requests, handle) = spawn_stub(vec![StubResponse::status("204 No Content")]);
    let client = ApiClient::new(base_url).expect("client");

    api::delete_student(&client, "s1").expect("delete student");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.target, "/api/students/s1");
    handle.join().unwrap();
}

#[test]
fn create_enrollment_posts_bare_reference_ids() {
    let (base_url, requests, handle) =
        spawn_stub(vec![StubResponse::ok(json!({"_id": "e1"}).to_string())]);
    let client = ApiClient::new(base_url).expect("client");

    let draft = EnrollmentDraft {
        student_id: "s1".to_string(),
        course_id: "c1".to_string(),
        status: EnrollmentStatus::Active,
    };
    api::create_enrollment(&client, &draft).expect("create enrollment");

    let request = requests.recv().expect("recorded request");
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/enrollments");
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(
        body,
        json!({"studentId": "s1", "courseId": "c1", "status": "active"})
    );
    handle.join().unwrap();
}

#[test]
fn non_success_status_maps_to_the_status_variant() {
    let (base_url, _requests, handle) = spawn_stub(vec![StubResponse {
        status: "500 Internal Server Error",
        body: "{}".to_string(),
    }]);
    let client = ApiClient::new(base_url).expect("client");

    let err = api::fetch_courses(&client).expect_err("should fail");
    assert!(matches!(err, ApiError::Status { .. }), "got {err:?}");
    handle.join().unwrap();
}

#[test]
fn malformed_body_maps_to_the_decode_variant() {
    let (base_url, _requests, handle) = spawn_stub(vec![StubResponse::ok("not json")]);
    let client = ApiClient::new(base_url).expect("client");

    let err = api::fetch_students(&client).expect_err("should fail");
    assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    handle.join().unwrap();
}

#[test]
fn unreachable_server_maps_to_the_transport_variant() {
    // Bind and immediately drop so nothing is listening on the port.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}/api")).expect("client");
    let err = api::fetch_students(&client).expect_err("should fail");
    assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
}
