use campus_admin::models::{Course, Student};
use campus_admin::query::{SearchFilters, SearchKind};

fn student(name: &str, email: &str) -> Student {
    Student {
        id: "s1".to_string(),
        name: name.to_string(),
        email: email.to_string(),
        age: 20,
        grade: "A".to_string(),
    }
}

fn course(title: &str, code: &str) -> Course {
    Course {
        id: "c1".to_string(),
        title: title.to_string(),
        code: code.to_string(),
        credits: 3,
        description: String::new(),
    }
}

#[test]
fn query_and_type_are_always_serialized_and_empty_refinements_dropped() {
    let filters = SearchFilters {
        query: "cs".to_string(),
        kind: SearchKind::Courses,
        min_age: String::new(),
        grade: String::new(),
    };
    assert_eq!(filters.to_query_string(), "query=cs&type=courses");
}

#[test]
fn refinements_serialize_when_present_and_round_trip() {
    let filters = SearchFilters {
        query: "ada".to_string(),
        kind: SearchKind::Students,
        min_age: "18".to_string(),
        grade: "A".to_string(),
    };
    let encoded = filters.to_query_string();
    assert_eq!(encoded, "query=ada&type=students&minAge=18&grade=A");
    assert_eq!(SearchFilters::from_query_string(&encoded), filters);
}

#[test]
fn values_are_percent_encoded_and_decoded() {
    let filters = SearchFilters {
        query: "mary jane".to_string(),
        kind: SearchKind::Students,
        min_age: String::new(),
        grade: String::new(),
    };
    let encoded = filters.to_query_string();
    assert_eq!(encoded, "query=mary%20jane&type=students");
    assert_eq!(SearchFilters::from_query_string(&encoded), filters);
}

#[test]
fn plus_decodes_to_a_space() {
    let filters = SearchFilters::from_query_string("query=mary+jane&type=students");
    assert_eq!(filters.query, "mary jane");
}

#[test]
fn unknown_keys_and_invalid_kind_fall_back_to_defaults() {
    let filters = SearchFilters::from_query_string("?query=cs&type=teachers&color=blue");
    assert_eq!(filters.query, "cs");
    assert_eq!(filters.kind, SearchKind::Students);
    assert!(filters.min_age.is_empty());
}

#[test]
fn refinements_apply_only_to_student_searches() {
    let mut filters = SearchFilters {
        query: "x".to_string(),
        kind: SearchKind::Students,
        min_age: "18".to_string(),
        grade: "A".to_string(),
    };
    assert_eq!(filters.refinements(), (Some("18"), Some("A")));

    filters.kind = SearchKind::Courses;
    assert_eq!(filters.refinements(), (None, None));
}

#[test]
fn course_match_is_case_insensitive_over_title_or_code() {
    let filters = SearchFilters {
        query: "cs".to_string(),
        kind: SearchKind::Courses,
        min_age: String::new(),
        grade: String::new(),
    };
    assert!(filters.matches_course(&course("CS101", "CS-101")));
    assert!(!filters.matches_course(&course("Biology", "BIO1")));
}

#[test]
fn student_match_checks_name_or_email() {
    let filters = SearchFilters {
        query: "LOVE".to_string(),
        kind: SearchKind::Students,
        min_age: String::new(),
        grade: String::new(),
    };
    assert!(filters.matches_student(&student("Ada Lovelace", "ada@example.com")));
    assert!(filters.matches_student(&student("Ada", "lovelace@example.com")));
    assert!(!filters.matches_student(&student("Alan Turing", "alan@example.com")));
}
