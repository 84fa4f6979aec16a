use campus_admin::models::{Course, Student};
use campus_admin::query::SearchKind;
use campus_admin::ui::screens::{SearchField, SearchResults, SearchScreen};

fn course(title: &str, code: &str) -> Course {
    Course {
        id: format!("c-{code}"),
        title: title.to_string(),
        code: code.to_string(),
        credits: 3,
        description: String::new(),
    }
}

fn student(name: &str, email: &str) -> Student {
    Student {
        id: "s1".to_string(),
        name: name.to_string(),
        email: email.to_string(),
        age: 20,
        grade: "A".to_string(),
    }
}

#[test]
fn empty_query_updates_the_location_but_triggers_no_fetch() {
    let mut screen = SearchScreen::new("");
    screen.filters.kind = SearchKind::Courses;

    assert!(screen.submit().is_none());
    assert_eq!(screen.location(), "query=&type=courses");
    assert!(!screen.searching());
}

#[test]
fn non_empty_query_produces_a_request_and_writes_the_location() {
    let mut screen = SearchScreen::new("");
    screen.filters.query = "cs".to_string();
    screen.filters.kind = SearchKind::Courses;

    let filters = screen.submit().expect("request");
    assert_eq!(filters.query, "cs");
    assert_eq!(screen.location(), "query=cs&type=courses");
}

#[test]
fn submission_is_ignored_while_a_search_is_in_flight() {
    let mut screen = SearchScreen::new("");
    screen.filters.query = "cs".to_string();

    let filters = screen.submit().expect("request");
    screen.begin_search(1, filters);
    assert!(screen.searching());
    assert!(screen.submit().is_none());
}

#[test]
fn switching_kind_hides_but_does_not_erase_refinements() {
    let mut screen = SearchScreen::new("");
    screen.filters.min_age = "18".to_string();
    screen.filters.grade = "A".to_string();

    screen.toggle_kind();
    assert_eq!(screen.filters.kind, SearchKind::Courses);
    assert_eq!(screen.filters.min_age, "18");
    assert_eq!(screen.filters.grade, "A");

    screen.toggle_kind();
    assert_eq!(screen.filters.kind, SearchKind::Students);
    assert_eq!(screen.filters.min_age, "18");
}

#[test]
fn field_cycle_skips_refinements_for_course_searches() {
    let mut screen = SearchScreen::new("");
    screen.filters.kind = SearchKind::Courses;
    assert_eq!(screen.active(), SearchField::Query);
    screen.next_field();
    assert_eq!(screen.active(), SearchField::Kind);
    screen.next_field();
    assert_eq!(screen.active(), SearchField::Query);

    screen.filters.kind = SearchKind::Students;
    screen.next_field();
    screen.next_field();
    assert_eq!(screen.active(), SearchField::MinAge);
}

#[test]
fn resolved_courses_are_filtered_by_title_or_code_substring() {
    let mut screen = SearchScreen::new("");
    screen.filters.query = "cs".to_string();
    screen.filters.kind = SearchKind::Courses;

    let filters = screen.submit().expect("request");
    screen.begin_search(1, filters);
    assert!(screen.resolve_courses(
        1,
        vec![course("CS101", "CS-101"), course("Biology", "BIO1")]
    ));

    match screen.results() {
        SearchResults::Courses(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].title, "CS101");
        }
        SearchResults::Students(_) => panic!("expected course results"),
    }
    assert_eq!(screen.headline(), "Found 1 results");
}

#[test]
fn resolved_students_are_filtered_by_name_or_email() {
    let mut screen = SearchScreen::new("");
    screen.filters.query = "ada".to_string();

    let filters = screen.submit().expect("request");
    screen.begin_search(1, filters);
    screen.resolve_students(
        1,
        vec![
            student("Ada Lovelace", "ada@example.com"),
            student("Alan Turing", "alan@example.com"),
        ],
    );

    match screen.results() {
        SearchResults::Students(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].name, "Ada Lovelace");
        }
        SearchResults::Courses(_) => panic!("expected student results"),
    }
}

#[test]
fn stale_search_results_are_dropped() {
    let mut screen = SearchScreen::new("");
    screen.filters.query = "cs".to_string();
    screen.filters.kind = SearchKind::Courses;

    let first = screen.submit().expect("request");
    screen.begin_search(1, first);
    // A second submission supersedes the first ticket.
    let second = screen.filters.clone();
    screen.begin_search(2, second);

    assert!(!screen.resolve_courses(1, vec![course("Stale", "OLD1")]));
    assert!(screen.resolve_courses(2, vec![course("CS101", "CS-101")]));
    assert_eq!(screen.results().len(), 1);
}

#[test]
fn entry_filters_come_from_the_stored_location() {
    let screen = SearchScreen::new("query=ada&type=students&minAge=18");
    let filters = screen.entry_filters().expect("entry filters");
    assert_eq!(filters.query, "ada");
    assert_eq!(filters.min_age, "18");

    assert!(SearchScreen::new("").entry_filters().is_none());
    assert!(SearchScreen::new("type=courses").entry_filters().is_none());
}

#[test]
fn headline_reports_no_results_before_anything_matches() {
    let screen = SearchScreen::new("");
    assert_eq!(screen.headline(), "No results");
}
