use campus_admin::models::{Course, EnrollmentStatus, Student};
use campus_admin::ui::forms::{CourseField, CourseForm, EnrollmentForm, StudentField, StudentForm};
use campus_admin::ui::notify::Notifier;

#[derive(Default)]
struct RecordingNotifier {
    successes: Vec<String>,
    errors: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn student(id: &str, name: &str, email: &str, age: i64, grade: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        age,
        grade: grade.to_string(),
    }
}

fn course(id: &str, title: &str, code: &str, credits: i64) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        code: code.to_string(),
        credits,
        description: "Basics".to_string(),
    }
}

#[test]
fn create_mode_submission_parses_age_text_into_a_number() {
    let mut form = StudentForm::create();
    form.name = "Ada Lovelace".to_string();
    form.email = "ada@example.com".to_string();
    form.age = "18".to_string();
    form.grade = "A".to_string();

    let draft = form.parse_inputs().expect("valid form");
    assert_eq!(draft.age, 18);
    assert_eq!(draft.name, "Ada Lovelace");
}

#[test]
fn age_field_accepts_digits_only() {
    let mut form = StudentForm::create();
    form.active = StudentField::Age;
    assert!(!form.push_char('x'));
    assert!(form.push_char('1'));
    assert!(form.push_char('8'));
    assert_eq!(form.age, "18");
}

#[test]
fn edit_mode_displays_the_fetched_age_as_text_and_round_trips_it() {
    let mut form = StudentForm::edit("s1");
    assert!(form.is_edit());
    form.populate(&student("s1", "Ada Lovelace", "ada@example.com", 21, "A"));

    assert_eq!(form.age, "21");
    let draft = form.parse_inputs().expect("valid form");
    assert_eq!(draft.age, 21);
}

#[test]
fn missing_required_student_fields_are_rejected() {
    let mut form = StudentForm::create();
    form.email = "ada@example.com".to_string();
    form.age = "18".to_string();
    form.grade = "A".to_string();
    let err = form.parse_inputs().expect_err("name missing");
    assert_eq!(err.to_string(), "Name is required.");

    form.name = "Ada Lovelace".to_string();
    form.grade = String::new();
    let err = form.parse_inputs().expect_err("grade missing");
    assert_eq!(err.to_string(), "Grade is required.");
}

#[test]
fn student_age_must_stay_within_range() {
    let mut form = StudentForm::create();
    form.name = "Ada Lovelace".to_string();
    form.email = "ada@example.com".to_string();
    form.grade = "A".to_string();

    form.age = "0".to_string();
    assert!(form.parse_inputs().is_err());

    form.age = "101".to_string();
    assert!(form.parse_inputs().is_err());

    form.age = "100".to_string();
    assert!(form.parse_inputs().is_ok());
}

#[test]
fn course_credits_must_stay_within_range() {
    let mut form = CourseForm::create();
    form.title = "Intro to CS".to_string();
    form.code = "CS101".to_string();
    form.description = "Basics".to_string();

    form.credits = "11".to_string();
    let err = form.parse_inputs().expect_err("credits out of range");
    assert_eq!(err.to_string(), "Credits must be between 1 and 10.");

    form.credits = "3".to_string();
    let draft = form.parse_inputs().expect("valid form");
    assert_eq!(draft.credits, 3);
}

#[test]
fn course_form_field_cycle_covers_all_fields() {
    let mut form = CourseForm::create();
    assert_eq!(form.active, CourseField::Title);
    form.toggle_field();
    assert_eq!(form.active, CourseField::Code);
    form.toggle_field();
    form.toggle_field();
    form.toggle_field();
    assert_eq!(form.active, CourseField::Title);
}

#[test]
fn enrollment_submission_without_a_course_sends_nothing_and_notifies() {
    let mut form = EnrollmentForm::new();
    form.students_pending = Some(1);
    form.set_students(
        1,
        vec![student("s1", "Ada Lovelace", "ada@example.com", 21, "A")],
    );
    form.student_idx = Some(0);

    let mut notifier = RecordingNotifier::default();
    assert!(form.submit(&mut notifier).is_none());
    assert_eq!(notifier.errors, vec!["Please select both student and course"]);
    assert!(notifier.successes.is_empty());
}

#[test]
fn enrollment_submission_with_both_selections_builds_the_draft() {
    let mut form = EnrollmentForm::new();
    form.students_pending = Some(1);
    form.courses_pending = Some(2);
    form.set_students(
        1,
        vec![student("s1", "Ada Lovelace", "ada@example.com", 21, "A")],
    );
    form.set_courses(2, vec![course("c1", "Intro to CS", "CS101", 3)]);
    form.student_idx = Some(0);
    form.course_idx = Some(0);

    let mut notifier = RecordingNotifier::default();
    let draft = form.submit(&mut notifier).expect("draft");
    assert_eq!(draft.student_id, "s1");
    assert_eq!(draft.course_id, "c1");
    assert_eq!(draft.status, EnrollmentStatus::Active);
    assert!(notifier.errors.is_empty());
}

#[test]
fn reference_slots_ignore_stale_tickets() {
    let mut form = EnrollmentForm::new();
    form.students_pending = Some(2);
    assert!(!form.set_students(
        1,
        vec![student("s1", "Ada Lovelace", "ada@example.com", 21, "A")]
    ));
    assert!(form.students.is_empty());
    assert!(form.set_students(
        2,
        vec![student("s1", "Ada Lovelace", "ada@example.com", 21, "A")]
    ));
    assert_eq!(form.students.len(), 1);
}

#[test]
fn first_keypress_selects_the_first_option() {
    let mut form = EnrollmentForm::new();
    form.students_pending = Some(1);
    form.set_students(
        1,
        vec![
            student("s1", "Ada Lovelace", "ada@example.com", 21, "A"),
            student("s2", "Alan Turing", "alan@example.com", 24, "B"),
        ],
    );

    assert!(form.selected_student().is_none());
    form.move_option(1);
    assert_eq!(form.selected_student().map(|s| s.id.as_str()), Some("s1"));
    form.move_option(1);
    assert_eq!(form.selected_student().map(|s| s.id.as_str()), Some("s2"));
    // Clamped at the end of the list.
    form.move_option(1);
    assert_eq!(form.selected_student().map(|s| s.id.as_str()), Some("s2"));
}
