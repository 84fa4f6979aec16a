use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{
    Course, CourseDraft, Enrollment, EnrollmentDraft, EnrollmentStatus, Student, StudentDraft,
};

use super::fetch::Ticket;
use super::notify::Notifier;

/// Fields within the student form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    Age,
    Grade,
}

impl Default for StudentField {
    fn default() -> Self {
        StudentField::Name
    }
}

/// Form state for creating or editing a student. Every attribute is held as
/// text; the age field accepts digits only and is parsed when the form is
/// submitted, not while typing.
#[derive(Default, Clone)]
pub struct StudentForm {
    /// Present when editing; the identifier drives create-vs-update.
    pub record_id: Option<String>,
    pub name: String,
    pub email: String,
    pub age: String,
    pub grade: String,
    pub active: StudentField,
    pub error: Option<String>,
    /// Ticket of the record fetch populating an edit form.
    pub loading: Option<Ticket>,
    /// Ticket of an in-flight create or update request.
    pub saving: Option<Ticket>,
}

impl StudentForm {
    /// An empty create-mode form.
    pub fn create() -> Self {
        Self::default()
    }

    /// An edit-mode form. Fields stay empty until the record fetch issued
    /// alongside it resolves through [`StudentForm::populate`].
    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            record_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.record_id.is_some()
    }

    /// Fill the fields from a fetched record, converting the age to display
    /// text.
    pub fn populate(&mut self, student: &Student) {
        self.name = student.name.clone();
        self.email = student.email.clone();
        self.age = student.age.to_string();
        self.grade = student.grade.clone();
        self.loading = None;
    }

    /// Cycle focus across the four fields.
    pub fn toggle_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Email,
            StudentField::Email => StudentField::Age,
            StudentField::Age => StudentField::Grade,
            StudentField::Grade => StudentField::Name,
        };
    }

    /// Append a character to the active field, validating allowed input.
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            StudentField::Name => self.name.push(ch),
            StudentField::Email => self.email.push(ch),
            StudentField::Age => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.age.push(ch);
            }
            StudentField::Grade => self.grade.push(ch),
        }
        true
    }

    pub fn backspace(&mut self) {
        match self.active {
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Email => {
                self.email.pop();
            }
            StudentField::Age => {
                self.age.pop();
            }
            StudentField::Grade => {
                self.grade.pop();
            }
        }
    }

    /// Validate the inputs and build the request body. The age is sent as a
    /// number; the valid range matches what the entry controls advertise.
    pub fn parse_inputs(&self) -> Result<StudentDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Name is required."));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(anyhow!("Email is required."));
        }
        let age_raw = self.age.trim();
        if age_raw.is_empty() {
            return Err(anyhow!("Age is required."));
        }
        let age = age_raw
            .parse::<i64>()
            .context("Age must be a whole number.")?;
        if !(1..=100).contains(&age) {
            return Err(anyhow!("Age must be between 1 and 100."));
        }
        let grade = self.grade.trim();
        if grade.is_empty() {
            return Err(anyhow!("Grade is required."));
        }
        Ok(StudentDraft {
            name: name.to_string(),
            email: email.to_string(),
            age,
            grade: grade.to_string(),
        })
    }

    /// Render a styled line for the modal form.
    pub fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let (value, is_active) = match field {
            StudentField::Name => (&self.name, self.active == StudentField::Name),
            StudentField::Email => (&self.email, self.active == StudentField::Email),
            StudentField::Age => (&self.age, self.active == StudentField::Age),
            StudentField::Grade => (&self.grade, self.active == StudentField::Grade),
        };
        form_line(field_name, value, is_active)
    }

    /// Character count of the requested field, used for cursor placement.
    pub fn value_len(&self, field: StudentField) -> usize {
        match field {
            StudentField::Name => self.name.chars().count(),
            StudentField::Email => self.email.chars().count(),
            StudentField::Age => self.age.chars().count(),
            StudentField::Grade => self.grade.chars().count(),
        }
    }
}

/// Fields within the course form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CourseField {
    Title,
    Code,
    Credits,
    Description,
}

impl Default for CourseField {
    fn default() -> Self {
        CourseField::Title
    }
}

/// Form state for creating or editing a course. Same text-until-submission
/// discipline as [`StudentForm`]; credits accept digits only.
#[derive(Default, Clone)]
pub struct CourseForm {
    pub record_id: Option<String>,
    pub title: String,
    pub code: String,
    pub credits: String,
    pub description: String,
    pub active: CourseField,
    pub error: Option<String>,
    pub loading: Option<Ticket>,
    pub saving: Option<Ticket>,
}

impl CourseForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            record_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.record_id.is_some()
    }

    pub fn populate(&mut self, course: &Course) {
        self.title = course.title.clone();
        self.code = course.code.clone();
        self.credits = course.credits.to_string();
        self.description = course.description.clone();
        self.loading = None;
    }

    pub fn toggle_field(&mut self) {
        self.active = match self.active {
            CourseField::Title => CourseField::Code,
            CourseField::Code => CourseField::Credits,
            CourseField::Credits => CourseField::Description,
            CourseField::Description => CourseField::Title,
        };
    }

    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            CourseField::Title => self.title.push(ch),
            CourseField::Code => self.code.push(ch),
            CourseField::Credits => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.credits.push(ch);
            }
            CourseField::Description => self.description.push(ch),
        }
        true
    }

    pub fn backspace(&mut self) {
        match self.active {
            CourseField::Title => {
                self.title.pop();
            }
            CourseField::Code => {
                self.code.pop();
            }
            CourseField::Credits => {
                self.credits.pop();
            }
            CourseField::Description => {
                self.description.pop();
            }
        }
    }

    pub fn parse_inputs(&self) -> Result<CourseDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Title is required."));
        }
        let code = self.code.trim();
        if code.is_empty() {
            return Err(anyhow!("Code is required."));
        }
        let credits_raw = self.credits.trim();
        if credits_raw.is_empty() {
            return Err(anyhow!("Credits are required."));
        }
        let credits = credits_raw
            .parse::<i64>()
            .context("Credits must be a whole number.")?;
        if !(1..=10).contains(&credits) {
            return Err(anyhow!("Credits must be between 1 and 10."));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(anyhow!("Description is required."));
        }
        Ok(CourseDraft {
            title: title.to_string(),
            code: code.to_string(),
            credits,
            description: description.to_string(),
        })
    }

    pub fn build_line(&self, field_name: &str, field: CourseField) -> Line<'static> {
        let (value, is_active) = match field {
            CourseField::Title => (&self.title, self.active == CourseField::Title),
            CourseField::Code => (&self.code, self.active == CourseField::Code),
            CourseField::Credits => (&self.credits, self.active == CourseField::Credits),
            CourseField::Description => {
                (&self.description, self.active == CourseField::Description)
            }
        };
        form_line(field_name, value, is_active)
    }

    pub fn value_len(&self, field: CourseField) -> usize {
        match field {
            CourseField::Title => self.title.chars().count(),
            CourseField::Code => self.code.chars().count(),
            CourseField::Credits => self.credits.chars().count(),
            CourseField::Description => self.description.chars().count(),
        }
    }
}

/// Fields within the enrollment form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnrollmentField {
    Student,
    Course,
    Status,
}

impl Default for EnrollmentField {
    fn default() -> Self {
        EnrollmentField::Student
    }
}

/// Form state for creating an enrollment. The two reference collections are
/// fetched independently and land in disjoint slots, so their arrival order
/// does not matter. There is no edit path for enrollments.
#[derive(Default)]
pub struct EnrollmentForm {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub student_idx: Option<usize>,
    pub course_idx: Option<usize>,
    pub status: EnrollmentStatus,
    pub active: EnrollmentField,
    pub students_pending: Option<Ticket>,
    pub courses_pending: Option<Ticket>,
    pub saving: Option<Ticket>,
}

impl EnrollmentForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the student selector if `ticket` matches the fetch this form
    /// issued for it.
    pub fn set_students(&mut self, ticket: Ticket, students: Vec<Student>) -> bool {
        if self.students_pending != Some(ticket) {
            return false;
        }
        self.students_pending = None;
        self.students = students;
        true
    }

    pub fn set_courses(&mut self, ticket: Ticket, courses: Vec<Course>) -> bool {
        if self.courses_pending != Some(ticket) {
            return false;
        }
        self.courses_pending = None;
        self.courses = courses;
        true
    }

    pub fn toggle_field(&mut self) {
        self.active = match self.active {
            EnrollmentField::Student => EnrollmentField::Course,
            EnrollmentField::Course => EnrollmentField::Status,
            EnrollmentField::Status => EnrollmentField::Student,
        };
    }

    /// Step the active selector. Selections clamp to the option list; the
    /// status cycles through its three values.
    pub fn move_option(&mut self, offset: isize) {
        match self.active {
            EnrollmentField::Student => {
                Self::step_selection(&mut self.student_idx, self.students.len(), offset);
            }
            EnrollmentField::Course => {
                Self::step_selection(&mut self.course_idx, self.courses.len(), offset);
            }
            EnrollmentField::Status => {
                self.status = if offset >= 0 {
                    self.status.next()
                } else {
                    self.status.previous()
                };
            }
        }
    }

    fn step_selection(slot: &mut Option<usize>, len: usize, offset: isize) {
        if len == 0 {
            return;
        }
        let current = match slot {
            Some(idx) => *idx as isize + offset,
            // First keypress lands on the first option.
            None => 0,
        };
        let clamped = current.clamp(0, len as isize - 1) as usize;
        *slot = Some(clamped);
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.student_idx.and_then(|idx| self.students.get(idx))
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.course_idx.and_then(|idx| self.courses.get(idx))
    }

    /// Validate the selections and build the request body. A missing student
    /// or course short-circuits with a validation notification and no
    /// request is sent.
    pub fn submit(&self, notifier: &mut dyn Notifier) -> Option<EnrollmentDraft> {
        let (student, course) = match (self.selected_student(), self.selected_course()) {
            (Some(student), Some(course)) => (student, course),
            _ => {
                notifier.error("Please select both student and course");
                return None;
            }
        };
        Some(EnrollmentDraft {
            student_id: student.id.clone(),
            course_id: course.id.clone(),
            status: self.status,
        })
    }
}

/// Which resource kind a pending delete targets. Drives both the endpoint
/// and the outcome notifications.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Student,
    Course,
    Enrollment,
}

impl DeleteTarget {
    pub fn noun(&self) -> &'static str {
        match self {
            DeleteTarget::Student => "student",
            DeleteTarget::Course => "course",
            DeleteTarget::Enrollment => "enrollment",
        }
    }
}

/// Confirmation state for a pending delete. The prompt must be answered
/// before the request is issued; the list is only re-fetched after the
/// delete succeeds.
pub struct ConfirmDelete {
    pub id: String,
    pub target: DeleteTarget,
    /// One-line description of the record shown in the dialog.
    pub summary: String,
}

impl ConfirmDelete {
    pub fn student(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            target: DeleteTarget::Student,
            summary: format!("{} ({})", student.name, student.email),
        }
    }

    pub fn course(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            target: DeleteTarget::Course,
            summary: format!("{} ({})", course.title, course.code),
        }
    }

    pub fn enrollment(enrollment: &Enrollment) -> Self {
        Self {
            id: enrollment.id.clone(),
            target: DeleteTarget::Enrollment,
            summary: format!(
                "{} in {}",
                enrollment.student.name, enrollment.course.title
            ),
        }
    }
}

/// Shared rendering for a labelled text field: active fields highlight,
/// empty ones show a required placeholder.
fn form_line(field_name: &str, value: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<required>".to_string()
    } else {
        value.to_string()
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}
