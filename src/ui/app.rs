use std::cmp::min;
use std::mem;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::api::{self, ApiClient};
use crate::models::{Course, Enrollment, Student};
use crate::query::{SearchFilters, SearchKind};

use super::fetch::{FetchEnvelope, FetchPayload, Fetcher, Ticket};
use super::forms::{
    ConfirmDelete, CourseField, CourseForm, DeleteTarget, EnrollmentField, EnrollmentForm,
    StudentField, StudentForm,
};
use super::helpers::{centered_rect, status_style, surface_error};
use super::notify::StatusLine;
use super::screens::{ListScreen, SearchField, SearchResults, SearchScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per summary card in the student and course lists.
const CARD_HEIGHT: u16 = 5;
/// Enrollment cards carry one extra line for the enrollment date.
const ENROLLMENT_CARD_HEIGHT: u16 = 6;

/// High-level navigation states, one per screen. Replacing the screen drops
/// its pending tickets, which is how navigating away cancels outstanding
/// requests.
enum Screen {
    Students(ListScreen<Student>),
    Courses(ListScreen<Course>),
    Enrollments(ListScreen<Enrollment>),
    Search(SearchScreen),
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    StudentForm(StudentForm),
    CourseForm(CourseForm),
    EnrollmentForm(EnrollmentForm),
    ConfirmDelete(ConfirmDelete),
}

/// A confirmed delete awaiting its response.
#[derive(Copy, Clone)]
struct DeleteAction {
    ticket: Ticket,
    target: DeleteTarget,
}

/// Central application state shared across the TUI.
pub struct App {
    fetcher: Fetcher,
    envelopes: Receiver<FetchEnvelope>,
    screen: Screen,
    mode: Mode,
    status: StatusLine,
    delete_pending: Option<DeleteAction>,
    /// Last submitted search location; restored when the search screen is
    /// reopened, the way a browser would restore it from the URL.
    search_location: String,
}

impl App {
    /// Build the app with the prefetched student collection as the entry
    /// screen. That one screen never shows a loading state on first render.
    pub fn new(client: Arc<ApiClient>, students: Vec<Student>) -> Self {
        let (fetcher, envelopes) = Fetcher::new(client);
        Self {
            fetcher,
            envelopes,
            screen: Screen::Students(ListScreen::prefetched(students)),
            mode: Mode::Normal,
            status: StatusLine::default(),
            delete_pending: None,
            search_location: String::new(),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::StudentForm(form) => self.handle_student_form(code, form)?,
            Mode::CourseForm(form) => self.handle_course_form(code, form)?,
            Mode::EnrollmentForm(form) => self.handle_enrollment_form(code, form)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match &mut self.screen {
            Screen::Students(list) => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-5),
                    KeyCode::PageDown => list.move_selection(5),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Char('+') => {
                        self.status.clear();
                        return Ok(Mode::StudentForm(StudentForm::create()));
                    }
                    KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                        if let Some(student) = list.current().cloned() {
                            self.status.clear();
                            let id = student.id.clone();
                            let ticket = self.fetcher.spawn(move |client| {
                                Ok(FetchPayload::StudentRecord(api::fetch_student(
                                    client, &id,
                                )?))
                            });
                            let mut form = StudentForm::edit(student.id);
                            form.loading = Some(ticket);
                            return Ok(Mode::StudentForm(form));
                        }
                        self.status.error("No student selected to edit");
                    }
                    KeyCode::Char('-') => {
                        if let Some(student) = list.current() {
                            let confirm = ConfirmDelete::student(student);
                            self.status.clear();
                            return Ok(Mode::ConfirmDelete(confirm));
                        }
                        self.status.error("No student selected to delete");
                    }
                    KeyCode::Char('2') => {
                        self.status.clear();
                        self.open_courses();
                    }
                    KeyCode::Char('3') => {
                        self.status.clear();
                        self.open_enrollments();
                    }
                    KeyCode::Char('4') | KeyCode::Char('f') => {
                        self.status.clear();
                        self.open_search();
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Courses(list) => {
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => {
                        self.status.clear();
                        self.open_students();
                    }
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-5),
                    KeyCode::PageDown => list.move_selection(5),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Char('+') => {
                        self.status.clear();
                        return Ok(Mode::CourseForm(CourseForm::create()));
                    }
                    KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                        if let Some(course) = list.current().cloned() {
                            self.status.clear();
                            let id = course.id.clone();
                            let ticket = self.fetcher.spawn(move |client| {
                                Ok(FetchPayload::CourseRecord(api::fetch_course(client, &id)?))
                            });
                            let mut form = CourseForm::edit(course.id);
                            form.loading = Some(ticket);
                            return Ok(Mode::CourseForm(form));
                        }
                        self.status.error("No course selected to edit");
                    }
                    KeyCode::Char('-') => {
                        if let Some(course) = list.current() {
                            let confirm = ConfirmDelete::course(course);
                            self.status.clear();
                            return Ok(Mode::ConfirmDelete(confirm));
                        }
                        self.status.error("No course selected to delete");
                    }
                    KeyCode::Char('1') => {
                        self.status.clear();
                        self.open_students();
                    }
                    KeyCode::Char('3') => {
                        self.status.clear();
                        self.open_enrollments();
                    }
                    KeyCode::Char('4') | KeyCode::Char('f') => {
                        self.status.clear();
                        self.open_search();
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Enrollments(list) => {
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => {
                        self.status.clear();
                        self.open_students();
                    }
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-5),
                    KeyCode::PageDown => list.move_selection(5),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Char('+') => {
                        self.status.clear();
                        let mut form = EnrollmentForm::new();
                        form.students_pending = Some(self.fetcher.spawn(|client| {
                            Ok(FetchPayload::ReferenceStudents(api::fetch_students(client)?))
                        }));
                        form.courses_pending = Some(self.fetcher.spawn(|client| {
                            Ok(FetchPayload::ReferenceCourses(api::fetch_courses(client)?))
                        }));
                        return Ok(Mode::EnrollmentForm(form));
                    }
                    KeyCode::Char('-') => {
                        if let Some(enrollment) = list.current() {
                            let confirm = ConfirmDelete::enrollment(enrollment);
                            self.status.clear();
                            return Ok(Mode::ConfirmDelete(confirm));
                        }
                        self.status.error("No enrollment selected to delete");
                    }
                    KeyCode::Char('1') => {
                        self.status.clear();
                        self.open_students();
                    }
                    KeyCode::Char('2') => {
                        self.status.clear();
                        self.open_courses();
                    }
                    KeyCode::Char('4') | KeyCode::Char('f') => {
                        self.status.clear();
                        self.open_search();
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Search(search) => {
                match code {
                    KeyCode::Esc => {
                        self.status.clear();
                        self.open_students();
                    }
                    KeyCode::Tab | KeyCode::BackTab => search.next_field(),
                    KeyCode::Up => search.move_selection(-1),
                    KeyCode::Down => search.move_selection(1),
                    KeyCode::PageUp => search.move_selection(-5),
                    KeyCode::PageDown => search.move_selection(5),
                    KeyCode::Left | KeyCode::Right
                        if search.active() == SearchField::Kind =>
                    {
                        search.toggle_kind();
                    }
                    KeyCode::Char(' ') if search.active() == SearchField::Kind => {
                        search.toggle_kind();
                    }
                    KeyCode::Enter => {
                        if let Some(filters) = search.submit() {
                            let ticket = Self::spawn_search(&mut self.fetcher, &filters);
                            search.begin_search(ticket, filters);
                        }
                    }
                    KeyCode::Backspace => search.backspace(),
                    KeyCode::Char(ch) => {
                        search.push_char(ch);
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_student_form(&mut self, code: KeyCode, mut form: StudentForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                let message = if form.is_edit() {
                    "Edit cancelled."
                } else {
                    "Add cancelled."
                };
                self.status.success(message);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if form.saving.is_none() {
                    match form.parse_inputs() {
                        Ok(draft) => {
                            let id = form.record_id.clone();
                            let ticket = self.fetcher.spawn(move |client| {
                                match &id {
                                    Some(id) => {
                                        api::update_student(client, id, &draft)?;
                                    }
                                    None => {
                                        api::create_student(client, &draft)?;
                                    }
                                }
                                Ok(FetchPayload::StudentSaved)
                            });
                            form.saving = Some(ticket);
                        }
                        Err(err) => {
                            let message = surface_error(&err);
                            form.error = Some(message.clone());
                            self.status.error(&message);
                        }
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::StudentForm(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_course_form(&mut self, code: KeyCode, mut form: CourseForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                let message = if form.is_edit() {
                    "Edit cancelled."
                } else {
                    "Add cancelled."
                };
                self.status.success(message);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if form.saving.is_none() {
                    match form.parse_inputs() {
                        Ok(draft) => {
                            let id = form.record_id.clone();
                            let ticket = self.fetcher.spawn(move |client| {
                                match &id {
                                    Some(id) => {
                                        api::update_course(client, id, &draft)?;
                                    }
                                    None => {
                                        api::create_course(client, &draft)?;
                                    }
                                }
                                Ok(FetchPayload::CourseSaved)
                            });
                            form.saving = Some(ticket);
                        }
                        Err(err) => {
                            let message = surface_error(&err);
                            form.error = Some(message.clone());
                            self.status.error(&message);
                        }
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::CourseForm(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_enrollment_form(
        &mut self,
        code: KeyCode,
        mut form: EnrollmentForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.status.success("Add cancelled.");
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Up => form.move_option(-1),
            KeyCode::Down => form.move_option(1),
            KeyCode::Enter => {
                if form.saving.is_none() {
                    if let Some(draft) = form.submit(&mut self.status) {
                        let ticket = self.fetcher.spawn(move |client| {
                            api::create_enrollment(client, &draft)?;
                            Ok(FetchPayload::EnrollmentSaved)
                        });
                        form.saving = Some(ticket);
                    }
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EnrollmentForm(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.status.success("Deletion cancelled.");
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let id = confirm.id.clone();
                let target = confirm.target;
                let ticket = self.fetcher.spawn(move |client| {
                    match target {
                        DeleteTarget::Student => api::delete_student(client, &id)?,
                        DeleteTarget::Course => api::delete_course(client, &id)?,
                        DeleteTarget::Enrollment => api::delete_enrollment(client, &id)?,
                    }
                    Ok(FetchPayload::RecordDeleted)
                });
                self.delete_pending = Some(DeleteAction { ticket, target });
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Route every envelope the background threads have delivered since the
    /// last tick. Called from the event loop before each draw.
    pub(crate) fn drain_envelopes(&mut self) {
        while let Ok(envelope) = self.envelopes.try_recv() {
            self.apply_envelope(envelope);
        }
    }

    /// Deliver one completed request to whichever state slot still expects
    /// its ticket. An envelope no slot expects belongs to a view that has
    /// been navigated away from; it is dropped so it can never write stale
    /// state.
    fn apply_envelope(&mut self, envelope: FetchEnvelope) {
        let FetchEnvelope { ticket, payload } = envelope;

        if let Some(action) = self.delete_pending {
            if action.ticket == ticket {
                self.delete_pending = None;
                match payload {
                    Ok(_) => {
                        let message = match action.target {
                            DeleteTarget::Student => "Student deleted successfully",
                            DeleteTarget::Course => "Course deleted successfully",
                            DeleteTarget::Enrollment => "Enrollment deleted successfully",
                        };
                        self.status.success(message);
                        self.refresh_current_list();
                    }
                    Err(err) => {
                        warn!(error = %err, "delete request failed");
                        let message = match action.target {
                            DeleteTarget::Student => "Failed to delete student",
                            DeleteTarget::Course => "Failed to delete course",
                            DeleteTarget::Enrollment => "Failed to delete enrollment",
                        };
                        self.status.error(message);
                    }
                }
                return;
            }
        }

        match &mut self.screen {
            Screen::Students(list) if list.pending() == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::StudentList(records)) => {
                        list.resolve(ticket, records);
                    }
                    Ok(_) => debug!(ticket, "mismatched payload for student list"),
                    Err(err) => {
                        warn!(error = %err, "student list fetch failed");
                        list.fail(ticket);
                        self.status.error("Failed to load students");
                    }
                }
                return;
            }
            Screen::Courses(list) if list.pending() == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::CourseList(records)) => {
                        list.resolve(ticket, records);
                    }
                    Ok(_) => debug!(ticket, "mismatched payload for course list"),
                    Err(err) => {
                        warn!(error = %err, "course list fetch failed");
                        list.fail(ticket);
                        self.status.error("Failed to load courses");
                    }
                }
                return;
            }
            Screen::Enrollments(list) if list.pending() == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::EnrollmentList(records)) => {
                        list.resolve(ticket, records);
                    }
                    Ok(_) => debug!(ticket, "mismatched payload for enrollment list"),
                    Err(err) => {
                        warn!(error = %err, "enrollment list fetch failed");
                        list.fail(ticket);
                        self.status.error("Failed to load enrollments");
                    }
                }
                return;
            }
            Screen::Search(search) if search.pending() == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::SearchStudents(records)) => {
                        search.resolve_students(ticket, records);
                    }
                    Ok(FetchPayload::SearchCourses(records)) => {
                        search.resolve_courses(ticket, records);
                    }
                    Ok(_) => debug!(ticket, "mismatched payload for search"),
                    Err(err) => {
                        warn!(error = %err, "search fetch failed");
                        search.fail(ticket);
                        self.status.error("Search failed");
                    }
                }
                return;
            }
            _ => {}
        }

        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::StudentForm(mut form) if form.loading == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::StudentRecord(student)) => form.populate(&student),
                    Ok(_) => {
                        form.loading = None;
                        debug!(ticket, "mismatched payload for student form");
                    }
                    Err(err) => {
                        warn!(error = %err, "student record fetch failed");
                        form.loading = None;
                        self.status.error("Failed to load student data");
                    }
                }
                Mode::StudentForm(form)
            }
            Mode::StudentForm(mut form) if form.saving == Some(ticket) => match payload {
                Ok(_) => {
                    let message = if form.is_edit() {
                        "Student updated successfully"
                    } else {
                        "Student created successfully"
                    };
                    self.status.success(message);
                    self.open_students();
                    Mode::Normal
                }
                Err(err) => {
                    warn!(error = %err, "student save failed");
                    form.saving = None;
                    self.status.error("Failed to save student");
                    Mode::StudentForm(form)
                }
            },
            Mode::CourseForm(mut form) if form.loading == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::CourseRecord(course)) => form.populate(&course),
                    Ok(_) => {
                        form.loading = None;
                        debug!(ticket, "mismatched payload for course form");
                    }
                    Err(err) => {
                        warn!(error = %err, "course record fetch failed");
                        form.loading = None;
                        self.status.error("Failed to load course data");
                    }
                }
                Mode::CourseForm(form)
            }
            Mode::CourseForm(mut form) if form.saving == Some(ticket) => match payload {
                Ok(_) => {
                    let message = if form.is_edit() {
                        "Course updated successfully"
                    } else {
                        "Course created successfully"
                    };
                    self.status.success(message);
                    self.open_courses();
                    Mode::Normal
                }
                Err(err) => {
                    warn!(error = %err, "course save failed");
                    form.saving = None;
                    self.status.error("Failed to save course");
                    Mode::CourseForm(form)
                }
            },
            Mode::EnrollmentForm(mut form) if form.students_pending == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::ReferenceStudents(records)) => {
                        form.set_students(ticket, records);
                    }
                    Ok(_) => {
                        form.students_pending = None;
                        debug!(ticket, "mismatched payload for student options");
                    }
                    Err(err) => {
                        // Logged only; the selector simply stays empty.
                        warn!(error = %err, "student options fetch failed");
                        form.students_pending = None;
                    }
                }
                Mode::EnrollmentForm(form)
            }
            Mode::EnrollmentForm(mut form) if form.courses_pending == Some(ticket) => {
                match payload {
                    Ok(FetchPayload::ReferenceCourses(records)) => {
                        form.set_courses(ticket, records);
                    }
                    Ok(_) => {
                        form.courses_pending = None;
                        debug!(ticket, "mismatched payload for course options");
                    }
                    Err(err) => {
                        warn!(error = %err, "course options fetch failed");
                        form.courses_pending = None;
                    }
                }
                Mode::EnrollmentForm(form)
            }
            Mode::EnrollmentForm(mut form) if form.saving == Some(ticket) => match payload {
                Ok(_) => {
                    self.status.success("Enrollment created successfully");
                    self.open_enrollments();
                    Mode::Normal
                }
                Err(err) => {
                    warn!(error = %err, "enrollment save failed");
                    form.saving = None;
                    self.status.error("Failed to create enrollment");
                    Mode::EnrollmentForm(form)
                }
            },
            other => {
                debug!(ticket, "fetch result no longer expected");
                other
            }
        };
    }

    /// Ctrl-R: re-fetch whatever the current screen shows.
    pub(crate) fn handle_ctrl_r(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) {
            self.refresh_current_list();
        }
        Ok(())
    }

    fn refresh_current_list(&mut self) {
        match &mut self.screen {
            Screen::Students(list) => {
                let ticket = self.fetcher.spawn(|client| {
                    Ok(FetchPayload::StudentList(api::fetch_students(client)?))
                });
                list.begin_refresh(ticket);
            }
            Screen::Courses(list) => {
                let ticket = self
                    .fetcher
                    .spawn(|client| Ok(FetchPayload::CourseList(api::fetch_courses(client)?)));
                list.begin_refresh(ticket);
            }
            Screen::Enrollments(list) => {
                let ticket = self.fetcher.spawn(|client| {
                    Ok(FetchPayload::EnrollmentList(api::fetch_enrollments(client)?))
                });
                list.begin_refresh(ticket);
            }
            Screen::Search(search) => {
                if let Some(filters) = search.entry_filters() {
                    let ticket = Self::spawn_search(&mut self.fetcher, &filters);
                    search.begin_search(ticket, filters);
                }
            }
        }
    }

    fn open_students(&mut self) {
        self.remember_search_location();
        let ticket = self
            .fetcher
            .spawn(|client| Ok(FetchPayload::StudentList(api::fetch_students(client)?)));
        let mut list = ListScreen::new();
        list.begin_refresh(ticket);
        self.screen = Screen::Students(list);
    }

    fn open_courses(&mut self) {
        self.remember_search_location();
        let ticket = self
            .fetcher
            .spawn(|client| Ok(FetchPayload::CourseList(api::fetch_courses(client)?)));
        let mut list = ListScreen::new();
        list.begin_refresh(ticket);
        self.screen = Screen::Courses(list);
    }

    fn open_enrollments(&mut self) {
        self.remember_search_location();
        let ticket = self
            .fetcher
            .spawn(|client| Ok(FetchPayload::EnrollmentList(api::fetch_enrollments(client)?)));
        let mut list = ListScreen::new();
        list.begin_refresh(ticket);
        self.screen = Screen::Enrollments(list);
    }

    fn open_search(&mut self) {
        let mut search = SearchScreen::new(&self.search_location);
        if let Some(filters) = search.entry_filters() {
            let ticket = Self::spawn_search(&mut self.fetcher, &filters);
            search.begin_search(ticket, filters);
        }
        self.screen = Screen::Search(search);
    }

    /// Keep the search location across visits, the way a browser would keep
    /// it in the URL.
    fn remember_search_location(&mut self) {
        if let Screen::Search(search) = &self.screen {
            self.search_location = search.location().to_string();
        }
    }

    fn spawn_search(fetcher: &mut Fetcher, filters: &SearchFilters) -> Ticket {
        let kind = filters.kind;
        let (min_age, grade) = {
            let (min_age, grade) = filters.refinements();
            (min_age.map(str::to_string), grade.map(str::to_string))
        };
        fetcher.spawn(move |client| match kind {
            SearchKind::Students => Ok(FetchPayload::SearchStudents(api::search_students(
                client,
                min_age.as_deref(),
                grade.as_deref(),
            )?)),
            SearchKind::Courses => {
                Ok(FetchPayload::SearchCourses(api::fetch_courses(client)?))
            }
        })
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Students(list) => self.draw_students(frame, content_area, list),
            Screen::Courses(list) => self.draw_courses(frame, content_area, list),
            Screen::Enrollments(list) => self.draw_enrollments(frame, content_area, list),
            Screen::Search(search) => self.draw_search(frame, content_area, search),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::StudentForm(form) => self.draw_student_form(frame, area, form),
            Mode::CourseForm(form) => self.draw_course_form(frame, area, form),
            Mode::EnrollmentForm(form) => self.draw_enrollment_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_students(&self, frame: &mut Frame, area: Rect, list: &ListScreen<Student>) {
        if list.is_loading() {
            render_notice(frame, area, "Students", "Loading students...");
            return;
        }
        if list.records().is_empty() {
            render_notice(
                frame,
                area,
                "Students",
                "No students found. Add your first student to get started!",
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Students", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  •  {} students", list.records().len())),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        render_record_cards(
            frame,
            chunks[1],
            list.records(),
            list.selected(),
            CARD_HEIGHT,
            student_card_lines,
        );
    }

    fn draw_courses(&self, frame: &mut Frame, area: Rect, list: &ListScreen<Course>) {
        if list.is_loading() {
            render_notice(frame, area, "Courses", "Loading courses...");
            return;
        }
        if list.records().is_empty() {
            render_notice(
                frame,
                area,
                "Courses",
                "No courses found. Add your first course to get started!",
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Courses", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  •  {} courses", list.records().len())),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        render_record_cards(
            frame,
            chunks[1],
            list.records(),
            list.selected(),
            CARD_HEIGHT,
            course_card_lines,
        );
    }

    fn draw_enrollments(&self, frame: &mut Frame, area: Rect, list: &ListScreen<Enrollment>) {
        if list.is_loading() {
            render_notice(frame, area, "Enrollments", "Loading enrollments...");
            return;
        }
        if list.records().is_empty() {
            render_notice(
                frame,
                area,
                "Enrollments",
                "No enrollments found. Create the first enrollment to get started!",
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        let header = Paragraph::new(Line::from(vec![
            Span::styled("Enrollments", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  •  {} enrollments", list.records().len())),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        render_record_cards(
            frame,
            chunks[1],
            list.records(),
            list.selected(),
            ENROLLMENT_CARD_HEIGHT,
            enrollment_card_lines,
        );
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, search: &SearchScreen) {
        let show_refinements = search.filters.kind == SearchKind::Students;
        let form_height = if show_refinements { 6 } else { 4 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(form_height),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(area);

        let mut lines = vec![
            search_line("Query", &search.filters.query, search.active() == SearchField::Query),
            search_line(
                "Search in",
                search.filters.kind.as_str(),
                search.active() == SearchField::Kind,
            ),
        ];
        if show_refinements {
            lines.push(search_line(
                "Minimum age",
                &search.filters.min_age,
                search.active() == SearchField::MinAge,
            ));
            lines.push(search_line(
                "Grade",
                &search.filters.grade,
                search.active() == SearchField::Grade,
            ));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search & Filter");
        let form = Paragraph::new(lines).block(block.clone());
        frame.render_widget(form, chunks[0]);

        let headline = Paragraph::new(Span::styled(
            search.headline(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(headline, chunks[1]);

        match search.results() {
            SearchResults::Students(records) => render_record_cards(
                frame,
                chunks[2],
                records,
                search.selected(),
                CARD_HEIGHT,
                search_student_card_lines,
            ),
            SearchResults::Courses(records) => render_record_cards(
                frame,
                chunks[2],
                records,
                search.selected(),
                CARD_HEIGHT,
                course_card_lines,
            ),
        }

        // Place the cursor in the active text field while no modal is open.
        if matches!(self.mode, Mode::Normal) {
            let inner = block.inner(chunks[0]);
            let position = match search.active() {
                SearchField::Query => Some(("Query: ", 0u16)),
                SearchField::Kind => None,
                SearchField::MinAge => Some(("Minimum age: ", 2)),
                SearchField::Grade => Some(("Grade: ", 3)),
            };
            if let Some((prefix, row)) = position {
                let cursor_x = inner.x
                    + prefix.len() as u16
                    + search.value_len(search.active()) as u16;
                frame.set_cursor_position((cursor_x, inner.y + row));
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some((text, kind)) = self.status.message() {
            Line::from(vec![Span::styled(text.to_string(), kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::StudentForm(_)) | (_, Mode::CourseForm(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::EnrollmentForm(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[n]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Students(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[2]", key_style),
                Span::raw(" Courses   "),
                Span::styled("[3]", key_style),
                Span::raw(" Enrollments   "),
                Span::styled("[4]", key_style),
                Span::raw(" Search   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Courses(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[1]", key_style),
                Span::raw(" Students   "),
                Span::styled("[3]", key_style),
                Span::raw(" Enrollments   "),
                Span::styled("[4]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Enrollments(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[1]", key_style),
                Span::raw(" Students   "),
                Span::styled("[2]", key_style),
                Span::raw(" Courses   "),
                Span::styled("[4]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Search(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle Type   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Results   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
        }
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, form: &StudentForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let title = if form.is_edit() {
            "Edit Student"
        } else {
            "Add Student"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", StudentField::Name),
            form.build_line("Email", StudentField::Email),
            form.build_line("Age", StudentField::Age),
            form.build_line("Grade", StudentField::Grade),
            Line::from(""),
        ];
        if form.loading.is_some() {
            lines.push(Line::from(Span::styled(
                "Loading student data...",
                Style::default().fg(Color::Gray),
            )));
        } else if form.saving.is_some() {
            lines.push(Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Gray),
            )));
        } else if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            StudentField::Name => ("Name: ", 0u16),
            StudentField::Email => ("Email: ", 1),
            StudentField::Age => ("Age: ", 2),
            StudentField::Grade => ("Grade: ", 3),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_course_form(&self, frame: &mut Frame, area: Rect, form: &CourseForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let title = if form.is_edit() {
            "Edit Course"
        } else {
            "Add Course"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", CourseField::Title),
            form.build_line("Code", CourseField::Code),
            form.build_line("Credits", CourseField::Credits),
            form.build_line("Description", CourseField::Description),
            Line::from(""),
        ];
        if form.loading.is_some() {
            lines.push(Line::from(Span::styled(
                "Loading course data...",
                Style::default().fg(Color::Gray),
            )));
        } else if form.saving.is_some() {
            lines.push(Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Gray),
            )));
        } else if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            CourseField::Title => ("Title: ", 0u16),
            CourseField::Code => ("Code: ", 1),
            CourseField::Credits => ("Credits: ", 2),
            CourseField::Description => ("Description: ", 3),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_enrollment_form(&self, frame: &mut Frame, area: Rect, form: &EnrollmentForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Enrollment").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let student_value = if form.students_pending.is_some() {
            "<loading students...>".to_string()
        } else {
            form.selected_student()
                .map(Student::select_label)
                .unwrap_or_else(|| "<choose a student>".to_string())
        };
        let course_value = if form.courses_pending.is_some() {
            "<loading courses...>".to_string()
        } else {
            form.selected_course()
                .map(Course::select_label)
                .unwrap_or_else(|| "<choose a course>".to_string())
        };

        let mut lines = vec![
            selector_line(
                "Student",
                &student_value,
                form.selected_student().is_some(),
                form.active == EnrollmentField::Student,
            ),
            selector_line(
                "Course",
                &course_value,
                form.selected_course().is_some(),
                form.active == EnrollmentField::Course,
            ),
            selector_line(
                "Status",
                form.status.as_str(),
                true,
                form.active == EnrollmentField::Status,
            ),
            Line::from(""),
        ];
        if form.saving.is_some() {
            lines.push(Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Gray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • ↑↓ to choose • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete this {}?",
                confirm.target.noun()
            )),
            Line::from(confirm.summary.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Render a centered single-message panel, used for loading and empty
/// states.
fn render_notice(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        );
    frame.render_widget(paragraph, area);
}

/// Windowed card list: keeps the selected record visible and renders one
/// bordered card per visible record.
fn render_record_cards<T>(
    frame: &mut Frame,
    area: Rect,
    records: &[T],
    selected: usize,
    card_height: u16,
    build: impl Fn(&T, bool) -> Vec<Line<'static>>,
) {
    if records.is_empty() || area.height == 0 {
        return;
    }

    let capacity = ((area.height as usize) / card_height as usize).max(1);
    let len = records.len();
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    let end = min(start + capacity, len);
    let visible_len = end.saturating_sub(start);
    if visible_len == 0 {
        return;
    }

    let constraints: Vec<Constraint> = (0..visible_len)
        .map(|_| Constraint::Length(card_height))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, chunk) in rows.iter().enumerate() {
        if chunk.height == 0 {
            continue;
        }

        let record_index = start + idx;
        if record_index >= len {
            break;
        }

        let is_selected = record_index == selected;
        let mut block = Block::default().borders(Borders::ALL);
        if is_selected {
            block = block.style(Style::default().fg(Color::Yellow));
        }

        let paragraph = Paragraph::new(build(&records[record_index], is_selected))
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, *chunk);
    }
}

fn student_card_lines(student: &Student, selected: bool) -> Vec<Line<'static>> {
    let name = if selected {
        format!("▶ {}", student.name)
    } else {
        student.name.clone()
    };
    vec![
        Line::from(vec![
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", student.grade),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(Span::styled(
            student.email.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Age: {} years", student.age),
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn course_card_lines(course: &Course, selected: bool) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", course.title)
    } else {
        course.title.clone()
    };
    vec![
        Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{} cr]", course.credits),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(Span::styled(
            format!("Code: {}", course.code),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            course.description.clone(),
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn enrollment_card_lines(enrollment: &Enrollment, selected: bool) -> Vec<Line<'static>> {
    let name = if selected {
        format!("▶ {}", enrollment.student.name)
    } else {
        enrollment.student.name.clone()
    };
    vec![
        Line::from(vec![
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                enrollment.status.as_str().to_string(),
                status_style(enrollment.status),
            ),
        ]),
        Line::from(Span::styled(
            enrollment.student.email.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(format!(
            "{} - {}",
            enrollment.course.code, enrollment.course.title
        )),
        Line::from(Span::styled(
            format!("Enrolled: {}", enrollment.enrolled_at.format("%Y-%m-%d")),
            Style::default().fg(Color::Gray),
        )),
    ]
}

/// Search result card for students shows the refinement-relevant fields.
fn search_student_card_lines(student: &Student, selected: bool) -> Vec<Line<'static>> {
    let name = if selected {
        format!("▶ {}", student.name)
    } else {
        student.name.clone()
    };
    vec![
        Line::from(Span::styled(
            name,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Email: {}", student.email),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Age: {}  Grade: {}", student.age, student.grade),
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn search_line(label: &str, value: &str, is_active: bool) -> Line<'static> {
    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value.to_string(), style),
    ])
}

/// Selector row for the enrollment form: placeholders render dim until a
/// choice is made.
fn selector_line(label: &str, value: &str, has_value: bool, is_active: bool) -> Line<'static> {
    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if !has_value {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value.to_string(), style),
    ])
}
