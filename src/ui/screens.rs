use crate::models::{Course, Student};
use crate::query::{SearchFilters, SearchKind};

use super::fetch::Ticket;

/// Uniform state behind the three record list screens. Records only ever
/// change through [`ListScreen::resolve`] with a matching ticket, so a failed
/// delete or a stale response can never remove a record from view.
pub struct ListScreen<T> {
    records: Vec<T>,
    loaded: bool,
    selected: usize,
    pending: Option<Ticket>,
}

impl<T> ListScreen<T> {
    /// An empty screen awaiting its first collection fetch.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loaded: false,
            selected: 0,
            pending: None,
        }
    }

    /// A screen whose collection was fetched before construction. It never
    /// shows a loading state on first render.
    pub fn prefetched(records: Vec<T>) -> Self {
        Self {
            records,
            loaded: true,
            selected: 0,
            pending: None,
        }
    }

    /// Record the ticket of an in-flight collection fetch. Any previously
    /// pending ticket is forgotten, which is what cancels a superseded
    /// request.
    pub fn begin_refresh(&mut self, ticket: Ticket) {
        self.pending = Some(ticket);
        self.loaded = false;
    }

    /// Replace the collection if `ticket` is still the one this screen
    /// awaits. Returns false for a stale ticket, leaving state untouched.
    pub fn resolve(&mut self, ticket: Ticket, records: Vec<T>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.records = records;
        self.loaded = true;
        self.ensure_in_bounds();
        true
    }

    /// Clear the loading state after a failed fetch. The records on screen
    /// stay as they were so the user can retry.
    pub fn fail(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.loaded = true;
        true
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&T> {
        self.records.get(self.selected)
    }

    pub fn move_selection(&mut self, offset: isize) {
        if self.records.is_empty() {
            return;
        }
        let len = self.records.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub fn select_first(&mut self) {
        if !self.records.is_empty() {
            self.selected = 0;
        }
    }

    pub fn select_last(&mut self) {
        if !self.records.is_empty() {
            self.selected = self.records.len() - 1;
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.records.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }
    }
}

impl<T> Default for ListScreen<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields available on the search screen. The refinement fields only take
/// focus while the target kind is students.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchField {
    Query,
    Kind,
    MinAge,
    Grade,
}

impl Default for SearchField {
    fn default() -> Self {
        SearchField::Query
    }
}

/// Doubly-filtered records currently on display.
pub enum SearchResults {
    Students(Vec<Student>),
    Courses(Vec<Course>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Students(records) => records.len(),
            SearchResults::Courses(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State behind the search screen. The screen owns a location string the
/// way a browser page owns its URL: submitting serializes the editable
/// filters into the location, and only a location whose text query is
/// non-empty produces a fetch.
pub struct SearchScreen {
    pub filters: SearchFilters,
    location: String,
    applied: Option<SearchFilters>,
    results: SearchResults,
    active: SearchField,
    selected: usize,
    pending: Option<Ticket>,
}

impl SearchScreen {
    /// Build the screen from a stored location, restoring whatever filters
    /// were last submitted.
    pub fn new(location: &str) -> Self {
        Self {
            filters: SearchFilters::from_query_string(location),
            location: location.to_string(),
            applied: None,
            results: SearchResults::Students(Vec::new()),
            active: SearchField::Query,
            selected: 0,
            pending: None,
        }
    }

    /// The filters a just-entered screen should immediately search for, if
    /// its location already carries a query.
    pub fn entry_filters(&self) -> Option<SearchFilters> {
        let filters = SearchFilters::from_query_string(&self.location);
        if filters.query.is_empty() {
            return None;
        }
        Some(filters)
    }

    /// Serialize the editable filters into the location and decide whether a
    /// fetch should run. An empty text query updates the location but
    /// produces no request; neither does a submission while a search is
    /// already in flight.
    pub fn submit(&mut self) -> Option<SearchFilters> {
        if self.pending.is_some() {
            return None;
        }
        self.location = self.filters.to_query_string();
        if self.filters.query.is_empty() {
            return None;
        }
        Some(self.filters.clone())
    }

    /// Record the in-flight search: its ticket and the filters that will be
    /// applied client-side once the collection arrives.
    pub fn begin_search(&mut self, ticket: Ticket, filters: SearchFilters) {
        self.pending = Some(ticket);
        self.applied = Some(filters);
    }

    /// Apply the client-side substring filter to a resolved student
    /// collection. Stale tickets leave the current results in place.
    pub fn resolve_students(&mut self, ticket: Ticket, records: Vec<Student>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        let filtered = match &self.applied {
            Some(filters) => records
                .into_iter()
                .filter(|student| filters.matches_student(student))
                .collect(),
            None => records,
        };
        self.results = SearchResults::Students(filtered);
        self.selected = 0;
        true
    }

    /// Course counterpart of [`SearchScreen::resolve_students`].
    pub fn resolve_courses(&mut self, ticket: Ticket, records: Vec<Course>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        let filtered = match &self.applied {
            Some(filters) => records
                .into_iter()
                .filter(|course| filters.matches_course(course))
                .collect(),
            None => records,
        };
        self.results = SearchResults::Courses(filtered);
        self.selected = 0;
        true
    }

    pub fn fail(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn searching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn active(&self) -> SearchField {
        self.active
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn headline(&self) -> String {
        if self.searching() {
            "Searching...".to_string()
        } else if self.results.is_empty() {
            "No results".to_string()
        } else {
            format!("Found {} results", self.results.len())
        }
    }

    /// Cycle focus across the visible fields. The age/grade refinements are
    /// skipped while the kind is courses, but their stored values survive
    /// the detour.
    pub fn next_field(&mut self) {
        self.active = match self.active {
            SearchField::Query => SearchField::Kind,
            SearchField::Kind => {
                if self.filters.kind == SearchKind::Students {
                    SearchField::MinAge
                } else {
                    SearchField::Query
                }
            }
            SearchField::MinAge => SearchField::Grade,
            SearchField::Grade => SearchField::Query,
        };
    }

    /// Flip the target kind. Refinement values are kept; only their
    /// visibility changes.
    pub fn toggle_kind(&mut self) {
        self.filters.kind = self.filters.kind.toggle();
    }

    /// Append a character to the active text field. The minimum-age field
    /// accepts digits only.
    pub fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            SearchField::Query => {
                if ch.is_control() {
                    return false;
                }
                self.filters.query.push(ch);
                true
            }
            SearchField::Kind => false,
            SearchField::MinAge => {
                if ch.is_ascii_digit() {
                    self.filters.min_age.push(ch);
                    true
                } else {
                    false
                }
            }
            SearchField::Grade => {
                if ch.is_control() {
                    return false;
                }
                self.filters.grade.push(ch);
                true
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.active {
            SearchField::Query => {
                self.filters.query.pop();
            }
            SearchField::Kind => {}
            SearchField::MinAge => {
                self.filters.min_age.pop();
            }
            SearchField::Grade => {
                self.filters.grade.pop();
            }
        }
    }

    pub fn move_selection(&mut self, offset: isize) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len as isize {
            new = len as isize - 1;
        }
        self.selected = new as usize;
    }

    /// Character count of the active field, used for cursor placement.
    pub fn value_len(&self, field: SearchField) -> usize {
        match field {
            SearchField::Query => self.filters.query.chars().count(),
            SearchField::Kind => self.filters.kind.as_str().chars().count(),
            SearchField::MinAge => self.filters.min_age.chars().count(),
            SearchField::Grade => self.filters.grade.chars().count(),
        }
    }
}
