//! Background request plumbing for the event loop.
//!
//! The UI thread never blocks on the network: each request runs on its own
//! thread against the shared [`ApiClient`] and reports back through a
//! channel as a ticketed envelope. Every state slot that awaits a response
//! records the ticket it expects; an envelope whose ticket matches no live
//! expectation is simply dropped. Navigating away from a view therefore
//! cancels its outstanding requests in the only way that matters: a late
//! response can never write stale state.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use tracing::debug;

use crate::api::ApiClient;
use crate::models::{Course, Enrollment, Student};

/// Identifier of one in-flight request. Strictly increasing per `Fetcher`.
pub type Ticket = u64;

/// Successful outcomes a background request can deliver. Mutations carry no
/// body because every view re-fetches after a mutation instead of patching
/// local state.
pub enum FetchPayload {
    StudentList(Vec<Student>),
    CourseList(Vec<Course>),
    EnrollmentList(Vec<Enrollment>),
    StudentRecord(Student),
    CourseRecord(Course),
    StudentSaved,
    CourseSaved,
    EnrollmentSaved,
    RecordDeleted,
    ReferenceStudents(Vec<Student>),
    ReferenceCourses(Vec<Course>),
    SearchStudents(Vec<Student>),
    SearchCourses(Vec<Course>),
}

/// One completed request: the ticket it was issued under plus its outcome.
pub struct FetchEnvelope {
    pub ticket: Ticket,
    pub payload: Result<FetchPayload>,
}

/// Spawns request threads and hands out tickets. The receiving half of the
/// channel lives with the event loop, which drains it every tick.
pub struct Fetcher {
    client: Arc<ApiClient>,
    tx: Sender<FetchEnvelope>,
    next_ticket: Ticket,
}

impl Fetcher {
    pub fn new(client: Arc<ApiClient>) -> (Self, Receiver<FetchEnvelope>) {
        let (tx, rx) = channel();
        (
            Self {
                client,
                tx,
                next_ticket: 1,
            },
            rx,
        )
    }

    /// Run `job` on a background thread and return the ticket its envelope
    /// will carry. The caller is responsible for remembering the ticket in
    /// whichever state slot awaits the result.
    pub fn spawn<F>(&mut self, job: F) -> Ticket
    where
        F: FnOnce(&ApiClient) -> Result<FetchPayload> + Send + 'static,
    {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let payload = job(&client);
            if tx.send(FetchEnvelope { ticket, payload }).is_err() {
                debug!(ticket, "fetch result arrived after shutdown");
            }
        });

        ticket
    }
}
