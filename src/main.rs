//! Binary entry point that glues the REST resource client to the TUI. The
//! bootstrapping pipeline: resolve configuration, start file-backed logging,
//! build the shared HTTP client, prefetch the entry screen's collection, and
//! drive the Ratatui event loop until the user exits.
use std::sync::Arc;

use tracing::warn;

use campus_admin::api::{self, ApiClient};
use campus_admin::{logging, run_app, App, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(&config.log_file)?;

    let client = Arc::new(ApiClient::new(&config.base_url)?);

    // The students screen is the entry screen and its collection is fetched
    // before the app state exists, so its first render never shows a loading
    // state. A failed prefetch degrades to an empty list.
    let students = match api::fetch_students(&client) {
        Ok(students) => students,
        Err(err) => {
            warn!(error = %err, "student prefetch failed");
            Vec::new()
        }
    };

    let mut app = App::new(client, students);
    run_app(&mut app)
}
