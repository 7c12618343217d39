use anyhow::Result;
use tracing::info;

use crate::form::{FormSession, SubmissionSnapshot};
use crate::io::{OutputOptions, emit};

use super::{options::UiOptions, runtime::App};

/// Interactive terminal front end over a mounted `FormSession`.
#[derive(Debug)]
pub struct FormUI {
    session: FormSession,
    options: UiOptions,
    output: Option<OutputOptions>,
}

impl FormUI {
    pub fn new(session: FormSession) -> Self {
        Self {
            session,
            options: UiOptions::default(),
            output: None,
        }
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = Some(output);
        self
    }

    /// Run until the user quits. Returns the last accepted snapshot, which is
    /// also written to the configured outputs.
    pub fn run(self) -> Result<Option<SubmissionSnapshot>> {
        let FormUI {
            session,
            options,
            output,
        } = self;

        let mut app = App::new(session, options);
        app.run()?;
        let session = app.into_session();

        let snapshot = session.last_snapshot().cloned();
        match (&snapshot, &output) {
            (Some(snapshot), Some(output)) => emit(snapshot, output)?,
            (None, _) => info!("terminal UI closed without a submission"),
            _ => {}
        }
        Ok(snapshot)
    }
}
