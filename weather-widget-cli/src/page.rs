use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, error};
use weather_widget_core::{FormValues, Html, Page};

/// Where rendered markup goes.
#[derive(Debug, Clone)]
pub enum Output {
    /// Holds the latest render; printed once by [`TerminalPage::flush`].
    Stdout,
    /// Rewritten on every render.
    File(PathBuf),
}

impl From<Option<PathBuf>> for Output {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Output::Stdout, Output::File)
    }
}

/// Terminal stand-in for the page: the form is filled up front, the output
/// region is stdout or a file.
#[derive(Debug)]
pub struct TerminalPage {
    form: FormValues,
    output: Output,
    latest: Mutex<Option<Html>>,
}

impl TerminalPage {
    pub fn new(form: FormValues, output: Output) -> Self {
        Self {
            form,
            output,
            latest: Mutex::default(),
        }
    }

    /// Print the current stdout region. No-op for file output.
    pub fn flush(&self) -> io::Result<()> {
        let Some(html) = self.latest_lock().take() else {
            return Ok(());
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{html}")?;
        stdout.flush()
    }

    fn latest_lock(&self) -> MutexGuard<'_, Option<Html>> {
        self.latest.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, html: Html) -> io::Result<()> {
        match &self.output {
            Output::Stdout => {
                *self.latest_lock() = Some(html);
                Ok(())
            }
            Output::File(path) => fs::write(path, html.as_str()),
        }
    }
}

impl Page for TerminalPage {
    fn read_form(&self) -> FormValues {
        self.form.clone()
    }

    fn render(&self, html: Html) {
        if let Err(e) = self.write(html) {
            error!(error = %e, output = ?self.output, "Failed to write widget output");
        }
    }

    fn set_submit_disabled(&self, disabled: bool) {
        debug!(disabled, "Submit control");
    }
}
