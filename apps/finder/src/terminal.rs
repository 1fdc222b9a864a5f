//! Terminal rendition of the page slots: results on stdout, status on stderr.

use std::{
    io::{self, Write},
    sync::{Mutex, MutexGuard},
};

use clap::ValueEnum;
use client_core::{
    render::{render_error_html, sanitize_text},
    ResultView, UiSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

pub struct TerminalSurface<O, E> {
    format: OutputFormat,
    out: Mutex<O>,
    status: Mutex<E>,
}

impl TerminalSurface<io::Stdout, io::Stderr> {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(format, io::stdout(), io::stderr())
    }
}

impl<O, E> TerminalSurface<O, E>
where
    O: Write + Send,
    E: Write + Send,
{
    pub fn new(format: OutputFormat, out: O, status: E) -> Self {
        Self {
            format,
            out: Mutex::new(out),
            status: Mutex::new(status),
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (
            self.out.into_inner().unwrap_or_else(|p| p.into_inner()),
            self.status.into_inner().unwrap_or_else(|p| p.into_inner()),
        )
    }

    fn write_out(&self, text: &str) {
        let mut out = lock(&self.out);
        if let Err(err) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            tracing::warn!("failed to write results: {err}");
        }
    }

    fn write_status(&self, text: &str) {
        let mut status = lock(&self.status);
        if let Err(err) = writeln!(status, "{text}") {
            tracing::warn!("failed to write status line: {err}");
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<O, E> UiSurface for TerminalSurface<O, E>
where
    O: Write + Send,
    E: Write + Send,
{
    fn notify(&self, message: &str) {
        self.write_status(&format!("warning: {}", sanitize_text(message)));
    }

    fn set_submit_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "submit trigger");
    }

    fn set_loading(&self, visible: bool) {
        if visible {
            self.write_status("Finding recommendations...");
        }
    }

    fn set_placeholder_visible(&self, visible: bool) {
        tracing::debug!(visible, "placeholder");
    }

    // Printed output cannot be withdrawn; each cycle prints once.
    fn clear_results(&self) {}

    fn render_result(&self, view: &ResultView) {
        match self.format {
            OutputFormat::Text => self.write_out(view.to_string().trim_end()),
            OutputFormat::Html => self.write_out(&view.to_html()),
        }
    }

    fn render_error(&self, message: &str) {
        match self.format {
            OutputFormat::Text => self.write_out(&format!("error: {}", sanitize_text(message))),
            OutputFormat::Html => self.write_out(&render_error_html(message)),
        }
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
