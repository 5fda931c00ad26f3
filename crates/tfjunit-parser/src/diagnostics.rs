// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Timing diagnostics
//!
//! The phase analyzer reports the timings it computed for each passing test
//! to a [`Diagnostics`] sink. The default sink does nothing, so parsing has no
//! side effects unless a caller opts in with [`WriterDiagnostics`] or
//! [`TracingDiagnostics`].

use crate::report::{ResourceTime, Test};
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives the timing breakdown of every analyzed test
pub trait Diagnostics: Send + Sync {
    /// Called once per passing test after its phases were timed
    fn test_timings(&self, test: &Test);
}

impl<T: Diagnostics + ?Sized> Diagnostics for Arc<T> {
    fn test_timings(&self, test: &Test) {
        (**self).test_timings(test);
    }
}

impl<T: Diagnostics + ?Sized> Diagnostics for Box<T> {
    fn test_timings(&self, test: &Test) {
        (**self).test_timings(test);
    }
}

/// Discards all diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn test_timings(&self, _test: &Test) {}
}

/// Writes the fixed-format timing summary to a writer
#[derive(Debug)]
pub struct WriterDiagnostics<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterDiagnostics<W> {
    /// Wrap a writer
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WriterDiagnostics<std::io::Stderr> {
    /// Write summaries to standard error
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Diagnostics for WriterDiagnostics<W> {
    fn test_timings(&self, test: &Test) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = write!(writer, "{}", TimingSummary(test)).and_then(|()| writer.flush()) {
            tracing::warn!(test = %test.name, error = %e, "Failed to write timing diagnostics");
        }
    }
}

/// Emits each timing summary as a `debug` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn test_timings(&self, test: &Test) {
        tracing::debug!(
            test = %test.name,
            time = test.time,
            create_time = test.create_time,
            create_destroy_time = test.create_destroy_time,
            overhead = test.overhead,
            "\n{}",
            TimingSummary(test)
        );
    }
}

/// Render the timing summary of a test
#[must_use]
pub fn render_timings(test: &Test) -> String {
    TimingSummary(test).to_string()
}

struct TimingSummary<'a>(&'a Test);

impl fmt::Display for TimingSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let test = self.0;
        writeln!(f, "------------------------------------------------")?;
        writeln!(f)?;
        writeln!(f, "TEST             : {}", test.name)?;
        writeln!(f, "Time             : {:.3}s", test.time)?;
        writeln!(f, "CreateTime       : {:.3}s", test.create_time)?;
        writeln!(f, "DestroyTime      : {:.3}s", test.destroy_time())?;
        writeln!(f, "CreateDestroyTime: {:.3}s", test.create_destroy_time)?;
        writeln!(f, "Overhead         : {:.3}s", test.overhead)?;
        writeln!(f)?;

        writeln!(f, "  CREATE STEP:")?;
        if test.steps.is_empty() {
            writeln!(f, "    TestStep      : N/A")?;
        }
        for step in &test.steps {
            write_step(f, "TestStep      ", step)?;
        }
        writeln!(f)?;

        writeln!(f, "  DESTROY STEP:")?;
        if test.cleanup.is_empty() {
            writeln!(f, "    DestroyStep   : N/A")?;
        }
        for step in &test.cleanup {
            write_step(f, "DestroyStep   ", step)?;
        }
        writeln!(f)
    }
}

fn write_step(f: &mut fmt::Formatter<'_>, label: &str, step: &ResourceTime) -> fmt::Result {
    let actions: Vec<&str> = step.actions.iter().map(|a| a.as_str()).collect();
    writeln!(f, "    {label}: [{}]", actions.join(", "))?;
    writeln!(f, "    {label}: {}", step.resource_name)?;
    writeln!(f, "    {label}: {:.3}", step.duration)
}
