//! Accumulating diagnostics collector.
//!
//! Compile-time faults (lexical, syntactic, resolution) are never fatal to
//! their pass: each stage reports into a [`Diagnostics`] value and keeps
//! going, so a single run surfaces every independent fault. The host inspects
//! the collector after each stage and decides whether to continue the
//! pipeline and what exit status to use.

use crate::error::LoxError;

/// Ordered collection of diagnostics produced by the pipeline stages.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Recording never aborts the reporting stage.
    pub fn report(&mut self, error: LoxError) {
        log::debug!("Diagnostic recorded: {}", error);

        self.errors.push(error);
    }

    /// Has any diagnostic been recorded?
    pub fn had_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoxError> {
        self.errors.iter()
    }
}
