//! Debounced uniqueness checks.
//!
//! Each watched field has at most one pending check. A new value aborts the
//! previous task and bumps the field's generation; outcomes carry the
//! generation they were started with so a late answer for an old value is
//! dropped instead of overwriting the current error state.

use crate::api::{ApiError, CheckResponse, IumsApi, UniqueField};
use crate::config::ValidationFailureMode;
use crate::state::forms::FieldName;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Result of one settled check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub field: FieldName,
    pub generation: u64,
    /// `None` clears the field's error
    pub error: Option<String>,
    /// The server answered and the value is free
    pub verified: bool,
}

pub struct FieldValidator {
    api: Arc<dyn IumsApi>,
    debounce: Duration,
    failure_mode: ValidationFailureMode,
    pending: HashMap<FieldName, JoinHandle<()>>,
    generations: HashMap<FieldName, u64>,
    outcome_tx: mpsc::UnboundedSender<ValidationOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<ValidationOutcome>,
}

impl FieldValidator {
    pub fn new(
        api: Arc<dyn IumsApi>,
        debounce: Duration,
        failure_mode: ValidationFailureMode,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            api,
            debounce,
            failure_mode,
            pending: HashMap::new(),
            generations: HashMap::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Restart the debounce window for `field` with `value`.
    ///
    /// An empty value only cancels; no request is scheduled. Must be called
    /// from within a Tokio runtime.
    pub fn watch(&mut self, field: UniqueField, value: &str) {
        let generation = self.cancel(field.field());
        if value.is_empty() {
            return;
        }

        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        let debounce = self.debounce;
        let failure_mode = self.failure_mode;
        let value = value.to_string();

        tracing::debug!(field = field.key(), generation, "scheduling uniqueness check");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = api.check_unique(field, value).await;
            let verified = matches!(&result, Ok(response) if !response.exists);
            let error = outcome_message(field.field(), result, failure_mode);
            // The receiver lives as long as the validator; a closed channel
            // means the wizard is gone and the result has nowhere to go.
            let _ = tx.send(ValidationOutcome {
                field: field.field(),
                generation,
                error,
                verified,
            });
        });
        self.pending.insert(field.field(), handle);
    }

    /// Abort any pending check for `field`. Returns the new generation.
    pub fn cancel(&mut self, field: FieldName) -> u64 {
        if let Some(handle) = self.pending.remove(&field) {
            handle.abort();
        }
        let generation = self.generations.entry(field).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Abort every pending check
    pub fn cancel_all(&mut self) {
        let fields: Vec<FieldName> = self.generations.keys().copied().collect();
        for field in fields {
            self.cancel(field);
        }
    }

    /// Whether an outcome still belongs to the field's latest value
    pub fn is_current(&self, outcome: &ValidationOutcome) -> bool {
        self.generations.get(&outcome.field) == Some(&outcome.generation)
    }

    /// Next outcome that is ready and still current, without waiting
    pub fn try_next(&mut self) -> Option<ValidationOutcome> {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
        None
    }

    /// Wait for the next outcome that is still current
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<ValidationOutcome> {
        loop {
            let outcome = self.outcome_rx.recv().await?;
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
    }

    /// Number of checks that have been scheduled and not yet delivered
    pub fn pending_count(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }

    fn accept(&mut self, outcome: ValidationOutcome) -> Option<ValidationOutcome> {
        if !self.is_current(&outcome) {
            tracing::debug!(
                field = outcome.field.key(),
                generation = outcome.generation,
                "discarding stale uniqueness result"
            );
            return None;
        }
        self.pending.remove(&outcome.field);
        Some(outcome)
    }
}

impl Drop for FieldValidator {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

/// Map a check result onto the field's error message
fn outcome_message(
    field: FieldName,
    result: Result<CheckResponse, ApiError>,
    failure_mode: ValidationFailureMode,
) -> Option<String> {
    match result {
        Ok(response) if response.exists => Some(
            response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("{} is already taken", field.label())),
        ),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(field = field.key(), error = %err, "uniqueness check failed");
            match failure_mode {
                ValidationFailureMode::Open => None,
                ValidationFailureMode::Closed => {
                    Some(format!("Could not verify {}", field.label().to_lowercase()))
                }
            }
        }
    }
}
