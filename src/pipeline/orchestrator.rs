//! Orchestration of a whole-page translation.
//!
//! One invocation runs extraction once, partitions the results into batches,
//! fires every batch through the message channel at the same time, and writes
//! each reply back onto the original nodes as it arrives. Replies may arrive
//! in any order; every batch carries its own starting index into the unit
//! sequence, so reconciliation never depends on arrival order.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use markup5ever_rcdom::Handle;

use crate::config::constants;
use crate::error::{TranslateError, TranslateResult};
use crate::html::extract_text_units;
use crate::messaging::MessageSender;
use crate::pipeline::batch::batch_texts;

/// Progress of one in-flight invocation. Created fresh per call and
/// discarded when the call returns; never shared between invocations.
struct ProgressState {
    total: usize,
    completed: usize,
    first_error: Option<TranslateError>,
}

/// Outcome of a completed page translation.
#[derive(Debug, Clone)]
pub struct TranslationSummary {
    /// Translatable units found on the page.
    pub units: usize,
    /// Batches dispatched.
    pub batches: usize,
    /// Batches whose request failed.
    pub failed_batches: usize,
    /// Units that received a translated value.
    pub units_updated: usize,
    /// Representative error when at least one batch failed.
    pub first_error: Option<TranslateError>,
}

/// Coordinates extraction, batching, dispatch, and result reconciliation for
/// one document at a time.
pub struct TranslationOrchestrator {
    channel: MessageSender,
    max_batch_size: usize,
    in_flight: AtomicBool,
}

impl TranslationOrchestrator {
    pub fn new(channel: MessageSender) -> Self {
        TranslationOrchestrator {
            channel,
            max_batch_size: constants::MAX_BATCH_SIZE,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Overrides the maximum combined character size per request batch.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Translates every visible text node under `root` in place.
    ///
    /// Batches are dispatched concurrently and reconciled independently: a
    /// failed batch is recorded and reported but never blocks or rolls back
    /// the translations other batches have already applied. The call fails
    /// outright only when a translation is already in flight on this
    /// orchestrator, or when every dispatched batch failed.
    pub async fn translate_page(
        &self,
        root: &Handle,
        target_lang: &str,
        model: &str,
    ) -> TranslateResult<TranslationSummary> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(TranslateError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        tracing::info!(target_lang, model, "page translation in progress");

        let units = extract_text_units(root);
        if units.is_empty() {
            tracing::info!("no translatable text found");
            return Ok(TranslationSummary {
                units: 0,
                batches: 0,
                failed_batches: 0,
                units_updated: 0,
                first_error: None,
            });
        }

        let values: Vec<&str> = units.iter().map(|unit| unit.text()).collect();
        let batches = batch_texts(&values, self.max_batch_size);
        tracing::debug!(
            units = units.len(),
            batches = batches.len(),
            "dispatching translation batches"
        );

        let progress = RefCell::new(ProgressState {
            total: batches.len(),
            completed: 0,
            first_error: None,
        });

        // All batch futures run interleaved on this task; DOM handles are
        // not Send, and the per-unit writes of different batches touch
        // disjoint index ranges.
        let units = &units;
        let progress = &progress;
        let channel = &self.channel;
        let results = join_all(batches.iter().map(|batch| async move {
            let request_text = batch.join(constants::BATCH_SEPARATOR);
            let result = channel.translate(request_text, target_lang, model).await;

            let mut progress = progress.borrow_mut();
            progress.completed += 1;

            match result {
                Ok(translated) => {
                    let mut applied = 0;
                    for (i, fragment) in translated.split(constants::BATCH_SEPARATOR).enumerate() {
                        let index = batch.start_index() + i;
                        if index < units.len() {
                            units[index].set_text(fragment);
                            applied += 1;
                        } else {
                            tracing::debug!(index, "fragment beyond unit count ignored");
                        }
                    }
                    tracing::debug!(
                        completed = progress.completed,
                        total = progress.total,
                        start_index = batch.start_index(),
                        applied,
                        "batch applied"
                    );
                    Ok(applied)
                }
                Err(e) => {
                    tracing::warn!(
                        completed = progress.completed,
                        total = progress.total,
                        start_index = batch.start_index(),
                        error = %e,
                        "translation batch failed"
                    );
                    if progress.first_error.is_none() {
                        progress.first_error = Some(e.clone());
                    }
                    Err(e)
                }
            }
        }))
        .await;

        let failed_batches = results.iter().filter(|r| r.is_err()).count();
        let units_updated = results
            .iter()
            .filter_map(|r| r.as_ref().ok().copied())
            .sum::<usize>();
        let first_error = progress.borrow_mut().first_error.take();

        if failed_batches == results.len() {
            // Every batch failed; nothing on the page was translated.
            let error = first_error
                .unwrap_or_else(|| TranslateError::Remote("no batches completed".to_string()));
            tracing::error!(error = %error, "page translation failed");
            return Err(error);
        }

        match &first_error {
            None => tracing::info!(units_updated, "page translation completed"),
            Some(e) => tracing::warn!(
                units_updated,
                failed_batches,
                error = %e,
                "page translation completed with errors"
            ),
        }

        Ok(TranslationSummary {
            units: units.len(),
            batches: results.len(),
            failed_batches,
            units_updated,
            first_error,
        })
    }
}

/// Clears the in-flight flag when an invocation ends, on any path out.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
