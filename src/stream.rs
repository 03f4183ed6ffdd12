//! Streaming conversion API: emit progress events as the batch runs.
//!
//! ## Why stream?
//!
//! A batch of large documents takes a while, and the surface driving it (the
//! CLI's progress bar, a GUI) must stay responsive the whole time. Instead of
//! letting two threads poke at shared mutable state, [`run_stream`] spawns
//! the batch onto a background task and hands back a `Stream` of
//! [`BatchEvent`]s: one `Started`, one `FileFinished` per input in input
//! order, one `Finished`. The subscriber consumes them at its own pace; the
//! channel is bounded, so a slow subscriber backpressures the worker rather
//! than buffering unboundedly.
//!
//! Fatal errors (output directory cannot be created) are returned as
//! `Err(DocBatchError)` before any event is emitted.

use crate::config::RunnerConfig;
use crate::error::DocBatchError;
use crate::job::ConversionJob;
use crate::output::{ConversionResult, RunSummary};
use crate::runner;
use futures::Stream;
use std::pin::Pin;
use std::time::Instant;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

/// Progress events emitted by [`run_stream`], in order:
/// `Started`, then one `FileFinished` per input, then `Finished`.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// The batch is locked in; `total` files will be attempted.
    Started { total: usize },

    /// One file finished (successfully or not). `index` is 0-based and
    /// strictly increasing, so `index + 1` of `total` is the human-readable
    /// progress position.
    FileFinished {
        index: usize,
        total: usize,
        result: ConversionResult,
    },

    /// Every file has been attempted.
    Finished { summary: RunSummary },
}

/// A boxed stream of batch events.
pub type BatchEventStream = Pin<Box<dyn Stream<Item = BatchEvent> + Send>>;

/// Run the batch on a background task, yielding progress events.
///
/// The job and config are captured before the task starts; nothing can
/// mutate the file list mid-run. Dropping the stream closes the channel:
/// the worker finishes the file currently in flight, then stops at the
/// next send.
///
/// # Errors
/// `Err(DocBatchError)` for fatal pre-run failures; in that case no task is
/// spawned and no event is emitted.
pub async fn run_stream(
    job: ConversionJob,
    config: RunnerConfig,
) -> Result<BatchEventStream, DocBatchError> {
    let engines = runner::prepare(&job, &config).await?;
    let total = job.len();
    info!(mode = %job.mode(), total, "starting streamed batch");

    let (tx, rx) = tokio::sync::mpsc::channel::<BatchEvent>(16);

    tokio::spawn(async move {
        let batch_start = Instant::now();
        if tx.send(BatchEvent::Started { total }).await.is_err() {
            return; // subscriber went away before we began
        }

        let mut results = Vec::with_capacity(total);
        for (index, input) in job.files().iter().enumerate() {
            let result = runner::convert_one(job.mode(), input, &config, &engines).await;
            results.push(result.clone());
            if tx
                .send(BatchEvent::FileFinished {
                    index,
                    total,
                    result,
                })
                .await
                .is_err()
            {
                return;
            }
        }

        let summary = RunSummary::tally(&results, batch_start.elapsed().as_millis() as u64);
        let _ = tx.send(BatchEvent::Finished { summary }).await;
    });

    Ok(Box::pin(ReceiverStream::new(rx)))
}
