//! Single serial background worker
//!
//! All ingestion and transfer encoding runs on one dedicated thread, in the
//! order it was submitted. Callers get results back through a future, so an
//! async host never blocks on decode work. Jobs cannot be cancelled once
//! queued. A panicking job fails only its own future.

use crate::error::{IngestError, TransferError, WorkerError};
use crate::ingest::{ingest_manifest, IngestOptions, StickerPackBatch};
use crate::manifest::PackManifest;
use crate::source::AssetSource;
use crate::transfer::{send_pack, TransferOptions, TransferTarget};
use crate::validate::Validator;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

/// Name of the worker thread
pub const WORKER_THREAD_NAME: &str = "sticker-pack-worker";

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct PackWorker {
    sender: Option<mpsc::UnboundedSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl PackWorker {
    /// Start the worker thread
    pub fn spawn() -> Result<Self, WorkerError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    job();
                }
                tracing::debug!("sticker pack worker stopped");
            })
            .map_err(|e| WorkerError::Spawn(e.to_string()))?;

        Ok(Self { sender: Some(sender), handle: Some(handle) })
    }

    /// Queue `job` and return a future for its result.
    ///
    /// The job is queued immediately, before the future is polled, so jobs
    /// run in the order `submit` was called.
    pub fn submit<F, T>(&self, job: F) -> impl Future<Output = Result<T, WorkerError>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job)).map_err(|_| {
                tracing::warn!("sticker pack job panicked");
                WorkerError::Panicked
            });
            // The caller may have dropped the future
            let _ = tx.send(result);
        });
        let queued = match &self.sender {
            Some(sender) => sender.send(job).map_err(|_| WorkerError::Stopped),
            None => Err(WorkerError::Stopped),
        };

        async move {
            match queued {
                Ok(()) => rx.await.map_err(|_| WorkerError::Stopped).and_then(|result| result),
                Err(e) => Err(e),
            }
        }
    }

    /// Ingest a manifest on the worker.
    ///
    /// The outer error comes from the worker itself; the inner one is the
    /// ingestion result.
    pub fn ingest(
        &self,
        manifest: PackManifest,
        assets: Arc<dyn AssetSource>,
        validator: Validator,
        options: IngestOptions,
    ) -> impl Future<Output = Result<Result<StickerPackBatch, IngestError>, WorkerError>> {
        self.submit(move || ingest_manifest(&manifest, assets.as_ref(), &validator, &options))
    }

    /// Encode and hand off one pack of `batch` on the worker.
    ///
    /// The inner value is `Ok(None)` when `identifier` isn't in the batch.
    pub fn send(
        &self,
        batch: Arc<StickerPackBatch>,
        identifier: String,
        target: Arc<dyn TransferTarget>,
        options: TransferOptions,
    ) -> impl Future<Output = Result<Result<Option<bool>, TransferError>, WorkerError>> {
        self.submit(move || {
            let Some(pack) = batch.find(&identifier) else {
                return Ok(None);
            };
            send_pack(pack, &batch.store_links, target.as_ref(), &options).map(Some)
        })
    }
}

impl Drop for PackWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain its queue and exit
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("sticker pack worker panicked");
            }
        }
    }
}
