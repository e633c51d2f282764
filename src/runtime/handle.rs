use std::{fmt, sync::Arc};

use tokio::{
    sync::{broadcast, mpsc, oneshot, Mutex},
    time::Instant,
};

use crate::{
    call::normalize,
    engine::{CallbookSource, LookupEngine},
    persist::{CacheError, CacheResult, HitCache},
    record::Hit,
    types::{Correlation, Sequence},
};

use super::events::LookupEvent;

/// Failure reported by a [`LookupHandle`] call.
#[derive(Debug)]
pub enum RuntimeError {
    /// Cache storage failed on an explicit cache command.
    Cache(CacheError),
    /// The service loop is gone.
    ChannelClosed,
    /// A blocking worker panicked or was cancelled.
    Worker(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache(err) => write!(f, "cache: {err}"),
            Self::ChannelClosed => f.write_str("lookup service closed"),
            Self::Worker(msg) => write!(f, "worker: {msg}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<CacheError> for RuntimeError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

/// Tunables for [`spawn_lookup_service`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Blocking workers a batch is split across.
    pub workers: usize,
    /// Fewest calls handed to one batch worker.
    pub batch_chunk: usize,
    /// Cap on merged batch hits; 0 keeps everything.
    pub max_batch_hits: usize,
    /// Consult and fill the cache on single lookups.
    pub use_cache: bool,
    /// Ask the callbook before the prefix database.
    pub use_callbook: bool,
    /// Broadcast buffer for [`LookupEvent`]s.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            batch_chunk: 64,
            max_batch_hits: 2000,
            use_cache: true,
            use_callbook: true,
            event_capacity: 1024,
        }
    }
}

/// Cloneable client of the lookup service.
pub struct LookupHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LookupEvent>,
}

impl Clone for LookupHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Lookup {
        call: String,
        correlation: Correlation,
        resp: oneshot::Sender<Result<Vec<Hit>, RuntimeError>>,
    },
    Batch {
        calls: Vec<String>,
        resp: oneshot::Sender<Result<Vec<Hit>, RuntimeError>>,
    },
    ClearCache {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    CacheLen {
        resp: oneshot::Sender<Result<Option<usize>, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

type SharedCache = Arc<Mutex<Box<dyn HitCache>>>;

struct Service {
    engine: LookupEngine,
    cache: Option<SharedCache>,
    callbook: Option<Arc<dyn CallbookSource>>,
    config: RuntimeConfig,
    events_tx: broadcast::Sender<LookupEvent>,
}

/// Starts the lookup service on the current tokio runtime.
///
/// Lookups run on blocking workers; the cache, when given, is only touched
/// from those workers.
pub fn spawn_lookup_service(
    engine: LookupEngine,
    cache: Option<Box<dyn HitCache>>,
    callbook: Option<Arc<dyn CallbookSource>>,
    config: RuntimeConfig,
) -> LookupHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<LookupEvent>(config.event_capacity.max(1));

    let service = Service {
        engine,
        cache: cache.map(|c| Arc::new(Mutex::new(c))),
        callbook,
        config,
        events_tx: events_tx.clone(),
    };

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if service.handle_command(cmd).await {
                break;
            }
        }
        log::debug!("lookup service stopped");
    });

    LookupHandle { cmd_tx, events_tx }
}

impl LookupHandle {
    /// Subscribes to lookup events.
    pub fn subscribe(&self) -> broadcast::Receiver<LookupEvent> {
        self.events_tx.subscribe()
    }

    /// Hits for one call.
    pub async fn lookup(&self, call: impl Into<String>) -> Result<Vec<Hit>, RuntimeError> {
        self.lookup_correlated(call, Correlation::default()).await
    }

    /// Hits for one call, tagged with the caller's correlation.
    pub async fn lookup_correlated(
        &self,
        call: impl Into<String>,
        correlation: Correlation,
    ) -> Result<Vec<Hit>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Lookup {
                call: call.into(),
                correlation,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Hits for many calls, merged in input order and capped by
    /// [`RuntimeConfig::max_batch_hits`]. Each hit's `sequence` is the index
    /// of its call in `calls`.
    pub async fn lookup_batch(&self, calls: Vec<String>) -> Result<Vec<Hit>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Batch { calls, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Empties the cache, if any.
    pub async fn clear_cache(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ClearCache { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Cached call count; `None` when the service has no cache.
    pub async fn cache_len(&self) -> Result<Option<usize>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CacheLen { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the service loop.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

impl Service {
    async fn handle_command(&self, cmd: Command) -> bool {
        match cmd {
            Command::Lookup {
                call,
                correlation,
                resp,
            } => {
                let res = self.lookup(call, correlation).await;
                let _ = resp.send(res);
            }
            Command::Batch { calls, resp } => {
                let res = self.batch(calls).await;
                let _ = resp.send(res);
            }
            Command::ClearCache { resp } => {
                let res = match &self.cache {
                    Some(cache) => with_cache(cache, |c| c.clear()).await,
                    None => Ok(()),
                };
                if res.is_ok() {
                    let _ = self.events_tx.send(LookupEvent::CacheCleared);
                }
                let _ = resp.send(res);
            }
            Command::CacheLen { resp } => {
                let res = match &self.cache {
                    Some(cache) => with_cache(cache, |c| c.len()).await.map(Some),
                    None => Ok(None),
                };
                let _ = resp.send(res);
            }
            Command::Shutdown { resp } => {
                let _ = resp.send(Ok(()));
                return true;
            }
        }
        false
    }

    async fn lookup(&self, call: String, correlation: Correlation) -> Result<Vec<Hit>, RuntimeError> {
        let key = normalize(&call);
        let cache = self.cache.as_ref().filter(|_| self.config.use_cache);

        if let (Some(cache), Some(key)) = (cache, key.clone()) {
            match with_cache(cache, move |c| c.get(&key)).await {
                Ok(Some(mut hits)) => {
                    for hit in &mut hits {
                        hit.correlate(correlation);
                    }
                    self.publish(&call, hits.len(), true);
                    return Ok(hits);
                }
                Ok(None) => {}
                Err(err) => log::warn!("cache read failed for {call}: {err}"),
            }
        }

        let engine = self.engine.clone();
        let callbook = self
            .callbook
            .clone()
            .filter(|_| self.config.use_callbook);
        let query = call.clone();
        let hits = tokio::task::spawn_blocking(move || match callbook {
            Some(callbook) => engine.lookup_with_callbook(&query, callbook.as_ref(), correlation),
            None => engine.lookup_correlated(&query, correlation),
        })
        .await
        .map_err(|e| RuntimeError::Worker(format!("join error: {e}")))?;

        if let (Some(cache), Some(key)) = (cache, key) {
            if !hits.is_empty() {
                let stored = hits.clone();
                if let Err(err) = with_cache(cache, move |c| c.put(&key, &stored)).await {
                    log::warn!("cache write failed for {call}: {err}");
                }
            }
        }
        self.publish(&call, hits.len(), false);
        Ok(hits)
    }

    async fn batch(&self, calls: Vec<String>) -> Result<Vec<Hit>, RuntimeError> {
        let started = Instant::now();
        let total = calls.len();
        let workers = self.config.workers.max(1);
        let chunk = self.config.batch_chunk.max(1).max(total.div_ceil(workers));

        let mut handles = Vec::new();
        for (n, part) in calls.chunks(chunk).enumerate() {
            let part = part.to_vec();
            let offset = n * chunk;
            let engine = self.engine.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let mut local = Vec::new();
                for (i, call) in part.iter().enumerate() {
                    let correlation = Correlation {
                        spot_id: 0,
                        sequence: (offset + i) as Sequence,
                    };
                    local.extend(engine.lookup_correlated(call, correlation));
                }
                local
            }));
        }

        let mut merged = Vec::new();
        for handle in handles {
            let local = handle
                .await
                .map_err(|e| RuntimeError::Worker(format!("join error: {e}")))?;
            merged.extend(local);
        }

        let cap = self.config.max_batch_hits;
        let truncated = cap > 0 && merged.len() > cap;
        if truncated {
            merged.truncate(cap);
        }
        let elapsed_ms = started.elapsed().as_millis() as u64;
        log::info!(
            "batch of {total} calls produced {} hits in {elapsed_ms} ms",
            merged.len()
        );
        let _ = self.events_tx.send(LookupEvent::BatchCompleted {
            calls: total,
            hits: merged.len(),
            truncated,
            elapsed_ms,
        });
        Ok(merged)
    }

    fn publish(&self, call: &str, hits: usize, cached: bool) {
        let _ = self.events_tx.send(LookupEvent::Resolved {
            call: call.to_string(),
            hits,
            cached,
        });
    }
}

async fn with_cache<T, F>(cache: &SharedCache, f: F) -> Result<T, RuntimeError>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn HitCache) -> CacheResult<T> + Send + 'static,
{
    let cache = Arc::clone(cache);
    tokio::task::spawn_blocking(move || {
        let mut guard = cache.blocking_lock();
        f(&mut **guard)
    })
    .await
    .map_err(|e| RuntimeError::Worker(format!("join error: {e}")))?
    .map_err(RuntimeError::from)
}
