//! Fork-join group queries.
//!
//! A query splits a group's member list into fixed-size chunks and runs one
//! task per chunk on the world's rayon pool. Every task counts down a shared
//! latch when it is done; `join` waits on the latch and then reduces what the
//! tasks produced.

use crate::store::ShapeStore;
use collisions::GjkConfig;
use common::{CollisionGroup, Shape, ShapeId};
use rayon::ThreadPool;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use tracing::trace;

const NO_MATCH: u32 = u32::MAX;

/// Counts outstanding tasks; `wait` returns once it reaches zero.
#[derive(Debug)]
struct Latch {
    remaining: Mutex<usize>,
    done: Condvar,
}

impl Latch {
    fn new(count: usize) -> Self {
        Latch {
            remaining: Mutex::new(count),
            done: Condvar::new(),
        }
    }

    fn count_down(&self) {
        let mut remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        *remaining -= 1;
        if *remaining == 0 {
            self.done.notify_all();
        }
    }

    fn wait(&self) {
        let mut remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        while *remaining > 0 {
            remaining = self
                .done
                .wait(remaining)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Keeps the world's in-flight counter raised until the handle is joined or
/// dropped.
#[derive(Debug)]
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        InFlight(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Everything a chunk task needs, shared by all chunks of one query.
struct Scan {
    store: Arc<ShapeStore>,
    source: ShapeId,
    shape: Shape,
    gjk: GjkConfig,
    candidates: Arc<[ShapeId]>,
}

impl Scan {
    #[inline]
    fn matches(&self, id: ShapeId) -> bool {
        if id == self.source {
            return false;
        }
        match self.store.get(id) {
            Some(record) if record.enabled => {
                collisions::check(&self.shape, &record.shape, self.store.arena(), &self.gjk)
            }
            _ => false,
        }
    }

    fn chunk(&self, index: usize, chunk_size: usize) -> &[ShapeId] {
        let start = index * chunk_size;
        let end = (start + chunk_size).min(self.candidates.len());
        &self.candidates[start..end]
    }
}

/// Pending smallest colliding id. See [`BatchEngine::find_min`].
#[derive(Debug)]
pub struct MinQuery {
    latch: Arc<Latch>,
    partial: Arc<[AtomicU32]>,
    _in_flight: InFlight,
}

impl MinQuery {
    /// Blocks until every chunk finished and returns the smallest match.
    pub fn join(self) -> Option<ShapeId> {
        self.latch.wait();
        self.partial
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .filter(|raw| *raw != NO_MATCH)
            .min()
            .map(ShapeId)
    }
}

/// Pending set of colliding ids. See [`BatchEngine::find_all`].
#[derive(Debug)]
pub struct AllQuery {
    latch: Arc<Latch>,
    results: Receiver<ShapeId>,
    sort: bool,
    _in_flight: InFlight,
}

impl AllQuery {
    /// Blocks until every chunk finished. Ids come back ascending when the
    /// query was started with `sort`, otherwise in completion order.
    pub fn join(self) -> Vec<ShapeId> {
        self.latch.wait();
        let mut hits: Vec<ShapeId> = self.results.try_iter().collect();
        if self.sort {
            hits.sort_unstable();
        }
        hits
    }
}

/// Worker pool plus the settings shared by every batch query of a world.
pub(crate) struct BatchEngine {
    pool: Arc<ThreadPool>,
    chunk_size: usize,
    in_flight: Arc<AtomicUsize>,
}

impl BatchEngine {
    pub(crate) fn new(pool: ThreadPool, chunk_size: usize) -> Self {
        BatchEngine {
            pool: Arc::new(pool),
            chunk_size,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub(crate) fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub(crate) fn set_chunk_size(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size;
    }

    fn chunk_count(&self, candidates: usize) -> usize {
        (candidates + self.chunk_size - 1) / self.chunk_size
    }

    /// An already finished query with no results.
    pub(crate) fn empty_min(&self) -> MinQuery {
        MinQuery {
            latch: Arc::new(Latch::new(0)),
            partial: Arc::from(Vec::new()),
            _in_flight: InFlight::enter(&self.in_flight),
        }
    }

    pub(crate) fn empty_all(&self) -> AllQuery {
        let (_, results) = mpsc::channel();
        AllQuery {
            latch: Arc::new(Latch::new(0)),
            results,
            sort: false,
            _in_flight: InFlight::enter(&self.in_flight),
        }
    }

    pub(crate) fn find_min(
        &self,
        store: Arc<ShapeStore>,
        source: (ShapeId, Shape),
        group: CollisionGroup,
        candidates: Arc<[ShapeId]>,
        gjk: GjkConfig,
    ) -> MinQuery {
        let chunks = self.chunk_count(candidates.len());
        trace!(?group, candidates = candidates.len(), chunks, "batch find-min");
        let partial: Arc<[AtomicU32]> = (0..chunks).map(|_| AtomicU32::new(NO_MATCH)).collect();
        let latch = Arc::new(Latch::new(chunks));
        let scan = Arc::new(Scan {
            store,
            source: source.0,
            shape: source.1,
            gjk,
            candidates,
        });

        for index in 0..chunks {
            let scan = Arc::clone(&scan);
            let partial = Arc::clone(&partial);
            let latch = Arc::clone(&latch);
            let chunk_size = self.chunk_size;
            self.pool.spawn(move || {
                let best = scan
                    .chunk(index, chunk_size)
                    .iter()
                    .filter(|id| scan.matches(**id))
                    .map(|id| id.0)
                    .min();
                if let Some(best) = best {
                    partial[index].store(best, Ordering::Release);
                }
                drop(scan);
                latch.count_down();
            });
        }

        MinQuery {
            latch,
            partial,
            _in_flight: InFlight::enter(&self.in_flight),
        }
    }

    pub(crate) fn find_all(
        &self,
        store: Arc<ShapeStore>,
        source: (ShapeId, Shape),
        group: CollisionGroup,
        candidates: Arc<[ShapeId]>,
        gjk: GjkConfig,
        sort: bool,
    ) -> AllQuery {
        let chunks = self.chunk_count(candidates.len());
        trace!(?group, candidates = candidates.len(), chunks, "batch find-all");
        let (sender, results): (Sender<ShapeId>, _) = mpsc::channel();
        let latch = Arc::new(Latch::new(chunks));
        let scan = Arc::new(Scan {
            store,
            source: source.0,
            shape: source.1,
            gjk,
            candidates,
        });

        for index in 0..chunks {
            let scan = Arc::clone(&scan);
            let sender = sender.clone();
            let latch = Arc::clone(&latch);
            let chunk_size = self.chunk_size;
            self.pool.spawn(move || {
                for id in scan.chunk(index, chunk_size) {
                    if scan.matches(*id) {
                        // Fails only once the handle was dropped unjoined.
                        let _ = sender.send(*id);
                    }
                }
                drop(scan);
                latch.count_down();
            });
        }

        AllQuery {
            latch,
            results,
            sort,
            _in_flight: InFlight::enter(&self.in_flight),
        }
    }
}
