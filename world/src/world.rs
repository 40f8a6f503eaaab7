//! The collision registry.
//!
//! A [`CollisionWorld`] owns every registered shape, the group buckets, the
//! optional quadtree, listener and receiver bindings and the batch worker
//! pool. Shapes are addressed by [`ShapeId`]s handed out by the world itself,
//! so several worlds can coexist without sharing anything.

mod maintenance;
mod queries;
mod shapes;
mod traversal;

pub use maintenance::ShapeDebug;

use crate::batch::BatchEngine;
use crate::buckets::GroupBuckets;
use crate::config::{BroadPhase, WorldConfig};
use crate::error::{CollisionError, CollisionResult};
use crate::listeners::Bindings;
use crate::store::ShapeStore;
use collisions::GjkConfig;
use common::ShapeId;
use quadtree::QuadTree;
use std::sync::Arc;

pub struct CollisionWorld {
    gjk: GjkConfig,
    // Shared with running batch queries; writes go through `store_mut`.
    store: Arc<ShapeStore>,
    buckets: GroupBuckets,
    quadtree: Option<QuadTree>,
    bindings: Bindings,
    batch: BatchEngine,
    next_id: u32,
}

impl CollisionWorld {
    pub fn new(config: WorldConfig) -> CollisionResult<Self> {
        if config.batch.chunk_size == 0 {
            return Err(CollisionError::InvalidChunkSize);
        }
        let quadtree = match config.broad_phase {
            BroadPhase::Buckets => None,
            BroadPhase::QuadTree(tree) => Some(QuadTree::new(tree)?),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch.worker_threads)
            .thread_name(|i| format!("collision-batch-{}", i))
            .build()?;
        Ok(CollisionWorld {
            gjk: config.gjk,
            store: Arc::new(ShapeStore::default()),
            buckets: GroupBuckets::default(),
            quadtree,
            bindings: Bindings::default(),
            batch: BatchEngine::new(pool, config.batch.chunk_size),
            next_id: 1,
        })
    }

    pub fn gjk_config(&self) -> &GjkConfig {
        &self.gjk
    }

    pub fn quadtree(&self) -> Option<&QuadTree> {
        self.quadtree.as_ref()
    }

    pub fn batch_chunk_size(&self) -> usize {
        self.batch.chunk_size()
    }

    pub fn set_batch_chunk_size(&mut self, chunk_size: usize) -> CollisionResult<()> {
        if chunk_size == 0 {
            return Err(CollisionError::InvalidChunkSize);
        }
        self.batch.set_chunk_size(chunk_size);
        Ok(())
    }

    fn store_mut(&mut self) -> &mut ShapeStore {
        debug_assert_eq!(
            self.batch.in_flight(),
            0,
            "world mutated while a batch query is in flight"
        );
        Arc::make_mut(&mut self.store)
    }

    fn allocate_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        debug_assert!(self.next_id < u32::MAX, "shape ids exhausted");
        self.next_id += 1;
        id
    }
}
