use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::buffer::pixel::{PixelBuffer, SharedBuffer};
use crate::color::format::Format;
use crate::foundation::core::{NodeId, Rect};
use crate::foundation::error::{PixgraphError, PixgraphResult};

/// Boundary to the tiled buffer storage backend.
///
/// The engine allocates every output through the store and may ask it to retain finished outputs
/// per node. Synchronization of the retention table is the implementation's responsibility.
pub trait BufferStore: Send + Sync {
    /// Allocate a zero-filled buffer covering `region`.
    fn allocate(&self, region: Rect, format: &Format) -> PixgraphResult<PixelBuffer>;

    /// A retained output of `node` computed at `level` whose extent covers `region`, if any.
    fn get(&self, node: NodeId, level: u32, region: Rect) -> Option<SharedBuffer>;

    /// Offer a finished output of `node` computed at `level` for retention. The store may decline.
    fn put(&self, node: NodeId, level: u32, buffer: &SharedBuffer);

    /// Forget every retained output of `node`, at every level.
    fn invalidate(&self, node: NodeId);
}

/// Limits for [`MemoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryStoreOpts {
    /// Maximum bytes retained across all nodes. `0` disables retention.
    pub max_retained_bytes: usize,
    /// Maximum number of retained buffers per node.
    pub max_buffers_per_node: usize,
    /// Largest single allocation in bytes.
    pub max_alloc_bytes: usize,
}

impl Default for MemoryStoreOpts {
    fn default() -> Self {
        Self {
            max_retained_bytes: 0,
            max_buffers_per_node: 8,
            max_alloc_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Counters reported by [`MemoryStore::stats`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Buffers currently retained.
    pub retained_buffers: usize,
    /// Bytes currently retained.
    pub retained_bytes: usize,
    /// Buffers allocated so far.
    pub alloc_buffers: u64,
    /// Bytes allocated so far.
    pub alloc_bytes: u64,
    /// Lookups answered from retained buffers.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Offered buffers that were not retained because of a limit.
    pub dropped_on_put: u64,
}

#[derive(Default)]
struct Inner {
    stats: MemoryStoreStats,
    by_node: HashMap<NodeId, Vec<(u32, SharedBuffer)>>,
}

/// In-memory [`BufferStore`] with bounded retention.
///
/// Retention is per node and only at dispatch granularity, never per pixel.
#[derive(Default)]
pub struct MemoryStore {
    opts: MemoryStoreOpts,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create a store with the given limits.
    pub fn new(opts: MemoryStoreOpts) -> Self {
        Self {
            opts,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Snapshot of the store counters.
    pub fn stats(&self) -> MemoryStoreStats {
        self.lock().stats.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BufferStore for MemoryStore {
    fn allocate(&self, region: Rect, format: &Format) -> PixgraphResult<PixelBuffer> {
        let bytes = region
            .area()
            .saturating_mul(format.channels() as u64)
            .saturating_mul(std::mem::size_of::<f32>() as u64);
        if !region.is_infinite() && bytes > self.opts.max_alloc_bytes as u64 {
            return Err(PixgraphError::allocation(format!(
                "{}x{} {} needs {bytes} bytes, limit is {}",
                region.width,
                region.height,
                format.encoding.name(),
                self.opts.max_alloc_bytes
            )));
        }
        let buffer = PixelBuffer::new(region, format.clone())?;
        let mut inner = self.lock();
        inner.stats.alloc_buffers = inner.stats.alloc_buffers.saturating_add(1);
        inner.stats.alloc_bytes = inner.stats.alloc_bytes.saturating_add(bytes);
        Ok(buffer)
    }

    fn get(&self, node: NodeId, level: u32, region: Rect) -> Option<SharedBuffer> {
        let mut inner = self.lock();
        let found = inner.by_node.get(&node).and_then(|bufs| {
            bufs.iter()
                .find(|(l, b)| *l == level && b.extent().contains(region))
                .map(|(_, b)| SharedBuffer::clone(b))
        });
        if found.is_some() {
            inner.stats.hits = inner.stats.hits.saturating_add(1);
        } else {
            inner.stats.misses = inner.stats.misses.saturating_add(1);
        }
        found
    }

    fn put(&self, node: NodeId, level: u32, buffer: &SharedBuffer) {
        let mut inner = self.lock();
        let bytes = buffer.byte_len();
        let over_bytes =
            inner.stats.retained_bytes.saturating_add(bytes) > self.opts.max_retained_bytes;
        let per_node = inner.by_node.get(&node).map_or(0, Vec::len);
        if over_bytes || per_node >= self.opts.max_buffers_per_node {
            inner.stats.dropped_on_put = inner.stats.dropped_on_put.saturating_add(1);
            return;
        }
        inner
            .by_node
            .entry(node)
            .or_default()
            .push((level, SharedBuffer::clone(buffer)));
        inner.stats.retained_buffers = inner.stats.retained_buffers.saturating_add(1);
        inner.stats.retained_bytes = inner.stats.retained_bytes.saturating_add(bytes);
    }

    fn invalidate(&self, node: NodeId) {
        let mut inner = self.lock();
        if let Some(bufs) = inner.by_node.remove(&node) {
            let bytes: usize = bufs.iter().map(|(_, b)| b.byte_len()).sum();
            inner.stats.retained_buffers = inner.stats.retained_buffers.saturating_sub(bufs.len());
            inner.stats.retained_bytes = inner.stats.retained_bytes.saturating_sub(bytes);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/store.rs"]
mod tests;
