use rayon::prelude::*;

use crate::buffer::pixel::{Abyss, PixelBuffer, SharedBuffer, copy_region};
use crate::engine::dispatch::Engine;
use crate::foundation::core::{NodeId, Rect};
use crate::foundation::error::{PixgraphError, PixgraphResult};
use crate::graph::model::Graph;
use crate::op::OUTPUT_PAD;

/// Tiling and threading for [`render_tiled`].
#[derive(Debug, Clone)]
pub struct TileOpts {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Evaluate tiles on a dedicated rayon pool.
    pub parallel: bool,
    /// Pool size override; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for TileOpts {
    fn default() -> Self {
        Self {
            tile_size: 128,
            parallel: false,
            threads: None,
        }
    }
}

/// Render `region` of `node` tile by tile and assemble the tiles into one buffer.
///
/// The result does not depend on `tile_size`, `parallel` or `threads`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(node = node.0, w = region.width, h = region.height, tile = opts.tile_size)
)]
pub fn render_tiled(
    engine: &Engine,
    graph: &Graph,
    node: NodeId,
    region: Rect,
    level: u32,
    opts: &TileOpts,
) -> PixgraphResult<PixelBuffer> {
    if opts.tile_size == 0 {
        return Err(PixgraphError::validation("tile_size must be >= 1"));
    }
    let format = graph
        .node(node)?
        .output_format()
        .cloned()
        .ok_or_else(|| PixgraphError::contract(format!("node {} is not prepared", node.0)))?;
    let mut out = engine.store().allocate(region, &format)?;
    let tiles = region.tiles(opts.tile_size);

    let render = |tile: &Rect| engine.process(graph, node, OUTPUT_PAD, *tile, level);
    let rendered: Vec<PixgraphResult<Option<SharedBuffer>>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| tiles.par_iter().map(render).collect())
    } else {
        tiles.iter().map(render).collect()
    };

    for (tile, result) in tiles.iter().zip(rendered) {
        if let Some(buf) = result? {
            copy_region(&buf, *tile, &mut out, *tile, Abyss::None)?;
        }
    }
    tracing::debug!(tiles = tiles.len(), "render_tiled done");
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> PixgraphResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PixgraphError::validation(
            "tile threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PixgraphError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/engine/tiles.rs"]
mod tests;
