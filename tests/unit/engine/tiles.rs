use super::*;
use crate::op::INPUT_PAD;
use crate::op::cast_space::CastSpaceOp;
use crate::op::linear_sinusoid::{LinearSinusoidOp, LinearSinusoidParams};
use crate::op::shift::{ShiftOp, ShiftParams};

fn pipeline(engine: &Engine) -> (Graph, NodeId) {
    let mut g = Graph::new();
    let pattern = g.add_node(
        LinearSinusoidOp::new(LinearSinusoidParams {
            x_period: 37.0,
            y_period: 23.0,
            rotation: 15.0,
            supersampling: 1,
            ..LinearSinusoidParams::default()
        })
        .unwrap(),
    );
    let s = g.add_node(
        ShiftOp::new(ShiftParams {
            shift: 9,
            seed: 4,
            ..ShiftParams::default()
        })
        .unwrap(),
    );
    let cast = g.add_node(CastSpaceOp::default());
    g.connect(pattern, s, INPUT_PAD).unwrap();
    g.connect(s, cast, INPUT_PAD).unwrap();
    engine.prepare(&mut g).unwrap();
    (g, cast)
}

#[test]
fn tiling_does_not_change_the_result() {
    let engine = Engine::default();
    let (g, out) = pipeline(&engine);
    let region = Rect::new(-13, 7, 70, 45);
    let whole = engine
        .process(&g, out, OUTPUT_PAD, region, 0)
        .unwrap()
        .unwrap();
    for tile_size in [1, 7, 16, 128] {
        let opts = TileOpts {
            tile_size,
            ..TileOpts::default()
        };
        let tiled = render_tiled(&engine, &g, out, region, 0, &opts).unwrap();
        assert_eq!(tiled.extent(), region);
        assert_eq!(tiled.format(), whole.format());
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                assert_eq!(tiled.pixel(x, y), whole.pixel(x, y), "tile_size {tile_size} ({x}, {y})");
            }
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    let engine = Engine::default();
    let (g, out) = pipeline(&engine);
    let region = Rect::new(0, 0, 96, 64);
    let seq = render_tiled(&engine, &g, out, region, 0, &TileOpts::default()).unwrap();
    let par = render_tiled(
        &engine,
        &g,
        out,
        region,
        0,
        &TileOpts {
            tile_size: 16,
            parallel: true,
            threads: Some(3),
        },
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn bad_tile_options_are_rejected() {
    let engine = Engine::default();
    let (g, out) = pipeline(&engine);
    let region = Rect::new(0, 0, 4, 4);
    let zero_tile = TileOpts {
        tile_size: 0,
        ..TileOpts::default()
    };
    assert!(matches!(
        render_tiled(&engine, &g, out, region, 0, &zero_tile),
        Err(PixgraphError::Validation(_))
    ));
    let zero_threads = TileOpts {
        parallel: true,
        threads: Some(0),
        ..TileOpts::default()
    };
    assert!(matches!(
        render_tiled(&engine, &g, out, region, 0, &zero_threads),
        Err(PixgraphError::Validation(_))
    ));
}

#[test]
fn infinite_region_cannot_be_rendered() {
    let engine = Engine::default();
    let (g, out) = pipeline(&engine);
    assert!(matches!(
        render_tiled(&engine, &g, out, Rect::INFINITE, 0, &TileOpts::default()),
        Err(PixgraphError::Allocation(_))
    ));
}
