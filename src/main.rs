//! # Voxel Editor Engine Demo
//!
//! A headless walk through an editing session: carve a room, notch a corner,
//! extrude a wall, then step back and forth through the history while the
//! workers remesh the chunks each step changed.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release [config.json]
//! ```

use cgmath::Point3;
use log::{error, info};
use voxel_editor_engine::{
    Direction, EditorConfig, EditorResult, EngineState, Extrude, FillRegion, PortalMode, Region,
    Selection, SetPortalable, WorldCommand,
};

fn main() {
    voxel_editor_engine::init_logging();

    if let Err(err) = run() {
        error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> EditorResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut engine = EngineState::new(config);

    let room = Region::new(Point3::new(0, 0, 0), Point3::new(7, 7, 7));
    engine.execute(Box::new(FillRegion::open(room)))?;
    engine.execute(Box::new(FillRegion::close(Region::single(Point3::new(0, 0, 0)))))?;
    engine.execute(Box::new(WorldCommand::new(SetPortalable::new(
        room.face(Direction::NegY),
        Direction::NegY,
        PortalMode::Set(true),
    ))))?;

    engine.set_selection(Selection::new(room, Direction::PosX));
    engine.execute(Box::new(WorldCommand::new(Extrude::new(12))))?;
    report(&mut engine, "after edits");

    while engine.undo() {}
    report(&mut engine, "after undoing everything");

    while engine.redo() {}
    report(&mut engine, "after redoing everything");

    Ok(())
}

fn report(engine: &mut EngineState, label: &str) {
    engine.finish_tasks();

    let mut chunks: Vec<_> = engine.mesh_cache().chunks().collect();
    chunks.sort_by_key(|chunk| (chunk.x, chunk.y, chunk.z));

    let mut total = 0;
    for chunk in chunks {
        let Some(cached) = engine.mesh_cache().peek(chunk) else {
            continue;
        };
        let quads = cached.mesh.quad_count();
        if quads > 0 {
            info!(
                "chunk {:?}: {} quads, vertices per material {:?}, meshed in {:?}",
                chunk,
                quads,
                cached.mesh.get_vertex_lens(),
                cached.elapsed
            );
        }
        total += quads;
    }

    info!(
        "{}: {} chunks stored, {} quads, undo '{}', redo '{}'",
        label,
        engine.world().get().chunk_count(),
        total,
        engine.command_stack().undo_name().unwrap_or("-"),
        engine.command_stack().redo_name().unwrap_or("-"),
    );
}
