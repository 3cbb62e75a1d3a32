#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor Engine
//!
//! The core of a voxel level editor: chunked voxel storage, a greedy surface
//! mesher and an undo/redo command engine built on copy-on-write edits.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership utilities used throughout the engine
//! * `engine_state` - The editing session and its subsystems: voxels, editing, meshing and tasks
//! * `config` - Session configuration loaded from JSON
//! * `error` - The crate's error type
//!
//! ## Architecture
//!
//! The world is a sparse map of 16x16x16 chunks of packed voxels. Every edit is a
//! command that writes through a copy-on-write layer over the world; committing
//! the layer records whole-chunk images so undo and redo restore exact state.
//! Chunks changed by an edit, and the neighbours sharing a face with a change,
//! are remeshed on worker threads by a greedy mesher that merges coplanar faces
//! of the same material into rectangles.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_editor_engine::{EditorConfig, EngineState, FillRegion, Region};
//!
//! voxel_editor_engine::init_logging();
//!
//! let mut engine = EngineState::new(EditorConfig::default());
//! let room = Region::new(Point3::new(0, 0, 0), Point3::new(7, 3, 7));
//! engine.execute(Box::new(FillRegion::open(room))).unwrap();
//! engine.finish_tasks();
//!
//! assert!(engine.undo());
//! assert!(engine.redo());
//! ```

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::EditorConfig;
pub use engine_state::{
    editing::{
        ChunkSnapshots, Command, CommandStack, EditContext, Extrude, FillRegion, ModifiedWorldLayer,
        PortalMode, Selection, SetPortalable, SetSubdivision, WorldCommand, WorldEdit,
    },
    rendering::{
        meshing::{greedy_quads, CachedMesh, FaceType, GreedyMesher, Mesh, MeshBatch, MeshCache, Quad},
        Vertex,
    },
    task_management::TaskManager,
    voxels::{
        chunk::{Chunk, CHUNK_DIMENSION},
        coords::{ChunkPos, LocalPos, VoxelPos},
        region::Region,
        view::{VoxelRead, VoxelView},
        voxel::{
            direction::{Axis, Direction},
            Voxel, MAX_SUBDIVISION,
        },
        world::World,
    },
    EngineState,
};
pub use error::{EditorError, EditorResult};

use log::info;

/// Installs the `env_logger` logger, writing to stdout and filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let installed = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok();

    if installed {
        info!("Logger initialized");
    }
}
