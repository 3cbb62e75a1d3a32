//! # Voxel Storage Core
//!
//! This module contains the voxel storage the editor works on: the packed
//! per-cell record, dense chunks, the sparse world, and the view traits that
//! let meshing and editing code run against any of them.
//!
//! ## Architecture
//!
//! * **Voxel**: open/closed state, per-face portalability and subdivision level
//! * **Chunk**: fixed-size 3D array of cells with bulk fill/copy/transform
//! * **World**: sparse map from chunk coordinate to chunk
//! * **View**: get/set/update/fill over global or chunk-relative addresses
//!
//! ## Data Flow
//!
//! 1. Edit commands write through a view (usually the copy-on-write edit layer)
//! 2. Finished edits are committed into the world chunk by chunk
//! 3. The chunks they touched, and their affected neighbours, are remeshed
//!
//! ## Thread Safety
//!
//! The world is not internally synchronized. Sessions share it behind a
//! read-write lock so meshing workers read a consistent snapshot while edits
//! hold exclusive access.

pub mod chunk;
pub mod coords;
pub mod region;
pub mod view;
pub mod voxel;
pub mod world;
