//! Engine data structures: vertices and meshes.
//!
//! - `vertex` holds the fixed position + colour vertex layout
//! - `mesh` holds CPU-side mesh data and the vertex welding step

pub mod mesh;
pub mod vertex;
