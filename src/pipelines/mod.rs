//! Render pipeline definitions.
//!
//! There is a single pipeline, built in `mesh`. Its vertex entry point,
//! bind group layout and culling depend on [`mesh::PipelineOptions`].

pub mod mesh;
