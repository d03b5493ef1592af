use std::io::{BufReader, Cursor};

use anyhow::{Context, bail};

use crate::data_structures::mesh::Mesh;

/// Parse OBJ text into a [`Mesh`].
///
/// Faces are fan-triangulated by `tobj`, positions are welded afterwards so
/// corners shared between faces with different normals or texture
/// coordinates end up as one vertex. Materials are ignored.
pub fn parse_obj(text: &str, file_name: &str) -> anyhow::Result<Mesh> {
    let mut obj_reader = BufReader::new(Cursor::new(text));

    let (models, _materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        // Only positions are used, so there is no point in resolving mtllib.
        |_| Err(tobj::LoadError::OpenFileFailed),
    )
    .with_context(|| format!("Failed to parse OBJ file {file_name}"))?;

    let Some(first) = models.first() else {
        bail!("{file_name} contains no meshes");
    };
    if models.len() > 1 {
        log::warn!(
            "{file_name} contains {} meshes, only the first ({:?}) is used",
            models.len(),
            first.name
        );
    }

    let mesh = &first.mesh;
    if mesh.indices.is_empty() {
        bail!("The first mesh of {file_name} has no faces");
    }

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let triangles: Vec<[u32; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Mesh::weld(file_name, &positions, &triangles)
}
