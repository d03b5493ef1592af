use std::path::Path;

use anyhow::{Context, bail};
use gltf::mesh::Mode;

use crate::{data_structures::mesh::Mesh, resources::load_binary_from_path};

/// Parse a glTF 2.0 document (JSON or GLB) into a [`Mesh`].
///
/// Only the first mesh is read. All of its triangle primitives are merged;
/// strips and fans are converted to triangle lists. External buffers are
/// resolved relative to `base_dir`.
pub async fn parse_gltf(data: &[u8], base_dir: &Path, file_name: &str) -> anyhow::Result<Mesh> {
    let gltf = gltf::Gltf::from_slice(data)
        .with_context(|| format!("Failed to parse glTF file {file_name}"))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffer_data.push(blob.into()),
                None => bail!("{file_name} references a binary chunk it does not contain"),
            },
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                bail!("{file_name}: embedded data URIs are not supported, use a .bin or .glb")
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary_from_path(&base_dir.join(uri)).await?;
                buffer_data.push(bin);
            }
        }
    }

    let mut meshes = gltf.meshes();
    let mesh_count = meshes.len();
    let Some(mesh) = meshes.next() else {
        bail!("{file_name} contains no meshes");
    };
    if mesh_count > 1 {
        log::warn!(
            "{file_name} contains {mesh_count} meshes, only the first ({:?}) is used",
            mesh.name()
        );
    }

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    for primitive in mesh.primitives() {
        let mode = primitive.mode();
        if !matches!(mode, Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan) {
            log::warn!(
                "Skipping primitive {} of {file_name}: {mode:?} is not a triangle mode",
                primitive.index()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
        let Some(read_positions) = reader.read_positions() else {
            log::warn!("Skipping primitive {} of {file_name}: no positions", primitive.index());
            continue;
        };
        let base = positions.len() as u32;
        positions.extend(read_positions);
        let count = positions.len() as u32 - base;

        let local: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..count).collect(),
        };
        triangles.extend(
            triangulate(mode, &local)
                .into_iter()
                .map(|tri| tri.map(|i| i + base)),
        );
    }

    if triangles.is_empty() {
        bail!("The first mesh of {file_name} has no triangles");
    }

    Mesh::weld(file_name, &positions, &triangles)
}

fn triangulate(mode: Mode, indices: &[u32]) -> Vec<[u32; 3]> {
    match mode {
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            // every other triangle of a strip is wound the opposite way
            .map(|(i, w)| if i % 2 == 0 { [w[0], w[1], w[2]] } else { [w[1], w[0], w[2]] })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&first, rest)) => rest.windows(2).map(|w| [first, w[0], w[1]]).collect(),
            None => Vec::new(),
        },
        _ => indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
    }
}
