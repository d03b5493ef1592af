use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use crate::data_structures::mesh::Mesh;

/**
 * This module contains all logic for loading meshes and shaders from external files.
 *
 * File names are resolved against the assets root (`./assets/`).
 */
pub mod gltf_model;
pub mod obj;

pub use gltf_model::parse_gltf;
pub use obj::parse_obj;

/// WGSL source of the vertex and pixel stage.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub pixel: String,
}

pub fn asset_path(file_name: &str) -> PathBuf {
    Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    load_string_from_path(&asset_path(file_name)).await
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    load_binary_from_path(&asset_path(file_name)).await
}

pub async fn load_string_from_path(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn load_binary_from_path(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Load the first mesh of a model file below the assets root.
pub async fn load_mesh(file_name: &str) -> anyhow::Result<Mesh> {
    load_mesh_from_path(&asset_path(file_name)).await
}

/// Load the first mesh of a model file. The format is picked by extension:
/// `.obj`, `.gltf` or `.glb`.
pub async fn load_mesh_from_path(path: &Path) -> anyhow::Result<Mesh> {
    let file_name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let mesh = match extension.as_deref() {
        Some("obj") => {
            let obj_text = load_string_from_path(path).await?;
            parse_obj(&obj_text, &file_name)?
        }
        Some("gltf") | Some("glb") => {
            let data = load_binary_from_path(path).await?;
            let base_dir = path.parent().unwrap_or(Path::new("./"));
            parse_gltf(&data, base_dir, &file_name).await?
        }
        _ => bail!("Unsupported model format: {file_name}"),
    };

    log::info!(
        "Loaded {file_name}: {} vertices, {} indices",
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

pub async fn load_shaders(vertex: &str, pixel: &str) -> anyhow::Result<ShaderSources> {
    let (vertex, pixel) = futures::try_join!(load_string(vertex), load_string(pixel))
        .context("Failed to load shaders")?;
    Ok(ShaderSources { vertex, pixel })
}
