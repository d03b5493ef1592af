//! CPU-side mesh data.
//!
//! A [`Mesh`] is what the model loaders hand to the device context: a vertex
//! list plus triangle index triples. It is built once during start-up and never
//! changed afterwards.

use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::data_structures::vertex::Vertex;

/// Positions closer than this on every axis are merged into a single vertex
/// by [`Mesh::weld`].
pub const WELD_EPSILON: f32 = 1e-5;

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// The hard-coded red/green/blue triangle of the first bootstrap stage.
    ///
    /// Positions are already in clip space, so it is meant to be drawn
    /// without a camera.
    pub fn triangle() -> Self {
        Self::new(
            "triangle",
            vec![
                Vertex::new([0.0, 0.5, 0.5], [0.0, 0.0, 1.0, 1.0]),
                Vertex::new([0.5, -0.5, 0.5], [0.0, 1.0, 0.0, 1.0]),
                Vertex::new([-0.5, -0.5, 0.5], [1.0, 0.0, 0.0, 1.0]),
            ],
            vec![[0, 1, 2]],
        )
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices, i.e. three per triangle.
    pub fn index_count(&self) -> u32 {
        (self.indices.len() * 3) as u32
    }

    /// Index triples as one flat list, ready for an index buffer.
    pub fn flat_indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.indices)
    }

    /// One vertex per index, for drawing without an index buffer.
    ///
    /// Panics on an index past the last vertex; [`validate`](Self::validate)
    /// first when the mesh was not built by [`weld`](Self::weld).
    pub fn unindexed(&self) -> Vec<Vertex> {
        self.flat_indices()
            .iter()
            .map(|&i| self.vertices[i as usize])
            .collect()
    }

    /// Fails if a triangle references a vertex that does not exist.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        for (t, tri) in self.indices.iter().enumerate() {
            if let Some(&i) = tri.iter().find(|&&i| i as usize >= count) {
                bail!(
                    "triangle {t} of {} references vertex {i}, but only {count} exist",
                    self.name
                );
            }
        }
        Ok(())
    }

    /// Build a mesh from raw positions and triangles, merging vertices whose
    /// positions lie within [`WELD_EPSILON`] of each other on every axis.
    ///
    /// Every resulting vertex gets the solid mesh colour. Fails if a triangle
    /// references a position that does not exist.
    pub fn weld(name: &str, positions: &[[f32; 3]], triangles: &[[u32; 3]]) -> Result<Self> {
        let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::with_capacity(positions.len());
        let mut vertices: Vec<Vertex> = Vec::with_capacity(positions.len());
        let mut remap = Vec::with_capacity(positions.len());
        for p in positions {
            let cell = cell_of(p);
            let existing = neighbours(cell)
                .filter_map(|c| grid.get(&c))
                .flatten()
                .copied()
                .find(|&v| close(&vertices[v as usize].position, p));
            let index = match existing {
                Some(index) => index,
                None => {
                    let index = vertices.len() as u32;
                    vertices.push(Vertex::solid(*p));
                    grid.entry(cell).or_default().push(index);
                    index
                }
            };
            remap.push(index);
        }

        let mut indices = Vec::with_capacity(triangles.len());
        for (t, tri) in triangles.iter().enumerate() {
            let mut welded = [0u32; 3];
            for (slot, &i) in welded.iter_mut().zip(tri.iter()) {
                match remap.get(i as usize) {
                    Some(&new) => *slot = new,
                    None => bail!(
                        "triangle {t} of {name} references vertex {i}, but only {} exist",
                        positions.len()
                    ),
                }
            }
            indices.push(welded);
        }

        log::debug!(
            "welded {name}: {} raw vertices -> {} unique",
            positions.len(),
            vertices.len()
        );
        Ok(Self::new(name, vertices, indices))
    }
}

// Cells are WELD_EPSILON wide, so positions within tolerance of each other
// sit in the same or an adjacent cell.
fn cell_of(p: &[f32; 3]) -> [i64; 3] {
    p.map(|c| (c / WELD_EPSILON).floor() as i64)
}

fn neighbours(cell: [i64; 3]) -> impl Iterator<Item = [i64; 3]> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dz| [cell[0] + dx, cell[1] + dy, cell[2] + dz])
        })
    })
}

fn close(a: &[f32; 3], b: &[f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= WELD_EPSILON)
}
