use mesh_ngin::data_structures::{
    mesh::{Mesh, WELD_EPSILON},
    vertex::Vertex,
};

#[test]
fn should_describe_position_then_colour() {
    let layout = Vertex::desc();

    assert_eq!(std::mem::size_of::<Vertex>(), 28);
    assert_eq!(layout.array_stride, 28);
    assert_eq!(layout.attributes[0].offset, 0);
    assert_eq!(layout.attributes[0].shader_location, 0);
    assert_eq!(layout.attributes[1].offset, 12);
    assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x4);
}

#[test]
fn should_build_the_rgb_triangle() {
    let triangle = Mesh::triangle();

    assert_eq!(triangle.vertex_count(), 3);
    assert_eq!(triangle.index_count(), 3);
    let colours: Vec<[f32; 4]> = triangle.vertices.iter().map(|v| v.color).collect();
    assert_eq!(
        colours,
        vec![
            [0.0, 0.0, 1.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 1.0]
        ]
    );
}

#[test]
fn should_merge_positions_within_tolerance() {
    let positions = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0 + WELD_EPSILON * 0.1, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ];
    let mesh = Mesh::weld("pair", &positions, &[[0, 1, 2], [3, 4, 5]]).unwrap();

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.indices, vec![[0, 1, 2], [1, 3, 2]]);
}

#[test]
fn should_keep_positions_further_apart_than_the_tolerance() {
    let positions = [[0.0, 0.0, 0.0], [WELD_EPSILON * 3.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let mesh = Mesh::weld("thin", &positions, &[[0, 1, 2]]).unwrap();

    assert_eq!(mesh.vertex_count(), 3);
}

#[test]
fn should_reject_indices_past_the_last_position() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    assert!(Mesh::weld("broken", &positions, &[[0, 1, 3]]).is_err());
}

#[test]
fn should_expand_indices_for_unindexed_drawing() {
    let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
    let mesh = Mesh::weld("quad", &positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();

    let expanded = mesh.unindexed();
    assert_eq!(expanded.len() as u32, mesh.index_count());
    assert_eq!(expanded[3].position, [0.0, 0.0, 0.0]);
    assert_eq!(mesh.flat_indices(), &[0, 1, 2, 0, 2, 3]);
}

#[test]
fn should_merge_close_positions_on_either_side_of_a_cell_boundary() {
    let positions = [
        [1.5 * WELD_EPSILON - 1e-7, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.5 * WELD_EPSILON + 1e-7, 0.0, 0.0],
    ];
    let mesh = Mesh::weld("seam", &positions, &[[0, 1, 2], [3, 1, 2]]).unwrap();

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![[0, 1, 2], [0, 1, 2]]);
}

#[test]
fn should_merge_close_positions_across_a_boundary_at_zero() {
    let positions = [[-1e-7, 0.0, 0.0], [1e-7, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let mesh = Mesh::weld("zero", &positions, &[[0, 1, 2]]).unwrap();

    assert_eq!(mesh.vertex_count(), 2);
}

#[test]
fn should_flag_out_of_range_indices_of_a_hand_built_mesh() {
    let vertices = vec![
        Vertex::solid([0.0, 0.0, 0.0]),
        Vertex::solid([1.0, 0.0, 0.0]),
        Vertex::solid([0.0, 1.0, 0.0]),
    ];
    let broken = Mesh::new("broken", vertices.clone(), vec![[0, 1, 3]]);
    let fine = Mesh::new("fine", vertices, vec![[0, 1, 2]]);

    assert!(broken.validate().is_err());
    assert!(fine.validate().is_ok());
    assert!(Mesh::triangle().validate().is_ok());
}
