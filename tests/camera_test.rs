use approx::assert_relative_eq;
use cgmath::{Point3, Rad, Vector4};
use mesh_ngin::{
    camera::{Camera, CameraUniform, Projection},
    settings::Settings,
};

fn assert_components_eq(actual: Vector4<f32>, expected: [f32; 4]) {
    let actual: [f32; 4] = actual.into();
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *e, epsilon = 1e-6);
    }
}

#[test]
fn should_move_the_eye_to_the_view_origin() {
    let camera = Camera::default();
    let view = camera.calc_matrix();

    let eye = view * camera.eye.to_homogeneous();
    assert_components_eq(eye, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn should_look_down_positive_z_in_view_space() {
    let camera = Camera::default();
    let view = camera.calc_matrix();

    let target = view * Point3::new(0.0, 0.0, 0.0).to_homogeneous();
    assert_components_eq(target, [0.0, 0.0, 3.0, 1.0]);
}

#[test]
fn should_scale_by_field_of_view_and_aspect_ratio() {
    let projection = Projection::new(1600, 900, Rad(3.0), 0.1, 1000.0);
    let m = projection.calc_matrix();

    let y_scale = 1.0 / 1.5f32.tan();
    assert_relative_eq!(m[1][1], y_scale, epsilon = 1e-6);
    assert_relative_eq!(m[0][0], y_scale / (16.0 / 9.0), epsilon = 1e-6);
    assert_relative_eq!(m[1][1], 0.0709, epsilon = 1e-4);
    assert_relative_eq!(m[0][0], 0.0399, epsilon = 1e-4);
}

#[test]
fn should_map_near_and_far_plane_to_zero_and_one() {
    let m = Projection::new(1600, 900, Rad(3.0), 0.1, 1000.0).calc_matrix();

    let near = m * Vector4::new(0.0, 0.0, 0.1, 1.0);
    let far = m * Vector4::new(0.0, 0.0, 1000.0, 1.0);
    assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-6);
    assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
}

#[test]
fn should_not_divide_by_zero_for_a_zero_height() {
    let projection = Projection::new(800, 0, Rad(1.0), 0.1, 10.0);

    assert!(projection.aspect().is_finite());
}

#[test]
fn should_upload_matrices_column_by_column() {
    let settings = Settings::default();
    let projection = Projection::new(
        settings.width,
        settings.height,
        settings.fovy,
        settings.znear,
        settings.zfar,
    );
    let uniform = CameraUniform::new(&settings.camera, &projection);

    // w takes view-space z, which sits in the third column
    assert_eq!(uniform.projection[2][3], 1.0);
    assert_eq!(uniform.projection[3][3], 0.0);
    assert_relative_eq!(
        uniform.projection[3][2],
        -settings.zfar / (settings.zfar - settings.znear) * settings.znear,
        epsilon = 1e-6
    );
    assert_eq!(uniform.view[3][2], 3.0);
    assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
}
