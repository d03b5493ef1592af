#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod gpu {
    use mesh_ngin::{
        Deg,
        camera::{Camera, CameraUniform, Projection},
        context::{SceneResources, load_geometry},
        data_structures::vertex::MESH_COLOR,
        render::{CAPTURE_FORMAT, capture_frame},
        resources::load_shaders,
        settings::Settings,
    };

    use crate::common::test_utils::{assert_close, headless_device, to_rgba};

    const SIZE: (u32, u32) = (128, 128);

    async fn render(settings: &Settings) -> image::RgbaImage {
        let (device, queue) = headless_device().await.unwrap();
        let mesh = load_geometry(&settings.geometry).await.unwrap();
        let shaders = load_shaders(&settings.vertex_shader, &settings.pixel_shader)
            .await
            .unwrap();
        let camera = settings.use_camera.then(|| {
            let projection = Projection::new(
                SIZE.0,
                SIZE.1,
                settings.fovy,
                settings.znear,
                settings.zfar,
            );
            CameraUniform::new(&settings.camera, &projection)
        });
        let scene = SceneResources::new(
            &device,
            CAPTURE_FORMAT,
            &mesh,
            camera,
            &shaders,
            settings.pipeline_options(),
        )
        .unwrap();

        capture_frame(&device, &queue, &scene, settings.clear_colour, SIZE)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_draw_the_cube_in_the_mesh_colour() {
        // far enough back that the corners see past the cube
        let mut settings = Settings::default().with_fovy(Deg(45.0));
        settings.camera = Camera::new((0.0, 0.0, 10.0), (0.0, 0.0, 0.0), (0.0, 1.0, 0.0));
        let frame = render(&settings).await;

        let clear = to_rgba(settings.clear_colour);
        let mesh = image::Rgba(MESH_COLOR.map(|c| (c * 255.0).round() as u8));
        assert_close(*frame.get_pixel(0, 0), clear);
        assert_close(*frame.get_pixel(SIZE.0 / 2, SIZE.1 / 2), mesh);
    }

    #[tokio::test]
    async fn should_draw_the_triangle_in_the_centre() {
        let settings = Settings::triangle();
        let frame = render(&settings).await;

        let clear = to_rgba(settings.clear_colour);
        assert_close(*frame.get_pixel(0, 0), clear);
        assert_ne!(*frame.get_pixel(SIZE.0 / 2, SIZE.1 / 2), clear);
    }
}
