use std::path::PathBuf;

pub fn fixture(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file_name)
}

#[cfg(feature = "integration-tests")]
pub async fn headless_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    use anyhow::Context;

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("No adapter for offscreen rendering")?;
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("test device"),
            ..Default::default()
        })
        .await?;
    Ok((device, queue))
}

#[cfg(feature = "integration-tests")]
pub fn to_rgba(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

#[cfg(feature = "integration-tests")]
pub fn assert_close(actual: image::Rgba<u8>, expected: image::Rgba<u8>) {
    let close = actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 1);
    assert!(close, "expected {expected:?}, got {actual:?}");
}
