use std::sync::Arc;

use resono::{
    CapturePattern, Material, Mesh, OrderRange, RayTraceSettings, RayTracer, SampleBuffer, Scene,
    SharedBuffer, SourcePattern, Transducer, Vec3,
};

pub fn room(material: Material) -> Scene {
    let mut scene = Scene::new();
    scene
        .attach(&Mesh::cuboid(
            Vec3::new(-3.0, -2.5, -1.5),
            Vec3::new(4.0, 3.0, 1.5),
            material,
        ))
        .unwrap();
    scene
}

/// Single large wall at x = 1 facing the origin.
pub fn wall() -> Scene {
    let mut mesh = Mesh::new();
    mesh.add_position(Vec3::new(1.0, -10.0, -10.0));
    mesh.add_position(Vec3::new(1.0, 10.0, -10.0));
    mesh.add_position(Vec3::new(1.0, 0.0, 10.0));
    let m = mesh.add_material(Material { absorption: 0.5 });
    mesh.add_triangle([0, 1, 2], m);
    let mut scene = Scene::new();
    scene.attach(&mesh).unwrap();
    scene
}

pub fn tracer(settings: RayTraceSettings, scene: Scene) -> RayTracer {
    let mut tracer = RayTracer::with_settings(settings).unwrap();
    tracer.init().unwrap();
    tracer.set_scene(scene).unwrap();
    tracer
}

/// Adds the source and the capsule pair of the reference setup, returns the
/// capture indices left first.
pub fn add_stereo_pair(tracer: &mut RayTracer) -> [usize; 2] {
    tracer
        .add_source(
            Transducer::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.3048, 0.0, 0.0)),
            SourcePattern::Icosphere,
        )
        .unwrap();
    let left = tracer
        .add_capture(
            Transducer::new(Vec3::new(1.0, 0.04, 0.0), Vec3::new(-0.036, 0.036, 0.0)),
            CapturePattern::Cardioid,
        )
        .unwrap();
    let right = tracer
        .add_capture(
            Transducer::new(Vec3::new(1.0, -0.04, 0.0), Vec3::new(-0.036, -0.036, 0.0)),
            CapturePattern::Cardioid,
        )
        .unwrap();
    [left, right]
}

/// Binds `captures` to consecutive channels of a new buffer.
pub fn bind_all(
    tracer: &mut RayTracer,
    captures: &[usize],
    range: OrderRange,
    length: usize,
) -> SharedBuffer {
    let buffer = SampleBuffer::shared(captures.len(), length);
    for (channel, &capture) in captures.iter().enumerate() {
        tracer
            .bind(capture, Arc::clone(&buffer), channel, range)
            .unwrap();
    }
    buffer
}

pub fn channel(buffer: &SharedBuffer, channel: usize) -> Vec<f32> {
    buffer.lock().unwrap().channel(channel).unwrap().to_vec()
}
