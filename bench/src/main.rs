use resono::{
    CapturePattern, Material, Mesh, OrderRange, RayTraceSettings, RayTracer, SampleBuffer, Scene,
    SharedBuffer, SourcePattern, Transducer, Vec3,
};
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc, time::Instant};

macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                panic!("{}: {:?}", $msg, why);
            }
        }
    };
}

const BUFFER_SECONDS: f32 = 2.0;
const ITERATIONS: usize = 3;

#[derive(Deserialize)]
#[serde(default)]
struct BenchSettings {
    trace: RayTraceSettings,
    thread_counts: Vec<usize>,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            trace: RayTraceSettings::default(),
            thread_counts: vec![1, 2, 4, 0],
        }
    }
}

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        // .level(log::LevelFilter::Debug)
        .level(log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("bench.log")?)
        .apply()?;
    Ok(())
}

fn load_settings(path: Option<PathBuf>) -> BenchSettings {
    match path {
        Some(path) => {
            let file = expect!(std::fs::File::open(&path), "Failed to open settings");
            expect!(serde_yaml::from_reader(file), "Failed to parse settings")
        }
        None => BenchSettings::default(),
    }
}

fn reference_room() -> Scene {
    let mut scene = Scene::new();
    expect!(
        scene.attach(&Mesh::cuboid(
            Vec3::new(-3.0, -2.5, -1.5),
            Vec3::new(4.0, 3.0, 1.5),
            Material::CONCRETE,
        )),
        "Failed to attach room"
    );
    scene
}

// Order ranges bound to both captures
fn ranges() -> [(&'static str, OrderRange); 5] {
    [
        ("direct", OrderRange::DIRECT),
        ("early", OrderRange { min: 1, max: Some(3) }),
        ("late", OrderRange { min: 4, max: None }),
        ("all", OrderRange::ALL),
        ("indirect", OrderRange::INDIRECT),
    ]
}

fn setup(settings: &RayTraceSettings) -> (RayTracer, Vec<SharedBuffer>) {
    let mut tracer = expect!(
        RayTracer::with_settings(*settings),
        "Invalid trace settings"
    );
    expect!(tracer.init(), "Failed to init tracer");
    expect!(tracer.set_scene(reference_room()), "Failed to set scene");
    expect!(
        tracer.add_source(
            Transducer::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.3048, 0.0, 0.0)),
            SourcePattern::Icosphere,
        ),
        "Failed to add source"
    );
    let left = expect!(
        tracer.add_capture(
            Transducer::new(Vec3::new(1.0, 0.04, 0.0), Vec3::new(-0.036, 0.036, 0.0)),
            CapturePattern::Cardioid,
        ),
        "Failed to add capture"
    );
    let right = expect!(
        tracer.add_capture(
            Transducer::new(Vec3::new(1.0, -0.04, 0.0), Vec3::new(-0.036, -0.036, 0.0)),
            CapturePattern::Cardioid,
        ),
        "Failed to add capture"
    );

    let length = (BUFFER_SECONDS * settings.sample_rate as f32) as usize;
    let buffers = ranges()
        .iter()
        .map(|&(_, range)| {
            let buffer = SampleBuffer::shared(2, length);
            for (channel, capture) in [left, right].into_iter().enumerate() {
                expect!(
                    tracer.bind(capture, Arc::clone(&buffer), channel, range),
                    "Failed to bind capture"
                );
            }
            buffer
        })
        .collect();

    (tracer, buffers)
}

fn bench(settings: &RayTraceSettings, thread_count: usize) {
    let mut best = f32::INFINITY;
    let mut buffers = Vec::new();
    for _ in 0..ITERATIONS {
        let (tracer, bufs) = setup(settings);
        let start = Instant::now();
        let stats = expect!(tracer.process(thread_count, 1.0), "Trace failed");
        best = best.min(start.elapsed().as_secs_f32());
        log::debug!("{:?}", stats);
        buffers = bufs;
    }

    println!(
        "{:>2} threads took {:7.2} ms at best",
        thread_count,
        best * 1e3
    );
    for ((name, range), buffer) in ranges().iter().zip(buffers.iter()) {
        let buffer = expect!(buffer.lock(), "Buffer lock poisoned");
        println!(
            "  {:<8} {:<8} total {:.6e} {:.6e}",
            name,
            range.to_string(),
            buffer.total(0),
            buffer.total(1)
        );
    }
}

fn main() {
    if let Err(why) = setup_logger() {
        panic!("{}", why);
    };

    let settings = load_settings(std::env::args().nth(1).map(PathBuf::from));
    log::info!("Settings {:?}", settings.trace);

    for &thread_count in &settings.thread_counts {
        bench(&settings.trace, thread_count);
    }
}
