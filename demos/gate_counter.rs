use anyhow::Result;
use gatecount::config::GateCountConfig;
use gatecount::examples::{scene, SceneWalker, WalkerGen};
use gatecount::pipeline::{Frame, LineCrossing};
use gatecount::trackers::notify::CrossingEvent;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

const DEFAULT_CONFIG: &str = r#"{
    "coords": [[10.0, 50.0], [90.0, 50.0]],
    "confidence_threshold": 0.85,
    "max_disappeared": 15
}"#;

fn main() -> Result<()> {
    env_logger::init();

    // an optional argument is the path to the JSON configuration
    let config = match std::env::args().nth(1) {
        Some(path) => GateCountConfig::from_file(path)?,
        None => GateCountConfig::from_json_str(DEFAULT_CONFIG)?,
    };

    let (detector, reidentifier) = scene(vec![
        SceneWalker {
            appears: 0,
            frames: 40,
            walk: WalkerGen::new(1, (300.0, 400.0), (0.0, -6.0), 128),
        },
        SceneWalker {
            appears: 10,
            frames: 40,
            walk: WalkerGen::new(2, (200.0, 90.0), (1.0, 6.0), 128),
        },
        SceneWalker {
            appears: 20,
            frames: 30,
            walk: WalkerGen::new(3, (420.0, 380.0), (-2.0, -5.0), 128),
        },
        SceneWalker {
            appears: 30,
            frames: 20,
            walk: WalkerGen::new(4, (100.0, 200.0), (8.0, 0.0), 128),
        },
    ]);
    let duration = detector.duration();

    let mut pipeline = LineCrossing::new(config, detector, reidentifier, |e: &CrossingEvent| {
        eprintln!(
            "Track {}: ({:.0}, {:.0}) -> ({:.0}, {:.0}), {:?}",
            e.track_id,
            e.first_point.x(),
            e.first_point.y(),
            e.last_point.x(),
            e.last_point.y(),
            e.direction
        )
    });

    let data = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    let frames = (0..duration).map(|_| Frame::new(&data, WIDTH, HEIGHT));
    let counts = pipeline.run(frames)?;

    println!("{}", serde_json::to_string(&counts)?);
    Ok(())
}
