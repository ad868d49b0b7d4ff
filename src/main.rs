//! Headless demo: a ring of walking humanoids seen from an orbiting camera.
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::{Vec2, Vec3};
use log::{debug, info};
use rigsight::prelude::*;
use rigsight::init_logging;

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
const FIELD_OF_VIEW: f32 = 60.0;
const RING_RADIUS: f32 = 12.0;
const ORBIT_RADIUS: f32 = 30.0;
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Renders rig overlays for a simulated scene and logs each frame
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON overlay config; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 120)]
    frames: u32,
    /// Number of humanoids in the ring
    #[arg(short, long, default_value_t = 6)]
    entities: u32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[expect(clippy::cast_precision_loss, reason = "small frame and entity counts")]
fn fraction(index: u32, count: u32) -> f32 {
    index as f32 / count.max(1) as f32
}

fn orbit_camera(frame: u32, frames: u32) -> PerspectiveCamera {
    let angle = fraction(frame, frames) * TAU;
    let eye = Vec3::new(angle.sin() * ORBIT_RADIUS, 6.0, angle.cos() * ORBIT_RADIUS);
    PerspectiveCamera::looking_at(eye, Vec3::ZERO, VIEWPORT, FIELD_OF_VIEW)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => OverlayConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => OverlayConfig::default(),
    };

    let scene = HeadlessScene::new();
    let screen = HeadlessScreen::new();
    let lifecycle = HeadlessLifecycle::new();
    let mut manager = OverlayManager::new(
        config,
        orbit_camera(0, args.frames),
        scene.clone(),
        screen.clone(),
        lifecycle.clone(),
    );

    let viewer = scene.spawn_entity("Viewer", 100.0, 100.0);
    manager.set_viewer(viewer);

    let start = Instant::now();
    let mut walkers = Vec::new();
    for index in 0..args.entities {
        let angle = fraction(index, args.entities) * TAU;
        let position = Vec3::new(angle.sin(), 0.0, angle.cos()) * RING_RADIUS;
        let entity = scene.spawn_humanoid(
            &format!("Walker {index}"),
            position,
            &manager.config().parts,
        );
        scene.set_health(entity, 100.0 - fraction(index, args.entities) * 90.0, 100.0);
        let tracking = manager.track(entity, start);
        debug!("entity {entity}: {tracking:?}");
        walkers.push((entity, Vec3::new(angle.cos(), 0.0, -angle.sin()) * 0.05));
    }
    info!("session started with {} entities", walkers.len());

    let removal_frame = args.frames / 2;
    for frame in 0..args.frames {
        let now = start + FRAME_TIME * frame;
        if frame == removal_frame {
            if let Some((entity, _)) = walkers.pop() {
                scene.despawn(entity);
                let notified = lifecycle.emit_removed(entity);
                info!("frame {frame}: entity {entity} removed ({notified} listener(s))");
            }
        }
        for (entity, step) in &walkers {
            scene.translate(*entity, *step);
        }
        manager.set_camera(orbit_camera(frame, args.frames));

        let report = manager.tick(now);
        debug!("frame {frame}: {report:?}");
    }

    for label in screen.labels().iter().filter(|label| !label.removed) {
        info!("{} {}", label.name, label.stats);
    }
    manager.shutdown();
    info!(
        "session finished: {} line(s) and {} label(s) still live",
        screen.live_lines(),
        screen.live_labels()
    );
    Ok(())
}
