//! Headless demo that flies a camera around a triacontahedral globe.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p triaconta-demo -- --frames 600 --seed 3`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{error, info, warn};
use triaconta_config::{CliArgs, Config};
use triaconta_globe::{FrameStats, Globe, GlobeError};
use triaconta_mesh::{BiomeTag, FaceTerrain, Overlay, ResourceTag, TerrainTile};
use triaconta_polyhedron::{Direction, FaceId, TileAddress};

/// Frame at which the second half of the terrain arrives.
const LATE_TERRAIN_FRAME: u32 = 10;

const BIOME_SEEDS: usize = 6;
const BIOME_COUNT: u16 = 8;
const RESOURCE_COUNT: u16 = 4;
const RESOURCE_CHANCE: f64 = 0.03;

/// Voronoi-style biome patches with scattered resources, reproducible per
/// `(seed, face)`.
fn generate_terrain(seed: u64, face: FaceId, resolution: u32) -> FaceTerrain {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed ^ (u64::from(face.0) << 32));
    let sites: Vec<(f64, f64, u16)> = (0..BIOME_SEEDS)
        .map(|_| {
            (
                rng.gen_range(0.0..1.0),
                rng.gen_range(0.0..1.0),
                rng.gen_range(0..BIOME_COUNT),
            )
        })
        .collect();

    let mut terrain = FaceTerrain::filled(resolution, TerrainTile::default());
    let scale = f64::from(resolution);
    for row in 0..resolution {
        for col in 0..resolution {
            let u = (f64::from(col) + 0.5) / scale;
            let v = (f64::from(row) + 0.5) / scale;
            let biome = sites
                .iter()
                .min_by(|a, b| {
                    let da = (a.0 - u).powi(2) + (a.1 - v).powi(2);
                    let db = (b.0 - u).powi(2) + (b.1 - v).powi(2);
                    da.total_cmp(&db)
                })
                .map_or(0, |site| site.2);
            let resource = rng
                .gen_bool(RESOURCE_CHANCE)
                .then(|| ResourceTag(rng.gen_range(0..RESOURCE_COUNT)));
            terrain.set(
                row,
                col,
                TerrainTile {
                    biome: BiomeTag(biome),
                    resource,
                },
            );
        }
    }
    terrain
}

/// Camera on a descending spiral: from distance 3.0 down to 1.2.
fn camera_at(frame: u32, frames: u32) -> DVec3 {
    let t = f64::from(frame) / f64::from(frames.max(1));
    let distance = 3.0 - 1.8 * t;
    let longitude = t * std::f64::consts::TAU * 2.0;
    let latitude = 0.6 * (t * std::f64::consts::TAU).sin();
    DVec3::new(
        latitude.cos() * longitude.cos(),
        latitude.sin(),
        latitude.cos() * longitude.sin(),
    ) * distance
}

fn deliver_faces(
    globe: &mut Globe,
    seed: u64,
    faces: impl Iterator<Item = usize>,
) -> Result<(), GlobeError> {
    let resolution = globe.resolution();
    for face in faces {
        let face = FaceId(face as u16);
        globe.deliver_terrain(face, generate_terrain(seed, face, resolution))?;
    }
    Ok(())
}

/// Pretend to upload dirty colour buffers. Returns the bytes "sent".
fn upload_colors(globe: &mut Globe) -> usize {
    let mut bytes = 0;
    for handle in globe.raycast_targets() {
        if let Some(mesh) = globe.mesh_mut(handle)
            && mesh.colors_dirty()
        {
            bytes += mesh.color_bytes().len();
            mesh.mark_colors_uploaded();
        }
    }
    bytes
}

fn run(config: &Config, args: &CliArgs) -> Result<(), GlobeError> {
    let mut globe = Globe::from_config(config)?;
    let face_count = globe.face_count();
    let half = face_count / 2;
    deliver_faces(&mut globe, args.seed, 0..half)?;

    let mut totals = FrameStats::default();
    let mut uploaded = 0;
    let mut hovered: Option<TileAddress> = None;

    for frame in 0..args.frames {
        if frame == LATE_TERRAIN_FRAME {
            deliver_faces(&mut globe, args.seed, half..face_count)?;
            info!(frame, faces = face_count - half, "late terrain arrived");
        }

        let camera = camera_at(frame, args.frames);
        let stats = globe.update(camera);
        totals.built += stats.built;
        totals.reused += stats.reused;
        totals.hidden += stats.hidden;
        totals.recolored += stats.recolored;

        let below = globe.tile_at_direction(camera);
        if below != hovered {
            if let Some(previous) = hovered {
                globe.clear_overlay(previous)?;
            }
            if let Some(tile) = below {
                globe.set_overlay(tile, Overlay::Hover)?;
            }
            hovered = below;
        }
        uploaded += upload_colors(&mut globe);

        if frame % 60 == 0 {
            info!(
                frame,
                distance = camera.length(),
                visible = stats.visible_cells,
                built = stats.built,
                deferred = stats.deferred,
                "frame"
            );
        }
    }

    let resolution = globe.resolution();
    let start = TileAddress::new(FaceId(0), 1, 1);
    let end = TileAddress::new(FaceId(7), resolution / 2, resolution / 2);
    let path = globe.compute_path(start, end, Direction::North);
    if path.is_complete() {
        info!(%start, %end, steps = path.steps.len(), "path found");
    } else {
        warn!(%start, %end, steps = path.steps.len(), outcome = ?path.outcome, "path incomplete");
    }

    let dropped = globe.clear_cache();
    let cache = globe.cache_stats();
    info!(
        frames = args.frames,
        built = totals.built,
        reused = totals.reused,
        hidden = totals.hidden,
        recolored = totals.recolored,
        uploaded_bytes = uploaded,
        dropped,
        live = cache.live,
        approx_bytes = cache.approx_bytes,
        "demo finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    triaconta_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    match run(&config, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("globe setup failed: {e}");
            ExitCode::FAILURE
        }
    }
}
