use clap::Parser;
use fire_sparks::config::SparkConfig;
use fire_sparks::core::error::{RenderError, SparkResult};
use fire_sparks::core::init_logging;
use fire_sparks::particles::{FrameParams, NoiseTable, SparkSystem};
use fire_sparks::render::{GpuSparkSystem, HeightMap, StreakAtlas};
use std::path::PathBuf;

/// 离屏渲染目标尺寸
const TARGET_SIZE: u32 = 512;

#[derive(Debug, Parser)]
#[command(name = "fire_sparks")]
#[command(about = "Headless fire-spark particle simulation", long_about = None)]
#[command(version)]
struct Args {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Time step per frame in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Run the GPU stream-out path instead of the CPU one
    #[arg(long)]
    gpu: bool,

    /// Configuration file (.toml or .json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> SparkResult<SparkConfig> {
    let mut config = match path {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
            SparkConfig::from_json_file(path)?
        }
        Some(path) => SparkConfig::from_toml_file(path)?,
        None => SparkConfig::load_or_default(),
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// 每秒模拟时间对应的帧数，用于节流统计日志
fn frames_per_second(dt: f32) -> u64 {
    if dt > 0.0 {
        (1.0 / dt).round().max(1.0) as u64
    } else {
        60
    }
}

fn run_cpu(config: &SparkConfig, args: &Args) -> SparkResult<()> {
    let mut system = SparkSystem::from_config(&config.simulation)?.with_render_config(&config.render);
    let mut frame = FrameParams::from_config(&config.simulation);
    let report_every = frames_per_second(args.dt);

    for _ in 0..args.frames {
        frame.advance(args.dt);
        let stats = system.simulate(&frame);
        let segments = system.render(&frame);

        if stats.frame % report_every == 0 {
            tracing::info!(
                target: "sparks",
                "t={:.2}s frame={} alive={} flares={} segments={} dropped={}",
                frame.scene_time,
                stats.frame,
                stats.alive,
                stats.flares,
                segments.len(),
                stats.dropped
            );
        }
    }

    let stats = system.stats();
    println!(
        "cpu: {} frames, {} particles alive ({} flares)",
        stats.frame, stats.alive, stats.flares
    );
    Ok(())
}

fn run_gpu(config: &SparkConfig, args: &Args) -> SparkResult<()> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok_or(RenderError::NoAdapter)?;
    tracing::info!(target: "sparks::gpu", "Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("Fire Sparks Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        },
        None,
    ))
    .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

    let format = wgpu::TextureFormat::Rgba8Unorm;
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Spark Offscreen Target"),
        size: wgpu::Extent3d {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let noise = NoiseTable::seeded(config.simulation.noise_table_len, config.simulation.noise_seed)?;
    let atlas = StreakAtlas::streak_gradient(config.render.atlas_size, config.render.atlas_layers);
    let height_map = HeightMap::flat(config.render.height_map_size);
    let mut system = GpuSparkSystem::new(&device, &queue, config, format, &noise, &atlas, &height_map)?;

    let mut frame = FrameParams::from_config(&config.simulation);
    let report_every = frames_per_second(args.dt);

    for _ in 0..args.frames {
        frame.advance(args.dt);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Spark Frame Encoder"),
        });
        system.simulate(&mut encoder, &queue, &frame);
        {
            // 每帧先清屏，火花以叠加方式绘制
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Spark Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        system.render(&mut encoder, &queue, &target_view, &frame);
        queue.submit(std::iter::once(encoder.finish()));

        if system.frame_index() % report_every == 0 {
            tracing::info!(
                target: "sparks::gpu",
                "t={:.2}s frame={}",
                frame.scene_time,
                system.frame_index()
            );
        }
    }

    device.poll(wgpu::Maintain::Wait);
    println!(
        "gpu: {} frames encoded (capacity {})",
        system.frame_index(),
        system.capacity()
    );
    Ok(())
}

fn run(args: Args) -> SparkResult<()> {
    let config = load_config(args.config.as_ref())?;
    init_logging(&config.logging);

    tracing::info!(
        target: "sparks",
        "Running {} frames at dt={}s on the {} path",
        args.frames,
        args.dt,
        if args.gpu { "GPU" } else { "CPU" }
    );

    if args.gpu {
        run_gpu(&config, &args)
    } else {
        run_cpu(&config, &args)
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("fire_sparks failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults_and_flags() {
        let args = Args::try_parse_from(["fire_sparks"]).unwrap();
        assert_eq!(args.frames, 600);
        assert!((args.dt - 1.0 / 60.0).abs() < 1e-9);
        assert!(!args.gpu);
        assert!(args.config.is_none());

        let args = Args::try_parse_from([
            "fire_sparks",
            "--frames",
            "18",
            "--dt",
            "0.3",
            "--gpu",
            "--config",
            "sparks.json",
        ])
        .unwrap();
        assert_eq!(args.frames, 18);
        assert_eq!(args.dt, 0.3);
        assert!(args.gpu);
        assert_eq!(args.config, Some(PathBuf::from("sparks.json")));
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(Args::try_parse_from(["fire_sparks", "--frames", "many"]).is_err());
        assert!(Args::try_parse_from(["fire_sparks", "--config"]).is_err());
        assert!(Args::try_parse_from(["fire_sparks", "--fast"]).is_err());
    }

    #[test]
    fn test_frames_per_second() {
        assert_eq!(frames_per_second(1.0 / 60.0), 60);
        assert_eq!(frames_per_second(0.3), 3);
        assert_eq!(frames_per_second(5.0), 1);
        assert_eq!(frames_per_second(0.0), 60);
    }
}
