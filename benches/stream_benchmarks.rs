/// 粒子流性能基准测试
///
/// 测试流输出模拟、完整帧推进和线段展开的吞吐

use std::hint::black_box;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fire_sparks::config::SimulationConfig;
use fire_sparks::particles::{
    stream_out, FrameParams, NoiseTable, Particle, ParticleStream, SimulationRule, SparkSystem,
};
use fire_sparks::render::LineExpansion;
use glam::{Mat4, Vec2, Vec3};

fn flare_field(count: usize) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(count + 1);
    particles.push(Particle::emitter(Vec3::ZERO));
    for i in 0..count {
        let t = i as f32 / count as f32;
        let mut flare = Particle::flare(
            Vec3::new(t * 10.0, 10.0, -t * 10.0),
            Vec3::new((t - 0.5) * 15.0, 40.0 + t, (0.5 - t) * 15.0),
            Vec2::ONE,
        );
        // 年龄均匀分布，约一半会被剔除
        flare.age = t * 10.0;
        particles.push(flare);
    }
    particles
}

// ============================================================================
// 流输出
// ============================================================================

fn bench_stream_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_out");
    let config = SimulationConfig::default();
    let rule = SimulationRule::from_config(&config);
    let noise = NoiseTable::seeded(config.noise_table_len, config.noise_seed).unwrap();
    let mut frame = FrameParams::from_config(&config);
    frame.advance(1.0 / 60.0);

    for count in [1_000usize, 10_000, 100_000] {
        let input = flare_field(count);
        let mut output = ParticleStream::with_capacity(count + rule.max_outputs());
        group.throughput(Throughput::Elements(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| {
                let report = stream_out(black_box(input), &mut output, |p| rule.apply(p, &frame, &noise));
                black_box(report)
            });
        });
    }

    group.finish();
}

// ============================================================================
// 完整帧
// ============================================================================

fn bench_system_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("spark_system");
    let config = SimulationConfig::default();

    group.bench_function("warm_300_frames", |b| {
        b.iter(|| {
            let mut system = SparkSystem::from_config(&config).unwrap();
            let mut frame = FrameParams::from_config(&config);
            for _ in 0..300 {
                frame.advance(1.0 / 60.0);
                system.simulate(&frame);
            }
            black_box(system.stats())
        });
    });

    group.finish();
}

// ============================================================================
// 线段展开
// ============================================================================

fn bench_line_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_expansion");
    let expansion = LineExpansion::default();
    let view_proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 500.0)
        * Mat4::look_at_rh(Vec3::new(0.0, 20.0, 80.0), Vec3::new(0.0, 20.0, 0.0), Vec3::Y);

    for count in [10_000usize, 100_000] {
        let input = flare_field(count);
        group.throughput(Throughput::Elements(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(expansion.expand(black_box(input), view_proj)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stream_out,
    bench_system_frames,
    bench_line_expansion
);
criterion_main!(benches);
