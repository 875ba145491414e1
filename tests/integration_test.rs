use fire_sparks::config::{SimulationConfig, SparkConfig};
use fire_sparks::particles::{
    stream_out, ConstantSource, FrameParams, NoiseTable, Particle, ParticleStream, SimulationRule,
    SparkSystem,
};
use fire_sparks::render::{shade, LineExpansion, StreakAtlas};
use glam::{Mat4, Vec2, Vec3};

fn frame_with_step(config: &SimulationConfig, dt: f32) -> FrameParams {
    let mut frame = FrameParams::from_config(config);
    frame.time_step = dt;
    frame
}

#[test]
fn test_end_to_end_first_burst() {
    let mut config = SimulationConfig::default();
    config.emit_position = Vec3::new(1.0, 2.0, 3.0);
    let mut system = SparkSystem::from_config(&config).unwrap();

    let mut frame = FrameParams::from_config(&config);
    frame.advance(0.3);
    let stats = system.simulate(&frame);
    assert_eq!(stats.alive, 6);
    assert_eq!(stats.flares, 5);

    let stream = system.current_stream();
    let emitters: Vec<&Particle> = stream.iter().filter(|p| p.is_emitter()).collect();
    assert_eq!(emitters.len(), 1);
    assert_eq!(emitters[0].age, 0.0);

    for flare in stream.iter().filter(|p| p.is_flare()) {
        assert_eq!(flare.age, 0.0);
        assert_eq!(flare.position, Vec3::new(1.0, 12.0, 3.0));
        assert_eq!(flare.size, Vec2::ONE);
        assert!(flare.velocity.y >= 40.0);
        assert!(flare.velocity.x.abs() <= 7.5 + 1e-4);
        assert!(flare.velocity.z.abs() <= 7.5 + 1e-4);
    }
}

#[test]
fn test_end_to_end_original_flares_expire() {
    let config = SimulationConfig::default();
    let mut system = SparkSystem::from_config(&config).unwrap();
    let mut frame = FrameParams::from_config(&config);

    frame.advance(0.3);
    system.simulate(&frame);
    let origin = Vec3::new(0.0, 10.0, 0.0);
    let first_burst: Vec<Vec3> = system
        .current_stream()
        .iter()
        .filter(|p| p.is_flare())
        .map(|p| p.velocity)
        .collect();
    assert_eq!(first_burst.len(), 5);

    for _ in 0..17 {
        frame.advance(0.3);
        let stats = system.simulate(&frame);
        assert_eq!(
            system.current_stream().iter().filter(|p| p.is_emitter()).count(),
            1,
            "emitter missing at frame {}",
            stats.frame
        );
    }

    let stream = system.current_stream();
    // 每帧都会爆发一次：第 2..=18 帧的 17 组仍然存活
    assert_eq!(stream.len(), 1 + 17 * 5);
    assert!(stream.iter().all(|p| p.age <= 5.0));

    // 第一组火花已经 5.1 秒，全部被剔除
    let max_age = stream
        .iter()
        .filter(|p| p.is_flare())
        .map(|p| p.age)
        .fold(0.0f32, f32::max);
    assert!(max_age < 5.0);
    assert!(stream.iter().all(|p| p.position != origin || p.age == 0.0));
}

#[test]
fn test_emitter_burst_at_026() {
    let config = SimulationConfig::default();
    let mut system = SparkSystem::with_noise(&config, ConstantSource(Vec3::new(0.6, -0.8, 0.0))).unwrap();

    let stats = system.simulate(&frame_with_step(&config, 0.26));
    assert_eq!(stats.alive, 6);
    assert_eq!(stats.spawned, 5);

    for flare in system.current_stream().iter().filter(|p| p.is_flare()) {
        assert!((flare.velocity - Vec3::new(4.5, 40.8, 0.0)).length() < 1e-4);
    }
}

#[test]
fn test_flare_integration_and_lifetime_boundary() {
    let config = SimulationConfig::default();
    let rule = SimulationRule::from_config(&config);
    let noise = ConstantSource(Vec3::Y);
    let dt = 0.1;
    let frame = frame_with_step(&config, dt);
    let a = frame.acceleration;

    let mut flare = Particle::flare(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 30.0, -1.0), Vec2::ONE);
    flare.age = 1.0;
    let out: Vec<Particle> = rule.apply(&flare, &frame, &noise).into_iter().collect();
    assert_eq!(out.len(), 1);
    let expected_pos = flare.position + 0.5 * dt * dt * a + dt * flare.velocity;
    let expected_vel = flare.velocity + dt * a;
    assert!((out[0].position - expected_pos).length() < 1e-5);
    assert!((out[0].velocity - expected_vel).length() < 1e-5);

    let still = frame_with_step(&config, 0.0);
    flare.age = 5.0;
    assert_eq!(rule.apply(&flare, &still, &noise).into_iter().count(), 1);
    flare.age = 5.0001;
    assert_eq!(rule.apply(&flare, &still, &noise).into_iter().count(), 0);
}

#[test]
fn test_negative_time_step_is_clamped() {
    let config = SimulationConfig::default();
    let mut system = SparkSystem::from_config(&config).unwrap();
    system.simulate(&frame_with_step(&config, 0.3));
    let before: Vec<Particle> = system.current_stream().iter().copied().collect();

    system.simulate(&frame_with_step(&config, -1.0));
    let mut after: Vec<Particle> = system.current_stream().iter().copied().collect();
    let mut before = before;
    let key = |p: &Particle| (p.kind.as_tag(), p.velocity.x.to_bits(), p.velocity.z.to_bits());
    before.sort_by_key(key);
    after.sort_by_key(key);
    assert_eq!(before, after);
}

#[test]
fn test_render_idempotent_and_pure() {
    let config = SimulationConfig::default();
    let mut system = SparkSystem::from_config(&config).unwrap();
    let mut frame = FrameParams::from_config(&config);
    for _ in 0..4 {
        frame.advance(0.3);
        system.simulate(&frame);
    }
    frame.view_proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 200.0)
        * Mat4::look_at_rh(Vec3::new(0.0, 20.0, 60.0), Vec3::new(0.0, 15.0, 0.0), Vec3::Y);

    let snapshot: Vec<Particle> = system.current_stream().iter().copied().collect();
    let first = system.render(&frame);
    let second = system.render(&frame);
    assert_eq!(first, second);
    assert_eq!(first.len(), system.stats().flares);
    assert_eq!(system.current_stream().as_slice(), snapshot.as_slice());
}

#[test]
fn test_stream_out_with_rule_matches_system() {
    let config = SimulationConfig::default();
    let rule = SimulationRule::from_config(&config);
    let noise = NoiseTable::seeded(config.noise_table_len, config.noise_seed).unwrap();
    let frame = frame_with_step(&config, 0.3);

    let mut output = ParticleStream::with_capacity(config.max_particles);
    let input = [Particle::emitter(Vec3::ZERO)];
    let report = stream_out(&input, &mut output, |p| rule.apply(p, &frame, &noise));
    assert_eq!(report.appended, 6);

    let mut system = SparkSystem::from_config(&config).unwrap();
    system.simulate(&frame);
    let mut expected: Vec<Particle> = system.current_stream().iter().copied().collect();
    let mut actual: Vec<Particle> = output.iter().copied().collect();
    let key = |p: &Particle| (p.kind.as_tag(), p.velocity.x.to_bits(), p.velocity.z.to_bits());
    expected.sort_by_key(key);
    actual.sort_by_key(key);
    assert_eq!(expected, actual);
}

#[test]
fn test_shading_along_rendered_streak() {
    let config = SimulationConfig::default();
    let mut system = SparkSystem::from_config(&config).unwrap();
    system.simulate(&frame_with_step(&config, 0.3));

    let atlas = StreakAtlas::streak_gradient(16, 1);
    let segments = LineExpansion::default().expand(system.current_stream().as_slice(), Mat4::IDENTITY);
    assert_eq!(segments.len(), 5);
    for segment in &segments {
        let head = shade(&atlas, 0, &segment.interpolate(0.0));
        let tail = shade(&atlas, 0, &segment.interpolate(1.0));
        assert!(head.w >= tail.w);
    }
}

#[test]
fn test_config_file_drives_system() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sparks.toml");
    std::fs::write(
        &path,
        r#"
[simulation]
burst_size = 8
emit_period = 0.1
max_particles = 20

[render]
streak_length = 0.3
"#,
    )?;

    let config = SparkConfig::from_toml_file(&path)?;
    config.validate()?;
    let mut system = SparkSystem::from_config(&config.simulation)?.with_render_config(&config.render);

    let mut frame = FrameParams::from_config(&config.simulation);
    frame.advance(0.15);
    assert_eq!(system.simulate(&frame).alive, 9);
    frame.advance(0.15);
    assert_eq!(system.simulate(&frame).alive, 17);
    frame.advance(0.15);
    let stats = system.simulate(&frame);
    assert_eq!(stats.alive, 20);
    assert_eq!(stats.dropped, 5);
    assert_eq!(system.current_stream().iter().filter(|p| p.is_emitter()).count(), 1);
    Ok(())
}
