//! WGSL 着色器源码
//!
//! 模拟、控制和渲染三个模块共享 `COMMON_WGSL` 中的结构体定义，
//! 创建着色器模块时拼接在各自源码之前。

/// 每个工作组处理的粒子数
pub const SIMULATE_WORKGROUP_SIZE: u32 = 64;

/// 共享结构体与常量
pub const COMMON_WGSL: &str = r#"
const KIND_EMITTER: u32 = 0u;
const KIND_FLARE: u32 = 1u;

struct Particle {
    position: vec3<f32>,
    age: f32,
    velocity: vec3<f32>,
    kind: u32,
    size: vec2<f32>,
    _pad: vec2<f32>,
};

struct SimulationUniforms {
    camera_pos: vec4<f32>,
    emit_pos: vec4<f32>,
    emit_dir: vec4<f32>,
    acceleration: vec3<f32>,
    scene_time: f32,
    time_step: f32,
    emit_period: f32,
    max_lifetime: f32,
    spawn_height: f32,
    spray_horizontal: f32,
    spray_vertical: f32,
    burst_size: u32,
    capacity: u32,
    flare_size: vec2<f32>,
    _pad: vec2<f32>,
};
"#;

/// 模拟计算着色器：读取源流，向目标流原子追加
///
/// 最后一个槽位保留给发射器，火花只能写入 `[0, capacity - 1)`，
/// 因此容量耗尽时只丢弃火花。
pub const SIMULATE_WGSL: &str = r#"
@group(0) @binding(0) var<uniform> sim: SimulationUniforms;
@group(0) @binding(1) var<storage, read> src_particles: array<Particle>;
@group(0) @binding(2) var<storage, read> src_count: u32;
@group(0) @binding(3) var<storage, read_write> dst_particles: array<Particle>;
@group(0) @binding(4) var<storage, read_write> dst_count: atomic<u32>;
@group(0) @binding(5) var noise_table: texture_1d<f32>;

// 周期寻址 + 线性插值，纹素中心位于 (i + 0.5) / n
fn noise_sample(coord: f32) -> vec3<f32> {
    let n = textureDimensions(noise_table);
    let x = fract(coord) * f32(n) - 0.5;
    let base = floor(x);
    let t = x - base;
    let i0 = u32(i32(base) + i32(n)) % n;
    let i1 = (i0 + 1u) % n;
    let a = textureLoad(noise_table, i0, 0).xyz;
    let b = textureLoad(noise_table, i1, 0).xyz;
    return mix(a, b, t);
}

fn rand_unit_vec3(offset: f32) -> vec3<f32> {
    let v = noise_sample(sim.scene_time + offset);
    let len = length(v);
    if (len <= 1e-6) {
        return vec3<f32>(0.0, 1.0, 0.0);
    }
    return v / len;
}

fn append_flare(p: Particle) {
    let idx = atomicAdd(&dst_count, 1u);
    if (idx + 1u < sim.capacity) {
        dst_particles[idx] = p;
    } else {
        // 回退本次占用，计数不会低于 capacity - 1
        atomicSub(&dst_count, 1u);
    }
}

fn append_emitter(p: Particle) {
    let idx = atomicAdd(&dst_count, 1u);
    dst_particles[min(idx, sim.capacity - 1u)] = p;
}

@compute @workgroup_size(64)
fn simulate_main(@builtin(global_invocation_id) global_id: vec3<u32>) {
    let idx = global_id.x;
    if (idx >= min(src_count, sim.capacity)) {
        return;
    }

    var p = src_particles[idx];
    let dt = max(sim.time_step, 0.0);
    p.age = p.age + dt;

    if (p.kind == KIND_EMITTER) {
        if (p.age > sim.emit_period) {
            let origin = sim.emit_pos.xyz + vec3<f32>(0.0, sim.spawn_height, 0.0);
            for (var i = 0u; i < sim.burst_size; i++) {
                let dir = rand_unit_vec3(f32(i) / f32(sim.burst_size));
                var flare: Particle;
                flare.position = origin;
                flare.velocity = vec3<f32>(
                    dir.x * sim.spray_horizontal,
                    abs(dir.y) + sim.spray_vertical,
                    dir.z * sim.spray_horizontal,
                );
                flare.size = sim.flare_size;
                flare.age = 0.0;
                flare.kind = KIND_FLARE;
                flare._pad = vec2<f32>(0.0, 0.0);
                append_flare(flare);
            }
            p.age = 0.0;
        }
        append_emitter(p);
        return;
    }

    p.position = p.position + 0.5 * dt * dt * sim.acceleration + dt * p.velocity;
    p.velocity = p.velocity + dt * sim.acceleration;
    if (p.age <= sim.max_lifetime) {
        append_flare(p);
    }
}
"#;

/// 控制计算着色器：模拟前准备派发参数，模拟后生成绘制参数
pub const CONTROL_WGSL: &str = r#"
struct DispatchArgs {
    x: u32,
    y: u32,
    z: u32,
};

struct DrawArgs {
    vertex_count: u32,
    instance_count: u32,
    first_vertex: u32,
    first_instance: u32,
};

@group(0) @binding(0) var<uniform> sim: SimulationUniforms;
@group(0) @binding(1) var<storage, read> src_count: u32;
@group(0) @binding(2) var<storage, read_write> dst_count: atomic<u32>;
@group(0) @binding(3) var<storage, read_write> dispatch_args: DispatchArgs;
@group(0) @binding(4) var<storage, read_write> draw_args: DrawArgs;

@compute @workgroup_size(1)
fn prepare_main() {
    let count = min(src_count, sim.capacity);
    dispatch_args.x = (count + 63u) / 64u;
    dispatch_args.y = 1u;
    dispatch_args.z = 1u;
    atomicStore(&dst_count, 0u);
}

@compute @workgroup_size(1)
fn finalize_main() {
    draw_args.vertex_count = 2u;
    draw_args.instance_count = min(atomicLoad(&dst_count), sim.capacity);
    draw_args.first_vertex = 0u;
    draw_args.first_instance = 0u;
}
"#;

/// 渲染着色器：每个实例一条线段，发射器折叠到裁剪体之外
pub const RENDER_WGSL: &str = r#"
struct RenderUniforms {
    view_proj: mat4x4<f32>,
    streak_length: f32,
    atlas_layer: u32,
    _pad: vec2<u32>,
};

@group(0) @binding(0) var<uniform> streak_params: RenderUniforms;
@group(0) @binding(1) var<storage, read> particles: array<Particle>;
@group(0) @binding(2) var streak_atlas: texture_2d_array<f32>;
@group(0) @binding(3) var streak_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    let p = particles[instance_index];
    var out: VertexOutput;
    if (p.kind != KIND_FLARE) {
        out.clip_position = vec4<f32>(0.0, 0.0, 2.0, 1.0);
        out.tex_coord = vec2<f32>(0.0, 0.0);
        return out;
    }

    let endpoint = f32(vertex_index & 1u);
    let world = p.position + endpoint * streak_params.streak_length * p.velocity;
    out.clip_position = streak_params.view_proj * vec4<f32>(world, 1.0);
    out.tex_coord = vec2<f32>(endpoint, endpoint);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(streak_atlas, streak_sampler, in.tex_coord, streak_params.atlas_layer);
}
"#;

/// 拼接共享定义和模块源码
pub fn compose(module: &str) -> String {
    format!("{}{}", COMMON_WGSL, module)
}
