//! GPU Uniform 与间接参数布局（对应 WGSL struct）

use crate::config::{RenderConfig, SimulationConfig};
use crate::particles::FrameParams;

/// 模拟阶段 Uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SimulationUniforms {
    /// 相机位置（保留）
    pub camera_pos: [f32; 4],
    /// 发射原点
    pub emit_pos: [f32; 4],
    /// 发射方向（保留）
    pub emit_dir: [f32; 4],
    /// 恒定加速度
    pub acceleration: [f32; 3],
    /// 模拟时钟
    pub scene_time: f32,
    /// 已限制为非负的时间步长
    pub time_step: f32,
    /// 发射周期
    pub emit_period: f32,
    /// 最大寿命
    pub max_lifetime: f32,
    /// 出生点垂直偏移
    pub spawn_height: f32,
    /// 水平速度缩放
    pub spray_horizontal: f32,
    /// 垂直速度偏置
    pub spray_vertical: f32,
    /// 每次爆发的火花数
    pub burst_size: u32,
    /// 粒子流容量
    pub capacity: u32,
    /// 火花尺寸
    pub flare_size: [f32; 2],
    /// 填充
    pub _pad: [f32; 2],
}

impl SimulationUniforms {
    pub fn new(config: &SimulationConfig, frame: &FrameParams) -> Self {
        Self {
            camera_pos: frame.camera_pos.to_array(),
            emit_pos: frame.emit_pos.to_array(),
            emit_dir: frame.emit_dir.to_array(),
            acceleration: frame.acceleration.to_array(),
            scene_time: frame.scene_time,
            time_step: frame.clamped_time_step(),
            emit_period: config.emit_period,
            max_lifetime: config.max_lifetime,
            spawn_height: config.spawn_height,
            spray_horizontal: config.spray_horizontal,
            spray_vertical: config.spray_vertical,
            burst_size: config.burst_size,
            capacity: config.max_particles as u32,
            flare_size: config.flare_size.to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// 渲染阶段 Uniform
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderUniforms {
    /// 视图投影矩阵
    pub view_proj: [[f32; 4]; 4],
    /// 拖尾长度系数
    pub streak_length: f32,
    /// 纹理数组层
    pub atlas_layer: u32,
    /// 填充
    pub _pad: [u32; 2],
}

impl RenderUniforms {
    pub fn new(config: &RenderConfig, frame: &FrameParams) -> Self {
        Self {
            view_proj: frame.view_proj.to_cols_array_2d(),
            streak_length: config.streak_length,
            atlas_layer: config.atlas_layer,
            _pad: [0; 2],
        }
    }
}

/// 计算着色器间接派发参数
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DispatchIndirectArgs {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// 间接绘制参数
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawIndirectArgs {
    /// 顶点数（每条线段 2 个）
    pub vertex_count: u32,
    /// 实例数（每个粒子一个）
    pub instance_count: u32,
    /// 第一个顶点
    pub first_vertex: u32,
    /// 第一个实例
    pub first_instance: u32,
}
