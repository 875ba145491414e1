//! 每帧全局参数
//!
//! 宿主每帧提供一次，在整个逻辑帧内保持不变，以只读引用传入模拟和渲染。

use crate::config::SimulationConfig;
use glam::{Mat4, Vec3, Vec4};

/// 每帧输入参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// 相机位置（保留，当前规则不读取）
    pub camera_pos: Vec4,
    /// 发射原点（w 未使用）
    pub emit_pos: Vec4,
    /// 发射方向（保留，当前规则不读取）
    pub emit_dir: Vec4,
    /// 单调递增的模拟时钟
    pub scene_time: f32,
    /// 距上一帧的时间步长
    pub time_step: f32,
    /// 视图投影矩阵
    pub view_proj: Mat4,
    /// 恒定加速度
    pub acceleration: Vec3,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            camera_pos: Vec4::ZERO,
            emit_pos: Vec4::ZERO,
            emit_dir: Vec4::Y,
            scene_time: 0.0,
            time_step: 0.0,
            view_proj: Mat4::IDENTITY,
            acceleration: Vec3::new(0.0, -12.8, 0.0),
        }
    }
}

impl FrameParams {
    /// 从模拟配置取发射原点和加速度
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            emit_pos: config.emit_position.extend(1.0),
            acceleration: config.acceleration,
            ..Default::default()
        }
    }

    /// 非负时间步长，NaN 视为 0
    pub fn clamped_time_step(&self) -> f32 {
        if self.time_step > 0.0 {
            self.time_step
        } else {
            0.0
        }
    }

    /// 推进宿主时钟
    pub fn advance(&mut self, dt: f32) {
        self.time_step = dt;
        self.scene_time += dt.max(0.0);
    }
}
