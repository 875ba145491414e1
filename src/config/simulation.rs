use super::{ConfigError, ConfigResult};
use crate::impl_default;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// 单次爆发允许的最大火花数
pub const MAX_BURST_SIZE: u32 = 64;

/// 噪声表允许的最大长度（与 1D 纹理的最小保证尺寸一致）
pub const MAX_NOISE_TABLE_LEN: usize = 8192;

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 恒定加速度（类重力）
    pub acceleration: Vec3,

    /// 默认发射原点（世界空间）
    pub emit_position: Vec3,

    /// 发射周期（秒）
    pub emit_period: f32,

    /// 每次爆发生成的火花数
    pub burst_size: u32,

    /// 火花最大寿命（秒）
    pub max_lifetime: f32,

    /// 水平方向速度缩放
    pub spray_horizontal: f32,

    /// 垂直方向速度偏置
    pub spray_vertical: f32,

    /// 新火花相对发射原点的垂直偏移
    pub spawn_height: f32,

    /// 新火花的尺寸
    pub flare_size: Vec2,

    /// 粒子流容量上限
    pub max_particles: usize,

    /// 随机向量表长度
    pub noise_table_len: usize,

    /// 随机向量表种子
    pub noise_seed: u64,
}

impl_default!(SimulationConfig {
    acceleration: Vec3::new(0.0, -12.8, 0.0),
    emit_position: Vec3::ZERO,
    emit_period: 0.25,
    burst_size: 5,
    max_lifetime: 5.0,
    spray_horizontal: 7.5,
    spray_vertical: 40.0,
    spawn_height: 10.0,
    flare_size: Vec2::ONE,
    max_particles: 65_536,
    noise_table_len: 1024,
    noise_seed: 0x5EED_F1A2,
});

impl SimulationConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_particles == 0 {
            return Err(ConfigError::ValidationError(
                "max_particles must be at least 1".to_string(),
            ));
        }
        if self.max_particles > u32::MAX as usize {
            return Err(ConfigError::ValidationError(format!(
                "max_particles {} exceeds the GPU counter range",
                self.max_particles
            )));
        }
        if self.burst_size == 0 || self.burst_size > MAX_BURST_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "burst_size must be in 1..={}, got {}",
                MAX_BURST_SIZE, self.burst_size
            )));
        }
        if !(self.emit_period > 0.0) || !self.emit_period.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "emit_period must be positive, got {}",
                self.emit_period
            )));
        }
        if !(self.max_lifetime >= 0.0) || !self.max_lifetime.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "max_lifetime must be non-negative, got {}",
                self.max_lifetime
            )));
        }
        if self.noise_table_len == 0 || self.noise_table_len > MAX_NOISE_TABLE_LEN {
            return Err(ConfigError::ValidationError(format!(
                "noise_table_len must be in 1..={}, got {}",
                MAX_NOISE_TABLE_LEN, self.noise_table_len
            )));
        }
        let finite = self.acceleration.is_finite()
            && self.emit_position.is_finite()
            && self.flare_size.is_finite()
            && self.spray_horizontal.is_finite()
            && self.spray_vertical.is_finite()
            && self.spawn_height.is_finite();
        if !finite {
            return Err(ConfigError::ValidationError(
                "simulation vectors and spray constants must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fire_rule() {
        let config = SimulationConfig::default();
        assert_eq!(config.acceleration, Vec3::new(0.0, -12.8, 0.0));
        assert_eq!(config.emit_period, 0.25);
        assert_eq!(config.burst_size, 5);
        assert_eq!(config.max_lifetime, 5.0);
        assert_eq!(config.spray_horizontal, 7.5);
        assert_eq!(config.spray_vertical, 40.0);
        assert_eq!(config.spawn_height, 10.0);
        assert_eq!(config.flare_size, Vec2::ONE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.max_particles = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.burst_size = MAX_BURST_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.emit_period = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.max_lifetime = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.noise_table_len = 0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.acceleration = Vec3::new(0.0, f32::INFINITY, 0.0);
        assert!(config.validate().is_err());
    }
}
