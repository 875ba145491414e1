use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 二维纹理允许的最大边长（与 wgpu 默认 `max_texture_dimension_2d` 一致）
pub const MAX_TEXTURE_SIZE: u32 = 8192;

/// 拖尾纹理数组允许的最大层数（与 wgpu 默认 `max_texture_array_layers` 一致）
pub const MAX_ATLAS_LAYERS: u32 = 256;

/// 渲染配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 拖尾长度（沿速度方向的缩放系数）
    pub streak_length: f32,

    /// 采样的纹理数组层
    pub atlas_layer: u32,

    /// 内置拖尾纹理的边长（像素）
    pub atlas_size: u32,

    /// 内置拖尾纹理的层数
    pub atlas_layers: u32,

    /// 高度图尺寸（保留资源，当前规则不读取）
    pub height_map_size: u32,
}

impl_default!(RenderConfig {
    streak_length: 0.15,
    atlas_layer: 0,
    atlas_size: 64,
    atlas_layers: 1,
    height_map_size: 1,
});

impl RenderConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.streak_length >= 0.0) || !self.streak_length.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "streak_length must be non-negative, got {}",
                self.streak_length
            )));
        }
        if self.atlas_size == 0 || self.atlas_size > MAX_TEXTURE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "atlas_size must be in 1..={}, got {}",
                MAX_TEXTURE_SIZE, self.atlas_size
            )));
        }
        if self.atlas_layers == 0 || self.atlas_layers > MAX_ATLAS_LAYERS {
            return Err(ConfigError::ValidationError(format!(
                "atlas_layers must be in 1..={}, got {}",
                MAX_ATLAS_LAYERS, self.atlas_layers
            )));
        }
        if self.height_map_size == 0 || self.height_map_size > MAX_TEXTURE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "height_map_size must be in 1..={}, got {}",
                MAX_TEXTURE_SIZE, self.height_map_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        let mut config = RenderConfig::default();
        config.streak_length = -0.1;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.atlas_layers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_texture_sizes_are_bounded() {
        let mut config = RenderConfig::default();
        config.atlas_size = MAX_TEXTURE_SIZE;
        config.height_map_size = MAX_TEXTURE_SIZE;
        config.atlas_layers = MAX_ATLAS_LAYERS;
        assert!(config.validate().is_ok());

        let mut config = RenderConfig::default();
        config.atlas_size = 70000;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.height_map_size = MAX_TEXTURE_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = RenderConfig::default();
        config.atlas_layers = MAX_ATLAS_LAYERS + 1;
        assert!(config.validate().is_err());
    }
}
