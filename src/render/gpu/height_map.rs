//! 场景高度图
//!
//! 作为 R32Float 纹理绑定到模拟阶段，供地面碰撞等后续规则使用；
//! 当前模拟规则不读取它。

use crate::config::render::MAX_TEXTURE_SIZE;
use crate::core::error::{RenderError, RenderResult};

/// 单通道浮点高度图
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl HeightMap {
    /// 全零的平坦高度图，边长限制在 `1..=MAX_TEXTURE_SIZE`
    pub fn flat(size: u32) -> Self {
        let size = size.clamp(1, MAX_TEXTURE_SIZE);
        Self {
            width: size,
            height: size,
            samples: vec![0.0; size as usize * size as usize],
        }
    }

    /// 从行优先的高度采样创建
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidHeightMap(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(RenderError::InvalidHeightMap(format!(
                "dimensions {}x{} exceed {}",
                width, height, MAX_TEXTURE_SIZE
            )));
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(RenderError::InvalidHeightMap(format!(
                "expected {} samples, got {}",
                expected,
                samples.len()
            )));
        }
        if let Some(bad) = samples.iter().position(|h| !h.is_finite()) {
            return Err(RenderError::InvalidHeightMap(format!(
                "sample {} is not finite",
                bad
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let map = HeightMap::flat(4);
        assert_eq!(map.width(), 4);
        assert_eq!(map.as_bytes().len(), 4 * 4 * 4);
        assert!(map.samples().iter().all(|h| *h == 0.0));
        assert_eq!(HeightMap::flat(0).width(), 1);
    }

    #[test]
    fn test_from_samples_validation() {
        assert!(HeightMap::from_samples(2, 2, vec![0.0; 4]).is_ok());
        assert!(HeightMap::from_samples(2, 2, vec![0.0; 3]).is_err());
        assert!(HeightMap::from_samples(0, 2, Vec::new()).is_err());
        assert!(HeightMap::from_samples(1, 1, vec![f32::NAN]).is_err());
        assert!(HeightMap::from_samples(70000, 70000, Vec::new()).is_err());
    }

    #[test]
    fn test_flat_size_is_clamped() {
        let map = HeightMap::flat(70000);
        assert_eq!(map.width(), MAX_TEXTURE_SIZE);
        assert_eq!(map.samples().len(), MAX_TEXTURE_SIZE as usize * MAX_TEXTURE_SIZE as usize);
    }
}
