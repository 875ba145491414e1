//! 拖尾纹理数组与着色
//!
//! 纹理解码由外部完成，这里只接收已解码的 RGBA8 图层，
//! 并提供与 GPU 采样器一致的 clamp-to-edge + 双线性采样。

use super::lines::LineVertex;
use crate::config::render::{MAX_ATLAS_LAYERS, MAX_TEXTURE_SIZE};
use crate::core::error::{RenderError, RenderResult};
use glam::{Vec2, Vec4};

/// 分层 RGBA8 纹理数组
#[derive(Debug, Clone)]
pub struct StreakAtlas {
    width: u32,
    height: u32,
    layers: u32,
    texels: Vec<[u8; 4]>,
}

impl StreakAtlas {
    /// 从已解码的图层创建，每层必须是 `width * height * 4` 字节
    pub fn from_rgba_layers(width: u32, height: u32, layers: &[Vec<u8>]) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidAtlas(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(RenderError::InvalidAtlas(format!(
                "dimensions {}x{} exceed {}",
                width, height, MAX_TEXTURE_SIZE
            )));
        }
        if layers.is_empty() || layers.len() > MAX_ATLAS_LAYERS as usize {
            return Err(RenderError::InvalidAtlas(format!(
                "layer count must be in 1..={}, got {}",
                MAX_ATLAS_LAYERS,
                layers.len()
            )));
        }

        let layer_bytes = width as usize * height as usize * 4;
        let mut texels = Vec::with_capacity(layer_bytes / 4 * layers.len());
        for (index, layer) in layers.iter().enumerate() {
            if layer.len() != layer_bytes {
                return Err(RenderError::InvalidAtlas(format!(
                    "layer {} has {} bytes, expected {}",
                    index,
                    layer.len(),
                    layer_bytes
                )));
            }
            texels.extend(layer.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]));
        }

        Ok(Self {
            width,
            height,
            layers: layers.len() as u32,
            texels,
        })
    }

    /// 内置的程序化拖尾：沿对角线从白热头部渐变到暗红尾部，边缘透明度衰减
    ///
    /// 边长和层数会被限制在 `1..=MAX_TEXTURE_SIZE` 与 `1..=MAX_ATLAS_LAYERS` 内。
    pub fn streak_gradient(size: u32, layers: u32) -> Self {
        let size = size.clamp(1, MAX_TEXTURE_SIZE);
        let layers = layers.clamp(1, MAX_ATLAS_LAYERS);
        let mut texels = Vec::with_capacity(size as usize * size as usize * layers as usize);

        for layer in 0..layers {
            // 每层略微偏移色温
            let warmth = 1.0 - layer as f32 / (layers as f32 * 2.0);
            for y in 0..size {
                for x in 0..size {
                    let u = (x as f32 + 0.5) / size as f32;
                    let v = (y as f32 + 0.5) / size as f32;
                    let along = (u + v) * 0.5;
                    let across = (u - v).abs();
                    let heat = 1.0 - along;
                    let falloff = (1.0 - across * 2.0).clamp(0.0, 1.0);

                    let r = 1.0;
                    let g = (0.35 + 0.65 * heat) * warmth;
                    let b = 0.8 * heat * heat * warmth;
                    let a = heat.max(0.15) * falloff;
                    texels.push([to_unorm(r), to_unorm(g), to_unorm(b), to_unorm(a)]);
                }
            }
        }

        Self {
            width: size,
            height: size,
            layers,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }

    /// 按图层顺序排列的原始字节，用于上传 GPU
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// 读取单个纹素（坐标会被限制在边缘）
    pub fn texel(&self, layer: u32, x: i64, y: i64) -> Vec4 {
        let layer = layer.min(self.layers - 1) as usize;
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let index = layer * self.width as usize * self.height as usize + y * self.width as usize + x;
        let [r, g, b, a] = self.texels[index];
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }

    /// clamp-to-edge 双线性采样；越界图层取最后一层
    pub fn sample(&self, layer: u32, uv: Vec2) -> Vec4 {
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self
            .texel(layer, x0, y0)
            .lerp(self.texel(layer, x0 + 1, y0), tx);
        let bottom = self
            .texel(layer, x0, y0 + 1)
            .lerp(self.texel(layer, x0 + 1, y0 + 1), tx);
        top.lerp(bottom, ty)
    }
}

/// 着色一个插值后的片元
pub fn shade(atlas: &StreakAtlas, layer: u32, fragment: &LineVertex) -> Vec4 {
    atlas.sample(layer, fragment.tex_coord)
}

fn to_unorm(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> StreakAtlas {
        // 2x2，第 0 层黑白棋盘，第 1 层全红
        let layer0 = vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 255, 255, 255, 0, 0, 0, 255,
        ];
        let layer1 = [255u8, 0, 0, 255].repeat(4);
        StreakAtlas::from_rgba_layers(2, 2, &[layer0, layer1]).unwrap()
    }

    #[test]
    fn test_texel_centers() {
        let atlas = checker();
        assert_eq!(atlas.sample(0, Vec2::new(0.25, 0.25)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(atlas.sample(0, Vec2::new(0.75, 0.25)), Vec4::ONE);
        assert_eq!(atlas.sample(1, Vec2::new(0.5, 0.5)), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_bilinear_midpoint() {
        let atlas = checker();
        let mid = atlas.sample(0, Vec2::splat(0.5));
        assert!((mid - Vec4::new(0.5, 0.5, 0.5, 1.0)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_clamp_addressing() {
        let atlas = checker();
        assert_eq!(atlas.sample(0, Vec2::new(-3.0, -3.0)), atlas.sample(0, Vec2::ZERO));
        assert_eq!(atlas.sample(0, Vec2::ZERO), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(atlas.sample(9, Vec2::splat(0.5)), atlas.sample(1, Vec2::splat(0.5)));
    }

    #[test]
    fn test_invalid_layers() {
        assert!(StreakAtlas::from_rgba_layers(2, 2, &[vec![0; 15]]).is_err());
        assert!(StreakAtlas::from_rgba_layers(2, 2, &[]).is_err());
        assert!(StreakAtlas::from_rgba_layers(0, 2, &[Vec::new()]).is_err());
        assert!(StreakAtlas::from_rgba_layers(70000, 70000, &[Vec::new()]).is_err());
    }

    #[test]
    fn test_gradient_size_is_clamped() {
        let atlas = StreakAtlas::streak_gradient(0, 1000);
        assert_eq!(atlas.width(), 1);
        assert_eq!(atlas.layers(), MAX_ATLAS_LAYERS);
        assert_eq!(atlas.as_bytes().len(), MAX_ATLAS_LAYERS as usize * 4);
    }

    #[test]
    fn test_gradient_head_is_brighter_than_tail() {
        let atlas = StreakAtlas::streak_gradient(32, 2);
        assert_eq!(atlas.layers(), 2);
        assert_eq!(atlas.as_bytes().len(), 32 * 32 * 4 * 2);

        let head = shade(
            &atlas,
            0,
            &LineVertex {
                clip_position: Vec4::ZERO,
                tex_coord: Vec2::ZERO,
            },
        );
        let tail = atlas.sample(0, Vec2::ONE);
        assert!(head.y > tail.y);
        assert!(head.w > tail.w);
    }
}
