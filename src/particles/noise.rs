//! 伪随机向量生成
//!
//! 初始化时预计算一张一维随机向量表，之后按 `time + offset` 周期寻址、
//! 在相邻表项之间线性插值采样。对固定的时间和表内容，输出可复现；
//! 时间单调前进时，结果连续且在实际时间尺度上不重复。

use crate::core::error::{SparkError, SparkResult};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 随机向量源
///
/// 与任何渲染资源解耦，便于单独测试和替换（例如返回固定向量的测试替身）。
pub trait RandomVectorSource: Send + Sync {
    /// 采样各分量位于 [-1, 1] 的向量
    fn sample(&self, time: f32, offset: f32) -> Vec3;

    /// 采样单位向量；零长度样本退化为 +Y
    fn sample_unit(&self, time: f32, offset: f32) -> Vec3 {
        self.sample(time, offset).try_normalize().unwrap_or(Vec3::Y)
    }
}

/// 预计算的随机向量表
#[derive(Debug, Clone)]
pub struct NoiseTable {
    vectors: Vec<Vec3>,
}

impl NoiseTable {
    /// 用确定性种子生成随机向量表
    pub fn seeded(len: usize, seed: u64) -> SparkResult<Self> {
        if len == 0 {
            return Err(SparkError::InvalidNoise("table length must be at least 1".to_string()));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let vectors = (0..len)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                    rng.gen_range(-1.0..=1.0),
                )
            })
            .collect();
        Ok(Self { vectors })
    }

    /// 从外部提供的向量构建（例如由宿主预先生成的纹理数据）
    pub fn from_vectors(vectors: Vec<Vec3>) -> SparkResult<Self> {
        if vectors.is_empty() {
            return Err(SparkError::InvalidNoise("table is empty".to_string()));
        }
        if let Some(index) = vectors
            .iter()
            .position(|v| !v.is_finite() || v.abs().max_element() > 1.0)
        {
            return Err(SparkError::InvalidNoise(format!(
                "entry {} is outside [-1, 1]",
                index
            )));
        }
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec3] {
        &self.vectors
    }

    /// 转换为 Rgba32Float 纹素（w 分量为 0），用于上传 1D 噪声纹理
    pub fn to_rgba32f(&self) -> Vec<[f32; 4]> {
        self.vectors.iter().map(|v| v.extend(0.0).to_array()).collect()
    }
}

impl RandomVectorSource for NoiseTable {
    fn sample(&self, time: f32, offset: f32) -> Vec3 {
        let len = self.vectors.len();
        let u = (time + offset).rem_euclid(1.0);
        // 纹素中心位于 (i + 0.5) / len
        let x = u * len as f32 - 0.5;
        let base = x.floor();
        let t = x - base;
        let i0 = (base as i64).rem_euclid(len as i64) as usize;
        let i1 = (i0 + 1) % len;
        self.vectors[i0].lerp(self.vectors[i1], t)
    }
}

/// 返回固定向量的确定性随机源
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(pub Vec3);

impl RandomVectorSource for ConstantSource {
    fn sample(&self, _time: f32, _offset: f32) -> Vec3 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_seeded_table_is_reproducible() {
        let a = NoiseTable::seeded(256, 7).unwrap();
        let b = NoiseTable::seeded(256, 7).unwrap();
        assert_eq!(a.vectors(), b.vectors());
        assert_eq!(a.sample(12.34, 0.2), b.sample(12.34, 0.2));
    }

    #[test]
    fn test_components_in_range() {
        let table = NoiseTable::seeded(64, 1).unwrap();
        for i in 0..500 {
            let v = table.sample(i as f32 * 0.013, (i % 5) as f32 / 5.0);
            assert!(v.abs().max_element() <= 1.0);
        }
    }

    #[test]
    fn test_texel_centers_return_entries() {
        let vectors = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
        ];
        let table = NoiseTable::from_vectors(vectors.clone()).unwrap();
        for (i, expected) in vectors.iter().enumerate() {
            let u = (i as f32 + 0.5) / 4.0;
            assert!(approx(table.sample(u, 0.0), *expected));
        }
    }

    #[test]
    fn test_linear_reconstruction_between_entries() {
        let table = NoiseTable::from_vectors(vec![Vec3::X, -Vec3::X]).unwrap();
        // u = 0.5 位于两个纹素中心之间
        assert!(approx(table.sample(0.5, 0.0), Vec3::ZERO));
        // u = 0 在最后一项和第一项之间环绕插值
        assert!(approx(table.sample(0.0, 0.0), Vec3::ZERO));
        assert!(approx(table.sample(0.375, 0.0), Vec3::X * 0.5));
    }

    #[test]
    fn test_wrapping_addressing() {
        let table = NoiseTable::seeded(32, 99).unwrap();
        let a = table.sample(0.3, 0.1);
        assert!(approx(a, table.sample(1.3, 0.1)));
        assert!(approx(a, table.sample(-0.7, 0.1)));
        assert!(approx(a, table.sample(0.0, 0.4)));
    }

    #[test]
    fn test_unit_sample() {
        let table = NoiseTable::seeded(128, 3).unwrap();
        let v = table.sample_unit(5.5, 0.4);
        assert!((v.length() - 1.0).abs() < 1e-5);

        let zero = ConstantSource(Vec3::ZERO);
        assert_eq!(zero.sample_unit(0.0, 0.0), Vec3::Y);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(NoiseTable::seeded(0, 1).is_err());
        assert!(NoiseTable::from_vectors(Vec::new()).is_err());
        assert!(NoiseTable::from_vectors(vec![Vec3::new(2.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_rgba_upload() {
        let table = NoiseTable::from_vectors(vec![Vec3::new(0.5, -0.5, 0.25)]).unwrap();
        assert_eq!(table.to_rgba32f(), vec![[0.5, -0.5, 0.25, 0.0]]);
    }
}
