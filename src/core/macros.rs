//! 核心宏定义
//!
//! 配置结构体大多只需要一组字段默认值，用宏统一生成 `Default` 实现。

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use fire_sparks::impl_default;
///
/// struct BurstShape {
///     count: u32,
///     spread: f32,
/// }
///
/// impl_default!(BurstShape {
///     count: 5,
///     spread: 7.5,
/// });
///
/// assert_eq!(BurstShape::default().count, 5);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
