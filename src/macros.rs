//! 组件构造相关的宏定义
//!
//! 提供简化 From trait 实现的宏

/// 为配置类型自动实现 From trait
///
/// 用法：`impl_from!(ConfigType => Type)`，调用 Type::new(config)
#[macro_export]
macro_rules! impl_from {
    ($config_type:ty => $target_type:ty) => {
        impl From<$config_type> for $target_type {
            fn from(config: $config_type) -> Self {
                <$target_type>::new(config)
            }
        }
    };
}
