use crate::config::{LoggerConfig, RegistryConfig};
use crate::level::LevelSpec;
use crate::logger::Logger;
use crate::registry::LevelRegistry;
use regex_lite::Regex;
use std::sync::Arc;

/// 全局 LevelRegistry 单例
///
/// 首次访问时创建，初始级别取自 LLT_DEBUG 环境变量，输出到终端
static GLOBAL_REGISTRY: once_cell::sync::Lazy<Arc<LevelRegistry>> =
    once_cell::sync::Lazy::new(|| LevelRegistry::new(RegistryConfig::from_env()));

/// 获取全局 LevelRegistry
pub fn global_registry() -> Arc<LevelRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}

/// 在全局注册表上创建 logger
pub fn new_logger(config: LoggerConfig) -> Arc<Logger> {
    Logger::new(&GLOBAL_REGISTRY, config)
}

/// 设置全局级别，`None` 关闭所有输出
pub fn set_level<L: Into<LevelSpec>>(level: Option<L>) {
    GLOBAL_REGISTRY.set_threshold(level)
}

/// 当前全局级别的 rank，`None` 表示已关闭
pub fn level() -> Option<i64> {
    GLOBAL_REGISTRY.level()
}

/// 清空全局注册的 logger
pub fn clear() {
    GLOBAL_REGISTRY.clear_all()
}

/// 全局日志总行数
pub fn count() -> usize {
    GLOBAL_REGISTRY.count()
}

pub fn count_errors() -> usize {
    GLOBAL_REGISTRY.count_errors()
}

pub fn count_warnings() -> usize {
    GLOBAL_REGISTRY.count_warnings()
}

/// 全局 error 日志行
pub fn errors() -> Vec<String> {
    GLOBAL_REGISTRY.all_error_messages()
}

/// 全局 warning 日志行
pub fn warnings() -> Vec<String> {
    GLOBAL_REGISTRY.all_warning_messages()
}

pub fn messages_that_match(pattern: &Regex) -> Vec<String> {
    GLOBAL_REGISTRY.messages_matching(pattern)
}
