use crate::appender::{ConsoleAppender, LogAppender};
use crate::config::{LoggerConfig, RegistryConfig};
use crate::error::LevelError;
use crate::level::{LevelSpec, Severity, DEFAULT_LEVEL};
use crate::logger::Logger;
use colored::Colorize;
use regex_lite::Regex;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// error 行的标记，聚合查询按它过滤
pub const ERROR_TAG: &str = "ERROR!";

/// warning 行的标记，聚合查询按它过滤
pub const WARNING_TAG: &str = "WARNING!";

/// 跨实例聚合时使用的计数字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountField {
    /// 已保存的日志行数
    #[default]
    Lines,
    /// error 次数
    Errors,
    /// warning 次数
    Warnings,
}

/// 级别注册表
///
/// 持有全局级别阈值与所有 logger 实例，所有 logger 共享同一个输出通道
pub struct LevelRegistry {
    threshold: RwLock<Option<Severity>>,
    instances: RwLock<Vec<Arc<Logger>>>,
    appender: Arc<dyn LogAppender>,
    colored: bool,
}

impl LevelRegistry {
    /// 从配置创建注册表，按 `appender` 配置输出到终端
    pub fn new(config: RegistryConfig) -> Arc<Self> {
        let appender = Arc::new(ConsoleAppender::from(config.appender.clone()));
        Self::with_appender(config, appender)
    }

    /// 从配置创建注册表，使用指定的输出通道
    pub fn with_appender(config: RegistryConfig, appender: Arc<dyn LogAppender>) -> Arc<Self> {
        let registry = Self {
            threshold: RwLock::new(None),
            instances: RwLock::new(Vec::new()),
            appender,
            colored: config.colored,
        };

        // 初始级别与 set_threshold 走同一套归一化和回退规则
        match config.level {
            Some(spec) => registry.apply_threshold(spec),
            None => *registry.threshold_mut() = Some(DEFAULT_LEVEL),
        }

        Arc::new(registry)
    }

    /// 创建 logger 并注册到当前注册表
    pub fn new_logger(self: &Arc<Self>, config: LoggerConfig) -> Arc<Logger> {
        Logger::new(self, config)
    }

    /// 设置级别阈值
    ///
    /// `None` 关闭所有输出；非法值保持原阈值（已关闭时回退到 info），
    /// 并在输出通道上打印一行诊断信息
    pub fn set_threshold<L: Into<LevelSpec>>(&self, level: Option<L>) {
        match level {
            Some(spec) => self.apply_threshold(spec.into()),
            None => self.disable(),
        }
    }

    /// 设置级别阈值（非 Option 形式）
    pub fn set_level(&self, level: impl Into<LevelSpec>) {
        self.apply_threshold(level.into());
    }

    /// 关闭所有输出
    pub fn disable(&self) {
        *self.threshold_mut() = None;
        tracing::debug!("log level disabled");
    }

    /// 当前阈值，`None` 表示已关闭
    pub fn threshold(&self) -> Option<Severity> {
        *self.threshold_ref()
    }

    /// 当前阈值的 rank，`None` 表示已关闭
    pub fn level(&self) -> Option<i64> {
        self.threshold().map(Severity::rank)
    }

    /// 注册表是否处于开启状态
    pub fn is_enabled(&self) -> bool {
        self.threshold().is_some()
    }

    /// 指定 rank 的消息是否会被输出：开启且 rank <= 阈值
    pub fn is_enabled_for(&self, rank: i64) -> bool {
        match self.threshold() {
            Some(threshold) => rank <= threshold.rank(),
            None => false,
        }
    }

    /// 是否对标记和诊断信息着色
    pub fn colored(&self) -> bool {
        self.colored
    }

    /// 注册 logger 实例
    pub fn register(&self, logger: Arc<Logger>) {
        let mut instances = self.instances_mut();
        instances.push(logger);
        tracing::debug!(instances = instances.len(), "logger registered");
    }

    /// 按实例身份移除 logger，logger 本身及其历史记录不受影响
    pub fn unregister(&self, logger: &Logger) -> bool {
        let mut instances = self.instances_mut();
        let before = instances.len();
        instances.retain(|registered| !std::ptr::eq(Arc::as_ptr(registered), logger));
        before != instances.len()
    }

    /// 清空所有已注册的 logger
    pub fn clear_all(&self) {
        let mut instances = self.instances_mut();
        let cleared = instances.len();
        instances.clear();
        tracing::debug!(cleared, "logger registry cleared");
    }

    /// 已注册 logger 的快照（按注册顺序）
    pub fn loggers(&self) -> Vec<Arc<Logger>> {
        self.instances_ref().clone()
    }

    pub fn instance_count(&self) -> usize {
        self.instances_ref().len()
    }

    /// 对所有实例的指定字段求和
    pub fn count_instances(&self, field: CountField) -> usize {
        self.instances_ref()
            .iter()
            .map(|logger| match field {
                CountField::Lines => logger.count(),
                CountField::Errors => logger.errors(),
                CountField::Warnings => logger.warnings(),
            })
            .sum()
    }

    /// 所有实例的日志总行数
    pub fn count(&self) -> usize {
        self.count_instances(CountField::Lines)
    }

    pub fn count_errors(&self) -> usize {
        self.count_instances(CountField::Errors)
    }

    pub fn count_warnings(&self) -> usize {
        self.count_instances(CountField::Warnings)
    }

    /// 所有实例的日志行，先按注册顺序、再按写入顺序拼接
    pub fn messages(&self) -> Vec<String> {
        self.instances_ref()
            .iter()
            .flat_map(|logger| logger.logs())
            .collect()
    }

    /// 所有带 ERROR! 标记的日志行
    pub fn all_error_messages(&self) -> Vec<String> {
        self.messages_containing(ERROR_TAG)
    }

    /// 所有带 WARNING! 标记的日志行
    pub fn all_warning_messages(&self) -> Vec<String> {
        self.messages_containing(WARNING_TAG)
    }

    /// 匹配正则的日志行
    pub fn messages_matching(&self, pattern: &Regex) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|message| pattern.is_match(message))
            .collect()
    }

    /// 匹配正则字符串的日志行
    pub fn messages_matching_str(&self, pattern: &str) -> Result<Vec<String>, LevelError> {
        let regex = Regex::new(pattern).map_err(|source| LevelError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.messages_matching(&regex))
    }

    /// 向共享输出通道写入一行
    ///
    /// 写入失败只记录 tracing 告警，日志操作本身不会失败
    pub fn emit(&self, line: &str) {
        if let Err(err) = self.appender.append(line) {
            tracing::warn!(error = %err, "failed to write log line");
        }
    }

    /// 刷新共享输出通道
    pub fn flush(&self) {
        if let Err(err) = self.appender.flush() {
            tracing::warn!(error = %err, "failed to flush log output");
        }
    }

    fn messages_containing(&self, tag: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|message| message.contains(tag))
            .collect()
    }

    fn apply_threshold(&self, spec: LevelSpec) {
        let rank = spec.normalized();
        let fallback = {
            let mut threshold = self.threshold_mut();
            match Severity::from_rank(rank) {
                Some(severity) => {
                    *threshold = Some(severity);
                    None
                }
                None => {
                    let fallback = (*threshold).unwrap_or(DEFAULT_LEVEL);
                    *threshold = Some(fallback);
                    Some(fallback)
                }
            }
        };

        if let Some(fallback) = fallback {
            let label = if self.colored {
                "LOG LEVEL ERROR".red().to_string()
            } else {
                "LOG LEVEL ERROR".to_string()
            };
            self.emit(&format!(
                "{}: {} is unknown - falling back to {}",
                label,
                spec,
                fallback.rank()
            ));
            tracing::warn!(value = %spec, fallback = %fallback, "unknown log level");
        }
    }

    fn threshold_ref(&self) -> RwLockReadGuard<'_, Option<Severity>> {
        self.threshold.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn threshold_mut(&self) -> RwLockWriteGuard<'_, Option<Severity>> {
        self.threshold.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn instances_ref(&self) -> RwLockReadGuard<'_, Vec<Arc<Logger>>> {
        self.instances.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn instances_mut(&self) -> RwLockWriteGuard<'_, Vec<Arc<Logger>>> {
        self.instances.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for LevelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelRegistry")
            .field("threshold", &self.threshold())
            .field("instances", &self.instance_count())
            .field("colored", &self.colored)
            .finish()
    }
}
