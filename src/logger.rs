use crate::config::{Indent, LoggerConfig};
use crate::level::Severity;
use crate::registry::{LevelRegistry, ERROR_TAG, WARNING_TAG};
use colored::Colorize;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// 按级别分发的输出函数
type Emitter = fn(&Logger, &str, Indent);

/// 行标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Plain,
    Error,
    Warning,
}

/// 单个 logger 的可变状态，追加与计数在同一把锁内完成
#[derive(Debug, Default)]
struct LogBook {
    lines: Vec<String>,
    errors: usize,
    warnings: usize,
}

/// 日志器
///
/// 每个实例带有标题、缩进前缀和默认级别，并保存自己输出过的日志行。
/// 是否输出由所属 [`LevelRegistry`] 的阈值决定。
pub struct Logger {
    title: String,
    indent: String,
    default: Severity,
    emitter: Emitter,
    registry: Weak<LevelRegistry>,
    book: Mutex<LogBook>,
}

impl Logger {
    /// 创建 logger 并注册到指定注册表
    pub fn new(registry: &Arc<LevelRegistry>, config: LoggerConfig) -> Arc<Self> {
        let logger = Arc::new(Self {
            title: config.title,
            indent: config.indent.to_whitespace(),
            default: config.default,
            emitter: emitter_for(config.default),
            registry: Arc::downgrade(registry),
            book: Mutex::new(LogBook::default()),
        });

        registry.register(Arc::clone(&logger));
        logger
    }

    /// 只带标题的 logger
    pub fn with_title(registry: &Arc<LevelRegistry>, title: impl Into<String>) -> Arc<Self> {
        Self::new(registry, LoggerConfig::default().title(title))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 归一化后的缩进前缀
    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn default_severity(&self) -> Severity {
        self.default
    }

    /// 按默认级别记录日志
    pub fn log(&self, message: impl AsRef<str>) {
        (self.emitter)(self, message.as_ref(), Indent::default())
    }

    /// 按默认级别记录日志，附加额外缩进
    pub fn log_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        (self.emitter)(self, message.as_ref(), extra.into())
    }

    /// 记录 error 日志，带 `ERROR!` 标记并计数
    pub fn error(&self, message: impl AsRef<str>) {
        self.error_indented(message, Indent::default())
    }

    pub fn error_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Error, Tag::Error, message.as_ref(), extra.into())
    }

    /// 记录 warning 日志，与 info 同级，带 `WARNING!` 标记并计数
    pub fn warning(&self, message: impl AsRef<str>) {
        self.warning_indented(message, Indent::default())
    }

    pub fn warning_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Info, Tag::Warning, message.as_ref(), extra.into())
    }

    /// 记录 info 日志
    pub fn info(&self, message: impl AsRef<str>) {
        self.info_indented(message, Indent::default())
    }

    pub fn info_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Info, Tag::Plain, message.as_ref(), extra.into())
    }

    /// 记录 parser 日志
    pub fn parser(&self, message: impl AsRef<str>) {
        self.parser_indented(message, Indent::default())
    }

    pub fn parser_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Parser, Tag::Plain, message.as_ref(), extra.into())
    }

    /// 记录 cf 日志
    pub fn cf(&self, message: impl AsRef<str>) {
        self.cf_indented(message, Indent::default())
    }

    pub fn cf_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Cf, Tag::Plain, message.as_ref(), extra.into())
    }

    /// 记录 morph 日志
    pub fn morph(&self, message: impl AsRef<str>) {
        self.morph_indented(message, Indent::default())
    }

    pub fn morph_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Morph, Tag::Plain, message.as_ref(), extra.into())
    }

    /// 记录 debug 日志
    pub fn debug(&self, message: impl AsRef<str>) {
        self.debug_indented(message, Indent::default())
    }

    pub fn debug_indented(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        self.write(Severity::Debug, Tag::Plain, message.as_ref(), extra.into())
    }

    /// 裸输出
    ///
    /// 不带标题和实例缩进，只加额外缩进；按默认级别判断是否输出，
    /// 不保存、不计数
    pub fn bare(&self, message: impl AsRef<str>, extra: impl Into<Indent>) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if !registry.is_enabled_for(self.default.rank()) {
            return;
        }

        let extra: Indent = extra.into();
        registry.emit(&format!("{}{}", extra, message.as_ref()));
    }

    /// 已保存的日志行数
    pub fn count(&self) -> usize {
        self.book().lines.len()
    }

    /// error 次数
    pub fn errors(&self) -> usize {
        self.book().errors
    }

    /// warning 次数
    pub fn warnings(&self) -> usize {
        self.book().warnings
    }

    /// 已保存日志行的快照
    pub fn logs(&self) -> Vec<String> {
        self.book().lines.clone()
    }

    fn write(&self, severity: Severity, tag: Tag, message: &str, extra: Indent) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if !registry.is_enabled_for(severity.rank()) {
            return;
        }

        let line = self.format_line(&registry, tag, message, &extra);

        // 保存与输出在同一把锁内，logs() 的顺序与输出顺序一致
        let mut book = self.book();
        registry.emit(&line);
        book.lines.push(line);
        match tag {
            Tag::Error => book.errors += 1,
            Tag::Warning => book.warnings += 1,
            Tag::Plain => {}
        }
    }

    fn format_line(&self, registry: &LevelRegistry, tag: Tag, message: &str, extra: &Indent) -> String {
        let decorated = match tag {
            Tag::Plain => message.to_string(),
            Tag::Error => {
                let text = format!("{} {}", ERROR_TAG, message);
                if registry.colored() {
                    text.bright_red().to_string()
                } else {
                    text
                }
            }
            Tag::Warning => {
                let text = format!("{} {}", WARNING_TAG, message);
                if registry.colored() {
                    text.yellow().to_string()
                } else {
                    text
                }
            }
        };

        let mut line = String::with_capacity(
            self.indent.len() + self.title.len() + decorated.len() + 8,
        );
        line.push_str(&self.indent);
        line.push_str(&extra.to_whitespace());
        if !self.title.is_empty() {
            line.push_str(&self.title);
            line.push_str(": ");
        }
        line.push_str(&decorated);
        line
    }

    fn book(&self) -> MutexGuard<'_, LogBook> {
        self.book.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("title", &self.title)
            .field("indent", &self.indent)
            .field("default", &self.default)
            .field("count", &self.count())
            .finish()
    }
}

/// 默认级别到输出函数的映射，构造时确定一次
fn emitter_for(severity: Severity) -> Emitter {
    match severity {
        Severity::Error => |logger, message, extra| logger.error_indented(message, extra),
        Severity::Info => |logger, message, extra| logger.info_indented(message, extra),
        Severity::Parser => |logger, message, extra| logger.parser_indented(message, extra),
        Severity::Cf => |logger, message, extra| logger.cf_indented(message, extra),
        Severity::Morph => |logger, message, extra| logger.morph_indented(message, extra),
        Severity::Debug => |logger, message, extra| logger.debug_indented(message, extra),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::MemoryAppender;
    use crate::config::RegistryConfig;
    use crate::level::LevelSpec;

    /// 辅助函数：创建输出到内存、指定级别的注册表
    fn create_test_registry(level: impl Into<LevelSpec>) -> (Arc<LevelRegistry>, Arc<MemoryAppender>) {
        let appender = Arc::new(MemoryAppender::new());
        let config = RegistryConfig {
            level: Some(level.into()),
            ..RegistryConfig::default()
        };
        let registry = LevelRegistry::with_appender(config, appender.clone());
        (registry, appender)
    }

    #[test]
    fn test_logger_defaults() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::default());
        assert_eq!(logger.title(), "");
        assert_eq!(logger.indent(), "");
        assert_eq!(logger.default_severity(), Severity::Info);
        assert_eq!(logger.count(), 0);
    }

    #[test]
    fn test_logger_title_and_indent() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::new().title("a").indent("  "));
        assert_eq!(logger.title(), "a");
        assert_eq!(logger.indent(), "  ");

        let logger = Logger::new(&registry, LoggerConfig::new().title("title").indent(3));
        assert_eq!(logger.indent(), "   ");
    }

    #[test]
    fn test_logger_registers_itself() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::with_title(&registry, "Registered");
        assert!(registry.loggers().iter().any(|l| Arc::ptr_eq(l, &logger)));
    }

    #[test]
    fn test_log_with_title_and_indent() {
        let (registry, appender) = create_test_registry(1);

        let logger = Logger::new(&registry, LoggerConfig::new().title("Logger").indent(2));
        logger.log("message");

        assert_eq!(appender.lines(), vec!["  Logger: message"]);
        assert_eq!(logger.logs(), vec!["  Logger: message"]);
    }

    #[test]
    fn test_log_extra_indent_adds_up() {
        let (registry, appender) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::new().indent(2));
        logger.log_indented("message", 2);
        logger.info_indented("text", "--");

        assert_eq!(appender.lines(), vec!["    message", "  --text"]);
    }

    #[test]
    fn test_log_dispatches_to_default() {
        let (registry, appender) = create_test_registry("cf");

        let a = Logger::new(&registry, LoggerConfig::new().default_severity(Severity::Cf));
        let b = Logger::new(&registry, LoggerConfig::new().default_severity(Severity::Morph));
        a.log("cf line");
        b.log("morph line");

        assert_eq!(appender.lines(), vec!["cf line"]);
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn test_log_default_error_counts() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::new().default_severity(Severity::Error));
        logger.log("failed");

        assert_eq!(logger.errors(), 1);
        assert_eq!(logger.logs(), vec!["ERROR! failed"]);
    }

    #[test]
    fn test_error_tag_and_counter() {
        let (registry, appender) = create_test_registry("error");

        let logger = Logger::with_title(&registry, "Parser");
        logger.error("unexpected token");

        assert_eq!(logger.errors(), 1);
        assert_eq!(appender.lines(), vec!["Parser: ERROR! unexpected token"]);
    }

    #[test]
    fn test_warning_tag_and_counter() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::default());
        logger.warning("");
        logger.warning("");

        assert_eq!(logger.warnings(), 2);
        assert_eq!(logger.errors(), 0);
        assert!(logger.logs().iter().all(|line| line.contains("WARNING!")));
    }

    #[test]
    fn test_warning_filtered_below_info() {
        let (registry, appender) = create_test_registry("error");

        let logger = Logger::new(&registry, LoggerConfig::default());
        logger.warning("quiet");

        assert_eq!(logger.warnings(), 0);
        assert!(appender.is_empty());
    }

    #[test]
    fn test_severity_gating() {
        let (registry, appender) = create_test_registry("parser");

        let logger = Logger::new(&registry, LoggerConfig::default());
        logger.error("e");
        logger.info("i");
        logger.parser("p");
        logger.cf("c");
        logger.morph("m");
        logger.debug("d");

        assert_eq!(appender.lines(), vec!["ERROR! e", "i", "p"]);
        assert_eq!(logger.count(), 3);
    }

    #[test]
    fn test_disabled_registry_is_noop() {
        let (registry, appender) = create_test_registry("debug");
        registry.disable();

        let logger = Logger::new(&registry, LoggerConfig::default());
        logger.error("x");
        logger.debug("x");
        logger.bare("x", 0);

        assert!(appender.is_empty());
        assert_eq!(logger.errors(), 0);
        assert_eq!(logger.count(), 0);
    }

    #[test]
    fn test_bare_skips_title_indent_and_storage() {
        let (registry, appender) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::new().title("Title").indent(28));
        logger.bare("message", 1);

        assert_eq!(appender.lines(), vec![" message"]);
        assert!(logger.logs().is_empty());
        assert_eq!(logger.count(), 0);
    }

    #[test]
    fn test_bare_respects_default_severity() {
        let (registry, appender) = create_test_registry("cf");

        let a = Logger::new(&registry, LoggerConfig::new().default_severity(Severity::Debug));
        let b = Logger::new(&registry, LoggerConfig::new().default_severity(Severity::Info));
        a.bare("", 0);
        b.bare("", 0);

        assert_eq!(appender.len(), 1);
        assert_eq!(a.count() + b.count(), 0);
    }

    #[test]
    fn test_count_and_logs() {
        let (registry, _) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::default());
        for _ in 0..5 {
            logger.log("");
        }
        logger.log("message");

        assert_eq!(logger.count(), 6);
        assert!(logger.logs().contains(&"message".to_string()));
    }

    #[test]
    fn test_colored_tags_keep_markers() {
        let appender = Arc::new(MemoryAppender::new());
        let config = RegistryConfig {
            colored: true,
            ..RegistryConfig::default()
        };
        let registry = LevelRegistry::with_appender(config, appender.clone());

        let logger = Logger::new(&registry, LoggerConfig::default());
        logger.error("red");
        logger.warning("yellow");

        assert_eq!(registry.all_error_messages().len(), 1);
        assert_eq!(registry.all_warning_messages().len(), 1);
    }

    #[test]
    fn test_dropped_registry_is_noop() {
        let (registry, appender) = create_test_registry("debug");

        let logger = Logger::new(&registry, LoggerConfig::default());
        drop(registry);
        logger.error("orphan");

        assert_eq!(logger.count(), 0);
        assert!(appender.is_empty());
    }

    #[test]
    fn test_logger_shared_across_threads() {
        let (registry, appender) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        logger.error("concurrent");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(logger.errors(), 100);
        assert_eq!(logger.count(), 100);
        assert_eq!(appender.len(), 100);
        assert_eq!(registry.count_errors(), 100);
    }

    #[test]
    fn test_stored_order_matches_output_order() {
        let (registry, appender) = create_test_registry("info");

        let logger = Logger::new(&registry, LoggerConfig::default());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        logger.info(format!("worker {} line {}", worker, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(logger.count(), 200);
        assert_eq!(logger.logs(), appender.lines());
    }
}
