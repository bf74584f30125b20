use chrono::{DateTime, Utc};
use colored::*;
use log::kv::{self, Key, Value, VisitSource};
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;

static BOT_LOGGER: Lazy<BotLogger> = Lazy::new(BotLogger::new);

/// Installs the process-wide logger. Fails if another logger is already set.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_log_level_filter();
    BOT_LOGGER.update_config(config)?;

    if let Err(e) = log::set_logger(&*BOT_LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(max_level);
    Ok(())
}

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Fatal => Color::Magenta,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
            LogLevel::Fatal => "💀",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            // `log` has no fatal level
            LogLevel::Error | LogLevel::Fatal => log::LevelFilter::Error,
        }
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}

/// One emitted record, with the key/values attached at the call site in `context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
    pub thread_id: String,
    pub context: BTreeMap<String, serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
            thread_id: format!("{:?}", std::thread::current().id()),
            context: BTreeMap::new(),
        }
    }
}

struct ContextCollector<'a>(&'a mut BTreeMap<String, serde_json::Value>);

impl<'kvs, 'a> VisitSource<'kvs> for ContextCollector<'a> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        let json = if let Some(n) = value.to_u64() {
            serde_json::Value::from(n)
        } else if let Some(n) = value.to_i64() {
            serde_json::Value::from(n)
        } else if let Some(b) = value.to_bool() {
            serde_json::Value::from(b)
        } else {
            serde_json::Value::String(value.to_string())
        };
        self.0.insert(key.as_str().to_string(), json);
        Ok(())
    }
}

/// Controls what the logger prints and where it writes.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_to_file: bool,
    pub log_file_path: String,
    pub custom_prefix: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            show_module: true,
            include_timestamp: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_to_file: false,
            log_file_path: "imagegen-bot.log".to_string(),
            custom_prefix: None,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_to_file = true;
        self.log_file_path = path.to_string();
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.custom_prefix = Some(prefix.to_string());
        self
    }

    /// JSON lines without colours, also appended to the log file.
    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            log_to_file: true,
            ..Default::default()
        }
    }

    /// Reads `LOG_LEVEL`, `LOG_JSON`, `LOG_FILE` and `LOG_PREFIX` on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("LOG_LEVEL") {
            match level.parse() {
                Ok(level) => config = config.with_level(level),
                Err(e) => eprintln!("{}, falling back to {}", e, config.min_level.as_str()),
            }
        }
        if lookup("LOG_JSON").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            config = config.with_json_output(true).with_colors(false);
        }
        if let Some(path) = lookup("LOG_FILE").filter(|p| !p.trim().is_empty()) {
            config = config.with_file_output(&path);
        }
        if let Some(prefix) = lookup("LOG_PREFIX").filter(|p| !p.trim().is_empty()) {
            config = config.with_prefix(prefix.trim());
        }

        config
    }
}

/// `log` backend printing to stdout and, when configured, a log file.
pub struct BotLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl BotLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) -> Result<(), String> {
        if new_config.log_to_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&new_config.log_file_path)
                .map_err(|e| {
                    format!("Failed to open log file {}: {}", new_config.log_file_path, e)
                })?;
            if let Ok(mut log_file) = self.log_file.lock() {
                *log_file = Some(file);
            }
        }

        let mut config = self
            .config
            .lock()
            .map_err(|_| "Logger configuration lock poisoned".to_string())?;
        *config = new_config;
        Ok(())
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let mut output = String::new();

        if let Some(prefix) = &config.custom_prefix {
            if config.show_colors {
                output.push_str(&format!("[{}] ", prefix.bright_white().bold()));
            } else {
                output.push_str(&format!("[{}] ", prefix));
            }
        }

        if config.include_timestamp {
            let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
            if config.show_colors {
                output.push_str(&format!("{} ", timestamp.bright_black()));
            } else {
                output.push_str(&format!("{} ", timestamp));
            }
        }

        let level_str = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        if config.show_colors {
            output.push_str(&format!(
                "[{}] ",
                level_str.color(entry.level.color()).bold()
            ));
        } else {
            output.push_str(&format!("[{}] ", level_str));
        }

        if config.show_module && !entry.module.is_empty() {
            if config.show_colors {
                output.push_str(&format!("{}: ", entry.module.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.module));
            }
        }

        if config.show_colors {
            output.push_str(&entry.message.white().bold().to_string());
        } else {
            output.push_str(&entry.message);
        }

        if !entry.context.is_empty() {
            let context = serde_json::to_string(&entry.context).unwrap_or_default();
            output.push(' ');
            if config.show_colors {
                output.push_str(&context.bright_cyan().to_string());
            } else {
                output.push_str(&context);
            }
        }

        if config.show_file_location {
            let location = format!("{}:{}", entry.file, entry.line);
            if config.show_colors {
                output.push_str(&format!(" ({})", location.bright_black()));
            } else {
                output.push_str(&format!(" ({})", location));
            }
        }

        output
    }

    fn write_to_file(&self, entry: &LogEntry, config: &LoggerConfig) {
        if let Ok(mut log_file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *log_file_guard {
                let content = if config.output_json {
                    serde_json::to_string(entry).unwrap_or_default() + "\n"
                } else {
                    // Never write ANSI escapes to the file.
                    let plain = LoggerConfig {
                        show_colors: false,
                        ..config.clone()
                    };
                    self.format_console_output(entry, &plain) + "\n"
                };
                let _ = file.write_all(content.as_bytes());
                let _ = file.flush();
            }
        }
    }

    /// Builds the entry for `record`, copying its key/values into `context`.
    fn create_log_entry(&self, record: &Record) -> LogEntry {
        let mut entry = LogEntry::new(
            LogLevel::from_log_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        );
        let _ = record
            .key_values()
            .visit(&mut ContextCollector(&mut entry.context));
        entry
    }
}

impl Default for BotLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for BotLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_log_level_filter(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = self.create_log_entry(record);
        if let Ok(config) = self.config.lock() {
            if config.output_json {
                println!("{}", serde_json::to_string(&entry).unwrap_or_default());
            } else {
                println!("{}", self.format_console_output(&entry, &config));
            }

            if config.log_to_file {
                self.write_to_file(&entry, &config);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut log_file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *log_file_guard {
                let _ = file.flush();
            }
        }
    }
}

/// Logs the effective configuration. Credentials are never printed.
pub fn log_config_info(config: &crate::config::Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   OpenAI base URL: {}", config.openai.base_url);
    log::info!("   Image model: {}", config.openai.model);
    log::info!("   Images directory: {}", config.storage.images_dir.display());
    log::info!(
        "   OpenAI API key: {}",
        if config.openai.api_key.is_empty() { "❌" } else { "✅" }
    );
    log::info!(
        "   Discord token: {}",
        if config.discord.token.is_empty() { "❌" } else { "✅" }
    );
}

/// In-memory `log` sink for tests that assert on emitted entries.
///
/// The sink is process-wide, so readers only see entries logged from their own thread.
#[cfg(test)]
pub(crate) mod capture {
    use super::{BotLogger, LogEntry};
    use log::{Metadata, Record};
    use once_cell::sync::Lazy;
    use std::sync::{Mutex, Once};

    struct CaptureLogger {
        builder: BotLogger,
        entries: Mutex<Vec<LogEntry>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let entry = self.builder.create_log_entry(record);
            if let Ok(mut entries) = self.entries.lock() {
                entries.push(entry);
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Lazy<CaptureLogger> = Lazy::new(|| CaptureLogger {
        builder: BotLogger::new(),
        entries: Mutex::new(Vec::new()),
    });

    pub(crate) fn install() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            if log::set_logger(&*CAPTURE).is_ok() {
                log::set_max_level(log::LevelFilter::Trace);
            }
        });
    }

    /// Entries logged so far by the calling thread.
    pub(crate) fn entries() -> Vec<LogEntry> {
        let thread_id = format!("{:?}", std::thread::current().id());
        CAPTURE
            .entries
            .lock()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.thread_id == thread_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
