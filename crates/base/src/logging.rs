use {
    crate::{format_timestamp, format_today},
    log::{LevelFilter, Log, Metadata, Record},
    std::{
        fs::{self, File, OpenOptions},
        io::Write,
        path::PathBuf,
        sync::Mutex,
    },
};

/// Environment variable that overrides the default maximum log level.
pub const LOG_LEVEL_ENV: &str = "SCANNER_LOG";

/// Writes log lines to stdout.
pub struct StdoutLogger;

/// Writes log lines to date-named files in a directory, rolling over at
/// midnight UTC.
pub struct FileLogger {
    state: Mutex<FileLoggerState>,
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

fn format_line(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let current_date = format_today();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("{}.log", current_date)))?;
        Ok(FileLogger {
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_line(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let today = format_today();
        if today != state.current_date {
            let path = state.dir.join(format!("{}.log", today));
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => {
                    state.file = file;
                    state.current_date = today;
                }
                Err(error) => {
                    // keep writing into the old file
                    eprintln!("Failed to open new log file {:?}: {}", path, error);
                }
            }
        }

        let line = format!("{}\n", format_line(record));
        if let Err(error) = state.file.write_all(line.as_bytes()) {
            eprintln!("Failed to write to log file: {}", error);
            eprintln!("{}", line.trim_end());
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

/// Parse a level name as accepted in `SCANNER_LOG`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Maximum level: `SCANNER_LOG` if set and valid, otherwise Debug for debug
/// builds and Info for release builds.
pub fn max_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}

/// Install `StdoutLogger` as the global logger.
///
/// Only the first logger installed in a process takes effect; later calls are
/// ignored.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level());
    }
}

/// Install a `FileLogger` writing into `dir` as the global logger.
///
/// Fails if the directory or today's file cannot be created.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let logger = FileLogger::new(dir)?;
    // set_logger needs a 'static reference; this runs once per process
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(max_level());
    }
    Ok(())
}
