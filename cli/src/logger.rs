use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use popuptip_core::paths;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct PopupTipLogger {
    max_level: Level,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, usize>>,
    next_color_index: AtomicUsize,
}

impl PopupTipLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        let max_level = if quiet {
            Level::Info
        } else if verbose {
            Level::Trace
        } else {
            Level::Debug
        };

        Self {
            max_level,
            log_file: Mutex::new(open_log_file()),
            target_colors: Mutex::new(HashMap::new()),
            next_color_index: AtomicUsize::new(0),
        }
    }

    fn color_for_target(&self, target: &str) -> ColoredString {
        // Palette of colors that still read well when dimmed
        let colors: &[fn(&str) -> ColoredString] = &[
            |s| s.green(),
            |s| s.yellow(),
            |s| s.blue(),
            |s| s.magenta(),
            |s| s.cyan(),
        ];

        let index = match self.target_colors.lock() {
            Ok(mut target_colors) => *target_colors
                .entry(target.to_string())
                .or_insert_with(|| {
                    self.next_color_index.fetch_add(1, Ordering::SeqCst) % colors.len()
                }),
            Err(_) => 0,
        };
        colors[index](target)
    }

    fn format_colored(&self, record: &Record) -> String {
        let tag = level_tag(record.level());
        let target = short_target(record);

        let message = match target {
            Some(target) => format!(
                "{} [{}] {}",
                tag,
                self.color_for_target(target).dimmed(),
                record.args()
            ),
            None => format!("{} {}", tag, record.args()),
        };

        match record.level() {
            Level::Error => message.red().bold().to_string(),
            Level::Warn => message.yellow().bold().to_string(),
            level => {
                let colored_tag = match level {
                    Level::Info => tag.green().bold(),
                    Level::Debug => tag.blue().bold(),
                    _ => tag.white().bold(),
                };
                message.replacen(tag, &colored_tag.to_string(), 1)
            }
        }
    }
}

fn open_log_file() -> Option<File> {
    paths::ensure_data_dir()?;
    let path = paths::log_file_path()?;
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file at {:?}: {}", path, e);
            None
        }
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[E]",
        Level::Warn => "[W]",
        Level::Info => "[I]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

/// Last path segment of the record target, e.g. `controller` for
/// `popuptip_core::tip::controller`.
fn short_target<'a>(record: &'a Record) -> Option<&'a str> {
    let target = record.target();
    if target.is_empty() {
        return None;
    }
    target.rsplit("::").next()
}

fn format_plain(record: &Record) -> String {
    match short_target(record) {
        Some(target) => format!("{} [{}] {}", level_tag(record.level()), target, record.args()),
        None => format!("{} {}", level_tag(record.level()), record.args()),
    }
}

impl Log for PopupTipLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!("{}", self.format_colored(record));

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(file) = file_opt.as_mut() {
                let _ = writeln!(file, "{}", format_plain(record));
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {}
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let logger = PopupTipLogger::new(quiet, verbose);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
