//! Logger module
//!
//! Provides logging utilities for the relay including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Chat pipeline events (request, prompt, reply, backend failure)
//! - Level filtering and file-based logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a level name; unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn enabled(level: Level) -> bool {
    !writer::is_initialized() || level >= writer::get().level()
}

fn write_info(message: &str) {
    if !enabled(Level::Info) {
        return;
    }
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

fn write_error(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Access lines are governed by `logging.access_log`, not by the level
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Chat relay started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Backend: {} (model: {}) at {}",
        config.backend.kind,
        config.backend.model,
        config.backend.endpoint()
    ));
    write_info(&format!("Static root: {}", config.routes.root));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_profile_loaded(name: &str, prompt_len: usize) {
    write_info(&format!(
        "[PROMPT] Using profile '{name}' ({prompt_len} chars of system prompt)"
    ));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_debug(message: &str) {
    if !enabled(Level::Debug) {
        return;
    }
    write_info(&format!("[DEBUG] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_chat_request(turns: usize, profile: &str, backend: &str) {
    log_info(&format!(
        "[CHAT] Processing {turns} turn(s) with profile '{profile}' via {backend}"
    ));
}

pub fn log_chat_prompt(prompt: &str) {
    log_debug(&format!("[CHAT] Prompt sent to model:\n{prompt}"));
}

pub fn log_chat_reply(raw_len: usize, final_len: usize) {
    log_info(&format!(
        "[CHAT] Reply ready ({raw_len} chars from model, {final_len} after sanitizing)"
    ));
}

pub fn log_backend_failure(backend: &str, err: &impl std::fmt::Display) {
    log_error(&format!("[CHAT] {backend} backend failed: {err}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
