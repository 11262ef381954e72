//! Logger module
//!
//! Logging utilities for the dashboard server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AppState, Config};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

/// Print the startup banner
///
/// The serving URL and the stop instruction go to stdout regardless of log
/// file configuration so an interactive user always sees them.
pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    println!("======================================");
    println!("Serving dashboard at http://localhost:{}", addr.port());
    println!("Press Ctrl+C to stop the server.");
    println!("======================================");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Dashboard root: {}", state.root.display()));
    if let Some(workers) = state.config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = state.config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = state.config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_signal_received(name: &str) {
    write_info(&format!("\n[Signal] {name} received, shutting down"));
}

pub fn log_shutdown() {
    write_info("[Shutdown] Listener closed, exiting");
}

pub fn log_browser_opened(url: &str) {
    write_info(&format!("[Browser] Opened {url}"));
}
