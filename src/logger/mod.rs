//! Logger module
//!
//! Logging utilities for the dev server:
//! - server lifecycle logging
//! - access logging with timestamps
//! - error and warning logging
//! - optional file-backed sinks selected by configuration

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::Method;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Mutex, OnceLock};

struct Sinks {
    access: Option<Mutex<File>>,
    error: Option<Mutex<File>>,
}

static SINKS: OnceLock<Sinks> = OnceLock::new();

/// Initialize the logger with configuration.
///
/// Should be called once at application startup; later calls are no-ops.
pub fn init(config: &Config) -> std::io::Result<()> {
    let access = match config.logging.access_log_file.as_deref() {
        Some(path) => Some(Mutex::new(open_append(path)?)),
        None => None,
    };
    let error = match config.logging.error_log_file.as_deref() {
        Some(path) => Some(Mutex::new(open_append(path)?)),
        None => None,
    };
    let _ = SINKS.set(Sinks { access, error });
    Ok(())
}

fn open_append(path: &str) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn write_info(message: &str) {
    match SINKS.get().and_then(|s| s.access.as_ref()) {
        Some(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match SINKS.get().and_then(|s| s.error.as_ref()) {
        Some(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Dev server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Frontend root: {}", config.serve.frontend_dir));
    write_info(&format!(
        "Dependency root: {}",
        config.serve.node_modules_dir
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
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

/// Log a completed request to the access log
pub fn log_access(method: &Method, path: &str, status: u16) {
    let entry = AccessLogEntry {
        method: method.as_str(),
        path,
        status,
    };
    write_info(&entry.format());
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    write_info(&format!("[API] {method} {path} - {status}"));
}

pub fn log_shutdown() {
    write_info("\n[Shutdown] Signal received, stopping server");
}
