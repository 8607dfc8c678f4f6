//! Access log entry formatting.

use chrono::Local;

/// One completed request, formatted for the access log
pub struct AccessLogEntry<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub status: u16,
}

impl AccessLogEntry<'_> {
    /// Render the entry with a local timestamp, e.g.
    /// `[2026-08-30 14:02:11] "GET /index.ts" 200`
    #[must_use]
    pub fn format(&self) -> String {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("[{ts}] \"{} {}\" {}", self.method, self.path, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_contains_method_path_and_status() {
        let entry = AccessLogEntry {
            method: "GET",
            path: "/index.ts",
            status: 200,
        };
        let line = entry.format();
        assert!(line.contains("\"GET /index.ts\" 200"));
        assert!(line.starts_with('['));
    }
}
