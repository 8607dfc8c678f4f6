//! Content production for resolved locations.
//!
//! Decides, by file extension, how response bytes are produced: type-stripped
//! script text, HTML with an injected import map, or raw passthrough. Nothing
//! is cached across requests; every hit re-reads and re-transforms from disk,
//! so edits are visible immediately.

use crate::handler::error::ServeError;
use crate::handler::resolve::{ResolvedLocation, ServeRoots};
use crate::http::mime;
use crate::importmap;
use crate::strip;
use std::io;
use std::path::Path;
use tokio::fs;

/// Supported content kinds, dispatched case-insensitively by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `.ts`: served as type-stripped JavaScript
    Script,
    /// `.html`: served with a generated import map injected
    Html,
    /// Everything else: raw passthrough
    Raw,
}

impl ContentKind {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("ts") => Self::Script,
            Some("html") => Self::Html,
            _ => Self::Raw,
        }
    }
}

/// Produced response content plus its content-type
#[derive(Debug)]
pub enum TransformOutcome {
    ScriptText(String),
    HtmlWithImportMap(String),
    RawFile(Vec<u8>, &'static str),
}

impl TransformOutcome {
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::ScriptText(_) => "text/javascript",
            Self::HtmlWithImportMap(_) => "text/html",
            Self::RawFile(_, ct) => ct,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::ScriptText(s) | Self::HtmlWithImportMap(s) => s.into_bytes(),
            Self::RawFile(b, _) => b,
        }
    }
}

/// Produce response content for a validated location.
pub async fn produce(
    location: &ResolvedLocation,
    roots: &ServeRoots,
) -> Result<TransformOutcome, ServeError> {
    match ContentKind::from_path(&location.path) {
        ContentKind::Script => {
            let source = fs::read_to_string(&location.path).await?;
            Ok(TransformOutcome::ScriptText(strip::strip_types(&source)))
        }
        ContentKind::Html => {
            let content = fs::read_to_string(&location.path).await?;
            let map_json = generate_import_map(location, roots, &content).await?;
            Ok(TransformOutcome::HtmlWithImportMap(inject_import_map(
                content, &map_json,
            )))
        }
        ContentKind::Raw => {
            let meta = fs::metadata(&location.path).await?;
            if !meta.is_file() {
                // A directory passed the containment check but must never be
                // served as a file body
                return Err(ServeError::NotFound);
            }
            let bytes = fs::read(&location.path).await?;
            let ext = location
                .path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            Ok(TransformOutcome::RawFile(
                bytes,
                mime::get_content_type(ext.as_deref()),
            ))
        }
    }
}

/// Generate and serialize the import map for an HTML file. The graph walk
/// hits the filesystem, so it runs on the blocking pool rather than stalling
/// the request loop.
async fn generate_import_map(
    location: &ResolvedLocation,
    roots: &ServeRoots,
    content: &str,
) -> Result<String, ServeError> {
    let project_root = roots.project_root().to_path_buf();
    let relative = location
        .path
        .strip_prefix(&project_root)
        .map_err(|_| {
            ServeError::Transform(io::Error::other(
                "resolved location is outside the project root",
            ))
        })?
        .to_path_buf();
    let html = content.to_string();
    let map = tokio::task::spawn_blocking(move || {
        importmap::generate(&project_root, &relative, &html)
    })
    .await
    .map_err(|e| ServeError::Transform(io::Error::other(e)))??;
    map.to_json().map_err(ServeError::ImportMap)
}

/// Insert the import-map script element immediately before the first
/// `<script` occurrence (case-insensitive). A document without any script
/// tag has no injection point and is returned unmodified.
fn inject_import_map(content: String, map_json: &str) -> String {
    const PATTERN: &[u8] = b"<script";
    let bytes = content.as_bytes();
    if bytes.len() < PATTERN.len() {
        return content;
    }
    let found = (0..=bytes.len() - PATTERN.len())
        .find(|&i| bytes[i..i + PATTERN.len()].eq_ignore_ascii_case(PATTERN));
    match found {
        Some(pos) => {
            let mut out = String::with_capacity(content.len() + map_json.len() + 40);
            out.push_str(&content[..pos]);
            out.push_str("<script type=\"importmap\">");
            out.push_str(map_json);
            out.push_str("</script>");
            out.push_str(&content[pos..]);
            out
        }
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::resolve::ServeRoots;
    use std::fs as stdfs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn project() -> (TempDir, ServeRoots) {
        let tmp = TempDir::new().unwrap();
        let frontend = tmp.path().join("frontend");
        let node_modules = tmp.path().join("node_modules");
        stdfs::create_dir(&frontend).unwrap();
        stdfs::create_dir(&node_modules).unwrap();
        let roots = ServeRoots::new(&frontend, &node_modules, "index.html").unwrap();
        (tmp, roots)
    }

    #[test]
    fn kind_dispatch_is_case_insensitive() {
        assert_eq!(ContentKind::from_path(Path::new("a/x.ts")), ContentKind::Script);
        assert_eq!(ContentKind::from_path(Path::new("a/X.TS")), ContentKind::Script);
        assert_eq!(ContentKind::from_path(Path::new("a/i.HTML")), ContentKind::Html);
        assert_eq!(ContentKind::from_path(Path::new("a/p.png")), ContentKind::Raw);
        assert_eq!(ContentKind::from_path(Path::new("noext")), ContentKind::Raw);
    }

    #[test]
    fn injects_before_first_script_tag() {
        let html = "<html><head><SCRIPT src=\"a.js\"></SCRIPT></head></html>".to_string();
        let out = inject_import_map(html, r#"{"imports":{}}"#);
        assert_eq!(
            out,
            "<html><head><script type=\"importmap\">{\"imports\":{}}</script><SCRIPT src=\"a.js\"></SCRIPT></head></html>"
        );
    }

    #[test]
    fn document_without_script_is_unmodified() {
        let html = "<html><body><p>no scripts here</p></body></html>".to_string();
        assert_eq!(inject_import_map(html.clone(), "{}"), html);
    }

    #[tokio::test]
    async fn script_files_are_stripped() {
        let (_tmp, roots) = project();
        let path = roots.primary().dir.join("index.ts");
        stdfs::write(&path, "const x: number = 1;\n").unwrap();
        let loc = roots.resolve("/index.ts").unwrap();
        let outcome = produce(&loc, &roots).await.unwrap();
        assert_eq!(outcome.content_type(), "text/javascript");
        assert_eq!(outcome.into_bytes(), b"const x = 1;\n");
    }

    #[tokio::test]
    async fn html_gets_import_map_injected() {
        let (tmp, roots) = project();
        stdfs::create_dir_all(tmp.path().join("node_modules/chalk")).unwrap();
        stdfs::write(
            tmp.path().join("node_modules/chalk/package.json"),
            r#"{"main":"index.js"}"#,
        )
        .unwrap();
        stdfs::write(
            roots.primary().dir.join("index.html"),
            "<body><script type=\"module\" src=\"./index.ts\"></script></body>",
        )
        .unwrap();
        stdfs::write(
            roots.primary().dir.join("index.ts"),
            "import chalk from 'chalk';\n",
        )
        .unwrap();

        let loc = roots.resolve("/").unwrap();
        let outcome = produce(&loc, &roots).await.unwrap();
        assert_eq!(outcome.content_type(), "text/html");
        let body = String::from_utf8(outcome.into_bytes()).unwrap();
        let first_script = body.find("<script").unwrap();
        assert!(body[first_script..].starts_with("<script type=\"importmap\">"));
        assert_eq!(body.matches("importmap").count(), 1);
        assert!(body.contains("\"chalk\":\"/node_modules/chalk/index.js\""));
    }

    #[tokio::test]
    async fn transformed_output_is_idempotent_across_requests() {
        let (_tmp, roots) = project();
        stdfs::write(
            roots.primary().dir.join("app.ts"),
            "let n: number = 2;\nexport { n };\n",
        )
        .unwrap();
        let loc = roots.resolve("/app.ts").unwrap();
        let first = produce(&loc, &roots).await.unwrap().into_bytes();
        let second = produce(&loc, &roots).await.unwrap().into_bytes();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn directories_report_not_found() {
        let (_tmp, roots) = project();
        stdfs::create_dir(roots.primary().dir.join("assets")).unwrap();
        let loc = roots.resolve("/assets").unwrap();
        let err = produce(&loc, &roots).await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound));
    }

    #[tokio::test]
    async fn missing_file_reports_not_found() {
        let (_tmp, roots) = project();
        let loc = ResolvedLocation {
            path: PathBuf::from(roots.primary().dir.join("missing-file.png")),
            root: crate::handler::resolve::RootTag::Primary,
        };
        let err = produce(&loc, &roots).await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound));
    }

    #[tokio::test]
    async fn raw_files_pass_through_with_inferred_type() {
        let (_tmp, roots) = project();
        stdfs::write(roots.primary().dir.join("style.css"), "body{}").unwrap();
        let loc = roots.resolve("/style.css").unwrap();
        let outcome = produce(&loc, &roots).await.unwrap();
        assert_eq!(outcome.content_type(), "text/css");
        assert_eq!(outcome.into_bytes(), b"body{}");
    }
}
