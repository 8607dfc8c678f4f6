//! Import-map generation for HTML entry points.
//!
//! Walks the module graph reachable from an HTML file's `<script src>`
//! references, collects the bare specifiers imported anywhere in that graph,
//! and resolves each against the installed dependency tree so the browser
//! can load them without a bundler. Resolved values are root-relative URLs
//! under `/node_modules/`.
//!
//! Type-only imports are excluded: they are erased before the browser ever
//! sees them, so they may legitimately refer to modules outside the served
//! tree.

mod resolver;

pub use resolver::{resolve_entry, split_specifier};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportMapError {
    #[error("package '{0}' is not installed under node_modules")]
    PackageNotFound(String),
    #[error("malformed package manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("import map serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Mapping from bare module specifiers to resolvable URLs
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ImportMap {
    pub imports: BTreeMap<String, String>,
}

impl ImportMap {
    pub fn to_json(&self) -> Result<String, ImportMapError> {
        serde_json::to_string(self).map_err(ImportMapError::Serialize)
    }
}

/// A module specifier found in source text
#[derive(Debug, PartialEq, Eq)]
struct ModuleRef {
    spec: String,
    type_only: bool,
}

/// Generate the import map for one HTML file.
///
/// `html_rel` is the file's path relative to `project_root`; `html` is its
/// content (already read by the caller). Every request regenerates the map
/// from disk, so a freshly installed dependency is picked up immediately.
pub fn generate(
    project_root: &Path,
    html_rel: &Path,
    html: &str,
) -> Result<ImportMap, ImportMapError> {
    let html_dir = project_root
        .join(html_rel)
        .parent()
        .map_or_else(|| project_root.to_path_buf(), Path::to_path_buf);
    let node_modules = project_root.join("node_modules");

    let mut bare = BTreeSet::new();
    let mut visited_files = HashSet::new();
    for src in script_sources(html) {
        let file = if let Some(rooted) = src.strip_prefix('/') {
            project_root.join(rooted)
        } else {
            html_dir.join(&src)
        };
        walk_module(&file, &mut visited_files, &mut bare)?;
    }

    let mut imports = BTreeMap::new();
    let mut resolved_packages = HashSet::new();
    let mut queue: Vec<String> = bare.into_iter().collect();
    while let Some(spec) = queue.pop() {
        if imports.contains_key(&spec) {
            continue;
        }
        let (name, subpath) = split_specifier(&spec);
        let entry = resolve_entry(&node_modules, &name)?;
        let url = match &subpath {
            Some(sub) if sub.rsplit('/').next().is_some_and(|s| s.contains('.')) => {
                format!("/node_modules/{name}/{sub}")
            }
            Some(sub) => format!("/node_modules/{name}/{sub}.js"),
            None => format!("/node_modules/{name}/{entry}"),
        };
        imports.insert(spec, url);

        // A package's own entry graph may pull in further bare dependencies
        if resolved_packages.insert(name.clone()) {
            let entry_file = node_modules.join(&name).join(&entry);
            let mut transitive = BTreeSet::new();
            walk_module(&entry_file, &mut visited_files, &mut transitive)?;
            for t in transitive {
                if !imports.contains_key(&t) {
                    queue.push(t);
                }
            }
        }
    }

    Ok(ImportMap { imports })
}

/// Recursively collect bare specifiers from a module file and the relative
/// imports reachable from it. Missing files are skipped, not failed: the
/// request for the missing module itself will produce the 404.
fn walk_module(
    file: &Path,
    visited: &mut HashSet<PathBuf>,
    bare: &mut BTreeSet<String>,
) -> Result<(), ImportMapError> {
    if !is_module_file(file) || !visited.insert(file.to_path_buf()) {
        return Ok(());
    }
    let Ok(source) = std::fs::read_to_string(file) else {
        return Ok(());
    };
    let dir = file.parent().map_or_else(PathBuf::new, Path::to_path_buf);
    for m in scan_specifiers(&source) {
        if m.type_only {
            continue;
        }
        let spec = m.spec;
        if spec.starts_with("./") || spec.starts_with("../") {
            walk_module(&dir.join(&spec), visited, bare)?;
        } else if !spec.starts_with('/') && !spec.starts_with('#') && !spec.contains("://") {
            bare.insert(spec);
        }
    }
    Ok(())
}

fn is_module_file(file: &Path) -> bool {
    file.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ts" | "js" | "mjs"))
}

/// Extract local `src` values from `<script>` tags, skipping remote URLs
fn script_sources(html: &str) -> Vec<String> {
    let bytes = html.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while let Some(pos) = find_ci(bytes, i, b"<script") {
        let end = find_byte(bytes, pos, b'>').unwrap_or(bytes.len());
        if let Some(src) = attribute_value(&html[pos..end], "src") {
            if !src.contains("://") && !src.starts_with("//") {
                out.push(src);
            }
        }
        i = end + 1;
    }
    out
}

/// Pull a quoted attribute value out of a tag slice
fn attribute_value(tag: &str, name: &str) -> Option<String> {
    let bytes = tag.as_bytes();
    let mut i = 0;
    while let Some(pos) = find_ci(bytes, i, name.as_bytes()) {
        let before_ok = pos == 0 || bytes[pos - 1].is_ascii_whitespace();
        let mut j = pos + name.len();
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if before_ok && bytes.get(j) == Some(&b'=') {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if let Some(&q) = bytes.get(j) {
                if q == b'"' || q == b'\'' {
                    let close = find_byte(bytes, j + 1, q)?;
                    return Some(tag[j + 1..close].to_string());
                }
            }
        }
        i = pos + name.len();
    }
    None
}

/// Scan module specifiers out of script source: static `import`/`export ..
/// from`, side-effect imports, and dynamic `import(...)` with a literal
/// argument. Strings and comments are skipped so specifiers inside them are
/// not picked up.
fn scan_specifiers(src: &str) -> Vec<ModuleRef> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            b'\'' | b'"' | b'`' => i = skip_string(bytes, i),
            c if is_word_start(c) => {
                let start = i;
                while i < bytes.len() && is_word_char(bytes[i]) {
                    i += 1;
                }
                let boundary = start == 0 || !is_word_char(bytes[start - 1]);
                if boundary {
                    match &bytes[start..i] {
                        b"import" => {
                            if let Some((m, next)) = import_clause(src, bytes, i) {
                                out.push(m);
                                i = next;
                            }
                        }
                        b"export" => {
                            if let Some((m, next)) = export_clause(src, bytes, i) {
                                out.push(m);
                                i = next;
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => i += 1,
        }
    }
    out
}

/// Parse the remainder of an `import` statement starting after the keyword,
/// returning the specifier and the index to resume scanning at.
fn import_clause(src: &str, bytes: &[u8], after_kw: usize) -> Option<(ModuleRef, usize)> {
    let mut i = skip_ws(bytes, after_kw);
    // Dynamic import with a literal argument
    if bytes.get(i) == Some(&b'(') {
        i = skip_ws(bytes, i + 1);
        let (spec, end) = string_literal(src, bytes, i)?;
        return Some((
            ModuleRef {
                spec,
                type_only: false,
            },
            end,
        ));
    }
    // Side-effect import: `import './x.ts';`
    if let Some((spec, end)) = string_literal(src, bytes, i) {
        return Some((
            ModuleRef {
                spec,
                type_only: false,
            },
            end,
        ));
    }
    let type_only = word_at(bytes, i) == Some(b"type");
    let (spec, end) = from_specifier(src, bytes, i)?;
    Some((ModuleRef { spec, type_only }, end))
}

fn export_clause(src: &str, bytes: &[u8], after_kw: usize) -> Option<(ModuleRef, usize)> {
    let i = skip_ws(bytes, after_kw);
    let type_only = word_at(bytes, i) == Some(b"type");
    let (spec, end) = from_specifier(src, bytes, i)?;
    Some((ModuleRef { spec, type_only }, end))
}

/// Find the string literal following a `from` keyword before the statement
/// ends
fn from_specifier(src: &str, bytes: &[u8], mut i: usize) -> Option<(String, usize)> {
    let mut depth = 0u32;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'(' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b';' | b'\n' if depth == 0 => return None,
            b'\'' | b'"' | b'`' => i = skip_string(bytes, i),
            c if is_word_start(c) => {
                let start = i;
                while i < bytes.len() && is_word_char(bytes[i]) {
                    i += 1;
                }
                if depth == 0 && &bytes[start..i] == b"from" {
                    let at = skip_ws(bytes, i);
                    return string_literal(src, bytes, at);
                }
            }
            _ => i += 1,
        }
    }
    None
}

fn string_literal(src: &str, bytes: &[u8], at: usize) -> Option<(String, usize)> {
    let q = *bytes.get(at)?;
    if q != b'\'' && q != b'"' {
        return None;
    }
    let end = find_byte(bytes, at + 1, q)?;
    Some((src[at + 1..end].to_string(), end + 1))
}

fn word_at(bytes: &[u8], at: usize) -> Option<&[u8]> {
    if !bytes.get(at).copied().is_some_and(is_word_start) {
        return None;
    }
    let mut end = at;
    while end < bytes.len() && is_word_char(bytes[end]) {
        end += 1;
    }
    Some(&bytes[at..end])
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn skip_string(bytes: &[u8], at: usize) -> usize {
    let quote = bytes[at];
    let mut i = at + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    i
}

fn find_byte(bytes: &[u8], from: usize, target: u8) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] == target)
}

fn find_ci(bytes: &[u8], from: usize, pattern: &[u8]) -> Option<usize> {
    if bytes.len() < pattern.len() {
        return None;
    }
    (from..=bytes.len() - pattern.len())
        .find(|&i| bytes[i..i + pattern.len()].eq_ignore_ascii_case(pattern))
}

const fn is_word_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

const fn is_word_char(c: u8) -> bool {
    is_word_start(c) || c.is_ascii_digit()
}
