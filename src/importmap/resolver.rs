//! Package entry-point resolution against an installed dependency tree.

use super::ImportMapError;
use serde::Deserialize;
use std::io;
use std::path::Path;

/// The subset of package.json consulted for entry-point resolution
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub exports: Option<serde_json::Value>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
}

/// Resolve the entry file of an installed package, relative to its own
/// directory. Precedence: `exports` root entry, then `module`, then `main`,
/// defaulting to `index.js`.
pub fn resolve_entry(node_modules: &Path, package: &str) -> Result<String, ImportMapError> {
    let manifest_path = node_modules.join(package).join("package.json");
    let raw = std::fs::read_to_string(&manifest_path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ImportMapError::PackageNotFound(package.to_string())
        } else {
            ImportMapError::Io {
                path: manifest_path.clone(),
                source: e,
            }
        }
    })?;
    let manifest: PackageManifest =
        serde_json::from_str(&raw).map_err(|e| ImportMapError::Manifest {
            path: manifest_path,
            source: e,
        })?;

    let entry = manifest
        .exports
        .as_ref()
        .and_then(exports_entry)
        .or(manifest.module)
        .or(manifest.main)
        .unwrap_or_else(|| "index.js".to_string());

    Ok(entry.trim_start_matches("./").to_string())
}

/// Pick the root entry out of an `exports` field. Conditional objects are
/// walked in `import` > `browser` > `module` > `default` order.
fn exports_entry(exports: &serde_json::Value) -> Option<String> {
    match exports {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => {
            let root = map.get(".").unwrap_or(exports);
            conditional_entry(root)
        }
        serde_json::Value::Array(items) => items.iter().find_map(exports_entry),
        _ => None,
    }
}

fn conditional_entry(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => ["import", "browser", "module", "default"]
            .iter()
            .find_map(|key| map.get(*key).and_then(conditional_entry)),
        serde_json::Value::Array(items) => items.iter().find_map(conditional_entry),
        _ => None,
    }
}

/// Split a bare specifier into its package name (one segment, or two for
/// scoped packages) and the remaining subpath.
pub fn split_specifier(spec: &str) -> (String, Option<String>) {
    let mut parts = spec.splitn(if spec.starts_with('@') { 3 } else { 2 }, '/');
    let name = if spec.starts_with('@') {
        let scope = parts.next().unwrap_or_default();
        let pkg = parts.next().unwrap_or_default();
        format!("{scope}/{pkg}")
    } else {
        parts.next().unwrap_or_default().to_string()
    };
    let subpath = parts.next().filter(|s| !s.is_empty()).map(String::from);
    (name, subpath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, pkg: &str, body: &str) {
        let pkg_dir = dir.join(pkg);
        fs::create_dir_all(&pkg_dir).unwrap();
        fs::write(pkg_dir.join("package.json"), body).unwrap();
    }

    #[test]
    fn exports_string_wins() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            tmp.path(),
            "a",
            r#"{"exports":"./dist/a.js","module":"./m.js","main":"./i.js"}"#,
        );
        assert_eq!(resolve_entry(tmp.path(), "a").unwrap(), "dist/a.js");
    }

    #[test]
    fn exports_conditional_root() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            tmp.path(),
            "chalk",
            r#"{"exports":{".":{"import":"./source/index.js"}}}"#,
        );
        assert_eq!(
            resolve_entry(tmp.path(), "chalk").unwrap(),
            "source/index.js"
        );
    }

    #[test]
    fn module_then_main_fallback() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "b", r#"{"module":"./esm/b.js"}"#);
        write_manifest(tmp.path(), "c", r#"{"main":"lib/c.js"}"#);
        write_manifest(tmp.path(), "d", r#"{"name":"d"}"#);
        assert_eq!(resolve_entry(tmp.path(), "b").unwrap(), "esm/b.js");
        assert_eq!(resolve_entry(tmp.path(), "c").unwrap(), "lib/c.js");
        assert_eq!(resolve_entry(tmp.path(), "d").unwrap(), "index.js");
    }

    #[test]
    fn missing_package_is_reported_by_name() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_entry(tmp.path(), "ghost").unwrap_err();
        assert!(matches!(err, ImportMapError::PackageNotFound(name) if name == "ghost"));
    }

    #[test]
    fn scoped_and_subpath_specifiers() {
        assert_eq!(split_specifier("chalk"), ("chalk".to_string(), None));
        assert_eq!(
            split_specifier("@jsenv/core"),
            ("@jsenv/core".to_string(), None)
        );
        assert_eq!(
            split_specifier("lodash/debounce"),
            ("lodash".to_string(), Some("debounce".to_string()))
        );
        assert_eq!(
            split_specifier("@scope/pkg/sub/mod.js"),
            ("@scope/pkg".to_string(), Some("sub/mod.js".to_string()))
        );
    }
}
