//! URL path to filesystem location resolution.
//!
//! Maps a request path onto one of two allowed roots and rejects anything
//! that escapes its selected root. The containment check below is the sole
//! security boundary of the server.

use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};

/// URL segment under which the dependency root is exposed
pub const DEPENDENCY_PREFIX: &str = "node_modules";

/// Identity of an allowed root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTag {
    /// Frontend asset root
    Primary,
    /// Installed-dependency root
    Secondary,
}

/// An absolute, canonicalized directory requests may be served from
#[derive(Debug, Clone)]
pub struct AllowedRoot {
    pub tag: RootTag,
    pub dir: PathBuf,
}

/// A request path that resolved outside every allowed root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

/// An absolute path together with the root it was validated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub root: RootTag,
}

/// The two allowed roots, fixed at startup.
///
/// `project_root` is the parent of the dependency root; import-map
/// generation computes file paths relative to it.
#[derive(Debug, Clone)]
pub struct ServeRoots {
    primary: AllowedRoot,
    secondary: AllowedRoot,
    project_root: PathBuf,
    index_file: String,
}

impl ServeRoots {
    /// Canonicalize both roots. Fails if either directory is missing,
    /// since containment checks against a non-existent root are meaningless.
    pub fn new(frontend_dir: &Path, node_modules_dir: &Path, index_file: &str) -> io::Result<Self> {
        let primary = frontend_dir.canonicalize()?;
        let secondary = node_modules_dir.canonicalize()?;
        let project_root = secondary
            .parent()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "dependency root has no parent directory",
                )
            })?
            .to_path_buf();
        Ok(Self {
            primary: AllowedRoot {
                tag: RootTag::Primary,
                dir: primary,
            },
            secondary: AllowedRoot {
                tag: RootTag::Secondary,
                dir: secondary,
            },
            project_root,
            index_file: index_file.to_string(),
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub const fn primary(&self) -> &AllowedRoot {
        &self.primary
    }

    pub const fn secondary(&self) -> &AllowedRoot {
        &self.secondary
    }

    /// Resolve a request path to a filesystem location.
    ///
    /// Steps: percent-decode, normalize segments (collapsing `.` and `..`
    /// lexically, never trusting the raw string), rewrite trailing `/` to
    /// the index file, select the root by the `/node_modules` prefix, join,
    /// and verify containment. The prefix match alone never grants access;
    /// the joined path must still sit under the selected root.
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedLocation, Rejected> {
        let decoded = percent_decode_str(request_path)
            .decode_utf8()
            .map_err(|_| Rejected)?;
        if decoded.contains('\0') {
            return Err(Rejected);
        }

        let mut segments: Vec<&str> = Vec::new();
        for seg in decoded.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    // A pop past the start is kept so the join below walks
                    // above the root and fails containment.
                    if segments.last().is_some_and(|s| *s != "..") {
                        segments.pop();
                    } else {
                        segments.push("..");
                    }
                }
                other => segments.push(other),
            }
        }

        // Directory-index convention
        if decoded.is_empty() || decoded.ends_with('/') {
            segments.push(&self.index_file);
        }

        let (root, base) = if segments.first() == Some(&DEPENDENCY_PREFIX) {
            // The literal node_modules segment maps onto the dependency
            // directory, so the join starts at its parent.
            (&self.secondary, self.project_root.as_path())
        } else {
            (&self.primary, self.primary.dir.as_path())
        };

        let joined = lexical_join(base, &segments);
        if joined.starts_with(&root.dir) {
            Ok(ResolvedLocation {
                path: joined,
                root: root.tag,
            })
        } else {
            Err(Rejected)
        }
    }
}

/// Join normalized segments onto a base, resolving `..` lexically
/// (symlink-agnostic, no filesystem access).
fn lexical_join(base: &Path, segments: &[&str]) -> PathBuf {
    let mut out = base.to_path_buf();
    for seg in segments {
        if *seg == ".." {
            out.pop();
        } else {
            out.push(seg);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn roots() -> (TempDir, ServeRoots) {
        let tmp = TempDir::new().unwrap();
        let frontend = tmp.path().join("frontend");
        let node_modules = tmp.path().join("node_modules");
        fs::create_dir(&frontend).unwrap();
        fs::create_dir(&node_modules).unwrap();
        let roots = ServeRoots::new(&frontend, &node_modules, "index.html").unwrap();
        (tmp, roots)
    }

    #[test]
    fn resolves_against_primary_root() {
        let (_tmp, roots) = roots();
        let loc = roots.resolve("/app/main.ts").unwrap();
        assert_eq!(loc.root, RootTag::Primary);
        assert!(loc.path.ends_with("frontend/app/main.ts"));
    }

    #[test]
    fn node_modules_prefix_selects_secondary_root() {
        let (_tmp, roots) = roots();
        let loc = roots.resolve("/node_modules/chalk/index.js").unwrap();
        assert_eq!(loc.root, RootTag::Secondary);
        assert!(loc.path.ends_with("node_modules/chalk/index.js"));
    }

    #[test]
    fn trailing_slash_appends_index_file() {
        let (_tmp, roots) = roots();
        let loc = roots.resolve("/").unwrap();
        assert!(loc.path.ends_with("frontend/index.html"));

        let loc = roots.resolve("/sub/").unwrap();
        assert!(loc.path.ends_with("frontend/sub/index.html"));
    }

    #[test]
    fn traversal_out_of_root_is_rejected() {
        let (_tmp, roots) = roots();
        assert_eq!(roots.resolve("/../../etc/passwd"), Err(Rejected));
        assert_eq!(roots.resolve("/../secret.txt"), Err(Rejected));
        assert_eq!(roots.resolve("/a/../../../etc/passwd"), Err(Rejected));
    }

    #[test]
    fn encoded_traversal_is_rejected() {
        let (_tmp, roots) = roots();
        assert_eq!(roots.resolve("/%2e%2e/%2e%2e/etc/passwd"), Err(Rejected));
        assert_eq!(roots.resolve("/..%2f..%2fetc/passwd"), Err(Rejected));
    }

    #[test]
    fn traversal_within_root_is_allowed() {
        let (_tmp, roots) = roots();
        // Collapses back inside the primary root before the join
        let loc = roots.resolve("/sub/../main.ts").unwrap();
        assert!(loc.path.ends_with("frontend/main.ts"));
    }

    #[test]
    fn node_modules_escape_into_sibling_is_rejected_or_rerooted() {
        let (_tmp, roots) = roots();
        // Popping the node_modules segment lands the path back under the
        // primary root, never in a sibling of the dependency root.
        let loc = roots.resolve("/node_modules/../common/types.ts").unwrap();
        assert_eq!(loc.root, RootTag::Primary);
        assert!(loc.path.ends_with("frontend/common/types.ts"));

        assert_eq!(roots.resolve("/node_modules/../../x"), Err(Rejected));
    }

    #[test]
    fn nul_byte_is_rejected() {
        let (_tmp, roots) = roots();
        assert_eq!(roots.resolve("/a%00b"), Err(Rejected));
    }

    #[test]
    fn exact_root_path_is_contained() {
        let (_tmp, roots) = roots();
        let loc = roots.resolve("/node_modules").unwrap();
        assert_eq!(loc.path, roots.secondary().dir);
    }
}
