//! Asset URL construction
//!
//! Every texture, environment map, and model in the scene is addressed
//! relative to a configurable base path (for example `/ddm-files`). The
//! helpers here join the two halves without duplicating or dropping the
//! separator, and never touch the filesystem or network.

use std::path::{Component, Path, PathBuf};

/// Join a base path and a relative asset path with exactly one `/`.
///
/// One trailing separator is stripped from `base_path` and one leading
/// separator from `relative_path` before joining. An empty relative path
/// yields the base path with a single trailing separator.
pub fn resolve(base_path: &str, relative_path: &str) -> String {
    let base = base_path.strip_suffix('/').unwrap_or(base_path);
    let relative = relative_path.strip_prefix('/').unwrap_or(relative_path);
    format!("{}/{}", base, relative)
}

/// Whether `url` carries its own scheme (`https://...`, `data:...`) and
/// should therefore bypass the asset base path.
pub fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };

    let valid_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid_scheme && (rest.starts_with("//") || matches!(scheme, "data" | "blob"))
}

/// Resolve a model URL: absolute URLs are used verbatim, everything else is
/// joined onto the base path.
pub fn resolve_model_url(base_path: &str, url: &str) -> String {
    if is_absolute_url(url) {
        url.to_string()
    } else {
        resolve(base_path, url)
    }
}

/// Validate a request path for the asset backend and turn it into a path
/// relative to the asset root.
///
/// Returns `None` for empty or root-only paths, any `..` component, or a
/// platform prefix. `.` components are dropped.
pub fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }

    let mut cleaned = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => cleaned.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if cleaned.as_os_str().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_separator_variants() {
        let expected = "/ddm-files/public/ground.jpg";
        assert_eq!(resolve("/ddm-files/", "public/ground.jpg"), expected);
        assert_eq!(resolve("/ddm-files", "/public/ground.jpg"), expected);
        assert_eq!(resolve("/ddm-files/", "/public/ground.jpg"), expected);
        assert_eq!(resolve("/ddm-files", "public/ground.jpg"), expected);
    }

    #[test]
    fn test_resolve_strips_only_one_separator() {
        assert_eq!(resolve("/ddm-files//", "x.glb"), "/ddm-files//x.glb");
        assert_eq!(resolve("/ddm-files", "//x.glb"), "/ddm-files//x.glb");
    }

    #[test]
    fn test_resolve_empty_relative() {
        assert_eq!(resolve("/ddm-files", ""), "/ddm-files/");
        assert_eq!(resolve("/ddm-files/", ""), "/ddm-files/");
    }

    #[test]
    fn test_resolve_is_stable() {
        let once = resolve("/ddm-files", "data/demo/generic_fou.glb");
        let (base, relative) = once.split_at("/ddm-files".len());
        assert_eq!(resolve(base, relative), once);
        assert_eq!(resolve("/ddm-files", "data/demo/generic_fou.glb"), once);
    }

    #[test]
    fn test_absolute_urls() {
        assert!(is_absolute_url("https://dl.polyhaven.org/file/sky.hdr"));
        assert!(is_absolute_url("http://localhost:3000/a.glb"));
        assert!(is_absolute_url("data:application/octet-stream;base64,AAAA"));
        assert!(!is_absolute_url("/ddm-files/public/ground.jpg"));
        assert!(!is_absolute_url("data/demo/generic_fou.glb"));
        assert!(!is_absolute_url("C:/assets/x.glb"));
        assert!(!is_absolute_url("://missing-scheme"));
    }

    #[test]
    fn test_resolve_model_url() {
        assert_eq!(
            resolve_model_url("/ddm-files", "data/demo/generic_fou.glb"),
            "/ddm-files/data/demo/generic_fou.glb"
        );
        let remote = "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Models/master/2.0/Duck/glTF/Duck.gltf";
        assert_eq!(resolve_model_url("/ddm-files", remote), remote);
    }

    #[test]
    fn test_sanitize_request_path() {
        assert_eq!(
            sanitize_request_path("public/ground.jpg"),
            Some(PathBuf::from("public/ground.jpg"))
        );
        assert_eq!(
            sanitize_request_path("/./data/demo/generic_fou.glb"),
            Some(PathBuf::from("data/demo/generic_fou.glb"))
        );
        assert_eq!(sanitize_request_path(""), None);
        assert_eq!(sanitize_request_path("/"), None);
        assert_eq!(sanitize_request_path("./"), None);
        assert_eq!(sanitize_request_path("../secret"), None);
        assert_eq!(sanitize_request_path("public/../../secret"), None);
    }
}
