// Mount path module
// Maps request paths under the configured mount prefix onto bundle paths

/// Strip `mount` from the front of `path`
///
/// Returns `None` when the request lies outside the mount. The mount root
/// itself maps to `/`.
pub fn strip_mount_path<'a>(mount: &str, path: &'a str) -> Option<&'a str> {
    let mount = mount.trim_end_matches('/');
    if mount.is_empty() {
        return Some(path);
    }

    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        // "/application" is not under "/app"
        None
    }
}
