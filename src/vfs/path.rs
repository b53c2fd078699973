//! slash-separated paths rooted at a tree's root

/// normalize a path relative to the tree root
///
/// empty and `.` segments are dropped, `..` pops a segment and never climbs
/// above the root. the root itself normalizes to the empty string.
pub fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    parts.join("/")
}

/// split a clean path into (parent, name); the root yields ("", "")
pub fn split_parent(clean: &str) -> (&str, &str) {
    match clean.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", clean),
    }
}

/// join a relative name onto a base path
pub fn join(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}

/// path segments of a clean path
pub(crate) fn segments(clean: &str) -> impl Iterator<Item = &str> {
    clean.split('/').filter(|s| !s.is_empty())
}

/// path shown in error messages
pub(crate) fn display(clean: &str) -> String {
    format!("/{}", clean)
}
