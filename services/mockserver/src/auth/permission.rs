//! Permission strings and matching.
//!
//! # Grammar
//! A permission is colon-separated segments: `domain:action[:target]`, e.g.
//! `roles:read`, `roles:edit:Admin`, `inputs:*`, `*`.
//!
//! # Matching
//! A granted permission implies a required one when, segment by segment, the
//! grant segment is a glob (`*` wildcards) or a comma-separated list of globs
//! matching the required segment. A grant with fewer segments implies every
//! remaining segment, so `roles:read` covers `roles:read:Admin`. A grant with
//! more segments only implies a shorter requirement if the extra segments are
//! all `*`.
use std::collections::BTreeSet;

/// Glob match of one segment. `*` matches any run of characters, including
/// an empty one; everything else is literal.
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    let mut pieces = pattern.split('*');
    let head = pieces.next().unwrap_or_default();
    let Some(mut rest) = value.strip_prefix(head) else {
        return false;
    };
    let pieces: Vec<&str> = pieces.collect();
    let Some((tail, middle)) = pieces.split_last() else {
        return rest.is_empty();
    };
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.ends_with(tail)
}

fn segment_matches(granted: &str, required: &str) -> bool {
    granted
        .split(',')
        .map(str::trim)
        .any(|alternative| wildcard_match(alternative, required))
}

/// Whether holding `granted` satisfies `required`.
pub fn permission_implies(granted: &str, required: &str) -> bool {
    let granted: Vec<&str> = granted.split(':').collect();
    let required: Vec<&str> = required.split(':').collect();
    for (idx, needed) in required.iter().enumerate() {
        match granted.get(idx) {
            None => return true,
            Some(part) if segment_matches(part, needed) => {}
            Some(_) => return false,
        }
    }
    granted.iter().skip(required.len()).all(|part| *part == "*")
}

/// Build the required permission string, scoped to `target` when given.
///
/// The target is not escaped. Role names and usernames are rejected at create
/// time if they contain `:`, so a target always stays one segment.
pub fn scoped(permission: &str, target: Option<&str>) -> String {
    match target {
        Some(target) if !target.is_empty() => format!("{permission}:{target}"),
        _ => permission.to_string(),
    }
}

/// De-duplicated set of granted permission strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: BTreeSet<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I, S>(&mut self, grants: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants.extend(grants.into_iter().map(Into::into));
    }

    /// Check `permission`, scoped to `target` when one is given. Unscoped
    /// grants cover every target.
    pub fn allows(&self, permission: &str, target: Option<&str>) -> bool {
        let required = scoped(permission, target);
        self.grants
            .iter()
            .any(|grant| permission_implies(grant, &required))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.grants.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
