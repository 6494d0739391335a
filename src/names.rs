//! # Name Standardization
//!
//! Group, track, and inherited-group names arrive in whatever shape the
//! legacy scheme allowed. Every name is pushed through [`standardize_name`]
//! before it is used as a key, so two raw spellings that standardize
//! identically are treated as the same group. That collision is the point:
//! "Admin Team" and "admin.team" refer to one migrated group.

/// Canonicalize a group or track name.
///
/// Trims surrounding whitespace, replaces `:`, space, and `.` with `-`,
/// and lower-cases the result. Idempotent.
pub fn standardize_name(name: &str) -> String {
    name.trim().replace([':', ' ', '.'], "-").to_lowercase()
}
