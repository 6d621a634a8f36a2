//! Output file names.
//!
//! `photo.JPG` becomes `cropped_photo.png`; a name without an extension keeps
//! its whole text as the stem (`noext` → `cropped_noext.png`).

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::options::CollisionPolicy;

const OUTPUT_EXTENSION: &str = "png";

/// The part of `name` before its last `.`, or all of `name` when that part
/// would be empty.
pub fn output_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Output name for a single source file.
pub fn output_name(name: &str, prefix: &str) -> String {
    format!("{prefix}{}.{OUTPUT_EXTENSION}", output_stem(name))
}

/// Output names for a whole batch, in input order.
///
/// Two inputs that differ only by extension map to the same name; `policy`
/// decides whether the later one gets an index suffix or the batch is
/// refused.
pub fn assign_output_names<'a, I>(
    names: I,
    prefix: &str,
    policy: CollisionPolicy,
) -> Result<Vec<String>, ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken = HashSet::new();
    let mut assigned = Vec::new();

    for name in names {
        let candidate = output_name(name, prefix);
        let unique = if taken.contains(&candidate) {
            match policy {
                CollisionPolicy::Reject => return Err(ValidationError::DuplicateName(candidate)),
                CollisionPolicy::AppendIndex => {
                    let stem = output_stem(name);
                    (2..)
                        .map(|n| format!("{prefix}{stem}_{n}.{OUTPUT_EXTENSION}"))
                        .find(|c| !taken.contains(c))
                        .unwrap_or(candidate)
                }
            }
        } else {
            candidate
        };
        taken.insert(unique.clone());
        assigned.push(unique);
    }

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_strips_extension() {
        assert_eq!(output_name("photo.JPG", "cropped_"), "cropped_photo.png");
        assert_eq!(output_name("scan.png", "cropped_"), "cropped_scan.png");
    }

    #[test]
    fn test_output_name_without_extension() {
        assert_eq!(output_name("noext", "cropped_"), "cropped_noext.png");
    }

    #[test]
    fn test_output_stem_only_last_extension() {
        assert_eq!(output_stem("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_output_stem_leading_dot() {
        // Stripping would leave nothing, so the whole name is kept
        assert_eq!(output_stem(".hidden"), ".hidden");
        assert_eq!(output_name(".hidden", "cropped_"), "cropped_.hidden.png");
    }

    #[test]
    fn test_output_name_custom_prefix() {
        assert_eq!(output_name("a.webp", "thumb-"), "thumb-a.png");
    }

    #[test]
    fn test_assign_unique_names() {
        let names = assign_output_names(
            ["a.jpg", "b.png", "c"],
            "cropped_",
            CollisionPolicy::AppendIndex,
        )
        .unwrap();
        assert_eq!(names, ["cropped_a.png", "cropped_b.png", "cropped_c.png"]);
    }

    #[test]
    fn test_assign_appends_index_on_collision() {
        let names = assign_output_names(
            ["photo.jpg", "photo.png", "photo_2.gif", "photo.webp"],
            "cropped_",
            CollisionPolicy::AppendIndex,
        )
        .unwrap();
        assert_eq!(
            names,
            [
                "cropped_photo.png",
                "cropped_photo_2.png",
                "cropped_photo_2_2.png",
                "cropped_photo_3.png",
            ]
        );
    }

    #[test]
    fn test_assign_rejects_collision() {
        let result = assign_output_names(
            ["photo.jpg", "photo.png"],
            "cropped_",
            CollisionPolicy::Reject,
        );
        assert_eq!(
            result,
            Err(ValidationError::DuplicateName("cropped_photo.png".to_string()))
        );
    }
}
