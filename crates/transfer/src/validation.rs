use std::path::{Component, Path};

use crate::TransferError;

/// Longest object name the blob service accepts.
pub const MAX_OBJECT_NAME_LEN: usize = 1024;

/// Validates an object name before it is used as a blob path.
///
/// Rejects:
/// - Empty names and names longer than [`MAX_OBJECT_NAME_LEN`]
/// - Names ending in `.` or `/`
/// - Control characters
/// - Absolute paths and parent directory traversal (`..`)
pub fn validate_object_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidName("empty name".into()));
    }

    if name.chars().count() > MAX_OBJECT_NAME_LEN {
        return Err(TransferError::InvalidName(format!(
            "longer than {MAX_OBJECT_NAME_LEN} characters: {name}"
        )));
    }

    if name.ends_with('.') || name.ends_with('/') {
        return Err(TransferError::InvalidName(format!(
            "must not end with '.' or '/': {name}"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(TransferError::InvalidName(format!(
            "control character in name: {name:?}"
        )));
    }

    for component in Path::new(name).components() {
        match component {
            Component::ParentDir => {
                return Err(TransferError::InvalidName(format!(
                    "parent directory traversal not allowed: {name}"
                )));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(TransferError::InvalidName(format!(
                    "absolute path not allowed: {name}"
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(validate_object_name("").is_err());
    }

    #[test]
    fn rejects_parent_dir_traversal() {
        assert!(validate_object_name("../secret.txt").is_err());
        assert!(validate_object_name("photos/../../x.png").is_err());
    }

    #[test]
    fn rejects_absolute_path() {
        assert!(validate_object_name("/etc/passwd").is_err());
    }

    #[test]
    fn rejects_trailing_dot_or_slash() {
        assert!(validate_object_name("photo.").is_err());
        assert!(validate_object_name("photos/").is_err());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(validate_object_name("bad\nname.png").is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "a".repeat(MAX_OBJECT_NAME_LEN + 1);
        assert!(validate_object_name(&name).is_err());
        let name = "a".repeat(MAX_OBJECT_NAME_LEN);
        assert!(validate_object_name(&name).is_ok());
    }

    #[test]
    fn accepts_plain_and_nested_names() {
        assert!(validate_object_name("cat.png").is_ok());
        assert!(validate_object_name("2024/holiday/beach photo.jpg").is_ok());
        assert!(validate_object_name(".hidden").is_ok());
    }
}
