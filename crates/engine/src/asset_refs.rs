use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetRefError {
    #[error("asset reference must not be empty")]
    Empty,
    #[error("asset reference '{reference}' points outside the local asset root")]
    Remote { reference: String },
    #[error("asset reference must not contain '\\\\'")]
    Backslash,
    #[error("asset reference must not contain '..'")]
    ParentTraversal,
    #[error("asset reference contains control character {character:?}")]
    ControlCharacter { character: char },
}

const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "data:"];

/// Maps a story asset reference onto the local asset root. A leading `/`
/// means "from the asset root", the way public-folder paths are written.
pub fn resolve_asset_path(asset_root: &Path, reference: &str) -> Result<PathBuf, AssetRefError> {
    validate_asset_ref(reference)?;
    let relative = reference.trim_start_matches('/');
    if relative.is_empty() {
        return Err(AssetRefError::Empty);
    }
    Ok(asset_root.join(relative))
}

pub(crate) fn validate_asset_ref(reference: &str) -> Result<(), AssetRefError> {
    if reference.is_empty() {
        return Err(AssetRefError::Empty);
    }
    if REMOTE_PREFIXES
        .iter()
        .any(|prefix| reference.starts_with(prefix))
    {
        return Err(AssetRefError::Remote {
            reference: reference.to_string(),
        });
    }
    if reference.contains('\\') {
        return Err(AssetRefError::Backslash);
    }
    if reference.split('/').any(|segment| segment == "..") {
        return Err(AssetRefError::ParentTraversal);
    }
    if let Some(character) = reference.chars().find(|ch| ch.is_control()) {
        return Err(AssetRefError::ControlCharacter { character });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_relative_and_root_anchored_refs() {
        let root = Path::new("/srv/tale/assets");
        assert_eq!(
            resolve_asset_path(root, "/images/intro.png").expect("anchored"),
            root.join("images/intro.png")
        );
        assert_eq!(
            resolve_asset_path(root, "audio/theme.mp3").expect("relative"),
            root.join("audio/theme.mp3")
        );
        assert!(resolve_asset_path(root, "images/v1..2/a.png").is_ok());
    }

    #[test]
    fn rejects_invalid_refs() {
        let root = Path::new("assets");
        for reference in [
            "",
            "/",
            "../secret.png",
            "a/../../b.png",
            r"images\a.png",
            "https://cdn.example/a.png",
            "data:image/png;base64,AAAA",
            "a\nb.png",
        ] {
            assert!(
                resolve_asset_path(root, reference).is_err(),
                "reference={reference:?}"
            );
        }
    }
}
