// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output naming and persistence.
//
// Page names come from the caller's naming callback or the default mask.
// Written paths are always contained in the output folder: the joined path
// is normalized and must stay at or below the folder, compared component by
// component.

use std::path::{Component, Path, PathBuf};

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{ConvertOptions, PageOutput};
use tracing::{debug, instrument};

/// Output file name for `page_number`.
///
/// The naming callback wins when it returns a name. Otherwise the name is
/// `{mask}_page_{page_number}.png`, where the mask is the caller's fixed
/// mask or `default_mask`.
pub fn page_name(options: &ConvertOptions, default_mask: &str, page_number: u32) -> String {
    if let Some(name) = options
        .output_file_mask_func
        .as_ref()
        .and_then(|func| func(page_number))
    {
        return name;
    }
    let mask = options.output_file_mask.as_deref().unwrap_or(default_mask);
    format!("{mask}_page_{page_number}.png")
}

/// Create the output folder (and parents) and return its absolute,
/// canonical form.
pub async fn prepare_output_folder(folder: &Path) -> Result<PathBuf> {
    let folder_error = |source| PagewerkError::OutputFolder {
        path: folder.to_path_buf(),
        source,
    };
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(folder_error)?;
    let canonical = tokio::fs::canonicalize(folder)
        .await
        .map_err(folder_error)?;
    debug!(folder = %canonical.display(), "output folder ready");
    Ok(canonical)
}

/// Join `name` onto `base`, refusing any result outside `base`.
pub fn resolve_output_path(base: &Path, name: &str) -> Result<PathBuf> {
    let base = normalize_lexically(base);
    let candidate = normalize_lexically(&base.join(name));
    if !candidate.starts_with(&base) {
        return Err(PagewerkError::PathTraversal {
            base,
            candidate,
        });
    }
    Ok(candidate)
}

/// Resolve `.` and `..` without touching the filesystem. `..` never climbs
/// above the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push(component);
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Write a rendered page under `folder` and record its path.
///
/// Content is dropped afterwards unless `keep_content` is set.
#[instrument(skip_all, fields(page = output.page_number, name = %output.name))]
pub async fn persist_page(output: &mut PageOutput, folder: &Path, keep_content: bool) -> Result<()> {
    let path = resolve_output_path(folder, &output.name)?;
    let content = output
        .content
        .as_deref()
        .ok_or(PagewerkError::MissingContent {
            page: output.page_number,
        })?;

    tokio::fs::write(&path, content)
        .await
        .map_err(|source| PagewerkError::Persist {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), bytes = content.len(), "page written");

    output.path = Some(path);
    if !keep_content {
        output.content = None;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(name: &str, content: Option<Vec<u8>>) -> PageOutput {
        PageOutput {
            page_number: 1,
            name: name.into(),
            content,
            path: None,
            width: 10.0,
            height: 10.0,
        }
    }

    #[test]
    fn default_name_uses_mask() {
        let options = ConvertOptions::default();
        assert_eq!(page_name(&options, "bar", 2), "bar_page_2.png");
    }

    #[test]
    fn fixed_mask_overrides_default() {
        let options = ConvertOptions {
            output_file_mask: Some("scan".into()),
            ..Default::default()
        };
        assert_eq!(page_name(&options, "bar", 1), "scan_page_1.png");
    }

    #[test]
    fn callback_wins_and_can_defer() {
        let options = ConvertOptions::default()
            .with_output_file_mask_func(|n| (n % 2 == 0).then(|| format!("even-{n}.png")));
        assert_eq!(page_name(&options, "bar", 2), "even-2.png");
        assert_eq!(page_name(&options, "bar", 3), "bar_page_3.png");
    }

    #[test]
    fn plain_names_stay_inside() {
        let path = resolve_output_path(Path::new("/out"), "a_page_1.png").unwrap();
        assert_eq!(path, PathBuf::from("/out/a_page_1.png"));
    }

    #[test]
    fn nested_names_that_return_are_allowed() {
        let path = resolve_output_path(Path::new("/out"), "sub/../a.png").unwrap();
        assert_eq!(path, PathBuf::from("/out/a.png"));
    }

    #[test]
    fn parent_escape_is_rejected() {
        let err = resolve_output_path(Path::new("/out"), "../evil.png").unwrap_err();
        assert!(matches!(err, PagewerkError::PathTraversal { .. }));
    }

    #[test]
    fn sibling_prefix_is_not_containment() {
        let err = resolve_output_path(Path::new("/base"), "../base-evil/x.png").unwrap_err();
        match err {
            PagewerkError::PathTraversal { base, candidate } => {
                assert_eq!(base, PathBuf::from("/base"));
                assert_eq!(candidate, PathBuf::from("/base-evil/x.png"));
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn absolute_names_are_rejected() {
        assert!(resolve_output_path(Path::new("/out"), "/etc/passwd").is_err());
    }

    #[test]
    fn dot_dot_cannot_climb_above_root() {
        assert_eq!(normalize_lexically(Path::new("/../a/./b")), PathBuf::from("/a/b"));
    }

    #[tokio::test]
    async fn persist_writes_and_drops_content() {
        let dir = tempfile::tempdir().unwrap();
        let folder = prepare_output_folder(&dir.path().join("nested/out")).await.unwrap();
        let mut output = rendered("doc_page_1.png", Some(vec![1, 2, 3]));

        persist_page(&mut output, &folder, false).await.unwrap();

        let path = output.path.clone().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        assert!(output.content.is_none());
    }

    #[tokio::test]
    async fn persist_without_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let folder = prepare_output_folder(dir.path()).await.unwrap();
        let mut output = rendered("doc_page_1.png", None);

        let err = persist_page(&mut output, &folder, true).await.unwrap_err();
        assert!(matches!(err, PagewerkError::MissingContent { page: 1 }));
        assert!(output.path.is_none());
    }

    #[tokio::test]
    async fn traversal_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = prepare_output_folder(&dir.path().join("out")).await.unwrap();
        let mut output = rendered("../escaped.png", Some(vec![9]));

        let err = persist_page(&mut output, &folder, true).await.unwrap_err();
        assert!(matches!(err, PagewerkError::PathTraversal { .. }));
        assert!(!dir.path().join("escaped.png").exists());
    }
}
