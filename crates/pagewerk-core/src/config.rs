// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion options, their defaults, and the normalizer that turns them
// into rendering-engine initialization parameters.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Custom page naming callback. Receives the 1-based page number and
/// returns the full output file name, or `None` to use the default name.
pub type PageNameFn = Arc<dyn Fn(u32) -> Option<String> + Send + Sync>;

/// Rendering-engine log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    #[default]
    Errors,
    Warnings,
    Infos,
}

impl VerbosityLevel {
    /// Equivalent `tracing` filter directive.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Errors => "error",
            Self::Warnings => "warn",
            Self::Infos => "info",
        }
    }
}

/// Caller-facing conversion options.
///
/// Every field is optional; `None` means "use the value from
/// [`ConvertDefaults`]". Explicit `Some(false)` or `Some(0)` values are
/// always honoured.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Linear scale applied to page dimensions before rasterization.
    pub viewport_scale: Option<f32>,
    pub disable_font_face: Option<bool>,
    pub use_system_fonts: Option<bool>,
    pub enable_xfa: Option<bool>,
    /// Decryption key for encrypted documents.
    pub pdf_file_password: Option<String>,
    /// 1-based page numbers. Out-of-range entries are dropped silently.
    pub pages_to_process: Option<Vec<i64>>,
    /// Fixed mask replacing the input-derived one in default page names.
    pub output_file_mask: Option<String>,
    /// Custom page naming. Not serializable.
    #[serde(skip)]
    pub output_file_mask_func: Option<PageNameFn>,
    /// Write each PNG under this folder (created recursively).
    pub output_folder: Option<PathBuf>,
    pub return_page_content: Option<bool>,
    pub process_pages_in_parallel: Option<bool>,
    /// Batch size for parallel rendering, clamped to at least 1.
    pub concurrency_limit: Option<usize>,
    pub verbosity_level: Option<VerbosityLevel>,
}

impl ConvertOptions {
    /// Attach a naming callback.
    pub fn with_output_file_mask_func<F>(mut self, func: F) -> Self
    where
        F: Fn(u32) -> Option<String> + Send + Sync + 'static,
    {
        self.output_file_mask_func = Some(Arc::new(func));
        self
    }

    pub fn viewport_scale(&self, defaults: &ConvertDefaults) -> f32 {
        self.viewport_scale.unwrap_or(defaults.viewport_scale)
    }

    pub fn return_page_content(&self, defaults: &ConvertDefaults) -> bool {
        self.return_page_content
            .unwrap_or(defaults.return_page_content)
    }

    /// Number of pages rendered at once: 1 in sequential mode, otherwise
    /// the concurrency limit clamped to at least 1.
    pub fn batch_size(&self, defaults: &ConvertDefaults) -> usize {
        let parallel = self
            .process_pages_in_parallel
            .unwrap_or(defaults.process_pages_in_parallel);
        if !parallel {
            return 1;
        }
        self.concurrency_limit
            .unwrap_or(defaults.concurrency_limit)
            .max(1)
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("viewport_scale", &self.viewport_scale)
            .field("disable_font_face", &self.disable_font_face)
            .field("use_system_fonts", &self.use_system_fonts)
            .field("enable_xfa", &self.enable_xfa)
            .field(
                "pdf_file_password",
                &self.pdf_file_password.as_ref().map(|_| "<redacted>"),
            )
            .field("pages_to_process", &self.pages_to_process)
            .field("output_file_mask", &self.output_file_mask)
            .field(
                "output_file_mask_func",
                &self.output_file_mask_func.as_ref().map(|_| "<fn>"),
            )
            .field("output_folder", &self.output_folder)
            .field("return_page_content", &self.return_page_content)
            .field("process_pages_in_parallel", &self.process_pages_in_parallel)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("verbosity_level", &self.verbosity_level)
            .finish()
    }
}

/// Immutable default values applied to unset [`ConvertOptions`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertDefaults {
    pub viewport_scale: f32,
    pub disable_font_face: bool,
    pub use_system_fonts: bool,
    pub enable_xfa: bool,
    pub return_page_content: bool,
    pub process_pages_in_parallel: bool,
    pub concurrency_limit: usize,
    pub verbosity_level: VerbosityLevel,
}

impl Default for ConvertDefaults {
    fn default() -> Self {
        Self {
            viewport_scale: 1.0,
            disable_font_face: true,
            use_system_fonts: false,
            enable_xfa: false,
            return_page_content: true,
            process_pages_in_parallel: false,
            concurrency_limit: 4,
            verbosity_level: VerbosityLevel::Errors,
        }
    }
}

/// Strict document-initialization parameters handed to the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInitParams {
    pub password: Option<String>,
    pub disable_font_face: bool,
    pub use_system_fonts: bool,
    pub enable_xfa: bool,
    pub verbosity: VerbosityLevel,
    /// Character-map data directory.
    pub cmap_dir: PathBuf,
    /// Whether the character maps are stored in packed binary form.
    pub cmap_packed: bool,
    /// Standard (base-14) font data directory.
    pub standard_font_dir: PathBuf,
}

/// Directory the running executable was installed in. Engine resource
/// locations are resolved against it, never against the working directory.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

/// Map caller options onto engine parameters, resolving resources against
/// [`install_dir`].
pub fn normalize(options: &ConvertOptions, defaults: &ConvertDefaults) -> EngineInitParams {
    normalize_in(options, defaults, &install_dir())
}

/// Map caller options onto engine parameters, resolving resources against
/// `resource_root`.
pub fn normalize_in(
    options: &ConvertOptions,
    defaults: &ConvertDefaults,
    resource_root: &Path,
) -> EngineInitParams {
    EngineInitParams {
        password: options.pdf_file_password.clone(),
        disable_font_face: options
            .disable_font_face
            .unwrap_or(defaults.disable_font_face),
        use_system_fonts: options
            .use_system_fonts
            .unwrap_or(defaults.use_system_fonts),
        enable_xfa: options.enable_xfa.unwrap_or(defaults.enable_xfa),
        verbosity: options.verbosity_level.unwrap_or(defaults.verbosity_level),
        cmap_dir: resource_root.join("cmaps"),
        cmap_packed: true,
        standard_font_dir: resource_root.join("standard_fonts"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_options_take_defaults() {
        let params = normalize_in(
            &ConvertOptions::default(),
            &ConvertDefaults::default(),
            Path::new("/opt/pagewerk"),
        );
        assert!(params.disable_font_face);
        assert!(!params.use_system_fonts);
        assert!(!params.enable_xfa);
        assert_eq!(params.verbosity, VerbosityLevel::Errors);
        assert_eq!(params.password, None);
    }

    #[test]
    fn explicit_false_is_honoured() {
        let options = ConvertOptions {
            disable_font_face: Some(false),
            ..Default::default()
        };
        let params = normalize_in(&options, &ConvertDefaults::default(), Path::new("/x"));
        assert!(!params.disable_font_face);
    }

    #[test]
    fn resources_resolve_against_root() {
        let params = normalize_in(
            &ConvertOptions::default(),
            &ConvertDefaults::default(),
            Path::new("/opt/pagewerk"),
        );
        assert_eq!(params.cmap_dir, PathBuf::from("/opt/pagewerk/cmaps"));
        assert_eq!(
            params.standard_font_dir,
            PathBuf::from("/opt/pagewerk/standard_fonts")
        );
        assert!(params.cmap_packed);
    }

    #[test]
    fn install_dir_is_absolute() {
        assert!(install_dir().is_absolute());
    }

    #[test]
    fn sequential_mode_uses_batches_of_one() {
        let options = ConvertOptions {
            concurrency_limit: Some(8),
            ..Default::default()
        };
        assert_eq!(options.batch_size(&ConvertDefaults::default()), 1);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let options = ConvertOptions {
            process_pages_in_parallel: Some(true),
            concurrency_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(options.batch_size(&ConvertDefaults::default()), 1);
    }

    #[test]
    fn parallel_mode_defaults_to_four() {
        let options = ConvertOptions {
            process_pages_in_parallel: Some(true),
            ..Default::default()
        };
        assert_eq!(options.batch_size(&ConvertDefaults::default()), 4);
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let json = r#"{
            "viewportScale": 2.0,
            "pagesToProcess": [1, 3],
            "returnPageContent": false,
            "verbosityLevel": "warnings"
        }"#;
        let options: ConvertOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.viewport_scale, Some(2.0));
        assert_eq!(options.pages_to_process, Some(vec![1, 3]));
        assert_eq!(options.return_page_content, Some(false));
        assert_eq!(options.verbosity_level, Some(VerbosityLevel::Warnings));
        assert!(options.output_file_mask_func.is_none());
    }

    #[test]
    fn debug_redacts_password() {
        let options = ConvertOptions {
            pdf_file_password: Some("hunter2".into()),
            ..Default::default()
        }
        .with_output_file_mask_func(|n| Some(format!("p{n}.png")));
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<fn>"));
    }
}
