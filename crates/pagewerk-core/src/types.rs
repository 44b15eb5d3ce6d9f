// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagewerk converter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Mask used for default page names when the input has no file name.
pub const BUFFER_MASK: &str = "buffer";

/// Where the PDF bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfInput {
    /// Read from the filesystem at conversion time.
    Path(PathBuf),
    /// Raw PDF bytes already in memory.
    Bytes(Vec<u8>),
}

impl PdfInput {
    /// Base name used for default output names: the file stem for paths,
    /// [`BUFFER_MASK`] for in-memory buffers.
    pub fn default_mask(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .filter(|stem| !stem.is_empty())
                .unwrap_or_else(|| BUFFER_MASK.to_string()),
            Self::Bytes(_) => BUFFER_MASK.to_string(),
        }
    }

    /// Source path, if this input refers to a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }
}

impl From<PathBuf> for PdfInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for PdfInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for PdfInput {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for PdfInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for PdfInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutput {
    /// 1-based page number, always within the document's page range.
    pub page_number: u32,
    /// Output file name, e.g. `report_page_1.png`.
    pub name: String,
    /// Encoded PNG bytes; `None` when the caller opted out of content.
    #[serde(skip)]
    pub content: Option<Vec<u8>>,
    /// Where the PNG was written; `None` unless an output folder was given.
    pub path: Option<PathBuf>,
    /// Viewport width at the requested scale.
    pub width: f32,
    /// Viewport height at the requested scale.
    pub height: f32,
}

/// Geometry of a single page, computed without rasterizing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: u32,
    pub width: f32,
    pub height: f32,
    /// Clockwise page rotation in degrees (0, 90, 180, 270).
    pub rotation: u16,
}

/// Pre-flight sizing information for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub num_pages: u32,
    pub pages: Vec<PageInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_mask_is_file_stem() {
        let input = PdfInput::from("foo/bar.pdf");
        assert_eq!(input.default_mask(), "bar");
    }

    #[test]
    fn buffer_mask_is_constant() {
        let input = PdfInput::from(b"%PDF-1.7".as_slice());
        assert_eq!(input.default_mask(), BUFFER_MASK);
        assert!(input.path().is_none());
    }

    #[test]
    fn dotted_stem_keeps_inner_dots() {
        let input = PdfInput::from("scans/2026.03.invoice.pdf");
        assert_eq!(input.default_mask(), "2026.03.invoice");
    }

    #[test]
    fn page_output_json_omits_content() {
        let output = PageOutput {
            page_number: 1,
            name: "a_page_1.png".into(),
            content: Some(vec![1, 2, 3]),
            path: None,
            width: 612.0,
            height: 792.0,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"pageNumber\":1"));
        assert!(!json.contains("content"));
    }
}
