// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagewerk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Pagewerk operations.
///
/// Errors travel to the caller unmodified. The orchestrator only ever
/// performs resource cleanup on the way out, it never translates or
/// suppresses a failure.
#[derive(Debug, Error)]
pub enum PagewerkError {
    // -- Input --
    #[error("failed to read PDF input {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Document --
    #[error("failed to open PDF document: {0}")]
    DocumentOpen(String),

    #[error("rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    // -- Rendering --
    #[error("page {page} could not be loaded: {reason}")]
    PageUnavailable { page: u32, reason: String },

    #[error("page {page} failed to render: {reason}")]
    Render { page: u32, reason: String },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    // -- Drawing surfaces --
    #[error("invalid drawing surface dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("drawing surface is missing")]
    MissingSurface,

    // -- Persistence --
    #[error("failed to create output folder {}: {source}", path.display())]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page {page} has no PNG content to write")]
    MissingContent { page: u32 },

    #[error("output path {} escapes output folder {}", candidate.display(), base.display())]
    PathTraversal { base: PathBuf, candidate: PathBuf },

    // -- Options --
    #[error("invalid conversion options: {0}")]
    InvalidOptions(String),

    #[error("options serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagewerkError>;

/// Coarse failure category, one per error family a caller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Source file missing or unreadable.
    InputRead,
    /// Malformed PDF, wrong or missing password, no engine.
    DocumentOpen,
    /// A single page failed to load, rasterize, or encode.
    Render,
    /// Output folder creation or file write failed.
    Persist,
    /// A page name resolved outside the output folder.
    PathTraversal,
    /// Drawing-surface contract violation.
    Surface,
    /// Caller-supplied options were unusable.
    Options,
}

impl PagewerkError {
    /// Classify this error into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            PagewerkError::InputRead { .. } => ErrorKind::InputRead,

            PagewerkError::DocumentOpen(_) | PagewerkError::EngineUnavailable(_) => {
                ErrorKind::DocumentOpen
            }

            PagewerkError::PageUnavailable { .. }
            | PagewerkError::Render { .. }
            | PagewerkError::Encode(_) => ErrorKind::Render,

            PagewerkError::InvalidDimension { .. } | PagewerkError::MissingSurface => {
                ErrorKind::Surface
            }

            PagewerkError::OutputFolder { .. }
            | PagewerkError::Persist { .. }
            | PagewerkError::MissingContent { .. } => ErrorKind::Persist,

            PagewerkError::PathTraversal { .. } => ErrorKind::PathTraversal,

            PagewerkError::InvalidOptions(_) | PagewerkError::Serialization(_) => {
                ErrorKind::Options
            }
        }
    }
}
