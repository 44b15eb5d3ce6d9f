// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input resolution — turn a path or buffer into the PDF bytes handed to the
// rendering engine.

use pagewerk_core::PdfInput;
use pagewerk_core::error::{PagewerkError, Result};
use tracing::debug;

/// Read `input` into memory. Byte buffers pass through unchanged.
pub async fn resolve_input(input: PdfInput) -> Result<Vec<u8>> {
    match input {
        PdfInput::Bytes(bytes) => Ok(bytes),
        PdfInput::Path(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| PagewerkError::InputRead {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), bytes = bytes.len(), "PDF input read");
            Ok(bytes)
        }
    }
}
