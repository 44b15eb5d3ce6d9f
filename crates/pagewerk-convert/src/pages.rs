// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection.

/// Compute the pages to render.
///
/// With no request every page `1..=num_pages` is selected in ascending
/// order. A requested list is filtered to `[1, num_pages]` in the caller's
/// order; out-of-range entries are dropped without error so one page list
/// can be applied across documents of different lengths.
pub fn select_pages(requested: Option<&[i64]>, num_pages: u32) -> Vec<u32> {
    match requested {
        None => (1..=num_pages).collect(),
        Some(pages) => pages
            .iter()
            .filter(|&&page| page >= 1 && page <= i64::from(num_pages))
            .map(|&page| page as u32)
            .collect(),
    }
}
