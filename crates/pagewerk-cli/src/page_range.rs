// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

/// Highest page a range expands to. PDFium indexes pages with a `u16`, so
/// no document has pages past this.
const MAX_RANGE_PAGE: i64 = u16::MAX as i64;

/// Parse a page range string like "1,3-5" into 1-based page numbers.
///
/// Only syntax is checked here. Numbers beyond the document are kept and
/// dropped later by page selection, so one range works for documents of
/// any length. Range ends are clamped to `MAX_RANGE_PAGE`, so "1-999999"
/// reads as "every page".
pub fn parse_page_range(input: &str) -> Result<Vec<i64>, String> {
    let mut pages = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let start = parse_number(start_str)?;
            let end = parse_number(end_str)?;
            if start > end {
                return Err(format!("range '{part}' runs backwards"));
            }
            pages.extend(start..=end.min(MAX_RANGE_PAGE));
        } else {
            pages.push(parse_number(part)?);
        }
    }

    Ok(pages)
}

fn parse_number(text: &str) -> Result<i64, String> {
    let text = text.trim();
    text.parse::<u32>()
        .map(i64::from)
        .map_err(|_| format!("invalid page number: '{text}'"))
}
