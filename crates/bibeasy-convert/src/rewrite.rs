//! Rewriting reference blocks in free text.
//!
//! Takes text containing blocks like `[J1, C5]` and rewrites each
//! reference through an old-to-new ID map, typically produced by
//! matching two versions of the bibliography. References absent from
//! the map come out as `?` so they stand out in the result.

use std::collections::BTreeMap;

use bibeasy_core::model::RefId;
use bibeasy_core::refs::parse_ref_block;

/// Rewrite every reference block in `text` through `map`.
///
/// Blocks that do not parse as reference lists are left untouched.
/// With `sort`, references within each block are reordered
/// lexicographically after rewriting.
#[must_use]
pub fn rewrite_text(text: &str, map: &BTreeMap<RefId, RefId>, sort: bool) -> String {
    text.lines()
        .map(|line| rewrite_line(line, map, sort))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite the reference blocks of a single line.
///
/// The output is rebuilt from the bracket spans of the input, so a
/// rewritten block is never picked up again as a source block.
#[must_use]
pub fn rewrite_line(line: &str, map: &BTreeMap<RefId, RefId>, sort: bool) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    loop {
        let Some(open) = rest.find('[') else { break };
        // Unterminated blocks stay as they are.
        let Some(close) = rest[open + 1..].find(']') else { break };
        let block = &rest[open + 1..open + 1 + close];
        out.push_str(&rest[..open]);
        out.push('[');
        out.push_str(&rewrite_block(block, map, sort));
        out.push(']');
        rest = &rest[open + 1 + close + 1..];
    }
    out.push_str(rest);
    out
}

fn rewrite_block(block: &str, map: &BTreeMap<RefId, RefId>, sort: bool) -> String {
    let old_ids = match parse_ref_block(block) {
        Ok(ids) => ids,
        Err(err) => {
            log::debug!("Skipping non-reference block '[{block}]': {err}");
            return block.to_string();
        }
    };

    let mut tokens: Vec<String> = Vec::with_capacity(old_ids.len());
    for old in old_ids {
        match map.get(&old) {
            Some(new) => {
                log::info!("{old} -> {new}");
                tokens.push(new.to_string());
            }
            None => {
                log::warn!("{old} -> ? (no match)");
                tokens.push("?".to_string());
            }
        }
    }
    if sort {
        tokens.sort();
    }
    tokens.join(", ")
}
