//! Reference grammar for citations embedded in free text.
//!
//! Grant applications and CV text cite publications through short indices
//! like `[J12, C8]`. This module extracts those blocks, parses individual
//! IDs, and expands the numeric range lists accepted on the command line.

use crate::error::{Error, Result};
use crate::model::RefId;

/// Extract bracketed reference blocks from a line of text.
///
/// `"Blablabla [J1, J5] pouf pouf [C45] yay!"` yields `["J1, J5", "C45"]`.
/// A block without a closing bracket is ignored.
#[must_use]
pub fn find_ref_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        blocks.push(&after[..close]);
        rest = &after[close + 1..];
    }
    blocks
}

/// Scan a line of text for reference IDs anywhere, bracketed or not.
///
/// Invalid-looking tokens are skipped; only well-formed IDs are returned,
/// in order of appearance.
#[must_use]
pub fn scan_refs(text: &str) -> Vec<RefId> {
    let mut found = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if crate::model::PubType::from_prefix(c).is_some() {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(id) = text[i..end].parse::<RefId>() {
                    found.push(id);
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }
    found
}

/// Parse the IDs inside one reference block ("J1, J5") in order.
///
/// # Errors
///
/// Returns an error on the first malformed ID.
pub fn parse_ref_block(block: &str) -> Result<Vec<RefId>> {
    block
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Parse a numeric selection list: `,` separates elements, `:` makes an
/// inclusive range.
///
/// Examples:
/// - `""` -> `[]`
/// - `"1,2,3"` -> `[1, 2, 3]`
/// - `"1:3,5"` -> `[1, 2, 3, 5]`
/// - `"1,1:4"` -> `[1, 2, 3, 4]` (duplicates removed, first occurrence kept)
///
/// # Errors
///
/// Returns an error on any element that is neither a number nor `a:b`.
pub fn parse_num_list(spec: &str) -> Result<Vec<u32>> {
    let mut nums: Vec<u32> = Vec::new();
    if spec.is_empty() {
        return Ok(nums);
    }

    for element in spec.split(',') {
        if let Ok(val) = element.parse::<u32>() {
            if !nums.contains(&val) {
                nums.push(val);
            }
            continue;
        }
        if let Some((first, last)) = element.split_once(':') {
            let a: u32 = first.parse().map_err(|_| bad_element(element, spec))?;
            let b: u32 = last.parse().map_err(|_| bad_element(element, spec))?;
            for val in a..=b {
                if !nums.contains(&val) {
                    nums.push(val);
                }
            }
            continue;
        }
        return Err(bad_element(element, spec));
    }

    Ok(nums)
}

fn bad_element(element: &str, spec: &str) -> Error {
    Error::InvalidData(format!(
        "unexpected element '{element}' in selection '{spec}'"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PubType, RefId};

    #[test]
    fn test_find_ref_blocks() {
        let blocks = find_ref_blocks("Blablabla [J1, J5] pouf pouf [C45] yay!");
        assert_eq!(blocks, vec!["J1, J5", "C45"]);
    }

    #[test]
    fn test_find_ref_blocks_none() {
        assert!(find_ref_blocks("no citations here").is_empty());
    }

    #[test]
    fn test_find_ref_blocks_unterminated() {
        let blocks = find_ref_blocks("start [J1, J2] then [C3 without end");
        assert_eq!(blocks, vec!["J1, J2"]);
    }

    #[test]
    fn test_scan_refs() {
        let refs = scan_refs("see J12 and [C8], also T3.");
        assert_eq!(
            refs,
            vec![
                RefId::new(PubType::Article, 12),
                RefId::new(PubType::Proceedings, 8),
                RefId::new(PubType::Talk, 3),
            ]
        );
    }

    #[test]
    fn test_scan_refs_skips_bare_prefix() {
        // "J" followed by a non-digit is an author initial, not a reference.
        assert!(scan_refs("Cohen-Adad J, et al.").is_empty());
    }

    #[test]
    fn test_parse_ref_block() {
        let ids = parse_ref_block("J1, J5").unwrap();
        assert_eq!(
            ids,
            vec![
                RefId::new(PubType::Article, 1),
                RefId::new(PubType::Article, 5)
            ]
        );
    }

    #[test]
    fn test_parse_ref_block_rejects_garbage() {
        assert!(parse_ref_block("J1, nope").is_err());
    }

    #[test]
    fn test_parse_num_list_empty() {
        assert!(parse_num_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_num_list_simple() {
        assert_eq!(parse_num_list("1,2,3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_num_list_ranges() {
        assert_eq!(parse_num_list("1:3,5").unwrap(), vec![1, 2, 3, 5]);
        assert_eq!(parse_num_list("1,1:4").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_num_list_rejects_garbage() {
        assert!(parse_num_list("1,x").is_err());
        assert!(parse_num_list("3:").is_err());
    }
}
