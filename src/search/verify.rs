use crate::error::SearchError;

/// 逐位比较并计数错配；一旦错配数超过 `max_mismatches` 立即返回 None。
#[inline]
pub fn count_mismatches(window: &[u8], pattern: &[u8], max_mismatches: usize) -> Option<usize> {
    debug_assert_eq!(window.len(), pattern.len());
    let mut mm = 0usize;
    for (a, b) in window.iter().zip(pattern) {
        if a != b {
            mm += 1;
            if mm > max_mismatches {
                return None;
            }
        }
    }
    Some(mm)
}

/// 在候选起点处用整段模式串做验证。
///
/// `Ok(Some(mm))` 表示命中，`Ok(None)` 表示错配过多（正常淘汰），
/// `Err(OutOfRange)` 表示窗口越过基因组末尾，调用方应直接丢弃该候选。
pub fn verify_candidate(
    text: &[u8],
    pos: usize,
    pattern: &[u8],
    max_mismatches: usize,
) -> Result<Option<usize>, SearchError> {
    let window = pos
        .checked_add(pattern.len())
        .and_then(|end| text.get(pos..end))
        .ok_or(SearchError::OutOfRange {
            offset: pos,
            pattern_len: pattern.len(),
            genome_len: text.len(),
        })?;
    Ok(count_mismatches(window, pattern, max_mismatches))
}
