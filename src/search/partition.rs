use crate::error::SearchError;

/// 模式串的一个连续片段及其在模式串中的起点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<'a> {
    pub bytes: &'a [u8],
    pub offset: usize,
}

/// 将长度为 m 的模式串切成 k+1 段互不重叠的分区（鸽巢原理：k 个错配
/// 至少留下一段完全精确匹配）。
///
/// 每段基本长度为 `m / (k+1)`，余下的 `m % (k+1)` 个字符从第 0 段开始
/// 依次各分一个。
pub fn partition(pattern: &[u8], max_mismatches: usize) -> Result<Vec<Partition<'_>>, SearchError> {
    let m = pattern.len();
    if m == 0 {
        return Err(SearchError::EmptyPattern);
    }
    let parts = max_mismatches.checked_add(1).filter(|&p| p <= m).ok_or(
        SearchError::Configuration { pattern_len: m, max_mismatches },
    )?;

    let base = m / parts;
    let extra = m % parts;
    let mut out = Vec::with_capacity(parts);
    let mut start = 0usize;
    for i in 0..parts {
        let len = base + usize::from(i < extra);
        out.push(Partition { bytes: &pattern[start..start + len], offset: start });
        start += len;
    }
    debug_assert_eq!(start, m);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(parts: &[Partition<'_>]) -> Vec<usize> {
        parts.iter().map(|p| p.bytes.len()).collect()
    }

    #[test]
    fn zero_mismatches_is_whole_pattern() {
        let parts = partition(b"TGGATGTGAA", 0).unwrap();
        assert_eq!(parts, vec![Partition { bytes: b"TGGATGTGAA", offset: 0 }]);
    }

    #[test]
    fn remainder_goes_to_leading_partitions() {
        // 20 / 3 = 6 余 2
        let p = b"TGGATGTGAAATGAGTCAAG";
        let parts = partition(p, 2).unwrap();
        assert_eq!(lens(&parts), vec![7, 7, 6]);
        assert_eq!(parts.iter().map(|p| p.offset).collect::<Vec<_>>(), vec![0, 7, 14]);

        let parts = partition(p, 3).unwrap();
        assert_eq!(lens(&parts), vec![5, 5, 5, 5]);

        let parts = partition(b"ACGTACG", 3).unwrap();
        assert_eq!(lens(&parts), vec![2, 2, 2, 1]);
    }

    #[test]
    fn partitions_cover_pattern_exactly() {
        let p = b"ACGTTGCAAGGCTTAACCGGA";
        for k in 0..p.len() {
            let parts = partition(p, k).unwrap();
            assert_eq!(parts.len(), k + 1);
            let mut expect_offset = 0;
            let mut joined = Vec::new();
            for part in &parts {
                assert_eq!(part.offset, expect_offset);
                assert!(!part.bytes.is_empty());
                expect_offset += part.bytes.len();
                joined.extend_from_slice(part.bytes);
            }
            assert_eq!(joined, p);
        }
    }

    #[test]
    fn one_char_per_partition_is_allowed() {
        let parts = partition(b"ACG", 2).unwrap();
        assert_eq!(lens(&parts), vec![1, 1, 1]);
    }

    #[test]
    fn too_many_partitions_is_rejected() {
        let err = partition(b"ACG", 3).unwrap_err();
        assert_eq!(err, SearchError::Configuration { pattern_len: 3, max_mismatches: 3 });
        let err = partition(b"ACG", usize::MAX).unwrap_err();
        assert!(matches!(err, SearchError::Configuration { .. }));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(partition(b"", 0).unwrap_err(), SearchError::EmptyPattern);
    }
}
