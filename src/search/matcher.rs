use std::cmp::Ordering;

use super::partition::Partition;
use crate::index::sa::SuffixArray;

/// 分区精确命中所推出的整段模式串起点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// 模式串在基因组中的绝对起点
    pub pos: usize,
    /// 产生该候选的分区编号
    pub partition: usize,
}

/// 后缀前 |pat| 个字符与 pat 的字典序比较（后缀较短时按短者为小）。
#[inline]
fn cmp_prefix(text: &[u8], suffix: usize, pat: &[u8]) -> Ordering {
    let end = (suffix + pat.len()).min(text.len());
    text[suffix..end].cmp(pat)
}

/// 在后缀数组上二分查找以 pat 为前缀的区间 [lo, hi)。
pub fn sa_range(sa: &SuffixArray, text: &[u8], pat: &[u8]) -> (usize, usize) {
    let idx = sa.as_slice();
    if pat.is_empty() {
        return (0, idx.len());
    }
    // 第一个前缀 >= pat 的后缀
    let lo = idx.partition_point(|&p| cmp_prefix(text, p as usize, pat) == Ordering::Less);
    // 第一个前缀 > pat 的后缀
    let hi = lo + idx[lo..].partition_point(|&p| cmp_prefix(text, p as usize, pat) != Ordering::Greater);
    (lo, hi)
}

/// 查找一个分区的所有精确出现，并换算成整段模式串的起点。
/// 起点为负或整段模式串会越过基因组末尾的位置被丢弃。
pub fn partition_candidates(
    sa: &SuffixArray,
    text: &[u8],
    part: &Partition<'_>,
    part_idx: usize,
    pattern_len: usize,
) -> Vec<Candidate> {
    let (lo, hi) = sa_range(sa, text, part.bytes);
    let mut out = Vec::with_capacity(hi - lo);
    for i in lo..hi {
        let Some(pos) = sa.get(i).checked_sub(part.offset) else {
            continue;
        };
        if pos + pattern_len > text.len() {
            continue;
        }
        out.push(Candidate { pos, partition: part_idx });
    }
    out
}
