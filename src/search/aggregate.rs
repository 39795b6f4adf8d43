use serde::Serialize;

use crate::index::genome::SequenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn as_char(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// 验证通过、尚未映射回参考坐标的命中。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedHit {
    pub pos: usize,
    pub mismatches: usize,
    pub strand: Strand,
}

/// 映射到参考序列局部坐标（0-based）的命中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub reference_name: String,
    pub position: usize,
    pub mismatches: usize,
    pub strand: Strand,
}

/// 去重（同一位置常被多个分区重复发现）、排序并映射回参考坐标。
///
/// 输出按 (绝对位置, 链) 排序。`allow_cross_reference` 为 false 时，
/// 跨越两条参考序列拼接边界的命中被丢弃。
pub fn aggregate<S: SequenceStore + ?Sized>(
    store: &S,
    mut hits: Vec<VerifiedHit>,
    pattern_len: usize,
    allow_cross_reference: bool,
) -> Vec<Hit> {
    hits.sort_unstable_by_key(|h| (h.pos, h.strand));
    hits.dedup_by_key(|h| (h.pos, h.strand));

    let mut out = Vec::with_capacity(hits.len());
    for h in hits {
        if !allow_cross_reference {
            match store.reference_span(h.pos) {
                Some((_, end)) if h.pos + pattern_len <= end => {}
                _ => continue,
            }
        }
        let Some((name, local)) = store.resolve(h.pos) else {
            continue;
        };
        out.push(Hit {
            reference_name: name.to_string(),
            position: local,
            mismatches: h.mismatches,
            strand: h.strand,
        });
    }
    out
}
