pub mod aggregate;
pub mod matcher;
pub mod partition;
pub mod verify;

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

pub use aggregate::{Hit, Strand, VerifiedHit};
pub use matcher::Candidate;
pub use partition::Partition;

use crate::error::SearchError;
use crate::index::genome::{Genome, SequenceStore};
use crate::index::sa::SuffixArray;
use crate::index::{build_index_with_stats, IndexStats};
use crate::util::dna;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOpt {
    /// 允许的最大错配数 k（模式串被切成 k+1 段）
    pub max_mismatches: usize,
    /// 同时搜索反向互补链
    pub both_strands: bool,
    /// 保留跨越两条参考序列拼接边界的命中
    pub allow_cross_reference: bool,
}

/// 在已构建的后缀数组上做近似搜索，只搜正链。
pub fn search<S: SequenceStore + ?Sized>(
    sa: &SuffixArray,
    store: &S,
    pattern: &[u8],
    max_mismatches: usize,
) -> Result<Vec<Hit>, SearchError> {
    let opt = SearchOpt { max_mismatches, ..SearchOpt::default() };
    search_with_opt(sa, store, pattern, &opt, None)
}

/// 完整的查询流程：分区 -> 分区精确匹配 -> 候选验证 -> 去重映射。
///
/// `cancel` 在每次候选验证前被检查；置位后返回 `SearchError::Cancelled`，不返回部分结果。
pub fn search_with_opt<S: SequenceStore + ?Sized>(
    sa: &SuffixArray,
    store: &S,
    pattern: &[u8],
    opt: &SearchOpt,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<Hit>, SearchError> {
    let pattern = dna::normalize_seq(pattern);
    let k = opt.max_mismatches;
    // 配置错误在任何搜索工作之前返回
    let parts = partition::partition(&pattern, k)?;
    if sa.len() != store.len() {
        return Err(SearchError::IndexNotBuilt);
    }

    let text = store.seq();
    let mut raw = search_strand(sa, text, &pattern, &parts, k, Strand::Forward, cancel)?;

    if opt.both_strands {
        let rc = dna::revcomp(&pattern);
        let rc_parts = partition::partition(&rc, k)?;
        raw.extend(search_strand(sa, text, &rc, &rc_parts, k, Strand::Reverse, cancel)?);
    }

    let hits = aggregate::aggregate(store, raw, pattern.len(), opt.allow_cross_reference);
    log::debug!(
        "pattern {} (k={}): {} hit(s)",
        String::from_utf8_lossy(&pattern),
        k,
        hits.len()
    );
    Ok(hits)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |c| c.load(Ordering::Relaxed))
}

fn search_strand(
    sa: &SuffixArray,
    text: &[u8],
    pattern: &[u8],
    parts: &[Partition<'_>],
    max_mismatches: usize,
    strand: Strand,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<VerifiedHit>, SearchError> {
    if is_cancelled(cancel) {
        return Err(SearchError::Cancelled);
    }

    let m = pattern.len();
    let candidates: Vec<Candidate> = parts
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, part)| matcher::partition_candidates(sa, text, part, i, m))
        .collect();

    if log::log_enabled!(log::Level::Trace) {
        let mut per_part = vec![0usize; parts.len()];
        for c in &candidates {
            per_part[c.partition] += 1;
        }
        log::trace!("{:?} strand partition hits: {:?}", strand, per_part);
    }

    let mut positions: Vec<usize> = candidates.iter().map(|c| c.pos).collect();
    positions.par_sort_unstable();
    positions.dedup();

    positions
        .par_iter()
        .map(|&pos| {
            if is_cancelled(cancel) {
                return Err(SearchError::Cancelled);
            }
            match verify::verify_candidate(text, pos, pattern, max_mismatches) {
                Ok(Some(mismatches)) => Ok(Some(VerifiedHit { pos, mismatches, strand })),
                Ok(None) | Err(SearchError::OutOfRange { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .filter_map(Result::transpose)
        .collect()
}

/// 搜索引擎句柄：持有基因组与（构建后的）后缀数组，构建一次、多次只读查询。
#[derive(Debug, Default)]
pub struct SearchEngine {
    genome: Genome,
    sa: Option<SuffixArray>,
    stats: Option<IndexStats>,
}

impl SearchEngine {
    pub fn new(genome: Genome) -> Self {
        Self { genome, sa: None, stats: None }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn is_indexed(&self) -> bool {
        self.sa.is_some()
    }

    pub fn stats(&self) -> Option<&IndexStats> {
        self.stats.as_ref()
    }

    /// 构建后缀数组；重复调用会整体重建。
    pub fn build_index(&mut self) -> Result<&IndexStats, SearchError> {
        let (sa, stats) = build_index_with_stats(&self.genome)?;
        self.sa = Some(sa);
        Ok(self.stats.insert(stats))
    }

    pub fn search(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<Hit>, SearchError> {
        let opt = SearchOpt { max_mismatches, ..SearchOpt::default() };
        self.search_with_opt(pattern, &opt, None)
    }

    pub fn search_with_opt(
        &self,
        pattern: &[u8],
        opt: &SearchOpt,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<Hit>, SearchError> {
        let sa = self.sa.as_ref().ok_or(SearchError::IndexNotBuilt)?;
        search_with_opt(sa, &self.genome, pattern, opt, cancel)
    }
}
