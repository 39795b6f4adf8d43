pub mod genome;
pub mod sa;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::SearchError;
use genome::{Genome, SequenceStore};
use sa::SuffixArray;

/// 一次索引构建的统计信息。
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub sequences: usize,
    pub total_len: usize,
    pub build_time: Duration,
    pub built_at: DateTime<Utc>,
}

/// 对整个基因组构建后缀数组。没有增量更新：基因组变化后必须整体重建。
pub fn build_index(genome: &Genome) -> Result<SuffixArray, SearchError> {
    Ok(SuffixArray::build(genome.seq())?)
}

/// 构建索引并记录耗时。
pub fn build_index_with_stats(genome: &Genome) -> Result<(SuffixArray, IndexStats), SearchError> {
    log::info!(
        "building suffix array over {} bp in {} reference(s)",
        genome.len(),
        genome.contigs().len()
    );
    let start = Instant::now();
    let sa = build_index(genome)?;
    let stats = IndexStats {
        sequences: genome.contigs().len(),
        total_len: genome.len(),
        build_time: start.elapsed(),
        built_at: Utc::now(),
    };
    log::info!("suffix array built in {:.2?}", stats.build_time);
    Ok((sa, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_index_covers_every_offset() {
        let g = Genome::from_records(vec![("a", "ACGTAC"), ("b", "GGT")]);
        let (sa, stats) = build_index_with_stats(&g).unwrap();
        assert_eq!(sa.len(), g.len());
        assert_eq!(stats.sequences, 2);
        assert_eq!(stats.total_len, 9);
    }

    #[test]
    fn build_index_empty_genome() {
        let g = Genome::default();
        assert!(build_index(&g).unwrap().is_empty());
    }
}
