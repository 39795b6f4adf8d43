use thiserror::Error;

/// 索引构建阶段的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("genome of {len} bases exceeds the 32-bit suffix array limit ({max})")]
    TooLarge { len: usize, max: usize },
}

/// 查询阶段的错误。
///
/// 比对验证失败（错配数超过上限）不是错误，而是近似搜索的正常淘汰路径，
/// 因此这里没有对应的变体。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(
        "cannot split a pattern of length {pattern_len} into {} partitions for {max_mismatches} allowed mismatches",
        .max_mismatches + 1
    )]
    Configuration { pattern_len: usize, max_mismatches: usize },

    #[error("pattern is empty")]
    EmptyPattern,

    #[error("search invoked before the suffix array index was built")]
    IndexNotBuilt,

    /// 候选位置会越过基因组末尾；只在验证阶段内部使用，候选被直接丢弃。
    #[error("candidate at offset {offset} with pattern length {pattern_len} runs past genome end ({genome_len})")]
    OutOfRange { offset: usize, pattern_len: usize, genome_len: usize },

    #[error("query cancelled")]
    Cancelled,

    #[error(transparent)]
    Index(#[from] IndexError),
}
