//! # sa-seek
//!
//! 基于后缀数组的 DNA 参考序列近似子串搜索。
//!
//! 给定模式串与最大错配数 k，返回所有错配数不超过 k 的基因组位置：
//!
//! - **索引构建**：对拼接后的基因组用倍增法构建后缀数组（只构建一次、只读共享）
//! - **分区**：按鸽巢原理把模式串切成 k+1 段，至少一段必然精确匹配
//! - **分区匹配**：在后缀数组上二分查找每段的精确出现
//! - **候选验证**：在推出的起点处逐位比较整段模式串，超出 k 即提前退出
//! - **结果汇总**：去重并映射回 (参考名, 局部偏移)
//!
//! ## 快速示例
//!
//! ```rust
//! use sa_seek::index::genome::Genome;
//! use sa_seek::search::SearchEngine;
//!
//! let genome = Genome::from_records(vec![("chr1", "ACGTACGTTTACGT")]);
//! let mut engine = SearchEngine::new(genome);
//! engine.build_index().unwrap();
//!
//! let hits = engine.search(b"ACGA", 1).unwrap();
//! assert_eq!(hits.len(), 3);
//! for h in &hits {
//!     println!("{}:{} mismatches={}", h.reference_name, h.position, h.mismatches);
//! }
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA（含 gzip）读取与命中结果输出（TSV / JSON / SAM）
//! - [`index`] — 基因组拼接与后缀数组构建
//! - [`search`] — 分区、分区匹配、候选验证与结果汇总
//! - [`util`] — DNA 归一化 / 反向互补
//! - [`error`] — 错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod search;
pub mod util;

pub use error::{IndexError, SearchError};
pub use index::build_index;
pub use search::{search, Hit, SearchEngine, SearchOpt};
