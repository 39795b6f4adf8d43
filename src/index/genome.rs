use anyhow::{bail, Result};
use std::path::Path;

use crate::io::fasta::{open_reference, FastaReader};
use crate::util::dna;

/// 单条参考序列（染色体）在拼接文本中的位置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub offset: usize,
    pub len: usize,
}

/// 序列存储接口：一段扁平的字节序列，加上从绝对位置到 (参考名, 局部偏移) 的映射。
pub trait SequenceStore {
    fn seq(&self) -> &[u8];

    fn len(&self) -> usize {
        self.seq().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 将绝对位置映射到 (参考名, 局部偏移)；越界返回 None。
    fn resolve(&self, pos: usize) -> Option<(&str, usize)>;

    /// 参考序列的 [start, end) 绝对区间，用于判断命中是否跨越参考边界。
    fn reference_span(&self, pos: usize) -> Option<(usize, usize)>;
}

/// 拼接后的基因组：所有参考序列首尾相连（不插入分隔符），
/// contig 表连续、无重叠且恰好覆盖 `[0, n)`。
#[derive(Debug, Clone, Default)]
pub struct Genome {
    text: Vec<u8>,
    contigs: Vec<Contig>,
}

impl Genome {
    /// 由 (名称, 序列) 构造；序列会被归一化，空序列被跳过。
    pub fn from_records<I, N, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut text: Vec<u8> = Vec::new();
        let mut contigs: Vec<Contig> = Vec::new();
        for (name, seq) in records {
            let seq = seq.as_ref();
            if seq.is_empty() {
                continue;
            }
            let offset = text.len();
            text.extend(seq.iter().map(|&b| dna::normalize_base(b)));
            contigs.push(Contig { name: name.into(), offset, len: seq.len() });
        }
        Self { text, contigs }
    }

    /// 读取（可能 gzip 压缩的）FASTA 并拼接。
    pub fn from_fasta(path: &Path) -> Result<Self> {
        let reader = FastaReader::new(open_reference(path)?);
        let mut records = Vec::new();
        for rec in reader {
            let rec = rec?;
            log::debug!("loaded reference {} ({} bp)", rec.id, rec.seq.len());
            records.push((rec.id, rec.seq));
        }
        if records.is_empty() {
            bail!("FASTA file '{}' contains no sequences", path.display());
        }
        let genome = Self::from_records(records);
        if genome.is_empty() {
            bail!("FASTA file '{}' contains only empty sequences", path.display());
        }
        Ok(genome)
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    fn contig_index(&self, pos: usize) -> Option<usize> {
        if pos >= self.text.len() {
            return None;
        }
        // 第一个 offset > pos 的 contig 的前一个
        let idx = self.contigs.partition_point(|c| c.offset <= pos);
        idx.checked_sub(1)
    }

    pub fn reference_containing(&self, pos: usize) -> Option<&Contig> {
        self.contig_index(pos).map(|i| &self.contigs[i])
    }
}

impl SequenceStore for Genome {
    fn seq(&self) -> &[u8] {
        &self.text
    }

    fn resolve(&self, pos: usize) -> Option<(&str, usize)> {
        self.reference_containing(pos)
            .map(|c| (c.name.as_str(), pos - c.offset))
    }

    fn reference_span(&self, pos: usize) -> Option<(usize, usize)> {
        self.reference_containing(pos).map(|c| (c.offset, c.offset + c.len))
    }
}
