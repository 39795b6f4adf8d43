use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::index::genome::Contig;
use crate::search::{Hit, Strand};
use crate::util::dna;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// 制表符分隔：query, reference, position(0-based), strand, mismatches
    Tsv,
    /// 每行一个 JSON 对象
    Json,
    /// 最小 SAM（1-based POS，NM 标签记录错配数）
    Sam,
}

#[derive(Serialize)]
struct JsonHit<'a> {
    query: &'a str,
    pattern: &'a str,
    #[serde(flatten)]
    hit: &'a Hit,
}

pub struct HitWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> HitWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn write_header(&mut self, contigs: &[Contig], command_line: Option<&str>) -> Result<()> {
        match self.format {
            OutputFormat::Tsv => {
                writeln!(self.out, "#query\treference\tposition\tstrand\tmismatches")?;
            }
            OutputFormat::Json => {}
            OutputFormat::Sam => {
                writeln!(self.out, "@HD\tVN:1.6\tSO:unsorted")?;
                for c in contigs {
                    writeln!(self.out, "@SQ\tSN:{}\tLN:{}", c.name, c.len)?;
                }
                write!(
                    self.out,
                    "@PG\tID:{0}\tPN:{0}\tVN:{1}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION")
                )?;
                if let Some(cl) = command_line {
                    write!(self.out, "\tCL:{}", cl)?;
                }
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    pub fn write_hits(&mut self, query: &str, pattern: &[u8], hits: &[Hit]) -> Result<()> {
        let pattern = dna::normalize_seq(pattern);
        let pattern_str = String::from_utf8_lossy(&pattern);
        for h in hits {
            match self.format {
                OutputFormat::Tsv => writeln!(
                    self.out,
                    "{}\t{}\t{}\t{}\t{}",
                    query,
                    h.reference_name,
                    h.position,
                    h.strand.as_char(),
                    h.mismatches
                )?,
                OutputFormat::Json => {
                    let rec = JsonHit { query, pattern: &pattern_str, hit: h };
                    serde_json::to_writer(&mut self.out, &rec)?;
                    writeln!(self.out)?;
                }
                OutputFormat::Sam => {
                    // SEQ 总是按参考正链给出
                    let (flag, seq) = match h.strand {
                        Strand::Forward => (0, pattern.clone()),
                        Strand::Reverse => (16, dna::revcomp(&pattern)),
                    };
                    writeln!(
                        self.out,
                        "{}\t{}\t{}\t{}\t255\t{}M\t*\t0\t0\t{}\t*\tNM:i:{}",
                        query,
                        flag,
                        h.reference_name,
                        h.position + 1,
                        pattern.len(),
                        String::from_utf8_lossy(&seq),
                        h.mismatches
                    )?;
                }
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
