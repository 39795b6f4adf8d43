use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::util::dna;

const READ_BUFFER: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

/// 打开参考序列文件，`.gz` 后缀自动解压（兼容 bgzip 的多成员 gzip）。
pub fn open_reference(path: &Path) -> Result<Box<dyn BufRead>> {
    let fh = File::open(path)
        .with_context(|| format!("cannot open reference FASTA '{}'", path.display()))?;
    let gz = path.extension().and_then(|s| s.to_str()) == Some("gz");
    if gz {
        log::debug!("reading gzip-compressed FASTA {}", path.display());
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER, MultiGzDecoder::new(fh))))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER, fh)))
    }
}

/// 流式 FASTA 解析器：逐条返回记录，序列中的空白/换行被丢弃并做大小写归一。
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    pending_header: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pending_header: None,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        Ok(n > 0)
    }

    fn header_of(line: &[u8]) -> String {
        String::from_utf8_lossy(&line[1..]).trim().to_string()
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let header = match self.pending_header.take() {
            Some(h) => h,
            None => loop {
                if !self.read_line()? {
                    self.done = true;
                    return Ok(None);
                }
                if self.line.first() == Some(&b'>') {
                    break Self::header_of(&self.line);
                }
                // ';' 注释行与记录前的空行直接跳过
            },
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut seq: Vec<u8> = Vec::new();
        loop {
            if !self.read_line()? {
                self.done = true;
                break;
            }
            match self.line.first() {
                Some(b'>') => {
                    self.pending_header = Some(Self::header_of(&self.line));
                    break;
                }
                Some(b';') => continue,
                _ => {}
            }
            seq.extend(
                self.line
                    .iter()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|&b| dna::normalize_base(b)),
            );
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_two_chromosomes() {
        let data = b">chr1 first\nACgTNN\n>chr2\nAAA\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "chr1");
        assert_eq!(r1.desc.as_deref(), Some("first"));
        assert_eq!(r1.seq, b"ACGTNN");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "chr2");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"AAA");

        assert!(r.next_record().unwrap().is_none());
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn strips_crlf_and_masks_iupac_codes() {
        let data = b">chr1 desc\r\nAC g t r\r\n acgu\r\n>chr2 \r\n N N N \r\n";
        let recs: Vec<FastaRecord> = FastaReader::new(Cursor::new(&data[..]))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].seq, b"ACGTNACGT");
        assert_eq!(recs[1].id, "chr2");
        assert_eq!(recs[1].seq, b"NNN");
    }

    #[test]
    fn skips_leading_blank_and_comment_lines() {
        let data = b"\n;comment\n>chr1\nAC\n;inner\nGT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));
        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "chr1");
        assert_eq!(r1.seq, b"ACGT");
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let mut r = FastaReader::new(Cursor::new(&b""[..]));
        assert!(r.next_record().unwrap().is_none());
    }
}
