/// 大小写归一：`U -> T`，`ACGTN` 之外的字符一律映射为 `N`。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        out.push(normalize_base(b));
    }
    out
}

#[inline]
pub fn normalize_base(b: u8) -> u8 {
    let up = b.to_ascii_uppercase();
    match up {
        b'A' | b'C' | b'G' | b'T' | b'N' => up,
        b'U' => b'T',
        _ => b'N',
    }
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}
