use rayon::prelude::*;

use crate::error::IndexError;

/// 后缀数组用 u32 存储位置，文本长度上限即 u32::MAX。
pub const MAX_TEXT_LEN: usize = u32::MAX as usize;

/// 超过该长度时使用 rayon 并行排序。
const PAR_SORT_THRESHOLD: usize = 1 << 16;

/// 构建后缀数组（倍增法，O(n log² n)）。
///
/// 初始秩为文本中出现过的字符的稠密编号；第 k 轮按 (rank[i], rank[i+k]) 排序，
/// 越过文本末尾的位置取最小的哨兵秩，因此较短的后缀排在前面。
/// 当所有秩互不相同（最大秩为 n-1）时结束。
pub fn build_sa(text: &[u8]) -> Result<Vec<u32>, IndexError> {
    let n = text.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n > MAX_TEXT_LEN {
        return Err(IndexError::TooLarge { len: n, max: MAX_TEXT_LEN });
    }

    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank = initial_ranks(text);
    let mut tmp: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    loop {
        {
            // 哨兵为 0，有效秩整体 +1（rank <= n-1 <= u32::MAX-1，不会溢出）
            let rank = &rank;
            let key = |i: u32| -> u64 {
                let i = i as usize;
                let next = if i + k < n { rank[i + k] + 1 } else { 0 };
                (u64::from(rank[i]) << 32) | u64::from(next)
            };

            if n > PAR_SORT_THRESHOLD {
                sa.par_sort_unstable_by_key(|&i| key(i));
            } else {
                sa.sort_unstable_by_key(|&i| key(i));
            }

            tmp[sa[0] as usize] = 0;
            for w in 1..n {
                let a = sa[w - 1];
                let b = sa[w];
                tmp[b as usize] = tmp[a as usize] + u32::from(key(a) != key(b));
            }
        }

        std::mem::swap(&mut rank, &mut tmp);
        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k <<= 1;
        log::trace!("suffix array doubling step k={}", k);
    }

    Ok(sa)
}

fn initial_ranks(text: &[u8]) -> Vec<u32> {
    let mut present = [false; 256];
    for &b in text {
        present[b as usize] = true;
    }
    let mut code = [0u32; 256];
    let mut next = 0u32;
    for (c, seen) in present.iter().enumerate() {
        if *seen {
            code[c] = next;
            next += 1;
        }
    }
    text.iter().map(|&b| code[b as usize]).collect()
}

/// 构建完成后只读的后缀数组。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixArray {
    sa: Vec<u32>,
}

impl SuffixArray {
    pub fn build(text: &[u8]) -> Result<Self, IndexError> {
        Ok(Self { sa: build_sa(text)? })
    }

    pub fn len(&self) -> usize {
        self.sa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.sa[i] as usize
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.sa
    }
}
