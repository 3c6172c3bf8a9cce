//! 相似度计算
//!
//! 基于最长匹配块的比值（gestalt pattern matching）：
//! `ratio = 2 * M / T`，M 为递归贪心找到的所有匹配块长度之和，T 为两串长度之和。
//! 即 Ratcliff/Obershelp 算法；b 长度不少于 200 时，b 中的高频字符不进入索引，
//! 只能通过匹配块两端的扩展被计入。

use std::collections::{HashMap, HashSet};

/// b 达到该长度时启用高频元素过滤
const AUTOJUNK_MIN_LEN: usize = 200;

/// 一个匹配块：`a[a_start..a_start+size] == b[b_start..b_start+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// 字符序列匹配器
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// b 中每个字符出现的位置（已去掉高频字符）
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = build_b2j(&b);
        Self { a, b, b2j }
    }

    /// 在 `a[alo..ahi]` 与 `b[blo..bhi]` 中找最长匹配块
    ///
    /// 多个等长时取 a 中最靠前的，再取 b 中最靠前的。
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (a, b) = (&self.a, &self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = 以 a[i-1]、b[j] 结尾的匹配长度
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(ch) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // 高频字符不在 b2j 中，靠两端扩展把它们补回来
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// 所有匹配块，按位置排序（不含末尾的哨兵块）
    pub fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks.sort();
        blocks
    }

    /// 相似度，0.0–1.0；两串都为空时为 1.0
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

fn build_b2j(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let n = b.len();
    if n >= AUTOJUNK_MIN_LEN {
        let ntest = n / 100 + 1;
        let popular: HashSet<char> = b2j
            .iter()
            .filter(|(_, positions)| positions.len() > ntest)
            .map(|(ch, _)| *ch)
            .collect();
        for ch in popular {
            b2j.remove(&ch);
        }
    }

    b2j
}

/// 机器翻译与参考译文的相似度百分比（0–100，保留两位小数）
pub fn similarity_percent(machine_translation: &str, reference: &str) -> f64 {
    let ratio = SequenceMatcher::new(machine_translation, reference).ratio();
    round2(ratio * 100.0)
}

/// 保留两位小数，恰好落在中点时取偶数
///
/// 按 `value` 的精确二进制值判断中点：`value * 100.0` 的舍入误差由 `mul_add` 补回。
fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let error = value.mul_add(100.0, -scaled);
    let floor = scaled.floor();
    let above_half = (scaled - floor - 0.5) + error;

    let units = if above_half > 0.0 {
        floor + 1.0
    } else if above_half < 0.0 || floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    units / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_round_to_even() {
        // 2 / 64 * 100 = 3.125
        let reference = format!("x{}", "y".repeat(62));
        assert_eq!(similarity_percent("x", &reference), 3.12);
        assert_eq!(round2(3.125), 3.12);
        assert_eq!(round2(15.625), 15.62);
        assert_eq!(round2(28.375), 28.38);
        assert_eq!(round2(0.5), 0.5);
    }

    #[test]
    fn test_round2_non_ties() {
        assert_eq!(round2(66.66666666666667), 66.67);
        assert_eq!(round2(8.2304526748971), 8.23);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_percent("Hello", "Hello"), 100.0);
        assert_eq!(similarity_percent("谢谢", "谢谢"), 100.0);
    }

    #[test]
    fn test_both_empty_is_full_match() {
        assert_eq!(similarity_percent("", ""), 100.0);
    }

    #[test]
    fn test_one_empty_is_zero() {
        assert_eq!(similarity_percent("", "Hello"), 0.0);
        assert_eq!(similarity_percent("Hello", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // 匹配 "bcd"，2*3/8
        assert_eq!(similarity_percent("abcd", "bcde"), 75.0);
        // "Thanks" / "Thank you": 匹配 "Thank"，2*5/15
        assert_eq!(similarity_percent("Thanks", "Thank you"), 66.67);
        assert_eq!(similarity_percent("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_matching_blocks() {
        let matcher = SequenceMatcher::new("abxcd", "abcd");
        let blocks = matcher.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchingBlock { a_start: 0, b_start: 0, size: 2 },
                MatchingBlock { a_start: 3, b_start: 2, size: 2 },
            ]
        );
    }

    #[test]
    fn test_leftmost_longest_match_wins() {
        let matcher = SequenceMatcher::new(" abcd", "abcd abcd");
        let best = matcher.find_longest_match(0, 5, 0, 9);
        assert_eq!(best, MatchingBlock { a_start: 0, b_start: 4, size: 5 });
    }

    #[test]
    fn test_autojunk_on_long_reference() {
        // b 长度 >= 200 时，出现次数超过 n/100+1 的字符不参与索引，
        // 这里 'a' 全部被过滤，只能靠 'b' 的扩展命中。
        let a = "b".to_string() + &"a".repeat(10);
        let b = "b".to_string() + &"a".repeat(299);
        let matcher = SequenceMatcher::new(&a, &b);
        let blocks = matcher.matching_blocks();
        assert_eq!(blocks, vec![MatchingBlock { a_start: 0, b_start: 0, size: 11 }]);
    }

    #[test]
    fn test_autojunk_popular_run_after_anchor() {
        // 'a' 被过滤，只有 "xyz" 能命中索引，随后向右扩展吞下 10 个 'a'
        let a = "xyz".to_string() + &"a".repeat(10);
        let b = "a".repeat(150) + "xyz" + &"a".repeat(150);
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(
            matcher.matching_blocks(),
            vec![MatchingBlock { a_start: 0, b_start: 150, size: 13 }]
        );
        assert_eq!(similarity_percent(&a, &b), 8.23);
    }

    #[test]
    fn test_bounded() {
        let pairs = [
            ("The cat sat on the mat", "A cat was sitting on a mat"),
            ("[OpenAI Error: timeout]", "Hello world"),
            ("你好世界", "Hello world"),
        ];
        for (a, b) in pairs {
            let score = similarity_percent(a, b);
            assert!((0.0..=100.0).contains(&score), "{} vs {} = {}", a, b, score);
        }
    }
}
