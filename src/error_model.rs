use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use serde::{Deserialize, Serialize};

use crate::error::{SpellError, SpellResult};

/// A character-transition key. `None` represents the empty character,
/// i.e. an insertion (`from == None`) or a deletion (`to == None`).
pub type EditChar = Option<char>;

/// Character-transition frequency store derived from aligned
/// (misspelling, correction) pairs.
///
/// Absence of a `(from, to)` pair means that edit is not permitted
/// (infinite cost) — see spec.md §3, ErrorModel invariant.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorModel {
    stat: HashMap<(EditChar, EditChar), u64>,
    weights: HashMap<(EditChar, EditChar), f64>,
    total_errors: u64,
}

impl ErrorModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only lines containing a tab are used; original and correction are
    /// lower-cased and their edit-matrix backtrace increments the
    /// corresponding (from, to) counters.
    pub fn build_from_file(&mut self, path: &str) -> SpellResult<()> {
        let file = File::open(path).map_err(|e| SpellError::io(path, e))?;
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("{}", SpellError::MalformedInput(e.to_string()));
                    continue;
                }
            };
            if let Some(idx) = line.find('\t') {
                let orig = line[..idx].to_lowercase();
                let fix = line[idx + 1..].to_lowercase();
                self.update_stat(&orig, &fix);
            }
        }
        self.calc_weights();
        Ok(())
    }

    /// Backtrace the unit-cost, no-transposition edit matrix between `s1`
    /// (original/misspelling) and `s2` (correction), recording one counter
    /// increment per cost-decreasing step.
    ///
    /// Precedence at ties: substitution, then insertion, then deletion —
    /// matching the original's `directions` tuple order.
    pub fn update_stat(&mut self, s1: &str, s2: &str) {
        let a: Vec<char> = s1.chars().collect();
        let b: Vec<char> = s2.chars().collect();
        let lev = edit_matrix(&a, &b);

        let mut i = a.len();
        let mut j = b.len();
        while (i, j) != (0, 0) {
            // (predecessor coords, cost-if-valid)
            let sub = if i > 0 && j > 0 {
                Some((i - 1, j - 1, lev[i - 1][j - 1]))
            } else {
                None
            };
            let ins = if j > 0 {
                Some((i, j - 1, lev[i][j - 1]))
            } else {
                None
            };
            let del = if i > 0 {
                Some((i - 1, j, lev[i - 1][j]))
            } else {
                None
            };

            let candidates = [sub, ins, del];
            let (oper, (pi, pj, dist)) = candidates
                .iter()
                .enumerate()
                .filter_map(|(op, c)| c.map(|c| (op, c)))
                .min_by_key(|(_, (_, _, dist))| *dist)
                .expect("at least one predecessor is always valid while (i,j) != (0,0)");

            if dist != lev[i][j] {
                match oper {
                    0 => {
                        *self.stat.entry((Some(a[i - 1]), Some(b[j - 1]))).or_insert(0) += 1;
                        self.total_errors += 1;
                    }
                    1 => {
                        *self.stat.entry((None, Some(b[j - 1]))).or_insert(0) += 1;
                        self.total_errors += 1;
                    }
                    _ => {
                        *self.stat.entry((Some(a[i - 1]), None)).or_insert(0) += 1;
                        self.total_errors += 1;
                    }
                }
            }
            i = pi;
            j = pj;
        }
    }

    pub fn calc_weights(&mut self) {
        self.weights.clear();
        for (pair, count) in self.stat.iter() {
            let weight = -((*count as f64) / (self.total_errors as f64)).ln();
            self.weights.insert(*pair, weight);
        }
    }

    /// Weight for transitioning `a -> b`. `None` means the edit was never
    /// observed and is therefore not permitted.
    pub fn weight(&self, a: EditChar, b: EditChar) -> Option<f64> {
        self.weights.get(&(a, b)).copied()
    }
}

/// Standard unit-cost Levenshtein edit matrix (no transpositions),
/// `(len(a)+1) x (len(b)+1)`.
fn edit_matrix(a: &[char], b: &[char]) -> Vec<Vec<u32>> {
    let (la, lb) = (a.len(), b.len());
    let mut lev = vec![vec![0u32; lb + 1]; la + 1];
    for i in 0..=la {
        lev[i][0] = i as u32;
    }
    for j in 0..=lb {
        lev[0][j] = j as u32;
    }
    for i in 1..=la {
        for j in 1..=lb {
            let sub_cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            lev[i][j] = (lev[i - 1][j] + 1)
                .min(lev[i][j - 1] + 1)
                .min(lev[i - 1][j - 1] + sub_cost);
        }
    }
    lev
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        for line in lines {
            writeln!(f, "{}", line).expect("write corpus line");
        }
        f
    }

    #[test]
    fn test0001_insertion_recorded() {
        let mut em = ErrorModel::new();
        em.update_stat("helo", "hello");
        em.calc_weights();
        assert!(em.weight(None, Some('l')).is_some());
    }

    #[test]
    fn test0002_deletion_recorded() {
        let mut em = ErrorModel::new();
        em.update_stat("helllo", "hello");
        em.calc_weights();
        assert!(em.weight(Some('l'), None).is_some());
    }

    #[test]
    fn test0003_substitution_recorded() {
        let mut em = ErrorModel::new();
        em.update_stat("halp", "help");
        em.calc_weights();
        assert!(em.weight(Some('a'), Some('e')).is_some());
    }

    #[test]
    fn test0004_unseen_pair_is_none() {
        let em = ErrorModel::new();
        assert!(em.weight(Some('z'), Some('q')).is_none());
    }

    #[test]
    fn test0005_weights_non_negative() {
        // Invariant (spec.md §3): weights are non-negative.
        let f = corpus(&["helo\thello", "wrold\tworld", "teh\tthe"]);
        let mut em = ErrorModel::new();
        em.build_from_file(f.path().to_str().unwrap()).unwrap();
        for (_, w) in em.weights.iter() {
            assert!(*w >= 0.0);
        }
    }

    #[test]
    fn test0006_only_tab_lines_used() {
        let f = corpus(&["this is a correct query", "helo\thello"]);
        let mut em = ErrorModel::new();
        em.build_from_file(f.path().to_str().unwrap()).unwrap();
        assert!(em.weight(None, Some('l')).is_some());
    }
}
