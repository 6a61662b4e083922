// src/prefix_index.rs
use std::collections::BTreeMap;

/// ルートパスの文字列前方一致を引くためのトライ。
///
/// キーはバイト単位で辿るので、`/a` は `/ab` の接頭辞として扱われる
/// (`str::starts_with` と同じ意味)。各終端には挿入順の添字を保持する。
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    next: BTreeMap<u8, usize>,
    entries: Vec<usize>,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        PrefixIndex {
            nodes: vec![TrieNode::default()],
        }
    }

    /// `(パス, 添字)` の列から作る
    pub fn build<'a>(items: impl IntoIterator<Item = (&'a str, usize)>) -> Self {
        let mut index = Self::new();
        for (path, id) in items {
            index.insert(path, id);
        }
        index
    }

    pub fn insert(&mut self, path: &str, id: usize) {
        let mut cursor = 0;
        for byte in path.bytes() {
            cursor = match self.nodes[cursor].next.get(&byte) {
                Some(&child) => child,
                None => {
                    self.nodes.push(TrieNode::default());
                    let child = self.nodes.len() - 1;
                    self.nodes[cursor].next.insert(byte, child);
                    child
                }
            };
        }
        self.nodes[cursor].entries.push(id);
    }

    /// `path` の接頭辞になっている全エントリを、短いものから順に返す。
    /// 同じ長さのものは挿入順。
    pub fn prefixes_of(&self, path: &str) -> Vec<usize> {
        let mut found = Vec::new();
        let mut cursor = 0;
        found.extend_from_slice(&self.nodes[cursor].entries);

        for byte in path.bytes() {
            match self.nodes[cursor].next.get(&byte) {
                Some(&child) => {
                    cursor = child;
                    found.extend_from_slice(&self.nodes[cursor].entries);
                }
                None => break,
            }
        }
        found
    }

    /// 最長の接頭辞エントリを返す。同じ長さなら先に挿入されたもの。
    /// `skip` が true を返すエントリは候補から外す。
    pub fn longest_prefix_of(&self, path: &str, skip: impl Fn(usize) -> bool) -> Option<usize> {
        let mut best = None;
        let mut cursor = 0;
        let pick = |entries: &[usize]| entries.iter().copied().find(|&id| !skip(id));

        if let Some(id) = pick(&self.nodes[cursor].entries) {
            best = Some(id);
        }
        for byte in path.bytes() {
            match self.nodes[cursor].next.get(&byte) {
                Some(&child) => {
                    cursor = child;
                    if let Some(id) = pick(&self.nodes[cursor].entries) {
                        best = Some(id);
                    }
                }
                None => break,
            }
        }
        best
    }
}
