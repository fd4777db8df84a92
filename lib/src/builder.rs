//! Compiles a word list into the binary GADDAG format read by [`crate::Gaddag`].
//!
//! ## Format
//!
//! ```text
//! version: u8 (GADDAG_VERSION)
//! fingerprint: [u8; 16]     XOR of the MD5 of every word's letter codes
//! last_letter: u8
//! bitset_width: u8          ceil((last_letter + 1) / 8)
//! pointer_width: u8         1..=8
//! root record, then every other canonical record in pre-order:
//!   child bitset: [u8; bitset_width]
//!   one pointer per set bit, ascending letter order: [u8; pointer_width]
//!     top bit = the edge completes a word, rest = record address (0 = leaf)
//! ```
//!
//! Addresses are relative to the root record. Multi-byte fields use the [`Endian`] chosen at
//! build time; the reader must be told the same one.

use crate::data::WordList;
use crate::fixed::{LetterString, MAX_WORD_LENGTH};
use crate::letters::*;
use crate::results::*;
use md5::{Digest, Md5};
use rustc_hash::FxHashMap;
use std::io::Write;
use tracing::{debug, info, warn};

/// The format version written as the first byte.
pub const GADDAG_VERSION: u8 = 2;

/// Bytes before the root record: version, fingerprint, alphabet bound, and the two widths.
pub const HEADER_SIZE: usize = 20;

/// The length of the word-list fingerprint.
pub const FINGERPRINT_SIZE: usize = 16;

/// Which patterns get stored for each word.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Layout {
    /// Every direction-switch rotation of every word, for searches anchored at any letter.
    #[default]
    Gaddag,
    /// Only the words themselves, for forward-only traversal.
    Dawg,
}

/// The byte order of the multi-byte bitset and pointer fields.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    /// Writes the low `width` bytes of `value`.
    pub(crate) fn write(self, value: u64, width: usize, out: &mut Vec<u8>) {
        match self {
            Endian::Little => out.extend_from_slice(&value.to_le_bytes()[..width]),
            Endian::Big => out.extend_from_slice(&value.to_be_bytes()[8 - width..]),
        }
    }

    /// Reads a `bytes.len()`-byte unsigned value.
    #[inline]
    pub(crate) fn read(self, bytes: &[u8]) -> u64 {
        match self {
            Endian::Little => bytes
                .iter()
                .rev()
                .fold(0, |value, byte| (value << 8) | *byte as u64),
            Endian::Big => bytes
                .iter()
                .fold(0, |value, byte| (value << 8) | *byte as u64),
        }
    }
}

/// Options that control how a structure is compiled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BuildOptions {
    pub layout: Layout,
    pub endian: Endian,
    /// Whether to merge structurally identical subtrees. Turning this off only makes the output
    /// larger; the accepted words are the same.
    pub minimize: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            layout: Layout::Gaddag,
            endian: Endian::Little,
            minimize: true,
        }
    }
}

/// Counters describing a finished build.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct BuildStats {
    pub words: usize,
    pub patterns: usize,
    pub trie_nodes: usize,
    /// Nodes that were replaced by an identical earlier node.
    pub merged_nodes: usize,
    /// Pairs of nodes with equal content hashes but different structure. These are not merged.
    pub hash_collisions: usize,
    pub bitset_records: usize,
    pub pointer_records: usize,
    pub pointer_width: usize,
    /// Total output size, header included.
    pub byte_size: usize,
}

/// The output of [`GaddagBuilder::build`].
#[derive(Debug, Clone)]
pub struct Built {
    pub bytes: Vec<u8>,
    pub fingerprint: [u8; FINGERPRINT_SIZE],
    pub stats: BuildStats,
}

impl Built {
    /// Writes the compiled structure to the given writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }
}

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct TrieNode {
    letter: Letter,
    terminates: bool,
    /// Kept sorted by letter.
    children: Vec<NodeId>,
    duplicate: Option<NodeId>,
    bitsets: usize,
    pointers: usize,
    hash: Option<[u8; 16]>,
}

impl TrieNode {
    fn new(letter: Letter) -> TrieNode {
        TrieNode {
            letter,
            terminates: false,
            children: Vec::new(),
            duplicate: None,
            bitsets: 0,
            pointers: 0,
            hash: None,
        }
    }
}

/// An arena-backed trie that lives only for the duration of one build.
struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn new() -> Trie {
        Trie {
            nodes: vec![TrieNode::new(DELIMITER)],
        }
    }

    fn insert(&mut self, pattern: &[Letter]) {
        let mut current = ROOT;
        for &letter in pattern {
            let position = {
                let nodes = &self.nodes;
                nodes[current]
                    .children
                    .binary_search_by_key(&letter, |child| nodes[*child].letter)
            };
            current = match position {
                Ok(index) => self.nodes[current].children[index],
                Err(index) => {
                    let id = self.nodes.len();
                    self.nodes.push(TrieNode::new(letter));
                    self.nodes[current].children.insert(index, id);
                    id
                }
            };
        }
        self.nodes[current].terminates = true;
    }

    /// Hashes the node's children: their letters, terminal flags, and (recursively) contents.
    fn hash(&mut self, id: NodeId) -> [u8; 16] {
        if let Some(hash) = self.nodes[id].hash {
            return hash;
        }
        let mut hasher = Md5::new();
        for index in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[index];
            let child_hash = self.hash(child);
            let child_node = &self.nodes[child];
            hasher.update([
                child_node.letter,
                if child_node.terminates { b'.' } else { b'-' },
            ]);
            hasher.update(child_hash);
        }
        let mut hash = [0u8; 16];
        hash.copy_from_slice(&hasher.finalize());
        self.nodes[id].hash = Some(hash);
        hash
    }

    /// Two nodes serialize identically iff their children match letter for letter, flag for
    /// flag, and subtree for subtree.
    fn same_as(&self, a: NodeId, b: NodeId) -> bool {
        let a_children = &self.nodes[a].children;
        let b_children = &self.nodes[b].children;
        a_children.len() == b_children.len()
            && a_children.iter().zip(b_children).all(|(x, y)| {
                self.nodes[*x].letter == self.nodes[*y].letter
                    && self.nodes[*x].terminates == self.nodes[*y].terminates
            })
            && a_children
                .iter()
                .zip(b_children)
                .all(|(x, y)| self.same_as(*x, *y))
    }

    fn bin_by_hash(&mut self, id: NodeId, by_hash: &mut FxHashMap<[u8; 16], Vec<NodeId>>) {
        let hash = self.hash(id);
        by_hash.entry(hash).or_default().push(id);
        for index in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[index];
            self.bin_by_hash(child, by_hash);
        }
    }

    /// Marks every node that matches an earlier (pre-order) node as its duplicate.
    ///
    /// Returns the number of merged nodes and the number of hash collisions.
    fn mark_duplicates(&mut self) -> (usize, usize) {
        let mut by_hash: FxHashMap<[u8; 16], Vec<NodeId>> = FxHashMap::default();
        self.bin_by_hash(ROOT, &mut by_hash);
        let mut merged = 0;
        let mut collisions = 0;
        for bucket in by_hash.values() {
            for (i, &canonical) in bucket.iter().enumerate() {
                if self.nodes[canonical].duplicate.is_some() {
                    continue;
                }
                for &candidate in &bucket[i + 1..] {
                    if self.nodes[candidate].duplicate.is_some() {
                        continue;
                    }
                    if self.same_as(canonical, candidate) {
                        self.nodes[candidate].duplicate = Some(canonical);
                        merged += 1;
                    } else {
                        warn!(canonical, candidate, "hash collision between distinct nodes");
                        collisions += 1;
                    }
                }
            }
        }
        (merged, collisions)
    }

    /// Assigns record ordinals in pre-order over canonical nodes. Leaves get no record.
    fn number(&mut self, id: NodeId, bitsets: &mut usize, pointers: &mut usize) {
        if id != ROOT && self.nodes[id].children.is_empty() {
            return;
        }
        self.nodes[id].bitsets = *bitsets;
        self.nodes[id].pointers = *pointers;
        *bitsets += 1;
        *pointers += self.nodes[id].children.len();
        for index in 0..self.nodes[id].children.len() {
            let child = self.nodes[id].children[index];
            if self.nodes[child].duplicate.is_none() {
                self.number(child, bitsets, pointers);
            }
        }
    }
}

/// Record layout parameters shared by every node of one build.
#[derive(Clone, Copy)]
struct Widths {
    bitset: usize,
    pointer: usize,
    endian: Endian,
}

impl Widths {
    fn completes_word_mask(&self) -> u64 {
        1 << (self.pointer * 8 - 1)
    }
}

/// Collects words and compiles them into the binary format.
pub struct GaddagBuilder {
    options: BuildOptions,
    words: Vec<LetterString>,
}

impl GaddagBuilder {
    pub fn new(options: BuildOptions) -> GaddagBuilder {
        GaddagBuilder {
            options,
            words: Vec::new(),
        }
    }

    /// Adds a word. Adding the same word more than once has no further effect.
    ///
    /// # Panics
    ///
    /// Panics if the word is empty, longer than [`MAX_WORD_LENGTH`], or contains a code outside
    /// `FIRST_LETTER..=LAST_LETTER`.
    pub fn add_word(&mut self, word: &[Letter]) {
        assert!(
            !word.is_empty() && word.len() <= MAX_WORD_LENGTH,
            "word length {} is outside 1..={}",
            word.len(),
            MAX_WORD_LENGTH
        );
        assert!(
            word.iter()
                .all(|letter| (FIRST_LETTER..=LAST_LETTER).contains(letter)),
            "word contains a code outside the alphabet"
        );
        self.words.push(LetterString::from_word(word));
    }

    pub fn add_words(&mut self, words: &WordList) {
        for word in words {
            self.add_word(word);
        }
    }

    /// Inserts every word's patterns, minimizes, and serializes the result.
    pub fn build(mut self) -> Built {
        self.words.sort_unstable();
        self.words.dedup();
        let fingerprint = fingerprint(&self.words);
        let mut patterns: Vec<LetterString> = match self.options.layout {
            Layout::Dawg => self.words.clone(),
            Layout::Gaddag => self
                .words
                .iter()
                .flat_map(|word| gaddag_patterns(word))
                .collect(),
        };
        patterns.sort_unstable();
        debug!(patterns = patterns.len(), "inserting sorted patterns");

        let mut trie = Trie::new();
        for pattern in &patterns {
            trie.insert(pattern);
        }

        let (merged_nodes, hash_collisions) = if self.options.minimize {
            trie.mark_duplicates()
        } else {
            (0, 0)
        };

        let records = serialize(&mut trie, &fingerprint, self.options.endian);

        let stats = BuildStats {
            words: self.words.len(),
            patterns: patterns.len(),
            trie_nodes: trie.nodes.len(),
            merged_nodes,
            hash_collisions,
            bitset_records: records.bitsets,
            pointer_records: records.pointers,
            pointer_width: records.pointer_width,
            byte_size: records.bytes.len(),
        };
        info!(
            words = stats.words,
            patterns = stats.patterns,
            trie_nodes = stats.trie_nodes,
            merged_nodes = stats.merged_nodes,
            pointer_width = stats.pointer_width,
            byte_size = stats.byte_size,
            "built {:?}",
            self.options.layout
        );
        if hash_collisions > 0 {
            warn!(hash_collisions, "some identical-hash nodes were left unmerged");
        }
        Built {
            bytes: records.bytes,
            fingerprint,
            stats,
        }
    }
}

/// The serialized form of a numbered trie.
struct Records {
    bytes: Vec<u8>,
    bitsets: usize,
    pointers: usize,
    pointer_width: usize,
}

/// Numbers the canonical nodes, then writes the header followed by every record.
fn serialize(trie: &mut Trie, fingerprint: &[u8; FINGERPRINT_SIZE], endian: Endian) -> Records {
    let mut bitsets = 0;
    let mut pointers = 0;
    trie.number(ROOT, &mut bitsets, &mut pointers);

    let bitset_width = bitset_width(LAST_LETTER);
    let widths = Widths {
        bitset: bitset_width,
        pointer: choose_pointer_width(bitset_width, bitsets, pointers),
        endian,
    };

    let body_size = widths.bitset * bitsets + widths.pointer * pointers;
    let mut bytes = Vec::with_capacity(HEADER_SIZE + body_size);
    bytes.push(GADDAG_VERSION);
    bytes.extend_from_slice(fingerprint);
    bytes.push(LAST_LETTER);
    bytes.push(widths.bitset as u8);
    bytes.push(widths.pointer as u8);
    write_node(trie, ROOT, widths, &mut bytes);
    debug_assert_eq!(bytes.len(), HEADER_SIZE + body_size);
    Records {
        bytes,
        bitsets,
        pointers,
        pointer_width: widths.pointer,
    }
}

/// XORs together the MD5 digests of every word's letter codes.
fn fingerprint(words: &[LetterString]) -> [u8; FINGERPRINT_SIZE] {
    let mut folded = [0; FINGERPRINT_SIZE];
    for word in words {
        let digest = Md5::digest(word.as_slice());
        for (slot, byte) in folded.iter_mut().zip(digest.iter()) {
            *slot ^= byte;
        }
    }
    folded
}

/// Compiles the words into a GADDAG with the default options.
pub fn build_gaddag(words: &WordList) -> Vec<u8> {
    let mut builder = GaddagBuilder::new(BuildOptions::default());
    builder.add_words(words);
    builder.build().bytes
}

/// Returns every direction-switch pattern of the word: for each switch point `s`, the first `s`
/// letters reversed, then (if any letters remain) the delimiter and the rest of the word.
pub fn gaddag_patterns(word: &[Letter]) -> impl Iterator<Item = LetterString> + '_ {
    (0..=word.len()).map(move |switch_index| {
        let mut pattern = LetterString::from_word(&word[..switch_index]).reversed();
        if switch_index < word.len() {
            pattern.push(DELIMITER);
            pattern.extend_from_slice(&word[switch_index..]);
        }
        pattern
    })
}

/// The number of bytes needed for one presence bit per code in `0..=last_letter`.
pub fn bitset_width(last_letter: Letter) -> usize {
    (last_letter as usize + 1 + 7) / 8
}

/// Picks the smallest pointer width whose address space is more than twice the body size, so
/// the top bit of every pointer is free for the completes-word flag.
pub fn choose_pointer_width(bitset_width: usize, bitsets: usize, pointers: usize) -> usize {
    (1..=8)
        .find(|&width| {
            let body_size = (bitset_width * bitsets + width * pointers) as u128;
            (1u128 << (width * 8)) > 2 * body_size
        })
        .unwrap_or(8)
}

fn address(trie: &Trie, id: NodeId, widths: Widths) -> u64 {
    let target = &trie.nodes[trie.nodes[id].duplicate.unwrap_or(id)];
    if target.children.is_empty() {
        return 0;
    }
    (widths.bitset * target.bitsets + widths.pointer * target.pointers) as u64
}

fn write_node(trie: &Trie, id: NodeId, widths: Widths, out: &mut Vec<u8>) {
    let node = &trie.nodes[id];
    let bitset = node
        .children
        .iter()
        .fold(0u64, |bits, child| bits | (1 << trie.nodes[*child].letter));
    widths.endian.write(bitset, widths.bitset, out);
    for &child in &node.children {
        let mut pointer = address(trie, child, widths);
        debug_assert!(pointer < widths.completes_word_mask());
        if trie.nodes[child].terminates {
            pointer |= widths.completes_word_mask();
        }
        widths.endian.write(pointer, widths.pointer, out);
    }
    for &child in &node.children {
        let child_node = &trie.nodes[child];
        if child_node.duplicate.is_none() && !child_node.children.is_empty() {
            write_node(trie, child, widths, out);
        }
    }
}
