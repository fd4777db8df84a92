use crate::builder::{bitset_width, Endian, FINGERPRINT_SIZE, GADDAG_VERSION, HEADER_SIZE};
use crate::letters::*;
use crate::results::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// The fixed-size fields at the start of a compiled structure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaddagHeader {
    pub version: u8,
    /// Identifies the word list the structure was compiled from, independent of word order.
    pub fingerprint: [u8; FINGERPRINT_SIZE],
    pub last_letter: Letter,
    pub bitset_width: u8,
    pub pointer_width: u8,
}

impl GaddagHeader {
    /// Parses and validates the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<GaddagHeader> {
        if bytes.len() < HEADER_SIZE {
            return Err(GaddagError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let version = bytes[0];
        if version != GADDAG_VERSION {
            return Err(GaddagError::UnsupportedVersion(version));
        }
        let mut fingerprint = [0; FINGERPRINT_SIZE];
        fingerprint.copy_from_slice(&bytes[1..1 + FINGERPRINT_SIZE]);
        let header = GaddagHeader {
            version,
            fingerprint,
            last_letter: bytes[17],
            bitset_width: bytes[18],
            pointer_width: bytes[19],
        };
        if header.last_letter < FIRST_LETTER || header.last_letter > LAST_LETTER {
            return Err(GaddagError::InvalidHeader(format!(
                "last letter {} is outside {}..={}",
                header.last_letter, FIRST_LETTER, LAST_LETTER
            )));
        }
        if header.bitset_width as usize != bitset_width(header.last_letter) {
            return Err(GaddagError::InvalidHeader(format!(
                "bitset width {} does not fit last letter {}",
                header.bitset_width, header.last_letter
            )));
        }
        if !(1..=8).contains(&header.pointer_width) {
            return Err(GaddagError::InvalidHeader(format!(
                "pointer width {} is outside 1..=8",
                header.pointer_width
            )));
        }
        Ok(header)
    }

    /// The fingerprint as lower-case hex.
    pub fn fingerprint_hex(&self) -> String {
        self.fingerprint
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

/// A node record: its child bitset followed by one pointer per child.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Node(usize);

/// A pointer record, which says whether its edge completes a word and where the child's record
/// is.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Edge(usize);

impl Node {
    /// The record's byte offset from the root record.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl Edge {
    pub fn offset(self) -> usize {
        self.0
    }
}

/// A read-only, compiled GADDAG (or DAWG).
///
/// All operations are pure reads, so one instance can be shared by any number of concurrent
/// searches.
#[derive(Clone)]
pub struct Gaddag {
    body: Box<[u8]>,
    header: GaddagHeader,
    endian: Endian,
    bitset_width: usize,
    pointer_width: usize,
    completes_word_mask: u64,
    address_mask: u64,
}

impl Gaddag {
    /// Loads a little-endian structure from its bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Gaddag> {
        Gaddag::from_bytes_with_endian(bytes, Endian::Little)
    }

    /// Loads a structure whose multi-byte fields have the given byte order.
    pub fn from_bytes_with_endian(mut bytes: Vec<u8>, endian: Endian) -> Result<Gaddag> {
        let header = GaddagHeader::parse(&bytes)?;
        let bitset_width = header.bitset_width as usize;
        let pointer_width = header.pointer_width as usize;
        let body = bytes.split_off(HEADER_SIZE);
        if body.len() < bitset_width {
            return Err(GaddagError::Truncated {
                expected: HEADER_SIZE + bitset_width,
                actual: HEADER_SIZE + body.len(),
            });
        }
        let completes_word_mask = 1u64 << (pointer_width * 8 - 1);
        let gaddag = Gaddag {
            body: body.into_boxed_slice(),
            header,
            endian,
            bitset_width,
            pointer_width,
            completes_word_mask,
            address_mask: completes_word_mask - 1,
        };
        gaddag.check_records()?;
        debug!(
            body_size = gaddag.body.len(),
            last_letter = header.last_letter,
            bitset_width,
            pointer_width,
            completes_word_mask,
            "loaded gaddag"
        );
        Ok(gaddag)
    }

    /// Walks every record reachable from the root and checks that it lies inside the body and
    /// only has children within the alphabet.
    fn check_records(&self) -> Result<()> {
        let truncated = |end: usize| GaddagError::Truncated {
            expected: HEADER_SIZE + end,
            actual: HEADER_SIZE + self.body.len(),
        };
        let letters_mask = all_letter_bits(self.header.last_letter) | (1u64 << DELIMITER);
        let mut visited = vec![false; self.body.len()];
        let mut pending = vec![self.root()];
        while let Some(node) = pending.pop() {
            let bitset_end = node.0 + self.bitset_width;
            if bitset_end > self.body.len() {
                return Err(truncated(bitset_end));
            }
            if visited[node.0] {
                continue;
            }
            visited[node.0] = true;
            let bitset = self.bitset(node);
            if bitset & !letters_mask != 0 {
                return Err(GaddagError::InvalidHeader(format!(
                    "record at {} has children past last letter {}",
                    node.0, self.header.last_letter
                )));
            }
            let children = bitset.count_ones() as usize;
            let record_end = bitset_end + self.pointer_width * children;
            if record_end > self.body.len() {
                return Err(truncated(record_end));
            }
            pending.extend(
                (0..children).filter_map(|ordinal| self.follow(self.pointer_at(node, ordinal))),
            );
        }
        Ok(())
    }

    /// Reads a little-endian structure from the given reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Gaddag> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Gaddag::from_bytes(bytes)
    }

    /// Reads a little-endian structure from the given file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Gaddag> {
        Gaddag::from_reader(File::open(path)?)
    }

    pub fn header(&self) -> &GaddagHeader {
        &self.header
    }

    pub fn fingerprint(&self) -> &[u8; FINGERPRINT_SIZE] {
        &self.header.fingerprint
    }

    pub fn last_letter(&self) -> Letter {
        self.header.last_letter
    }

    /// The size of the node records, excluding the header.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_children(self.root()) == 0
    }

    #[inline]
    pub fn root(&self) -> Node {
        Node(0)
    }

    #[inline]
    fn bitset(&self, node: Node) -> u64 {
        self.endian
            .read(&self.body[node.0..node.0 + self.bitset_width])
    }

    #[inline]
    fn pointer_at(&self, node: Node, ordinal: usize) -> Edge {
        Edge(node.0 + self.bitset_width + self.pointer_width * ordinal)
    }

    #[inline]
    fn pointer(&self, edge: Edge) -> u64 {
        self.endian
            .read(&self.body[edge.0..edge.0 + self.pointer_width])
    }

    /// Returns `true` iff the node has a child for the given letter.
    #[inline]
    pub fn has_child(&self, node: Node, letter: Letter) -> bool {
        self.bitset(node) & (1 << letter) != 0
    }

    /// Returns the pointer record for the given letter. The node must have that child.
    #[inline]
    pub fn child(&self, node: Node, letter: Letter) -> Edge {
        let before_letter_mask = (1u64 << letter) - 1;
        let ordinal = (self.bitset(node) & before_letter_mask).count_ones() as usize;
        self.pointer_at(node, ordinal)
    }

    /// Finds the lowest child letter that is at least `min_letter`.
    #[inline]
    pub fn next_child(&self, node: Node, min_letter: Letter) -> Option<(Letter, Edge)> {
        self.next_rack_child(node, min_letter, u64::MAX)
    }

    /// Finds the lowest child letter that is at least `min_letter` and is set in `rack_bits`.
    #[inline]
    pub fn next_rack_child(
        &self,
        node: Node,
        min_letter: Letter,
        rack_bits: u64,
    ) -> Option<(Letter, Edge)> {
        if min_letter > self.header.last_letter {
            return None;
        }
        let bitset = self.bitset(node);
        let candidates = bitset & rack_bits & !((1u64 << min_letter) - 1);
        if candidates == 0 {
            return None;
        }
        let letter = candidates.trailing_zeros() as Letter;
        if letter > self.header.last_letter {
            return None;
        }
        let ordinal = (bitset & ((1u64 << letter) - 1)).count_ones() as usize;
        Some((letter, self.pointer_at(node, ordinal)))
    }

    /// Returns `true` iff the node has a child for any letter in `rack_bits`.
    #[inline]
    pub fn has_any_child(&self, node: Node, rack_bits: u64) -> bool {
        self.intersection(node, rack_bits) != 0
    }

    /// Returns the letters that both nodes have children for.
    pub fn shared_children(&self, a: Node, b: Node) -> u64 {
        self.bitset(a) & self.bitset(b)
    }

    /// Returns the letters in `rack_bits` that the node has children for.
    #[inline]
    pub fn intersection(&self, node: Node, rack_bits: u64) -> u64 {
        self.bitset(node) & rack_bits
    }

    pub fn num_children(&self, node: Node) -> usize {
        self.bitset(node).count_ones() as usize
    }

    /// Returns `true` iff following this edge completes a word.
    #[inline]
    pub fn completes_word(&self, edge: Edge) -> bool {
        self.pointer(edge) & self.completes_word_mask != 0
    }

    /// Returns the node this edge leads to, or `None` if the edge ends at a leaf.
    #[inline]
    pub fn follow(&self, edge: Edge) -> Option<Node> {
        let address = (self.pointer(edge) & self.address_mask) as usize;
        if address == 0 {
            return None;
        }
        Some(Node(address))
    }

    /// Returns the delimiter edge that switches from the reversed prefix to the forward suffix,
    /// if the node has one.
    #[inline]
    pub fn change_direction(&self, node: Node) -> Option<Edge> {
        if self.has_child(node, DELIMITER) {
            Some(self.pointer_at(node, 0))
        } else {
            None
        }
    }

    /// Returns `true` iff the exact word was compiled into this GADDAG.
    ///
    /// The lookup follows the pattern that switches direction after the first letter.
    pub fn contains_word(&self, word: &[Letter]) -> bool {
        let Some((&first, rest)) = word.split_first() else {
            return false;
        };
        let mut path = Vec::with_capacity(word.len() + 1);
        path.push(first);
        if !rest.is_empty() {
            path.push(DELIMITER);
            path.extend_from_slice(rest);
        }
        self.accepts(&path)
    }

    /// Returns `true` iff the exact word was compiled into this DAWG.
    pub fn contains_word_forward(&self, word: &[Letter]) -> bool {
        !word.is_empty() && self.accepts(word)
    }

    fn accepts(&self, path: &[Letter]) -> bool {
        let mut node = Some(self.root());
        let mut completes = false;
        for &letter in path {
            let Some(current) = node else {
                return false;
            };
            if letter > self.header.last_letter || !self.has_child(current, letter) {
                return false;
            }
            let edge = self.child(current, letter);
            completes = self.completes_word(edge);
            node = self.follow(edge);
        }
        completes
    }
}

impl std::fmt::Debug for Gaddag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gaddag")
            .field("header", &self.header)
            .field("endian", &self.endian)
            .field("body_len", &self.body.len())
            .finish()
    }
}
