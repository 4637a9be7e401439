// lzw.rs
//
// Copyright (c) 2024  tidefill developers
//
//! Lempel-Ziv-Welch compression for GIF image data
use crate::error::Result;
use std::cmp::Ordering;
use std::ops::AddAssign;

/// Code Bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }
}

/// Code type
type Code = u16;

/// Maximum number of entries in the code table
pub const MAX_CODES: usize = 1 << 12;

/// Trie node: one (prefix code, symbol) entry
///
/// Entries sharing a prefix are linked as a binary search tree ordered by
/// symbol, so lookups never scan the whole table.
#[derive(Clone, Copy, Debug)]
struct Node {
    /// First extension of this entry
    next: Option<Code>,
    /// Sibling with a smaller symbol
    left: Option<Code>,
    /// Sibling with a larger symbol
    right: Option<Code>,
    /// Symbol value
    symbol: u8,
}

/// Code dictionary trie
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

/// LZW Data Compressor
#[derive(Debug)]
pub struct Compressor {
    /// Code dictionary
    trie: Trie,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Current code
    code: u32,
    /// Number of bits in current code
    n_bits: u8,
    /// Number of table resets
    resets: usize,
}

impl Node {
    /// Create a new node
    fn new(symbol: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            symbol,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(MAX_CODES),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary to its seeded state
    fn reset(&mut self) {
        self.table.clear();
        for symbol in 0..self.clear_code() {
            self.table.push(Node::new(symbol as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Get a mutable node
    fn node_mut(&mut self, code: Code) -> &mut Node {
        debug_assert!(code < self.next_code());
        &mut self.table[code as usize]
    }

    /// Check whether the table has no room for another code
    fn is_full(&self) -> bool {
        self.table.len() >= MAX_CODES
    }

    /// Search for (prefix + symbol), inserting it when missing.
    ///
    /// Returns the code of the extended match, or `None` if it was missing.
    /// Nothing is inserted into a full table.
    fn search_insert(&mut self, code: Code, symbol: u8) -> Option<Code> {
        let next_code = self.next_code();
        let full = self.is_full();
        let mut node = self.node_mut(code);
        let mut ordering = Ordering::Equal;
        while let Some(code) = node.link(ordering) {
            node = self.node_mut(code);
            ordering = symbol.cmp(&node.symbol);
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        if !full {
            node.set_link(ordering, next_code);
            self.table.push(Node::new(symbol));
        }
        None
    }
}

impl Compressor {
    /// Create a new compressor
    pub fn new(min_code_bits: u8) -> Self {
        let min_code_bits = min_code_bits.clamp(2, 8);
        let trie = Trie::new(min_code_bits);
        let code_bits = Bits::from(min_code_bits + 1);
        Compressor {
            min_code_bits,
            trie,
            code_bits,
            code: 0,
            n_bits: 0,
            resets: 0,
        }
    }

    /// Get the minimum code bits
    pub fn min_code_bits(&self) -> u8 {
        self.min_code_bits
    }

    /// Get the number of table resets so far
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Get the number of entries in the code table
    pub fn table_len(&self) -> usize {
        self.trie.table.len()
    }

    /// Reset the code table and code bits
    fn reset_table(&mut self) {
        self.trie.reset();
        self.code_bits = Bits::from(self.min_code_bits + 1);
    }

    /// Pack a code into a buffer, least-significant bit first
    fn pack(&mut self, code: Code, buffer: &mut Vec<u8>) {
        self.code |= (code as u32) << self.n_bits;
        self.n_bits += u8::from(self.code_bits);
        while self.n_bits >= 8 {
            buffer.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Flush any remaining partial byte
    fn flush(&mut self, buffer: &mut Vec<u8>) {
        if self.n_bits > 0 {
            buffer.push(self.code as u8);
            self.code = 0;
            self.n_bits = 0;
        }
    }

    /// Compress a buffer of symbols.
    ///
    /// The output starts with a clear code, ends with an end code and is
    /// padded to a whole byte.  Every symbol must be less than
    /// `1 << min_code_bits`.
    pub fn compress(&mut self, symbols: &[u8], buffer: &mut Vec<u8>) -> Result<()> {
        buffer.try_reserve(symbols.len() / 2 + 8)?;
        self.reset_table();
        self.pack(self.trie.clear_code(), buffer);
        let mut code: Option<Code> = None;
        for symbol in symbols {
            debug_assert!(Code::from(*symbol) < self.trie.clear_code());
            if let Some(prefix) = code {
                let full = self.trie.is_full();
                if let Some(c) = self.trie.search_insert(prefix, *symbol) {
                    code = Some(c);
                    continue;
                }
                self.pack(prefix, buffer);
                if full {
                    self.pack(self.trie.clear_code(), buffer);
                    self.reset_table();
                    self.resets += 1;
                    trace!("lzw table reset #{}", self.resets);
                } else if self.trie.next_code() > self.code_bits.entries() {
                    self.code_bits += 1;
                }
            }
            code = Some(Code::from(*symbol));
        }
        if let Some(code) = code {
            self.pack(code, buffer);
        }
        // decoders widen one code early, after adding the last entry
        if self.trie.next_code() == self.code_bits.entries() {
            self.code_bits += 1;
        }
        self.pack(self.trie.end_code(), buffer);
        self.flush(buffer);
        Ok(())
    }
}
