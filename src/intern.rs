//! Interned names.
//!
//! Identifier and literal text survives the whole compilation, so it is
//! stored once: every distinct string becomes a [`Name`], the maps in the
//! converter and the registry key on it, and equality is an integer compare.
//!
//! Storage mirrors how the rest of the front end treats text. The interner
//! appends every new string to one backing buffer and records its [`Span`];
//! resolving a name is slicing that buffer, exactly like slicing a file's
//! content with a token span. Deduplication goes through buckets keyed by a
//! 64-bit hash of the bytes, with same-hash entries told apart by a byte
//! compare.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::token::Span;

/// Handle to one interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Name(u32);

impl Name {
    /// The empty string, present in every interner.
    pub const EMPTY: Name = Name(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

pub struct Interner {
    /// Every interned string, concatenated.
    buffer: String,
    /// Where each name's text sits in the buffer, indexed by the name.
    spans: Vec<Span>,
    /// 64-bit content hash → names carrying that hash.
    buckets: HashMap<u64, Vec<Name>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            buffer: String::new(),
            // Name::EMPTY is the zero-length span at the buffer's start.
            spans: vec![Span::default()],
            buckets: HashMap::new(),
        }
    }

    /// Interns `text`, reusing the existing name when the bytes match.
    pub fn intern(&mut self, text: &str) -> Name {
        if text.is_empty() {
            return Name::EMPTY;
        }

        let hash = content_hash(text);
        if let Some(bucket) = self.buckets.get(&hash) {
            for &name in bucket {
                if self.resolve(name) == text {
                    return name;
                }
            }
        }

        let start = self.buffer.len();
        self.buffer.push_str(text);
        let name = Name(self.spans.len() as u32);
        self.spans.push(Span::new(start, self.buffer.len()));
        self.buckets.entry(hash).or_default().push(name);
        name
    }

    /// Interns the `span` slice of `source`; how the lexer stores lexemes.
    pub fn intern_span(&mut self, source: &str, span: Span) -> Name {
        self.intern(&source[span.start..span.end])
    }

    pub fn resolve(&self, name: Name) -> &str {
        let span = self.spans[name.index()];
        &self.buffer[span.start..span.end]
    }

    /// Finds an existing name without creating one.
    pub fn lookup(&self, text: &str) -> Option<Name> {
        if text.is_empty() {
            return Some(Name::EMPTY);
        }
        let bucket = self.buckets.get(&content_hash(text))?;
        bucket.iter().copied().find(|&name| self.resolve(name) == text)
    }

    /// Number of names, the empty sentinel included.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.len() <= 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed 64-bit content hash names are bucketed by.
fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_share_one_name() {
        let mut interner = Interner::new();
        let a = interner.intern("main");
        let b = interner.intern("main");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut interner = Interner::new();
        let a = interner.intern("count");
        let b = interner.intern("counter");
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "count");
        assert_eq!(interner.resolve(b), "counter");
    }

    #[test]
    fn names_stay_valid_as_the_buffer_grows() {
        let mut interner = Interner::new();
        let first = interner.intern("first");
        for i in 0..500 {
            interner.intern(&format!("filler_{}", i));
        }
        assert_eq!(interner.resolve(first), "first");
    }

    #[test]
    fn empty_name_is_always_present() {
        let mut interner = Interner::new();
        assert_eq!(interner.resolve(Name::EMPTY), "");
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(""), Some(Name::EMPTY));
    }

    #[test]
    fn intern_span_slices_the_source() {
        let mut interner = Interner::new();
        let source = "let counter = 0;";
        let name = interner.intern_span(source, Span::new(4, 11));
        assert_eq!(interner.resolve(name), "counter");
        assert_eq!(interner.intern("counter"), name);
    }

    #[test]
    fn lookup_does_not_create_entries() {
        let mut interner = Interner::new();
        assert!(interner.lookup("absent").is_none());
        let before = interner.len();
        interner.lookup("absent");
        assert_eq!(interner.len(), before);

        let name = interner.intern("present");
        assert_eq!(interner.lookup("present"), Some(name));
    }

    #[test]
    fn is_empty_ignores_the_sentinel() {
        let mut interner = Interner::new();
        assert!(interner.is_empty());
        interner.intern("x");
        assert!(!interner.is_empty());
    }
}
