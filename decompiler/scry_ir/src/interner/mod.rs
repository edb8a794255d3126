//! Sharded string interner for display text.
//!
//! Every piece of text the decompiler can emit (token spellings, statement
//! keywords, synthesized variable names, inline assembly) is interned once
//! and handled as a [`Name`] afterwards. Interning is O(1) with thread-safe
//! concurrent access via per-shard locking, so one interner can serve many
//! translation contexts running on independent threads.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by local index.
    strings: Vec<&'static str>,
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0 so Name::EMPTY resolves.
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity (over 4 billion strings).
    ShardOverflow { shard_idx: usize, count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// Sharded string interner.
///
/// Interned strings are leaked, which gives them the same lifetime story as
/// the rest of the translation output: nothing is reclaimed piecemeal.
///
/// # Thread Safety
/// Uses an `RwLock` per shard for concurrent read/write access. Wrap in
/// [`SharedInterner`] to share across threads.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with the decompiler vocabulary pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        // Start with 1 for the empty string pre-interned in shard 0.
        let interner = Self {
            shards,
            total_count: AtomicUsize::new(1),
        };
        interner.pre_intern_keywords();
        interner
    }

    /// Compute shard for a string based on a prefix hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Shared insertion path for borrowed and owned strings.
    ///
    /// Owned input is leaked directly; borrowed input is only copied when it
    /// was not already interned.
    fn intern_cow(&self, s: Cow<'_, str>) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(&s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: already interned.
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s.as_ref()) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring the write lock.
        if let Some(&local) = guard.map.get(s.as_ref()) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        // Leak to get the 'static lifetime the shard stores.
        let leaked: &'static str = Box::leak(s.into_owned().into_boxed_str());

        let local = u32::try_from(guard.strings.len()).map_err(|_| InternError::ShardOverflow {
            shard_idx,
            count: guard.strings.len(),
        })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        // Relaxed is fine, the count is only a diagnostic.
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        self.intern_cow(Cow::Borrowed(s))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity (over 4 billion strings).
    /// Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Try to intern an owned String, avoiding the copy `try_intern` would
    /// make for a string that is new to the interner.
    pub fn try_intern_owned(&self, s: String) -> Result<Name, InternError> {
        self.intern_cow(Cow::Owned(s))
    }

    /// Intern an owned String, avoiding double allocation.
    ///
    /// Useful for synthesized names built with `format!`.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern_owned` for
    /// fallible interning.
    pub fn intern_owned(&self, s: String) -> Name {
        self.try_intern_owned(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &str {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.strings[name.local()]
    }

    /// Look up the string for a Name, returning a `'static` reference.
    ///
    /// Safe because interned strings are leaked and never deallocated.
    pub fn lookup_static(&self, name: Name) -> &'static str {
        let shard = &self.shards[name.shard()];
        let guard = shard.read();
        guard.strings[name.local()]
    }

    /// Pre-intern the fixed vocabulary of decompiled output.
    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Builtin value spellings
            "true",
            "false",
            "null",
            "__undefined",
            // Intrinsic call targets
            "memcpy",
            "memmove",
            "memset",
            "__builtin_trap",
            // Statement keywords
            "break",
            "continue",
            "return",
            "goto",
            "if",
            "else",
            "while",
            "do",
            // Synthesized name prefixes
            "phi",
            "phi_in",
            "anon",
            "var",
            "arg",
            // Common type spellings
            "void",
            "int",
            "char",
        ];

        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner holds only the empty string.
    ///
    /// A freshly created interner is never empty by this measure because the
    /// keyword vocabulary is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for looking up interned string names.
///
/// Lets downstream code (type rendering, pretty-printing) accept any lookup
/// source without depending on `StringInterner` directly.
pub trait StringLookup {
    /// Look up the string for an interned name.
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

/// Shared interner handle for use across translation contexts.
///
/// One decompilation run typically translates many functions, each in its
/// own context and possibly on its own thread; all of them share one
/// interner through clones of this handle. The newtype keeps the `Arc`
/// plumbing in one place.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    /// Create a new shared interner.
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
