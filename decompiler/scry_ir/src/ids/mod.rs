//! Id newtypes and flat-table ranges for the node arena.
//!
//! Every reference between nodes is an index into the owning arena, never a
//! pointer:
//! - `ExprId(u32)` / `StmtId(u32)` index the expression and statement arrays
//! - `TypeId(u32)` indexes the type table owned by the translation context
//! - `UseRange` / `StmtRange` address contiguous runs in the flat operand
//!   and statement-list tables
//!
//! `u32::MAX` is reserved as the `INVALID` sentinel of each id; freshly
//! allocated operand slots hold it until the caller fills them.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Index into the expression arena.
///
/// 4 bytes, `Copy`, O(1) equality. Two expressions are the same node exactly
/// when their ids are equal, which is what makes memoized translation and
/// structural sharing observable.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Invalid expression id (sentinel value, also the unfilled-slot marker).
    pub const INVALID: ExprId = ExprId(u32::MAX);

    /// Create a new `ExprId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a valid id.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Hash for ExprId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId::INVALID")
        }
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Index into the statement arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct StmtId(u32);

impl StmtId {
    pub const INVALID: StmtId = StmtId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        StmtId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "StmtId({})", self.0)
        } else {
            write!(f, "StmtId::INVALID")
        }
    }
}

impl Default for StmtId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Index into the type table of a translation context.
///
/// Interned types compare equal exactly when their ids are equal; the table
/// guarantees one id per structural key for the interned kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Invalid type id (sentinel value).
    ///
    /// Nodes whose type is supplied by their first operand carry this until
    /// that operand is set.
    pub const INVALID: TypeId = TypeId(u32::MAX);

    /// The void type, pre-interned by every type table at index 0.
    pub const VOID: TypeId = TypeId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "TypeId({})", self.0)
        } else {
            write!(f, "TypeId::INVALID")
        }
    }
}

impl Default for TypeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of operand slots in the flat slot table.
///
/// 8 bytes after alignment (start: u32, len: u16). A node's operand count is
/// fixed when it is allocated, so `len` never changes afterwards.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct UseRange {
    pub start: u32,
    pub len: u16,
}

impl UseRange {
    /// Empty range (zero-operand nodes).
    pub const EMPTY: UseRange = UseRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        UseRange { start, len }
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Iterator over slot-table indices in this range.
    #[inline]
    pub fn indices(&self) -> impl Iterator<Item = u32> {
        self.start..(self.start + u32::from(self.len))
    }
}

impl fmt::Debug for UseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UseRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

impl Default for UseRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Range of statements in the flat statement-list table.
///
/// Statement bodies (the arms of an if, the body of a loop) are sealed into
/// one of these when they are attached to their parent.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct StmtRange {
    pub start: u32,
    pub len: u16,
}

impl StmtRange {
    pub const EMPTY: StmtRange = StmtRange { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        StmtRange { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for StmtRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StmtRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

#[cfg(test)]
mod tests;
