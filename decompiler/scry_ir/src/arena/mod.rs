//! Node arena for one decompiled function.
//!
//! [`AstArena`] uses struct-of-arrays layout: parallel `kinds`, `types`,
//! `uses_of` arrays indexed by [`ExprId`], with every node's operand slots
//! living in one shared flat `uses` table addressed by [`UseRange`]. The
//! layout is uniform across node kinds, which is what lets a single
//! `set_operand` work for all of them, and zero-slot leaves consume no slot
//! storage at all.
//!
//! Statements mirror the expression side (`stmt_kinds`, `stmt_uses_of`) and
//! add a flat `stmt_lists` table for nested bodies, built through the
//! move-only [`StmtList`] handle.
//!
//! # Failure model
//!
//! Every misuse here is a defect in the calling translation code, never a
//! data-dependent condition, so the arena asserts and aborts instead of
//! returning errors: requesting slots for a slotless kind, filling a slot
//! with an invalid id, indexing past a node's slot count.

use crate::expr::ExprKind;
use crate::ids::{ExprId, StmtId, StmtRange, TypeId, UseRange};
use crate::stmt::StmtKind;

/// Convert a length to u32, aborting if the arena outgrew the id space.
pub fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("too many {what}: {len}"),
    }
}

/// Convert a length to u16, aborting if a single list outgrew its range.
pub fn to_u16(len: usize, what: &str) -> u16 {
    match u16::try_from(len) {
        Ok(v) => v,
        Err(_) => panic!("{what} too long: {len}"),
    }
}

/// Arena owning every expression and statement of one translated function.
///
/// Nodes are created during translation and dropped together with the
/// arena; there is no per-node reclamation.
#[derive(Clone, Debug, Default)]
pub struct AstArena {
    /// Expression kinds (parallel with `types` and `uses_of`).
    kinds: Vec<ExprKind>,
    /// Static type of each expression (parallel with `kinds`).
    types: Vec<TypeId>,
    /// Operand-slot range of each expression (parallel with `kinds`).
    uses_of: Vec<UseRange>,
    /// Shared flat operand-slot table for expressions and statements.
    uses: Vec<ExprId>,
    /// Statement kinds (parallel with `stmt_uses_of`).
    stmt_kinds: Vec<StmtKind>,
    /// Operand-slot range of each statement (parallel with `stmt_kinds`).
    stmt_uses_of: Vec<UseRange>,
    /// Flattened statement id lists for nested bodies.
    stmt_lists: Vec<StmtId>,
}

impl AstArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena pre-sized for a function of known shape.
    ///
    /// `exprs` and `stmts` are estimates; the arena grows past them freely.
    pub fn with_capacity(exprs: usize, stmts: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(exprs),
            types: Vec::with_capacity(exprs),
            uses_of: Vec::with_capacity(exprs),
            uses: Vec::with_capacity(exprs * 2),
            stmt_kinds: Vec::with_capacity(stmts),
            stmt_uses_of: Vec::with_capacity(stmts),
            stmt_lists: Vec::with_capacity(stmts),
        }
    }

    /// Allocate an expression with `use_count` operand slots.
    ///
    /// Slots start unfilled ([`ExprId::INVALID`]) and must all be set via
    /// [`set_operand`](Self::set_operand) before the node is observed by
    /// anything downstream. `ty` may be [`TypeId::INVALID`] for nodes whose
    /// type is supplied by their first operand.
    ///
    /// # Panics
    /// Panics if `kind` owns no operand slots and `use_count` is nonzero.
    pub fn alloc_expr(&mut self, kind: ExprKind, ty: TypeId, use_count: usize) -> ExprId {
        assert!(
            kind.has_operands() || use_count == 0,
            "kind {kind:?} owns no operand slots, {use_count} requested"
        );

        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        let range = if use_count == 0 {
            UseRange::EMPTY
        } else {
            let start = to_u32(self.uses.len(), "operand slots");
            let len = to_u16(use_count, "operand list");
            self.uses.resize(self.uses.len() + use_count, ExprId::INVALID);
            UseRange::new(start, len)
        };
        self.kinds.push(kind);
        self.types.push(ty);
        self.uses_of.push(range);
        id
    }

    /// Get the kind of an expression.
    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.kinds[id.index()]
    }

    /// Get the static type of an expression.
    #[inline]
    pub fn ty(&self, id: ExprId) -> TypeId {
        self.types[id.index()]
    }

    /// Fill operand slot `index` of `expr`.
    ///
    /// Works uniformly for every slotted kind. Filling slot 0 of a node
    /// allocated with an invalid type copies the operand's type onto the
    /// node; that is how n-ary arithmetic picks up the type of its leftmost
    /// operand.
    ///
    /// # Panics
    /// Panics if `value` is invalid or `index` is out of range for the node.
    pub fn set_operand(&mut self, expr: ExprId, index: usize, value: ExprId) {
        assert!(
            value.is_valid(),
            "slot {index} of {expr:?} must be filled with a valid expression"
        );
        let range = self.uses_of[expr.index()];
        assert!(
            index < range.len(),
            "slot index {index} out of range for {expr:?} ({} slots)",
            range.len()
        );
        self.uses[range.start as usize + index] = value;

        if index == 0 && !self.types[expr.index()].is_valid() {
            self.types[expr.index()] = self.types[value.index()];
        }
    }

    /// All operand slots of an expression, in slot order.
    ///
    /// Unfilled slots read as [`ExprId::INVALID`].
    pub fn operands(&self, id: ExprId) -> &[ExprId] {
        let range = self.uses_of[id.index()];
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.uses[start..start + range.len()]
    }

    /// One operand slot of an expression.
    ///
    /// # Panics
    /// Panics if `index` is out of range for the node.
    pub fn operand(&self, id: ExprId, index: usize) -> ExprId {
        let range = self.uses_of[id.index()];
        assert!(
            index < range.len(),
            "slot index {index} out of range for {id:?} ({} slots)",
            range.len()
        );
        self.uses[range.start as usize + index]
    }

    /// Number of operand slots of an expression.
    #[inline]
    pub fn operand_count(&self, id: ExprId) -> usize {
        self.uses_of[id.index()].len()
    }

    /// Number of allocated expressions.
    pub fn expr_count(&self) -> usize {
        self.kinds.len()
    }

    /// Total operand slots allocated across all nodes (diagnostic).
    pub fn slot_count(&self) -> usize {
        self.uses.len()
    }

    /// Allocate a statement with its operands filled in argument order.
    ///
    /// Statement operand counts are always known at the call site, so there
    /// is no deferred-fill path on this side.
    ///
    /// # Panics
    /// Panics if any operand is invalid.
    pub fn alloc_stmt(&mut self, kind: StmtKind, operands: &[ExprId]) -> StmtId {
        let id = StmtId::new(to_u32(self.stmt_kinds.len(), "statements"));
        let range = if operands.is_empty() {
            UseRange::EMPTY
        } else {
            let start = to_u32(self.uses.len(), "operand slots");
            let len = to_u16(operands.len(), "operand list");
            for (slot, &operand) in operands.iter().enumerate() {
                assert!(
                    operand.is_valid(),
                    "statement operand {slot} must be a valid expression"
                );
                self.uses.push(operand);
            }
            UseRange::new(start, len)
        };
        self.stmt_kinds.push(kind);
        self.stmt_uses_of.push(range);
        id
    }

    /// Get the kind of a statement.
    #[inline]
    pub fn stmt_kind(&self, id: StmtId) -> StmtKind {
        self.stmt_kinds[id.index()]
    }

    /// All operand slots of a statement.
    pub fn stmt_operands(&self, id: StmtId) -> &[ExprId] {
        let range = self.stmt_uses_of[id.index()];
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.uses[start..start + range.len()]
    }

    /// Number of allocated statements.
    pub fn stmt_count(&self) -> usize {
        self.stmt_kinds.len()
    }

    /// Seal a pending body into the flat statement-list table.
    ///
    /// Consumes the handle; a body cannot be attached twice or grown after
    /// attachment.
    pub fn seal_stmt_list(&mut self, list: StmtList) -> StmtRange {
        if list.stmts.is_empty() {
            return StmtRange::EMPTY;
        }
        let start = to_u32(self.stmt_lists.len(), "statement lists");
        let len = to_u16(list.stmts.len(), "statement list");
        self.stmt_lists.extend_from_slice(&list.stmts);
        StmtRange::new(start, len)
    }

    /// Get the statements of a sealed body.
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.stmt_lists[start..start + range.len()]
    }

    /// Check that every node is well formed: all slots filled with in-bounds
    /// ids, every node typed, every body range inside the list table.
    ///
    /// # Panics
    /// Panics on the first violation found.
    pub fn validate(&self) {
        for (i, range) in self.uses_of.iter().enumerate() {
            assert!(self.types[i].is_valid(), "expression {i} has no type");
            for (slot, idx) in range.indices().enumerate() {
                let operand = self.uses[idx as usize];
                assert!(operand.is_valid(), "expression {i} slot {slot} is unfilled");
                assert!(
                    operand.index() < self.kinds.len(),
                    "expression {i} slot {slot} is out of bounds"
                );
            }
        }

        for (i, range) in self.stmt_uses_of.iter().enumerate() {
            for (slot, idx) in range.indices().enumerate() {
                let operand = self.uses[idx as usize];
                assert!(
                    operand.is_valid() && operand.index() < self.kinds.len(),
                    "statement {i} slot {slot} is invalid"
                );
            }
            match self.stmt_kinds[i] {
                StmtKind::IfElse {
                    then_body,
                    else_body,
                } => {
                    self.validate_body(i, then_body);
                    self.validate_body(i, else_body);
                }
                StmtKind::Loop { body, .. } => self.validate_body(i, body),
                StmtKind::Expr | StmtKind::Keyword { .. } => {}
            }
        }
    }

    fn validate_body(&self, stmt: usize, body: StmtRange) {
        let end = body.start as usize + body.len();
        assert!(
            end <= self.stmt_lists.len(),
            "statement {stmt} body range is out of bounds"
        );
        for &child in &self.stmt_lists[body.start as usize..end] {
            assert!(
                child.is_valid() && child.index() < self.stmt_kinds.len(),
                "statement {stmt} body references an invalid statement"
            );
        }
    }
}

/// An ordered body of statements waiting to be attached to its parent.
///
/// Deliberately not `Clone`: a body belongs to exactly one parent, and
/// attaching it (via [`AstArena::seal_stmt_list`]) consumes the handle.
#[derive(Debug, Default)]
pub struct StmtList {
    stmts: Vec<StmtId>,
}

impl StmtList {
    /// Create an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body holding a single statement.
    pub fn single(stmt: StmtId) -> Self {
        Self { stmts: vec![stmt] }
    }

    /// Append a statement to the body.
    pub fn push(&mut self, stmt: StmtId) {
        self.stmts.push(stmt);
    }

    /// Number of statements in the body.
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[cfg(test)]
mod tests;
