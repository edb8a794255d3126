//! Per-function translation context.
//!
//! [`AstContext`] bundles the node arena, the type index, the shared name
//! interner and the translation caches behind one builder API. A pass
//! lowers one machine-code function per context: the builders allocate
//! typed nodes, [`expression_for`](AstContext::expression_for) and
//! [`statement_for`](AstContext::statement_for) memoize the mapping from
//! IR handles to nodes, and the builtin expressions exist before the
//! first instruction is visited.
//!
//! Builders derive each node's type from its inputs where the node kind
//! determines it (dereference, member access, call, subscript) and take
//! an explicit type where it does not (literals, casts, aggregates).
//! Handing a builder an input whose type cannot support the node is a
//! translation defect and aborts.

use crate::source::{Lower, Source, TypeShape};
use crate::types::{TypeIndex, TypeKind};
use rustc_hash::FxHashMap;
use scry_ir::{
    AstArena, ConditionPosition, ExprId, ExprKind, NAryOperator, Name, SharedInterner, StmtId,
    StmtKind, StmtList, StringInterner, TypeId, UnaryOperator,
};
use smallvec::SmallVec;

/// The always-present expressions every translated function may reference.
///
/// Installed before any translation runs, so they occupy the lowest ids of
/// the arena and are stable for the context's lifetime. Passes compare
/// against them by id; [`AstContext::break_if`] for example recognizes the
/// `true` builtin as its condition and drops the wrapping branch.
#[derive(Copy, Clone)]
pub struct Builtins {
    true_expr: ExprId,
    false_expr: ExprId,
    undef: ExprId,
    null: ExprId,
    memcpy: ExprId,
    memmove: ExprId,
    memset: ExprId,
    trap: ExprId,
}

fn token_expr(arena: &mut AstArena, names: &StringInterner, ty: TypeId, text: &str) -> ExprId {
    arena.alloc_expr(ExprKind::Token(names.intern(text)), ty, 0)
}

impl Builtins {
    fn install(arena: &mut AstArena, types: &mut TypeIndex, names: &StringInterner) -> Self {
        let bool_ty = types.integer(false, 1);
        let int_ty = types.integer(true, 32);
        let size_ty = types.integer(false, 64);
        let void_ptr = types.pointer_to(TypeId::VOID);

        let memcpy_ty = types.create_function(void_ptr);
        types.append_parameter(memcpy_ty, void_ptr);
        types.append_parameter(memcpy_ty, void_ptr);
        types.append_parameter(memcpy_ty, size_ty);

        let memmove_ty = types.create_function(void_ptr);
        types.append_parameter(memmove_ty, void_ptr);
        types.append_parameter(memmove_ty, void_ptr);
        types.append_parameter(memmove_ty, size_ty);

        let memset_ty = types.create_function(void_ptr);
        types.append_parameter(memset_ty, void_ptr);
        types.append_parameter(memset_ty, int_ty);
        types.append_parameter(memset_ty, size_ty);

        let trap_ty = types.create_function(TypeId::VOID);

        Self {
            true_expr: token_expr(arena, names, bool_ty, "true"),
            false_expr: token_expr(arena, names, bool_ty, "false"),
            undef: token_expr(arena, names, TypeId::VOID, "__undefined"),
            null: token_expr(arena, names, void_ptr, "null"),
            memcpy: token_expr(arena, names, memcpy_ty, "memcpy"),
            memmove: token_expr(arena, names, memmove_ty, "memmove"),
            memset: token_expr(arena, names, memset_ty, "memset"),
            trap: token_expr(arena, names, trap_ty, "__builtin_trap"),
        }
    }

    /// The boolean `true` literal.
    #[inline]
    pub fn true_expr(self) -> ExprId {
        self.true_expr
    }

    /// The boolean `false` literal.
    #[inline]
    pub fn false_expr(self) -> ExprId {
        self.false_expr
    }

    /// The undefined value, spelled `__undefined`.
    #[inline]
    pub fn undef(self) -> ExprId {
        self.undef
    }

    /// The null pointer literal.
    #[inline]
    pub fn null(self) -> ExprId {
        self.null
    }

    /// The `memcpy` intrinsic, typed `void* (void*, void*, u64)`.
    #[inline]
    pub fn memcpy(self) -> ExprId {
        self.memcpy
    }

    /// The `memmove` intrinsic, typed `void* (void*, void*, u64)`.
    #[inline]
    pub fn memmove(self) -> ExprId {
        self.memmove
    }

    /// The `memset` intrinsic, typed `void* (void*, i32, u64)`.
    #[inline]
    pub fn memset(self) -> ExprId {
        self.memset
    }

    /// The trap intrinsic, spelled `__builtin_trap`, typed `void ()`.
    #[inline]
    pub fn trap(self) -> ExprId {
        self.trap
    }

    /// Every builtin expression, for passes that treat them as roots.
    pub fn all(self) -> [ExprId; 8] {
        [
            self.true_expr,
            self.false_expr,
            self.undef,
            self.null,
            self.memcpy,
            self.memmove,
            self.memset,
            self.trap,
        ]
    }
}

/// Translation context for one machine-code function.
///
/// Owns the arena, the type index and the caches; shares the name interner
/// with sibling contexts through [`SharedInterner`]. Node ids handed out by
/// one context are meaningless in another.
pub struct AstContext<S: Source> {
    source: S,
    arena: AstArena,
    types: TypeIndex,
    interner: SharedInterner,
    builtins: Builtins,
    /// Value-translation memo: each IR value lowers at most once.
    expressions: FxHashMap<S::Value, ExprId>,
    /// Phi read expression to the assignable written at incoming edges.
    phi_writes: FxHashMap<ExprId, ExprId>,
    /// Source struct type to its nominal id, recorded before field
    /// translation so recursive layouts terminate.
    struct_types: FxHashMap<S::Type, TypeId>,
    /// Next suffix per synthesized-name prefix.
    assignable_counters: FxHashMap<Name, u32>,
}

impl<S: Source> AstContext<S> {
    /// Create a context with its own interner.
    pub fn new(source: S) -> Self {
        Self::with_interner(source, SharedInterner::new())
    }

    /// Create a context sharing `interner` with other contexts.
    pub fn with_interner(source: S, interner: SharedInterner) -> Self {
        Self::build(source, interner, AstArena::new())
    }

    /// Create a context pre-sized for a function of known shape.
    pub fn with_capacity(source: S, exprs: usize, stmts: usize) -> Self {
        Self::build(
            source,
            SharedInterner::new(),
            AstArena::with_capacity(exprs, stmts),
        )
    }

    fn build(source: S, interner: SharedInterner, mut arena: AstArena) -> Self {
        let mut types = TypeIndex::new();
        let builtins = Builtins::install(&mut arena, &mut types, &interner);
        tracing::debug!(
            builtin_exprs = arena.expr_count(),
            seed_types = types.len(),
            "translation context ready"
        );
        Self {
            source,
            arena,
            types,
            interner,
            builtins,
            expressions: FxHashMap::default(),
            phi_writes: FxHashMap::default(),
            struct_types: FxHashMap::default(),
            assignable_counters: FxHashMap::default(),
        }
    }

    // ---- types ----------------------------------------------------------

    /// The void type.
    pub fn void_type(&self) -> TypeId {
        self.types.void_type()
    }

    /// The integer type of the given signedness and width.
    pub fn integer_type(&mut self, signed: bool, bits: u16) -> TypeId {
        self.types.integer(signed, bits)
    }

    /// The 1-bit unsigned integer standing in for `bool`.
    pub fn bool_type(&mut self) -> TypeId {
        self.types.integer(false, 1)
    }

    /// The pointer type to `pointee`.
    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        self.types.pointer_to(pointee)
    }

    /// The array type of `count` elements.
    pub fn array_of(&mut self, element: TypeId, count: u64) -> TypeId {
        self.types.array_of(element, count)
    }

    /// Create a fresh nominal struct type with no fields yet.
    pub fn create_structure(&mut self, name: &str) -> TypeId {
        let name = self.interner.intern(name);
        self.types.create_structure(name)
    }

    /// Create a fresh nominal function type with no parameters yet.
    pub fn create_function(&mut self, return_type: TypeId) -> TypeId {
        self.types.create_function(return_type)
    }

    /// Translate a source type, reusing nominal ids for source structs.
    ///
    /// Struct ids are recorded in the cache before their fields are
    /// translated, so a struct that (through a pointer) contains itself
    /// comes out as one nominal type rather than an infinite regress.
    /// Function shapes get a fresh nominal type on every call.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn get_type(&mut self, ty: S::Type) -> TypeId {
        if let Some(&known) = self.struct_types.get(&ty) {
            return known;
        }
        match self.source.type_shape(ty) {
            TypeShape::Void => self.types.void_type(),
            TypeShape::Integer { signed, bits } => self.types.integer(signed, bits),
            TypeShape::Pointer { pointee } => {
                let pointee = self.get_type(pointee);
                self.types.pointer_to(pointee)
            }
            TypeShape::Array { element, count } => {
                let element = self.get_type(element);
                self.types.array_of(element, count)
            }
            TypeShape::Struct { name, fields } => {
                let name = self.interner.intern_owned(name);
                let struct_ty = self.types.create_structure(name);
                self.struct_types.insert(ty, struct_ty);
                for field in fields {
                    let field_ty = self.get_type(field);
                    self.types.append_field(struct_ty, field_ty);
                }
                struct_ty
            }
            TypeShape::Function {
                return_type,
                parameters,
            } => {
                let return_type = self.get_type(return_type);
                let func = self.types.create_function(return_type);
                for parameter in parameters {
                    let parameter_ty = self.get_type(parameter);
                    self.types.append_parameter(func, parameter_ty);
                }
                func
            }
        }
    }

    // ---- expression builders --------------------------------------------

    /// Build a unary operator node.
    ///
    /// The result type follows the operator: negation and complement keep
    /// the operand's type, logical not yields bool, address-of wraps the
    /// operand's type in a pointer, dereference unwraps one.
    ///
    /// # Panics
    /// Panics when dereferencing a non-pointer operand.
    pub fn unary(&mut self, op: UnaryOperator, operand: ExprId) -> ExprId {
        let ty = self.unary_result_type(op, operand);
        let expr = self.arena.alloc_expr(ExprKind::Unary(op), ty, 1);
        self.arena.set_operand(expr, 0, operand);
        expr
    }

    fn unary_result_type(&mut self, op: UnaryOperator, operand: ExprId) -> TypeId {
        let operand_ty = self.arena.ty(operand);
        match op {
            UnaryOperator::Negate | UnaryOperator::BitwiseNot => operand_ty,
            UnaryOperator::LogicalNot => self.bool_type(),
            UnaryOperator::AddressOf => self.types.pointer_to(operand_ty),
            UnaryOperator::Dereference => match self.types.kind(operand_ty) {
                TypeKind::Pointer(pointee) => pointee,
                kind => panic!("dereference of non-pointer type {kind:?}"),
            },
        }
    }

    /// Allocate an n-ary operator node with `count` unfilled slots.
    ///
    /// Comparisons and logical operators are typed bool up front; other
    /// operators start untyped and pick up the type of the first operand
    /// filled in.
    ///
    /// # Panics
    /// Panics if `count` is zero.
    pub fn nary_slots(&mut self, op: NAryOperator, count: usize) -> ExprId {
        assert!(count >= 1, "n-ary operator {op:?} needs at least one operand");
        let ty = if op.is_comparison() || op.is_logical() {
            self.bool_type()
        } else {
            TypeId::INVALID
        };
        self.arena.alloc_expr(ExprKind::NAry(op), ty, count)
    }

    /// Build an n-ary operator node over `operands`, left to right.
    pub fn nary(&mut self, op: NAryOperator, operands: &[ExprId]) -> ExprId {
        let expr = self.nary_slots(op, operands.len());
        for (slot, &operand) in operands.iter().enumerate() {
            self.arena.set_operand(expr, slot, operand);
        }
        expr
    }

    /// Build an n-ary operator node from an iterator of operands.
    ///
    /// With `collapse_single` set, a one-element sequence yields that
    /// element itself instead of a one-operand node; chains folded from
    /// variable-length runs use this to avoid degenerate wrappers.
    ///
    /// # Panics
    /// Panics if the iterator is empty.
    pub fn nary_from_iter<I>(&mut self, op: NAryOperator, operands: I, collapse_single: bool) -> ExprId
    where
        I: IntoIterator<Item = ExprId>,
    {
        let operands: SmallVec<[ExprId; 4]> = operands.into_iter().collect();
        assert!(
            !operands.is_empty(),
            "n-ary operator {op:?} needs at least one operand"
        );
        if collapse_single && operands.len() == 1 {
            return operands[0];
        }
        self.nary(op, &operands)
    }

    /// Build a field access on a struct or pointer-to-struct base.
    ///
    /// The node's type is the accessed field's type.
    ///
    /// # Panics
    /// Panics if the base type has no fields or the index is out of range.
    pub fn member_access(&mut self, base: ExprId, field_index: u32) -> ExprId {
        let base_ty = self.arena.ty(base);
        let struct_ty = match self.types.kind(base_ty) {
            TypeKind::Struct(_) => base_ty,
            TypeKind::Pointer(pointee)
                if matches!(self.types.kind(pointee), TypeKind::Struct(_)) =>
            {
                pointee
            }
            kind => panic!("member access base must be a struct or struct pointer, got {kind:?}"),
        };
        let fields = self.types.fields(struct_ty);
        assert!(
            (field_index as usize) < fields.len(),
            "field index {field_index} out of range ({} fields)",
            fields.len()
        );
        let ty = fields[field_index as usize];
        let expr = self.arena.alloc_expr(ExprKind::MemberAccess { field_index }, ty, 1);
        self.arena.set_operand(expr, 0, base);
        expr
    }

    /// Build `condition ? if_true : if_false`, typed after `if_true`.
    pub fn ternary(&mut self, condition: ExprId, if_true: ExprId, if_false: ExprId) -> ExprId {
        let ty = self.arena.ty(if_true);
        let expr = self.arena.alloc_expr(ExprKind::Ternary, ty, 3);
        self.arena.set_operand(expr, 0, condition);
        self.arena.set_operand(expr, 1, if_true);
        self.arena.set_operand(expr, 2, if_false);
        expr
    }

    /// Build an integer literal of the given integer type.
    ///
    /// The bit pattern is stored unsigned; the type's signedness decides
    /// how it reads back.
    ///
    /// # Panics
    /// Panics if `ty` is not an integer type.
    pub fn numeric(&mut self, ty: TypeId, value: u64) -> ExprId {
        assert!(
            matches!(self.types.kind(ty), TypeKind::Integer { .. }),
            "numeric literal needs an integer type"
        );
        self.arena.alloc_expr(ExprKind::Numeric(value), ty, 0)
    }

    /// Build a token expression: a fixed spelling with the given type.
    pub fn token(&mut self, ty: TypeId, text: &str) -> ExprId {
        let name = self.interner.intern(text);
        self.arena.alloc_expr(ExprKind::Token(name), ty, 0)
    }

    /// Build a call with `num_params` argument slots.
    ///
    /// The callee lands in slot 0 and arguments in slots `1..=num_params`,
    /// left unfilled for the caller. The node's type is the callee's
    /// return type.
    ///
    /// # Panics
    /// Panics if the callee is not of function type.
    pub fn call(&mut self, callee: ExprId, num_params: usize) -> ExprId {
        let callee_ty = self.arena.ty(callee);
        let ty = self.types.return_type(callee_ty);
        let expr = self.arena.alloc_expr(ExprKind::Call, ty, num_params + 1);
        self.arena.set_operand(expr, 0, callee);
        expr
    }

    /// Build a conversion of `value` to `ty`.
    pub fn cast(&mut self, ty: TypeId, value: ExprId) -> ExprId {
        assert!(ty.is_valid(), "cast requires an explicit result type");
        let expr = self.arena.alloc_expr(ExprKind::Cast, ty, 1);
        self.arena.set_operand(expr, 0, value);
        expr
    }

    /// Build an aggregate literal with `num_fields` unfilled slots.
    pub fn aggregate(&mut self, ty: TypeId, num_fields: usize) -> ExprId {
        assert!(ty.is_valid(), "aggregate requires an explicit result type");
        self.arena.alloc_expr(ExprKind::Aggregate, ty, num_fields)
    }

    /// Build `base[index]`, typed as the element the base points at.
    ///
    /// # Panics
    /// Panics if the base is neither an array nor a pointer.
    pub fn subscript(&mut self, base: ExprId, index: ExprId) -> ExprId {
        let base_ty = self.arena.ty(base);
        let ty = match self.types.kind(base_ty) {
            TypeKind::Array { element, .. } => element,
            TypeKind::Pointer(pointee) => pointee,
            kind => panic!("subscript base must be an array or pointer, got {kind:?}"),
        };
        let expr = self.arena.alloc_expr(ExprKind::Subscript, ty, 2);
        self.arena.set_operand(expr, 0, base);
        self.arena.set_operand(expr, 1, index);
        expr
    }

    /// Build an inline-assembly expression, callable like a function.
    ///
    /// # Panics
    /// Panics if `ty` is not a function type.
    pub fn assembly(&mut self, ty: TypeId, text: &str) -> ExprId {
        let TypeKind::Function(_) = self.types.kind(ty) else {
            panic!("assembly must be typed as a function, got {ty:?}");
        };
        let name = self.interner.intern(text);
        self.arena.alloc_expr(ExprKind::Assembly(name), ty, 0)
    }

    /// Build a fresh assignable location named `prefix` plus a counter.
    ///
    /// Each prefix numbers independently, so `"phi"` yields `phi0`,
    /// `phi1`, ... regardless of how many `"var"` locations exist.
    pub fn assignable(&mut self, ty: TypeId, prefix: &str, addressable: bool) -> ExprId {
        assert!(ty.is_valid(), "assignable requires an explicit type");
        let prefix_name = self.interner.intern(prefix);
        let counter = self.assignable_counters.entry(prefix_name).or_insert(0);
        let index = *counter;
        *counter += 1;
        let name = self.interner.intern_owned(format!("{prefix}{index}"));
        self.arena.alloc_expr(ExprKind::Assignable { name, addressable }, ty, 0)
    }

    /// Build the logical negation of a boolean expression, simplifying as
    /// it goes.
    ///
    /// Negating a `!x` node unwraps it back to `x`; negating a comparison
    /// builds a new node with the flipped operator over the same operands.
    /// Everything else is wrapped in a logical-not node. No memo is kept,
    /// so negating twice yields a node equivalent to, not identical to,
    /// the original.
    pub fn negate(&mut self, expr: ExprId) -> ExprId {
        debug_assert!(
            self.arena.ty(expr) == self.bool_type(),
            "negate expects a boolean operand"
        );
        match self.arena.kind(expr) {
            ExprKind::Unary(UnaryOperator::LogicalNot) => self.arena.operand(expr, 0),
            ExprKind::NAry(op) => {
                if let Some(flipped) = op.negated() {
                    let operands: SmallVec<[ExprId; 4]> =
                        self.arena.operands(expr).iter().copied().collect();
                    self.nary(flipped, &operands)
                } else {
                    self.unary(UnaryOperator::LogicalNot, expr)
                }
            }
            _ => self.unary(UnaryOperator::LogicalNot, expr),
        }
    }

    // ---- statement builders ---------------------------------------------

    /// Build a statement evaluating `expr` for its effects.
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.arena.alloc_stmt(StmtKind::Expr, &[expr])
    }

    /// Build an `if` with no `else` arm.
    pub fn if_then(&mut self, condition: ExprId, then_body: StmtList) -> StmtId {
        self.if_then_else(condition, then_body, StmtList::new())
    }

    /// Build an `if`/`else`, sealing both bodies.
    pub fn if_then_else(
        &mut self,
        condition: ExprId,
        then_body: StmtList,
        else_body: StmtList,
    ) -> StmtId {
        let then_body = self.arena.seal_stmt_list(then_body);
        let else_body = self.arena.seal_stmt_list(else_body);
        self.arena.alloc_stmt(
            StmtKind::IfElse {
                then_body,
                else_body,
            },
            &[condition],
        )
    }

    /// Build a loop testing `condition` at the given position.
    pub fn loop_stmt(
        &mut self,
        condition: ExprId,
        position: ConditionPosition,
        body: StmtList,
    ) -> StmtId {
        let body = self.arena.seal_stmt_list(body);
        self.arena.alloc_stmt(StmtKind::Loop { position, body }, &[condition])
    }

    /// Build a keyword statement, with its value when it carries one.
    pub fn keyword(&mut self, word: &str, value: Option<ExprId>) -> StmtId {
        let word = self.interner.intern(word);
        match value {
            Some(value) => self.arena.alloc_stmt(StmtKind::Keyword { word }, &[value]),
            None => self.arena.alloc_stmt(StmtKind::Keyword { word }, &[]),
        }
    }

    /// Build an unconditional `break`.
    pub fn break_stmt(&mut self) -> StmtId {
        self.keyword("break", None)
    }

    /// Build a `break` guarded by `condition`.
    ///
    /// A condition that is literally the `true` builtin yields a plain
    /// `break` with no wrapping branch.
    pub fn break_if(&mut self, condition: ExprId) -> StmtId {
        if condition == self.builtins.true_expr() {
            self.break_stmt()
        } else {
            let brk = self.break_stmt();
            self.if_then(condition, StmtList::single(brk))
        }
    }

    // ---- translation entry points ---------------------------------------

    /// The expression for an IR value, lowering it on first request.
    ///
    /// Later requests for the same value return the same id, which is what
    /// makes shared IR values come out as shared subtrees.
    ///
    /// # Panics
    /// Panics if the lowerer returns an invalid id.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn expression_for<L: Lower<S>>(&mut self, lowerer: &mut L, value: S::Value) -> ExprId {
        if let Some(&expr) = self.expressions.get(&value) {
            return expr;
        }
        let expr = lowerer.lower_value(self, value);
        assert!(expr.is_valid(), "lowering a value must produce an expression");
        self.expressions.insert(value, expr);
        tracing::trace!(?expr, "lowered value");
        expr
    }

    /// The statement for an IR instruction, or `None` when it has no
    /// statement-level rendering. Not memoized.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn statement_for<L: Lower<S>>(&mut self, lowerer: &mut L, inst: S::Inst) -> Option<StmtId> {
        lowerer.lower_instruction(self, inst)
    }

    /// Build the assignment statement realizing one incoming phi edge.
    ///
    /// The phi's read expression maps to a single write target shared by
    /// every incoming edge; the first edge creates it as a `phi_in`
    /// assignable of the read's type. The returned statement assigns the
    /// edge's value to that target.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn phi_assignment<L: Lower<S>>(
        &mut self,
        lowerer: &mut L,
        phi: S::Value,
        value: S::Value,
    ) -> StmtId {
        let read = self.expression_for(lowerer, phi);
        let write = match self.phi_writes.get(&read) {
            Some(&write) => write,
            None => {
                let ty = self.arena.ty(read);
                let write = self.assignable(ty, "phi_in", false);
                self.phi_writes.insert(read, write);
                tracing::debug!(?read, ?write, "new phi write target");
                write
            }
        };
        let value = self.expression_for(lowerer, value);
        let assign = self.nary(NAryOperator::Assign, &[write, value]);
        self.expr_stmt(assign)
    }

    // ---- access ---------------------------------------------------------

    /// The IR being translated.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The node arena.
    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    /// The node arena, for passes that fill deferred slots directly.
    pub fn arena_mut(&mut self) -> &mut AstArena {
        &mut self.arena
    }

    /// The type index.
    pub fn types(&self) -> &TypeIndex {
        &self.types
    }

    /// The type index, mutable.
    pub fn types_mut(&mut self) -> &mut TypeIndex {
        &mut self.types
    }

    /// The name interner.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// A clonable handle to the interner, for sibling contexts.
    pub fn shared_interner(&self) -> SharedInterner {
        self.interner.clone()
    }

    /// The builtin expressions of this context.
    pub fn builtins(&self) -> Builtins {
        self.builtins
    }

    /// Fill a deferred operand slot. See [`AstArena::set_operand`].
    pub fn set_operand(&mut self, expr: ExprId, index: usize, value: ExprId) {
        self.arena.set_operand(expr, index, value);
    }
}
