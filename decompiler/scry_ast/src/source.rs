//! The seam between a machine-code IR and the output tree.
//!
//! The context never inspects IR values directly. It identifies them by
//! cheap copyable handles and asks the [`Source`] for the one thing it
//! must understand itself, the shape of a type. Everything else about
//! turning IR into expressions and statements lives behind [`Lower`],
//! implemented by the translation pass that drives the context.

use crate::context::AstContext;
use scry_ir::{ExprId, StmtId};
use std::hash::Hash;

/// One unfolding of a source type, expressed in source type handles.
///
/// [`AstContext::get_type`](crate::AstContext::get_type) walks shapes
/// recursively, so a shape only needs to describe its outermost layer.
/// Recursive types terminate because struct ids are recorded before
/// their field shapes are requested.
#[derive(Clone, Debug)]
pub enum TypeShape<T> {
    Void,
    Integer { signed: bool, bits: u16 },
    Pointer { pointee: T },
    Array { element: T, count: u64 },
    Struct { name: String, fields: Vec<T> },
    Function { return_type: T, parameters: Vec<T> },
}

/// A machine-code IR being decompiled.
///
/// The associated handle types are keys into the translation caches, so
/// they must be cheap to copy and stable for the lifetime of the context.
pub trait Source {
    /// Handle for an IR value (an SSA definition, a constant, an argument).
    type Value: Copy + Eq + Hash;
    /// Handle for an IR instruction.
    type Inst: Copy + Eq + Hash;
    /// Handle for an IR type.
    type Type: Copy + Eq + Hash;

    /// Describe the outermost layer of `ty`.
    fn type_shape(&self, ty: Self::Type) -> TypeShape<Self::Type>;
}

/// The translation pass that expands IR handles into tree nodes.
///
/// [`AstContext::expression_for`](crate::AstContext::expression_for) and
/// friends call back into the lowerer on cache misses; the lowerer in
/// turn builds nodes through the context it is handed, including nested
/// `expression_for` calls for its operands.
pub trait Lower<S: Source> {
    /// Build the expression for `value`. Called at most once per distinct
    /// value; the result is cached by the context.
    fn lower_value(&mut self, cx: &mut AstContext<S>, value: S::Value) -> ExprId;

    /// Build the statement for `inst`, or `None` if the instruction has
    /// no statement-level rendering (pure address arithmetic and the
    /// like). Not cached; instructions are visited once in program order.
    fn lower_instruction(&mut self, cx: &mut AstContext<S>, inst: S::Inst) -> Option<StmtId>;
}
