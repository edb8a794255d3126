//! Read-only traversal over the node arena.
//!
//! Downstream passes (liveness over builtin roots, printing, validation)
//! walk the tree without mutating it. Override `visit_*` methods for
//! behavior at specific nodes and call the matching `walk_*` function to
//! descend into children.
//!
//! Expressions form a DAG, not a tree: a shared subexpression is visited
//! once per parent that references it. Visitors that must act once per node
//! keep their own seen-set keyed by [`ExprId`].

use crate::arena::AstArena;
use crate::ids::{ExprId, StmtId, StmtRange};
use crate::stmt::StmtKind;

/// Arena visitor.
///
/// The visitor may mutate its own state; the arena stays immutable.
pub trait Visitor {
    /// Visit an expression node.
    fn visit_expr(&mut self, id: ExprId, arena: &AstArena) {
        walk_expr(self, id, arena);
    }

    /// Visit a statement node.
    fn visit_stmt(&mut self, id: StmtId, arena: &AstArena) {
        walk_stmt(self, id, arena);
    }
}

/// Descend into every filled operand slot of an expression.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, id: ExprId, arena: &AstArena) {
    for &operand in arena.operands(id) {
        if operand.is_valid() {
            visitor.visit_expr(operand, arena);
        }
    }
}

/// Descend into a statement's operand expressions and nested bodies.
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, id: StmtId, arena: &AstArena) {
    for &operand in arena.stmt_operands(id) {
        visitor.visit_expr(operand, arena);
    }
    match arena.stmt_kind(id) {
        StmtKind::IfElse {
            then_body,
            else_body,
        } => {
            walk_body(visitor, then_body, arena);
            walk_body(visitor, else_body, arena);
        }
        StmtKind::Loop { body, .. } => walk_body(visitor, body, arena),
        StmtKind::Expr | StmtKind::Keyword { .. } => {}
    }
}

fn walk_body<V: Visitor + ?Sized>(visitor: &mut V, body: StmtRange, arena: &AstArena) {
    for &stmt in arena.stmt_list(body) {
        visitor.visit_stmt(stmt, arena);
    }
}
