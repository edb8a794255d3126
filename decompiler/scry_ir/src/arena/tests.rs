use super::*;
use crate::{ConditionPosition, NAryOperator, Name, UnaryOperator};
use pretty_assertions::assert_eq;

const INT: TypeId = TypeId::new(1);

fn leaf(arena: &mut AstArena, value: u64) -> ExprId {
    arena.alloc_expr(ExprKind::Numeric(value), INT, 0)
}

#[test]
fn alloc_and_read_back() {
    let mut arena = AstArena::new();

    let a = leaf(&mut arena, 2);
    let b = leaf(&mut arena, 3);
    let sum = arena.alloc_expr(ExprKind::NAry(NAryOperator::Add), TypeId::INVALID, 2);
    arena.set_operand(sum, 0, a);
    arena.set_operand(sum, 1, b);

    assert_eq!(arena.expr_count(), 3);
    assert_eq!(arena.kind(a), ExprKind::Numeric(2));
    assert_eq!(arena.kind(sum), ExprKind::NAry(NAryOperator::Add));
    assert_eq!(arena.operands(sum), &[a, b]);
    assert_eq!(arena.operand(sum, 1), b);
    assert_eq!(arena.operand_count(sum), 2);
}

#[test]
fn zero_slot_leaves_consume_no_slot_storage() {
    let mut arena = AstArena::new();

    let a = leaf(&mut arena, 1);
    let b = arena.alloc_expr(ExprKind::Token(Name::EMPTY), TypeId::VOID, 0);

    assert_eq!(arena.operands(a), &[]);
    assert_eq!(arena.operands(b), &[]);
    assert_eq!(arena.slot_count(), 0);

    let neg = arena.alloc_expr(ExprKind::Unary(UnaryOperator::Negate), INT, 1);
    arena.set_operand(neg, 0, a);
    assert_eq!(arena.slot_count(), 1);
    assert_eq!(arena.operands(neg), &[a]);
}

#[test]
#[should_panic(expected = "owns no operand slots")]
fn slotless_kind_with_slots_is_fatal() {
    let mut arena = AstArena::new();
    arena.alloc_expr(ExprKind::Numeric(0), INT, 1);
}

#[test]
fn nary_type_refined_from_first_operand() {
    let mut arena = AstArena::new();

    let a = leaf(&mut arena, 7);
    let sum = arena.alloc_expr(ExprKind::NAry(NAryOperator::Add), TypeId::INVALID, 2);
    assert!(!arena.ty(sum).is_valid());

    arena.set_operand(sum, 0, a);
    assert_eq!(arena.ty(sum), INT);
}

#[test]
fn fixed_type_survives_operand_fill() {
    let mut arena = AstArena::new();

    let a = leaf(&mut arena, 7);
    let bool_ty = TypeId::new(2);
    let cmp = arena.alloc_expr(ExprKind::NAry(NAryOperator::Less), bool_ty, 2);
    arena.set_operand(cmp, 0, a);

    // A comparison keeps its boolean type, not the operand's.
    assert_eq!(arena.ty(cmp), bool_ty);
}

#[test]
#[should_panic(expected = "out of range")]
fn set_operand_past_slot_count_is_fatal() {
    let mut arena = AstArena::new();
    let a = leaf(&mut arena, 1);
    let neg = arena.alloc_expr(ExprKind::Unary(UnaryOperator::Negate), INT, 1);
    arena.set_operand(neg, 1, a);
}

#[test]
#[should_panic(expected = "valid expression")]
fn set_operand_with_invalid_id_is_fatal() {
    let mut arena = AstArena::new();
    let neg = arena.alloc_expr(ExprKind::Unary(UnaryOperator::Negate), INT, 1);
    arena.set_operand(neg, 0, ExprId::INVALID);
}

#[test]
fn unfilled_slots_read_as_invalid() {
    let mut arena = AstArena::new();
    let call = arena.alloc_expr(ExprKind::Call, TypeId::VOID, 3);
    assert_eq!(arena.operands(call), &[ExprId::INVALID; 3]);
}

#[test]
fn statements_and_bodies() {
    let mut arena = AstArena::new();

    let cond = leaf(&mut arena, 1);
    let val = leaf(&mut arena, 2);

    let then_stmt = arena.alloc_stmt(StmtKind::Expr, &[val]);
    let break_word = Name::new(0, 9);
    let else_stmt = arena.alloc_stmt(StmtKind::Keyword { word: break_word }, &[]);

    let then_body = arena.seal_stmt_list(StmtList::single(then_stmt));
    let mut else_list = StmtList::new();
    else_list.push(else_stmt);
    let else_body = arena.seal_stmt_list(else_list);

    let branch = arena.alloc_stmt(
        StmtKind::IfElse {
            then_body,
            else_body,
        },
        &[cond],
    );

    assert_eq!(arena.stmt_count(), 3);
    assert_eq!(arena.stmt_operands(branch), &[cond]);
    assert_eq!(arena.stmt_list(then_body), &[then_stmt]);
    assert_eq!(arena.stmt_list(else_body), &[else_stmt]);
    assert_eq!(arena.stmt_operands(else_stmt), &[]);

    match arena.stmt_kind(branch) {
        StmtKind::IfElse {
            then_body: t,
            else_body: e,
        } => {
            assert_eq!(t, then_body);
            assert_eq!(e, else_body);
        }
        other => panic!("expected IfElse, got {other:?}"),
    }
}

#[test]
fn loop_statement_keeps_position() {
    let mut arena = AstArena::new();
    let cond = leaf(&mut arena, 1);
    let body_stmt = arena.alloc_stmt(StmtKind::Expr, &[cond]);
    let body = arena.seal_stmt_list(StmtList::single(body_stmt));

    let looped = arena.alloc_stmt(
        StmtKind::Loop {
            position: ConditionPosition::PostTested,
            body,
        },
        &[cond],
    );

    match arena.stmt_kind(looped) {
        StmtKind::Loop { position, .. } => assert_eq!(position, ConditionPosition::PostTested),
        other => panic!("expected Loop, got {other:?}"),
    }
}

#[test]
fn empty_body_seals_to_empty_range() {
    let mut arena = AstArena::new();
    let range = arena.seal_stmt_list(StmtList::new());
    assert!(range.is_empty());
    assert_eq!(arena.stmt_list(range), &[]);
}

#[test]
#[should_panic(expected = "valid expression")]
fn statement_with_invalid_operand_is_fatal() {
    let mut arena = AstArena::new();
    arena.alloc_stmt(StmtKind::Expr, &[ExprId::INVALID]);
}

#[test]
fn validate_accepts_complete_tree() {
    let mut arena = AstArena::new();

    let a = leaf(&mut arena, 2);
    let b = leaf(&mut arena, 3);
    let sum = arena.alloc_expr(ExprKind::NAry(NAryOperator::Add), TypeId::INVALID, 2);
    arena.set_operand(sum, 0, a);
    arena.set_operand(sum, 1, b);
    let stmt = arena.alloc_stmt(StmtKind::Expr, &[sum]);
    let body = arena.seal_stmt_list(StmtList::single(stmt));
    let cond = leaf(&mut arena, 1);
    arena.alloc_stmt(
        StmtKind::Loop {
            position: ConditionPosition::PreTested,
            body,
        },
        &[cond],
    );

    arena.validate();
}

#[test]
#[should_panic(expected = "unfilled")]
fn validate_rejects_partial_node() {
    let mut arena = AstArena::new();
    let a = leaf(&mut arena, 2);
    let sum = arena.alloc_expr(ExprKind::NAry(NAryOperator::Add), INT, 2);
    arena.set_operand(sum, 0, a);
    // Slot 1 never filled.
    arena.validate();
}

#[test]
fn with_capacity_starts_empty() {
    let arena = AstArena::with_capacity(128, 32);
    assert_eq!(arena.expr_count(), 0);
    assert_eq!(arena.stmt_count(), 0);
}
