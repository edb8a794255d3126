//! Statement node kinds.
//!
//! Statements reference their condition or value expressions through operand
//! slots, exactly like expression nodes; nested bodies are `StmtRange`s into
//! the arena's flat statement-list table, sealed when the body is attached.

use crate::ids::StmtRange;
use crate::Name;

/// Where a loop tests its condition.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConditionPosition {
    /// `while (c) { ... }`
    PreTested,
    /// `do { ... } while (c)`
    PostTested,
}

/// Statement node kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression evaluated for its effects; 1 slot.
    Expr,
    /// Two-way branch; 1 slot (the condition). `else_body` is empty for a
    /// plain `if`.
    IfElse {
        then_body: StmtRange,
        else_body: StmtRange,
    },
    /// Loop; 1 slot (the condition).
    Loop {
        position: ConditionPosition,
        body: StmtRange,
    },
    /// Keyword statement (`break`, `continue`, `return x`, `goto l`);
    /// 1 slot when the keyword carries a value, 0 otherwise.
    Keyword { word: Name },
}
