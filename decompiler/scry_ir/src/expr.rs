//! Expression node kinds and operator enums.
//!
//! A node's kind is a small `Copy` payload stored in the arena's parallel
//! `kinds` array; operand references live in the shared slot table, never in
//! the kind itself. Leaf kinds (numerals, tokens, inline assembly,
//! assignable locations) carry their payload inline and own no slots.

use crate::Name;

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOperator {
    /// Arithmetic negation `-x`.
    Negate,
    /// Bitwise complement `~x`.
    BitwiseNot,
    /// Logical complement `!x`.
    LogicalNot,
    /// Address-of `&x`.
    AddressOf,
    /// Pointer dereference `*x`.
    Dereference,
}

impl UnaryOperator {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::BitwiseNot => "~",
            Self::LogicalNot => "!",
            Self::AddressOf => "&",
            Self::Dereference => "*",
        }
    }
}

/// N-ary operators.
///
/// Every operator here is variadic in the tree: `a + b + c` is one `Add`
/// node with three operand slots, not a nest of binary nodes. Assignment is
/// an operator too, with the written location in slot 0.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NAryOperator {
    Assign,

    // Arithmetic
    Multiply,
    Divide,
    Modulus,
    Add,
    Subtract,

    // Shifts
    ShiftLeft,
    ShiftRight,

    // Comparison
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,

    // Bitwise
    BitAnd,
    BitXor,
    BitOr,

    // Logical
    LogicalAnd,
    LogicalOr,
}

impl NAryOperator {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
        }
    }

    /// Returns the precedence level of this operator.
    ///
    /// Higher number = lower precedence (binds less tightly), following C.
    /// The printer uses this to decide where parentheses are required.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Multiply | Self::Divide | Self::Modulus => 3,
            Self::Add | Self::Subtract => 4,
            Self::ShiftLeft | Self::ShiftRight => 5,
            Self::Less | Self::LessOrEqual | Self::Greater | Self::GreaterOrEqual => 6,
            Self::Equal | Self::NotEqual => 7,
            Self::BitAnd => 8,
            Self::BitXor => 9,
            Self::BitOr => 10,
            Self::LogicalAnd => 11,
            Self::LogicalOr => 12,
            Self::Assign => 14,
        }
    }

    /// Whether this operator compares its operands.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::LessOrEqual
                | Self::Greater
                | Self::GreaterOrEqual
                | Self::Equal
                | Self::NotEqual
        )
    }

    /// Whether this operator combines boolean operands.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }

    /// The comparison with the opposite truth value, if there is one.
    ///
    /// `!(a < b)` is `a >= b`, so negating a comparison node can flip the
    /// operator instead of wrapping the node.
    pub const fn negated(self) -> Option<Self> {
        match self {
            Self::Less => Some(Self::GreaterOrEqual),
            Self::GreaterOrEqual => Some(Self::Less),
            Self::LessOrEqual => Some(Self::Greater),
            Self::Greater => Some(Self::LessOrEqual),
            Self::Equal => Some(Self::NotEqual),
            Self::NotEqual => Some(Self::Equal),
            _ => None,
        }
    }
}

/// Expression node kinds.
///
/// The operand-slot count of each kind is decided by the builder that
/// allocates it; the four leaf kinds must be allocated with zero slots.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Unary operator; 1 slot.
    Unary(UnaryOperator),
    /// N-ary operator; >= 1 slots, filled left to right.
    NAry(NAryOperator),
    /// Struct field access on the base in slot 0.
    MemberAccess { field_index: u32 },
    /// `cond ? a : b`; 3 slots.
    Ternary,
    /// Integer literal, interpreted per the node's integer type. Leaf.
    Numeric(u64),
    /// Verbatim spelling for values the translation cannot model. Leaf.
    Token(Name),
    /// Call; slot 0 is the callee, remaining slots are arguments.
    Call,
    /// Type conversion of the value in slot 0.
    Cast,
    /// Aggregate literal; one slot per field.
    Aggregate,
    /// `base[index]`; 2 slots.
    Subscript,
    /// Inline assembly spelling, typed as a function. Leaf.
    Assembly(Name),
    /// A synthetic named location the output can assign to. Leaf.
    Assignable { name: Name, addressable: bool },
}

impl ExprKind {
    /// Whether nodes of this kind may own operand slots.
    ///
    /// Allocating a kind that returns `false` with a nonzero slot count is a
    /// precondition violation the arena treats as fatal.
    pub const fn has_operands(self) -> bool {
        !matches!(
            self,
            Self::Numeric(_) | Self::Token(_) | Self::Assembly(_) | Self::Assignable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_spot_check() {
        assert_eq!(UnaryOperator::Dereference.as_symbol(), "*");
        assert_eq!(NAryOperator::ShiftLeft.as_symbol(), "<<");
        assert_eq!(NAryOperator::Assign.as_symbol(), "=");
    }

    #[test]
    fn comparison_negation_is_an_involution() {
        let comparisons = [
            NAryOperator::Less,
            NAryOperator::LessOrEqual,
            NAryOperator::Greater,
            NAryOperator::GreaterOrEqual,
            NAryOperator::Equal,
            NAryOperator::NotEqual,
        ];
        for op in comparisons {
            assert!(op.is_comparison());
            let flipped = match op.negated() {
                Some(f) => f,
                None => panic!("comparison {op:?} must have a negation"),
            };
            assert_eq!(flipped.negated(), Some(op));
        }
    }

    #[test]
    fn only_comparisons_flip() {
        assert_eq!(NAryOperator::Add.negated(), None);
        assert_eq!(NAryOperator::LogicalAnd.negated(), None);
        assert_eq!(NAryOperator::Assign.negated(), None);
    }

    #[test]
    fn logical_operators() {
        assert!(NAryOperator::LogicalAnd.is_logical());
        assert!(NAryOperator::LogicalOr.is_logical());
        assert!(!NAryOperator::BitAnd.is_logical());
    }

    #[test]
    fn precedence_orders_like_c() {
        assert!(NAryOperator::Multiply.precedence() < NAryOperator::Add.precedence());
        assert!(NAryOperator::Add.precedence() < NAryOperator::Less.precedence());
        assert!(NAryOperator::Less.precedence() < NAryOperator::LogicalAnd.precedence());
        assert!(NAryOperator::LogicalOr.precedence() < NAryOperator::Assign.precedence());
    }

    #[test]
    fn leaf_kinds_have_no_operands() {
        assert!(!ExprKind::Numeric(0).has_operands());
        assert!(!ExprKind::Token(Name::EMPTY).has_operands());
        assert!(!ExprKind::Assembly(Name::EMPTY).has_operands());
        assert!(!ExprKind::Assignable { name: Name::EMPTY, addressable: false }.has_operands());

        assert!(ExprKind::Call.has_operands());
        assert!(ExprKind::Unary(UnaryOperator::Negate).has_operands());
        assert!(ExprKind::NAry(NAryOperator::Add).has_operands());
    }
}
