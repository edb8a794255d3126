//! scry IR - AST node storage for the scry decompiler.
//!
//! This crate contains the storage layer shared by every translation unit:
//! - Names for interned display text (tokens, keywords, variables)
//! - Id newtypes (`ExprId`, `StmtId`, `TypeId`) and flat-table ranges
//! - Expression and statement node kinds
//! - The arena that owns every node of one decompiled function
//! - A read-only visitor over the arena
//!
//! # Design Philosophy
//!
//! - **Intern everything**: display strings become `Name(u32)`, types become
//!   `TypeId(u32)`
//! - **Flatten everything**: no boxed trees; nodes live in parallel arrays
//!   and refer to each other through `ExprId(u32)` indices
//! - **One lifetime**: nodes are never freed individually; the arena drops
//!   as a unit when translation of the function is done
//!
//! Operand slots are fixed in count when a node is allocated and addressed
//! uniformly through the arena, independent of the node's kind.

mod arena;
mod expr;
mod ids;
mod interner;
mod name;
mod stmt;
pub mod visitor;

pub use arena::{to_u16, to_u32, AstArena, StmtList};
pub use expr::{ExprKind, NAryOperator, UnaryOperator};
pub use ids::{ExprId, StmtId, StmtRange, TypeId, UseRange};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use stmt::{ConditionPosition, StmtKind};
