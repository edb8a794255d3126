//! scry AST - typed AST construction for the scry decompiler.
//!
//! The instruction-level representation of an imported binary is lowered,
//! one function at a time, into an arena-owned tree of expressions and
//! statements that later stages print as source code. This crate owns that
//! construction surface:
//!
//! - [`TypeIndex`]: produces and owns every value type the tree mentions,
//!   structurally interning the shapes that allow it
//! - [`Source`] / [`Lower`]: the seam to the instruction-level world; the
//!   lowering visitor decides what each value or instruction becomes and is
//!   granted the allocator and operand-setting primitives to build it
//! - [`AstContext`]: the builder facade gluing arena, types, interner,
//!   translation caches, and the builtin expression roots together
//!
//! One context translates one function. Contexts never share node or type
//! ids; the string interner is the only component designed to be shared
//! across them.

mod context;
mod source;
mod types;

pub use context::{AstContext, Builtins};
pub use source::{Lower, Source, TypeShape};
pub use types::{FunctionData, FunctionId, StructData, StructId, TypeIndex, TypeKind};
