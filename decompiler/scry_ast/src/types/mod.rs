//! Value types of the decompiled output.
//!
//! [`TypeIndex`] produces and exclusively owns every type the tree mentions.
//! Two families with different identity rules share the table:
//!
//! - **Structural** kinds (void, integers, pointers, arrays) are interned:
//!   equal construction parameters always yield the same [`TypeId`], so id
//!   equality is type equality.
//! - **Nominal** kinds (structs, functions) are never interned: every
//!   creation call returns a fresh id even for an identical shape, because
//!   their identity is the declaration they were made for. Two structs both
//!   named `list` stay distinct types.
//!
//! A context owns one index and mutates it single-threaded; sharing types
//! across translation contexts is not supported.

use rustc_hash::FxHashMap;
use scry_ir::{to_u32, Name, StringLookup, TypeId};
use std::fmt;

/// Index into the nominal struct table of a [`TypeIndex`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct StructId(u32);

impl StructId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StructId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructId({})", self.0)
    }
}

/// Index into the nominal function table of a [`TypeIndex`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionId({})", self.0)
    }
}

/// Type kinds.
///
/// The `Struct` and `Function` payloads point into the side tables of the
/// owning index; everything else is self-contained and usable as an
/// interning key.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Void,
    Integer { signed: bool, bits: u16 },
    Pointer(TypeId),
    Array { element: TypeId, count: u64 },
    Struct(StructId),
    Function(FunctionId),
}

/// Name and ordered field types of a nominal struct.
#[derive(Clone, Debug)]
pub struct StructData {
    pub name: Name,
    pub fields: Vec<TypeId>,
}

/// Return type and ordered parameter types of a nominal function type.
#[derive(Clone, Debug)]
pub struct FunctionData {
    pub return_type: TypeId,
    pub parameters: Vec<TypeId>,
}

/// Owner and interner of all value types in one translation context.
#[derive(Clone, Debug, Default)]
pub struct TypeIndex {
    /// Kind of every type, indexed by [`TypeId`].
    kinds: Vec<TypeKind>,
    /// Structural dedup map. Nominal kinds never appear here.
    interned: FxHashMap<TypeKind, TypeId>,
    /// Payloads of nominal struct types.
    structs: Vec<StructData>,
    /// Payloads of nominal function types.
    functions: Vec<FunctionData>,
}

impl TypeIndex {
    /// Create an index with void pre-interned at [`TypeId::VOID`].
    pub fn new() -> Self {
        let mut index = Self::default();
        let void = index.intern(TypeKind::Void);
        debug_assert!(void == TypeId::VOID);
        index
    }

    /// Intern a structural kind, returning the canonical id for it.
    ///
    /// The map hashes the whole key and falls back to key equality on
    /// collision, so composite keys (pointee + count and the like) cannot
    /// be confused by coinciding hashes.
    fn intern(&mut self, kind: TypeKind) -> TypeId {
        debug_assert!(!matches!(kind, TypeKind::Struct(_) | TypeKind::Function(_)));
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.push_kind(kind);
        self.interned.insert(kind, id);
        id
    }

    fn push_kind(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId::new(to_u32(self.kinds.len(), "types"));
        self.kinds.push(kind);
        id
    }

    /// The void type.
    #[inline]
    pub fn void_type(&self) -> TypeId {
        TypeId::VOID
    }

    /// The interned integer type of the given width and signedness.
    ///
    /// Signedness is part of the identity: `integer(true, 32)` and
    /// `integer(false, 32)` are distinct types. Translation that wants to
    /// reinterpret a value's signedness goes through a cast node, never
    /// through type aliasing.
    pub fn integer(&mut self, signed: bool, bits: u16) -> TypeId {
        self.intern(TypeKind::Integer { signed, bits })
    }

    /// The interned pointer type to `pointee`.
    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        debug_assert!(pointee.is_valid());
        self.intern(TypeKind::Pointer(pointee))
    }

    /// The interned array type of `count` elements.
    pub fn array_of(&mut self, element: TypeId, count: u64) -> TypeId {
        debug_assert!(element.is_valid());
        self.intern(TypeKind::Array { element, count })
    }

    /// Create a fresh nominal struct type. Never deduplicated.
    ///
    /// The new struct has no fields; populate it with
    /// [`append_field`](Self::append_field).
    pub fn create_structure(&mut self, name: Name) -> TypeId {
        let sid = StructId::new(to_u32(self.structs.len(), "struct types"));
        self.structs.push(StructData {
            name,
            fields: Vec::new(),
        });
        self.push_kind(TypeKind::Struct(sid))
    }

    /// Create a fresh nominal function type. Never deduplicated.
    ///
    /// The new function type has no parameters; populate it with
    /// [`append_parameter`](Self::append_parameter).
    pub fn create_function(&mut self, return_type: TypeId) -> TypeId {
        debug_assert!(return_type.is_valid());
        let fid = FunctionId::new(to_u32(self.functions.len(), "function types"));
        self.functions.push(FunctionData {
            return_type,
            parameters: Vec::new(),
        });
        self.push_kind(TypeKind::Function(fid))
    }

    /// Append a field to a struct type, in declaration order.
    ///
    /// # Panics
    /// Panics if `struct_ty` is not a struct.
    pub fn append_field(&mut self, struct_ty: TypeId, field: TypeId) {
        let TypeKind::Struct(sid) = self.kind(struct_ty) else {
            panic!("append_field on non-struct type {struct_ty:?}");
        };
        self.structs[sid.index()].fields.push(field);
    }

    /// Append a parameter to a function type, in declaration order.
    ///
    /// # Panics
    /// Panics if `function_ty` is not a function type.
    pub fn append_parameter(&mut self, function_ty: TypeId, parameter: TypeId) {
        let TypeKind::Function(fid) = self.kind(function_ty) else {
            panic!("append_parameter on non-function type {function_ty:?}");
        };
        self.functions[fid.index()].parameters.push(parameter);
    }

    /// Get the kind of a type.
    #[inline]
    pub fn kind(&self, id: TypeId) -> TypeKind {
        assert!(id.is_valid(), "type id must be valid");
        self.kinds[id.index()]
    }

    /// Payload of a nominal struct type.
    pub fn struct_data(&self, id: StructId) -> &StructData {
        &self.structs[id.index()]
    }

    /// Payload of a nominal function type.
    pub fn function_data(&self, id: FunctionId) -> &FunctionData {
        &self.functions[id.index()]
    }

    /// Name of a struct type.
    ///
    /// # Panics
    /// Panics if `ty` is not a struct.
    pub fn struct_name(&self, ty: TypeId) -> Name {
        let TypeKind::Struct(sid) = self.kind(ty) else {
            panic!("struct_name on non-struct type {ty:?}");
        };
        self.structs[sid.index()].name
    }

    /// Ordered field types of a struct type.
    ///
    /// # Panics
    /// Panics if `ty` is not a struct.
    pub fn fields(&self, ty: TypeId) -> &[TypeId] {
        let TypeKind::Struct(sid) = self.kind(ty) else {
            panic!("fields on non-struct type {ty:?}");
        };
        &self.structs[sid.index()].fields
    }

    /// Return type of a function type.
    ///
    /// # Panics
    /// Panics if `ty` is not a function type.
    pub fn return_type(&self, ty: TypeId) -> TypeId {
        let TypeKind::Function(fid) = self.kind(ty) else {
            panic!("return_type on non-function type {ty:?}");
        };
        self.functions[fid.index()].return_type
    }

    /// Ordered parameter types of a function type.
    ///
    /// # Panics
    /// Panics if `ty` is not a function type.
    pub fn parameters(&self, ty: TypeId) -> &[TypeId] {
        let TypeKind::Function(fid) = self.kind(ty) else {
            panic!("parameters on non-function type {ty:?}");
        };
        &self.functions[fid.index()].parameters
    }

    /// Total number of types owned by the index.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the index holds only the pre-interned void type.
    pub fn is_empty(&self) -> bool {
        self.kinds.len() <= 1
    }

    /// Human-readable spelling of a type, for diagnostics and tests.
    pub fn render(&self, id: TypeId, names: &impl StringLookup) -> String {
        match self.kind(id) {
            TypeKind::Void => "void".to_owned(),
            TypeKind::Integer { signed, bits } => {
                format!("{}{bits}", if signed { 'i' } else { 'u' })
            }
            TypeKind::Pointer(pointee) => format!("{}*", self.render(pointee, names)),
            TypeKind::Array { element, count } => {
                format!("{}[{count}]", self.render(element, names))
            }
            TypeKind::Struct(sid) => {
                format!("struct {}", names.lookup(self.structs[sid.index()].name))
            }
            TypeKind::Function(fid) => {
                let data = &self.functions[fid.index()];
                let params: Vec<String> = data
                    .parameters
                    .iter()
                    .map(|&p| self.render(p, names))
                    .collect();
                format!("{} ({})", self.render(data.return_type, names), params.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests;
