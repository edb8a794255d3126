use super::*;
use pretty_assertions::assert_eq;
use scry_ir::StringInterner;

#[test]
fn void_is_pre_interned() {
    let index = TypeIndex::new();
    assert_eq!(index.len(), 1);
    assert!(index.is_empty());
    assert_eq!(index.void_type(), TypeId::VOID);
    assert_eq!(index.kind(TypeId::VOID), TypeKind::Void);
}

#[test]
fn structural_kinds_intern_to_one_id() {
    let mut index = TypeIndex::new();
    let a = index.integer(true, 32);
    let b = index.integer(true, 32);
    assert_eq!(a, b);

    let pa = index.pointer_to(a);
    let pb = index.pointer_to(b);
    assert_eq!(pa, pb);

    let aa = index.array_of(a, 16);
    let ab = index.array_of(a, 16);
    assert_eq!(aa, ab);
    assert_eq!(index.len(), 4);
}

#[test]
fn signedness_splits_integer_types() {
    let mut index = TypeIndex::new();
    let signed = index.integer(true, 32);
    let unsigned = index.integer(false, 32);
    assert_ne!(signed, unsigned);
}

#[test]
fn width_splits_integer_types() {
    let mut index = TypeIndex::new();
    let narrow = index.integer(true, 16);
    let wide = index.integer(true, 32);
    assert_ne!(narrow, wide);
}

#[test]
fn array_count_is_part_of_the_key() {
    let mut index = TypeIndex::new();
    let byte = index.integer(false, 8);
    let short = index.array_of(byte, 8);
    let long = index.array_of(byte, 9);
    assert_ne!(short, long);
}

#[test]
fn nested_structural_types_intern() {
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    let p = index.pointer_to(int);
    let pa = index.pointer_to(p);
    let int2 = index.integer(true, 32);
    let p2 = index.pointer_to(int2);
    let pb = index.pointer_to(p2);
    assert_eq!(pa, pb);
}

#[test]
fn structs_are_never_deduplicated() {
    let interner = StringInterner::new();
    let name = interner.intern("node");
    let mut index = TypeIndex::new();
    let a = index.create_structure(name);
    let b = index.create_structure(name);
    assert_ne!(a, b);
    assert_eq!(index.struct_name(a), index.struct_name(b));
}

#[test]
fn functions_are_never_deduplicated() {
    let mut index = TypeIndex::new();
    let a = index.create_function(TypeId::VOID);
    let b = index.create_function(TypeId::VOID);
    assert_ne!(a, b);
}

#[test]
fn fields_append_in_order() {
    let interner = StringInterner::new();
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    let byte = index.integer(false, 8);
    let pair = index.create_structure(interner.intern("pair"));
    index.append_field(pair, int);
    index.append_field(pair, byte);
    assert_eq!(index.fields(pair), &[int, byte]);
}

#[test]
fn parameters_append_in_order() {
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    let ptr = index.pointer_to(int);
    let func = index.create_function(int);
    index.append_parameter(func, ptr);
    index.append_parameter(func, int);
    assert_eq!(index.return_type(func), int);
    assert_eq!(index.parameters(func), &[ptr, int]);
}

#[test]
#[should_panic(expected = "non-struct")]
fn append_field_on_non_struct_is_fatal() {
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    index.append_field(int, int);
}

#[test]
#[should_panic(expected = "non-function")]
fn append_parameter_on_non_function_is_fatal() {
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    index.append_parameter(int, int);
}

#[test]
#[should_panic(expected = "valid")]
fn kind_of_invalid_id_is_fatal() {
    let index = TypeIndex::new();
    index.kind(TypeId::INVALID);
}

#[test]
fn render_spellings() {
    let interner = StringInterner::new();
    let mut index = TypeIndex::new();
    let int = index.integer(true, 32);
    let byte = index.integer(false, 8);
    let ptr = index.pointer_to(int);
    let buf = index.array_of(byte, 16);
    let node = index.create_structure(interner.intern("node"));
    let func = index.create_function(TypeId::VOID);
    index.append_parameter(func, int);
    index.append_parameter(func, ptr);

    assert_eq!(index.render(TypeId::VOID, &interner), "void");
    assert_eq!(index.render(int, &interner), "i32");
    assert_eq!(index.render(byte, &interner), "u8");
    assert_eq!(index.render(ptr, &interner), "i32*");
    assert_eq!(index.render(buf, &interner), "u8[16]");
    assert_eq!(index.render(node, &interner), "struct node");
    assert_eq!(index.render(func, &interner), "void (i32, i32*)");
}
