use super::*;

#[test]
fn expr_id_valid() {
    let id = ExprId::new(42);
    assert!(id.is_valid());
    assert_eq!(id.index(), 42);
    assert_eq!(id.raw(), 42);
}

#[test]
fn expr_id_invalid() {
    assert!(!ExprId::INVALID.is_valid());
    assert!(!ExprId::default().is_valid());
}

#[test]
fn stmt_id_roundtrip() {
    let id = StmtId::new(7);
    assert!(id.is_valid());
    assert_eq!(id.index(), 7);
    assert!(!StmtId::INVALID.is_valid());
}

#[test]
fn type_id_void_is_index_zero() {
    assert!(TypeId::VOID.is_valid());
    assert_eq!(TypeId::VOID.index(), 0);
    assert!(!TypeId::INVALID.is_valid());
}

#[test]
fn use_range_indices() {
    let range = UseRange::new(10, 5);
    assert!(!range.is_empty());
    assert_eq!(range.len(), 5);
    let indices: Vec<_> = range.indices().collect();
    assert_eq!(indices, vec![10, 11, 12, 13, 14]);
}

#[test]
fn use_range_empty() {
    assert!(UseRange::EMPTY.is_empty());
    assert!(UseRange::default().is_empty());
    assert_eq!(UseRange::EMPTY.indices().count(), 0);
}

#[test]
fn stmt_range_empty() {
    assert!(StmtRange::EMPTY.is_empty());
    assert!(StmtRange::default().is_empty());
    assert_eq!(StmtRange::new(3, 2).len(), 2);
}

#[test]
fn expr_id_hash() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(ExprId::new(1));
    set.insert(ExprId::new(1)); // duplicate
    set.insert(ExprId::new(2));
    assert_eq!(set.len(), 2);
}

#[test]
fn debug_formats_distinguish_invalid() {
    assert_eq!(format!("{:?}", ExprId::new(3)), "ExprId(3)");
    assert_eq!(format!("{:?}", ExprId::INVALID), "ExprId::INVALID");
    assert_eq!(format!("{:?}", TypeId::VOID), "TypeId(0)");
}

#[test]
fn memory_size() {
    // Ids are bare u32s; ranges align to 8 bytes (u32 + u16 + padding).
    assert_eq!(std::mem::size_of::<ExprId>(), 4);
    assert_eq!(std::mem::size_of::<StmtId>(), 4);
    assert_eq!(std::mem::size_of::<TypeId>(), 4);
    assert_eq!(std::mem::size_of::<UseRange>(), 8);
    assert_eq!(std::mem::size_of::<StmtRange>(), 8);
}
