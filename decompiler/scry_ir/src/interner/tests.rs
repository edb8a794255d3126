use super::*;

#[test]
fn intern_and_lookup() {
    let interner = StringInterner::new();

    let eax = interner.intern("eax");
    let ebx = interner.intern("ebx");
    let eax2 = interner.intern("eax");

    assert_eq!(eax, eax2);
    assert_ne!(eax, ebx);

    assert_eq!(interner.lookup(eax), "eax");
    assert_eq!(interner.lookup(ebx), "ebx");
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    let empty = interner.intern("");
    assert_eq!(empty, Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn vocabulary_pre_interned() {
    let interner = StringInterner::new();
    let before = interner.len();

    // Interning vocabulary words must not grow the interner.
    for word in ["true", "false", "null", "__undefined", "break", "phi_in"] {
        let name = interner.intern(word);
        assert_eq!(interner.lookup(name), word);
    }
    assert_eq!(interner.len(), before);
}

#[test]
fn shared_handles_agree() {
    let interner = SharedInterner::new();
    let clone = interner.clone();

    let a = interner.intern("stack_slot");
    let b = clone.intern("stack_slot");

    assert_eq!(a, b);
}

#[test]
fn intern_owned_matches_borrowed() {
    let interner = StringInterner::new();

    let owned = interner.intern_owned(String::from("var0"));
    let borrowed = interner.intern("var0");
    assert_eq!(owned, borrowed);

    // Reverse order: borrowed first, then owned.
    let first = interner.intern("var1");
    let second = interner.intern_owned(String::from("var1"));
    assert_eq!(first, second);
}

#[test]
fn try_intern_succeeds() {
    let interner = StringInterner::new();
    let name = interner.try_intern("rsp");
    assert_eq!(name, Ok(interner.intern("rsp")));
}

#[test]
fn lookup_static_outlives_guard() {
    let interner = StringInterner::new();
    let name = interner.intern("label_1000");
    let s: &'static str = interner.lookup_static(name);
    assert_eq!(s, "label_1000");
}

#[test]
fn concurrent_interning_converges() {
    let interner = SharedInterner::new();
    let mut handles = Vec::new();

    for _ in 0..4 {
        let interner = interner.clone();
        handles.push(std::thread::spawn(move || {
            (0..64).map(|i| interner.intern_owned(format!("loc_{i}"))).collect::<Vec<_>>()
        }));
    }

    let mut results: Vec<Vec<Name>> = Vec::new();
    for handle in handles {
        match handle.join() {
            Ok(names) => results.push(names),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    // Every thread resolved each spelling to the same Name.
    for names in &results[1..] {
        assert_eq!(names, &results[0]);
    }
}

#[test]
fn len_counts_distinct_strings() {
    let interner = StringInterner::new();
    assert!(!interner.is_empty());

    let before = interner.len();
    interner.intern("completely_fresh_string");
    interner.intern("completely_fresh_string");
    assert_eq!(interner.len(), before + 1);
}
