use todopad_core::{generate_storage_key, StorageKeyError};

#[test]
fn replaces_inner_whitespace_with_hyphen() {
    assert_eq!(
        generate_storage_key("Tanaka Yu").unwrap().as_str(),
        "Tanaka-Yu-todos"
    );
    assert_eq!(
        generate_storage_key("  Tanaka   Yu  ").unwrap().as_str(),
        "Tanaka-Yu-todos"
    );
}

#[test]
fn is_deterministic() {
    let first = generate_storage_key("佐藤 花子").unwrap();
    let second = generate_storage_key("佐藤 花子").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), "佐藤-花子-todos");
}

#[test]
fn rejects_blank_name() {
    assert_eq!(generate_storage_key(""), Err(StorageKeyError::EmptyName));
    assert_eq!(generate_storage_key("   "), Err(StorageKeyError::EmptyName));
}

#[test]
fn normalized_names_can_collide() {
    // Known ambiguity: no disambiguation between these two users.
    assert_eq!(
        generate_storage_key("A B").unwrap(),
        generate_storage_key("A-B").unwrap()
    );
}
