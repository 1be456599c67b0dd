use rustymsg::{HttpHeaders, canonical_name};

#[test]
fn variants_share_one_entry() {
    let mut headers = HttpHeaders::new();
    headers.set("X-Custom", "a", false);
    headers.set("x custom", "b", true);
    headers.set("X_CUSTOM", "c", true);

    assert_eq!(
        headers.get("x-custom"),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );
    assert_eq!(headers.len(), 1);
}

#[test]
fn irregular_names_are_stored_canonically() {
    let mut headers = HttpHeaders::new();
    headers.set("etag", "\"abc\"", false);
    headers.set("www authenticate", "Basic", false);

    assert_eq!(headers.keys().collect::<Vec<_>>(), vec!["ETag", "WWW-Authenticate"]);
    assert_eq!(canonical_name("content type"), "Content-Type");
}

#[test]
fn remove_from_any_state() {
    let mut headers = HttpHeaders::new();
    headers.remove("Accept");
    assert!(!headers.has("accept"));

    headers.append("accept", "text/html");
    headers.append("Accept", "*/*");
    headers.remove("ACCEPT");
    assert!(!headers.has("Accept"));
    assert!(headers.is_empty());
}
