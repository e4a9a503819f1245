//! HTML helper functions

/// Entities decoded in passthrough HTML, in application order.
///
/// `&amp;` must stay last: decoding it first would turn `&amp;lt;` into `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&#x3C;", "<"),
    ("&#x3E;", ">"),
    ("&amp;", "&"),
];

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decode the entities a markdown engine emits for escaped HTML
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut result = s.to_string();
    for (entity, replacement) in ENTITIES {
        result = result.replace(entity, replacement);
    }
    result
}
