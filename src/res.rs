use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// The one page shown for every link that cannot be resolved.
pub fn sorry() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html")),
    )
        .into_response()
}

/// Substitutes `{key}` placeholders in one pass over `template`.
///
/// Inserted values are never scanned again, and braces that do not name a
/// known key (CSS rules, say) are copied through untouched.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let value = tail.find('}').and_then(|close| {
            let key = &tail[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// User-written text as an escaped `<p>`; line breaks survive through the
/// `.text` class's `white-space: pre-wrap`.
pub fn text_block(text: &str) -> String {
    format!("<p class=\"text\">{}</p>", escape_html(text))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_never_markup() {
        let html = text_block("[open](javascript:alert(document.domain))\n<script>x</script>");
        assert_eq!(
            html,
            "<p class=\"text\">[open](javascript:alert(document.domain))\n&lt;script&gt;x&lt;/script&gt;</p>"
        );
        assert!(!html.contains("<a"));
    }

    #[test]
    fn fill_is_single_pass() {
        let html = fill("{giver} gives to {receiver}", &[("giver", "{receiver}"), ("receiver", "Bob")]);
        assert_eq!(html, "{receiver} gives to Bob");
    }

    #[test]
    fn fill_keeps_unknown_braces() {
        let css = "p { color: red } {name} {";
        assert_eq!(fill(css, &[("name", "Ann")]), "p { color: red } Ann {");
    }

    #[test]
    fn escapes_names() {
        assert_eq!(escape_html(r#"<Bo"b> & 'co'"#), "&lt;Bo&quot;b&gt; &amp; &#39;co&#39;");
    }
}
