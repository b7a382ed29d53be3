use std::borrow::Cow;

pub(crate) fn escape_text(value: &str) -> Cow<'_, str> {
    escape(value, |c| matches!(c, '&' | '<' | '>'))
}

pub(crate) fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, |c| matches!(c, '&' | '<' | '"'))
}

fn escape(value: &str, needs_escape: impl Fn(char) -> bool) -> Cow<'_, str> {
    if !value.chars().any(&needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if needs_escape(c) {
            escaped.push_str(match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                _ => "&quot;",
            });
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}
