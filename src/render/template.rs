//! Placeholder substitution for the embedded page template.

use anyhow::{Result, anyhow, bail};

/// Replaces every `{{ name }}` in `template` with its value from `vars`.
///
/// Substitution is a single left-to-right pass, so placeholder-like text
/// inside a value is written out verbatim.
///
/// # Errors
///
/// Fails on a placeholder with no value in `vars` or an unterminated `{{`.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            bail!("unterminated placeholder at byte {}", template.len() - rest.len() + start);
        };

        let name = after[..end].trim();
        let value = vars
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| anyhow!("no value for placeholder '{name}'"))?;
        out.push_str(value);

        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Escapes text for use inside HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes `value` as JSON that can sit inside a `<script>` element.
pub fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_placeholders() {
        let out = render_template("a {{ x }} b {{y}}", &[("x", "1"), ("y", "2")]).unwrap();
        assert_eq!(out, "a 1 b 2");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = render_template("{{ x }}|{{ y }}", &[("x", "{{ y }}"), ("y", "2")]).unwrap();
        assert_eq!(out, "{{ y }}|2");
    }

    #[test]
    fn test_unknown_placeholder_is_an_error() {
        assert!(render_template("{{ missing }}", &[]).is_err());
    }

    #[test]
    fn test_unterminated_placeholder_is_an_error() {
        assert!(render_template("before {{ x", &[("x", "1")]).is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let out = script_json(&["</script><script>alert(1)"]).unwrap();
        assert!(!out.contains("</script>"));
        assert_eq!(out, r#"["<\/script><script>alert(1)"]"#);
    }
}
