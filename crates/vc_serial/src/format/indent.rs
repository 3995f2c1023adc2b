use alloc::string::String;

const INDENT: &str = "  ";

/// Pretty-prints compact JSON: one member or element per line, two spaces
/// per level. Text inside strings is left alone and empty containers stay
/// on one line.
///
/// ```
/// use vc_serial::indent_json;
///
/// let pretty = indent_json(r#"{"a":[1,2],"b":{},"c":"x,{y}"}"#);
/// assert_eq!(pretty, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {},\n  \"c\": \"x,{y}\"\n}");
/// ```
pub fn indent_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len() * 2);
    let mut level = 0_usize;
    let mut chars = json.chars().peekable();

    let newline = |out: &mut String, level: usize| {
        out.push('\n');
        for _ in 0..level {
            out.push_str(INDENT);
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                let mut escaped = false;
                for c in chars.by_ref() {
                    out.push(c);
                    match c {
                        '\\' if !escaped => escaped = true,
                        '"' if !escaped => break,
                        _ => escaped = false,
                    }
                }
            }
            '{' | '[' => {
                out.push(c);
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                let close = if c == '{' { '}' } else { ']' };
                if chars.next_if_eq(&close).is_some() {
                    out.push(close);
                } else {
                    level += 1;
                    newline(&mut out, level);
                }
            }
            '}' | ']' => {
                level = level.saturating_sub(1);
                newline(&mut out, level);
                out.push(c);
            }
            ',' => {
                out.push(',');
                newline(&mut out, level);
            }
            ':' => out.push_str(": "),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::indent_json;

    #[test]
    fn indented_text_is_the_same_json() {
        let compact = r#"{"list":[{"a":1},{"b":[true,null]}],"text":"a \"quoted\": [x]","empty":[]}"#;
        let pretty = indent_json(compact);
        let left: serde_json::Value = serde_json::from_str(compact).unwrap();
        let right: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(left, right);
        assert!(pretty.contains("\n    {\n      \"a\": 1\n    },"));
        assert!(pretty.contains("\"empty\": []"));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(indent_json("42"), "42");
        assert_eq!(indent_json("\"a,b\""), "\"a,b\"");
    }
}
