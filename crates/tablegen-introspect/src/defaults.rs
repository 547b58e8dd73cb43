//! Default-value cleanup shared by the adapters.

/// Normalize a raw engine default expression.
///
/// Strips enclosing parentheses one layer at a time, treats sequence
/// advances (`nextval(...)::regclass` and friends) as "no explicit
/// default", and peels trailing `::type` cast suffixes until none
/// remains. Returns the empty string when no usable default is left.
pub fn clean_default_value(raw: &str) -> String {
    let mut value = raw.trim().to_string();

    loop {
        let stripped = strip_enclosing_parens(&value);
        if stripped == value {
            break;
        }
        value = stripped;
    }

    if is_sequence_default(&value) {
        return String::new();
    }

    loop {
        let stripped = strip_cast_suffix(&value);
        if stripped == value {
            break;
        }
        value = stripped;
    }

    strip_quotes(&value)
}

fn strip_enclosing_parens(value: &str) -> String {
    let trimmed = value.trim();
    if !(trimmed.starts_with('(') && trimmed.ends_with(')')) {
        return trimmed.to_string();
    }
    // only strip when the parens actually enclose the whole expression
    let mut depth = 0_i32;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && idx != trimmed.len() - 1 {
                    return trimmed.to_string();
                }
            }
            _ => {}
        }
    }
    trimmed[1..trimmed.len() - 1].trim().to_string()
}

fn is_sequence_default(value: &str) -> bool {
    value.starts_with("nextval(") && value.contains("::")
}

fn strip_cast_suffix(value: &str) -> String {
    match value.rfind("::") {
        Some(pos) => {
            let suffix = &value[pos + 2..];
            let is_typename = !suffix.is_empty()
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_');
            if is_typename {
                value[..pos].trim_end().to_string()
            } else {
                value.to_string()
            }
        }
        None => value.to_string(),
    }
}

fn strip_quotes(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_parens_and_casts() {
        assert_eq!(clean_default_value("('active'::character varying)"), "active");
        assert_eq!(clean_default_value("'pending'::text"), "pending");
        assert_eq!(clean_default_value("0"), "0");
    }

    #[test]
    fn sequence_advance_means_no_default() {
        assert_eq!(clean_default_value("nextval('seq'::regclass)"), "");
        assert_eq!(clean_default_value("(nextval('users_id_seq'::regclass))"), "");
    }

    #[test]
    fn strips_nested_casts_recursively() {
        assert_eq!(clean_default_value("'x'::character varying::text"), "x");
    }

    #[test]
    fn keeps_non_enclosing_parens() {
        assert_eq!(clean_default_value("now()"), "now()");
        assert_eq!(clean_default_value("(a) + (b)"), "(a) + (b)");
    }
}
