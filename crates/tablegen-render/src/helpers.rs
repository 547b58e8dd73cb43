//! Helper functions bound to every template execution.

use handlebars::{Handlebars, handlebars_helper};
use inflector::Inflector;
use serde_json::Value;

handlebars_helper!(pluralize: |s: String| s.to_plural());
handlebars_helper!(singularize: |s: String| s.to_singular());
handlebars_helper!(upper: |s: String| s.to_uppercase());
handlebars_helper!(lower: |s: String| s.to_lowercase());
handlebars_helper!(title: |s: String| s.to_title_case());
handlebars_helper!(snake: |s: String| s.to_snake_case());
handlebars_helper!(lower_camel: |s: String| s.to_camel_case());
handlebars_helper!(json: |v: Json, {indent: u64 = 0}| stringify(v, indent as usize));

/// JSON stringification with a configurable indent width.
fn stringify(value: &Value, indent: usize) -> String {
    if indent == 0 {
        return value.to_string();
    }
    let pad = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&pad);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    if serde::Serialize::serialize(value, &mut serializer).is_err() {
        return value.to_string();
    }
    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

/// Register the fixed helper set shared by all templates.
pub(crate) fn register(hb: &mut Handlebars<'static>) {
    hb.register_helper("pluralize", Box::new(pluralize));
    hb.register_helper("singularize", Box::new(singularize));
    hb.register_helper("upper", Box::new(upper));
    hb.register_helper("lower", Box::new(lower));
    hb.register_helper("title", Box::new(title));
    hb.register_helper("snake", Box::new(snake));
    hb.register_helper("lowerCamel", Box::new(lower_camel));
    hb.register_helper("json", Box::new(json));
}

#[cfg(test)]
mod tests {
    use handlebars::Handlebars;
    use serde_json::json;

    fn render(template: &str, ctx: serde_json::Value) -> String {
        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        super::register(&mut hb);
        hb.render_template(template, &ctx).expect("render")
    }

    #[test]
    fn inflection_helpers() {
        assert_eq!(render("{{pluralize name}}", json!({"name": "order"})), "orders");
        assert_eq!(render("{{singularize name}}", json!({"name": "addresses"})), "address");
    }

    #[test]
    fn case_helpers() {
        let ctx = json!({"name": "user_profile"});
        assert_eq!(render("{{upper name}}", ctx.clone()), "USER_PROFILE");
        assert_eq!(render("{{title name}}", ctx.clone()), "User Profile");
        assert_eq!(render("{{lowerCamel name}}", ctx.clone()), "userProfile");
        assert_eq!(render("{{snake name}}", json!({"name": "UserProfile"})), "user_profile");
    }

    #[test]
    fn json_helper_honors_indent() {
        let ctx = json!({"v": {"a": 1}});
        assert_eq!(render("{{json v}}", ctx.clone()), r#"{"a":1}"#);
        assert_eq!(render("{{json v indent=2}}", ctx), "{\n  \"a\": 1\n}");
    }
}
