mod selector;
mod value;

pub use selector::Selector;
pub use value::{Kind, Value};

#[cfg(test)]
mod tests {
    use super::*;

    // ── Value kinds ────────────────────────────────────────────────

    #[test]
    fn kind_of_values() {
        assert_eq!(Value::from_i64(7).kind(), Kind::Integer);
        assert_eq!(Value::from_text("foo").kind(), Kind::Text);
    }

    #[test]
    fn values_compare_by_payload() {
        assert_eq!(Value::from_i64(3), Value::from_i64(3));
        assert_ne!(Value::from_i64(3), Value::from_i64(4));
        assert_eq!(Value::from_text("a"), Value::from_text("a"));
        assert_ne!(Value::from_text("a"), Value::from_i64(0));
    }

    // ── Rendering ──────────────────────────────────────────────────

    #[test]
    fn integers_render_base_10() {
        assert_eq!(Value::from_i64(7).to_string(), "7");
        assert_eq!(Value::from_i64(-42).to_string(), "-42");
        assert_eq!(Value::from_i64(i64::MIN).to_string(), i64::MIN.to_string());
    }

    #[test]
    fn text_renders_unquoted() {
        assert_eq!(Value::from_text("foobar").to_string(), "foobar");
        assert_eq!(Value::from_text("").to_string(), "");
    }

    // ── Table indices ──────────────────────────────────────────────

    #[test]
    fn kind_indices_are_dense() {
        assert!(Kind::Integer.index() < Kind::COUNT);
        assert!(Kind::Text.index() < Kind::COUNT);
        assert_ne!(Kind::Integer.index(), Kind::Text.index());
    }

    #[test]
    fn selector_indices_are_dense() {
        assert!(Selector::Add.index() < Selector::COUNT);
        assert!(Selector::Print.index() < Selector::COUNT);
        assert_ne!(Selector::Add.index(), Selector::Print.index());
    }
}
