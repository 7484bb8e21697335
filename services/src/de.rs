use serde::Deserialize;
use serde_json::Value;

/// Last.fm wraps most text in `{"#text": ...}`; the extended format uses `name` instead.
const TEXT_KEYS: &[&str] = &["#text", "name"];


/// Accepts a plain string or a Last.fm text object. Empty strings are treated as absent.
pub fn text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Value>::deserialize(de).map(|v| v.and_then(value_text))
}

/// Unix seconds from a string or number. Unusable values become `None` instead of failing the record.
pub fn unix_timestamp<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Value>::deserialize(de).map(|v| v.as_ref().and_then(value_timestamp))
}

/// Last.fm flags are usually the string `"true"`, but accept real booleans and numbers as well
pub fn truthy<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Value>::deserialize(de).map(|v| v.as_ref().map_or(false, value_truthy))
}


fn value_text(val: Value) -> Option<String> {
    let text = match val {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Object(mut m) => TEXT_KEYS.iter().find_map(|k| m.remove(*k).and_then(value_text)),
        other => Some(other.to_string()),
    };
    text.filter(|s| !s.is_empty())
}

fn value_timestamp(val: &Value) -> Option<i64> {
    match val {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64().or_else(|| {
            // i64::MAX rounds up to 2^63 as an f64, so that bound is exclusive
            n.as_f64()
                .filter(|&f| f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    }
}

fn value_truthy(val: &Value) -> bool {
    match val {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true") || s.trim() == "1",
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_shapes() {
        assert_eq!(value_text(json!("Artist A")), Some("Artist A".to_owned()));
        assert_eq!(value_text(json!({"#text": "Artist A", "mbid": ""})), Some("Artist A".to_owned()));
        assert_eq!(value_text(json!({"name": "Artist A", "url": "https://www.last.fm/music/Artist+A"})), Some("Artist A".to_owned()));
        assert_eq!(value_text(json!({"#text": "Preferred", "name": "Fallback"})), Some("Preferred".to_owned()));
        assert_eq!(value_text(json!({"mbid": "", "#text": ""})), None);
        assert_eq!(value_text(json!({"mbid": ""})), None);
        assert_eq!(value_text(json!({"#text": "", "name": "Fallback"})), Some("Fallback".to_owned()));
        assert_eq!(value_text(json!(1999)), Some("1999".to_owned()));
        assert_eq!(value_text(json!({"#text": 1999})), Some("1999".to_owned()));
        assert_eq!(value_text(Value::Null), None);
    }

    #[test]
    fn test_timestamp_coercion() {
        assert_eq!(value_timestamp(&json!("1000")), Some(1000));
        assert_eq!(value_timestamp(&json!(" 1669318360 ")), Some(1_669_318_360));
        assert_eq!(value_timestamp(&json!(1000)), Some(1000));
        assert_eq!(value_timestamp(&json!(1000.9)), Some(1000));
        assert_eq!(value_timestamp(&json!("-5")), Some(-5));
        assert_eq!(value_timestamp(&json!("10 Jul 2018, 06:58")), None);
        assert_eq!(value_timestamp(&json!("")), None);
        assert_eq!(value_timestamp(&json!(true)), None);
        assert_eq!(value_timestamp(&json!(u64::MAX)), None);
        assert_eq!(value_timestamp(&json!(1e30)), None);
        assert_eq!(value_timestamp(&json!(-1e30)), None);
        assert_eq!(value_timestamp(&json!("18446744073709551615")), None);
        assert_eq!(value_timestamp(&json!(-1000.9)), Some(-1000));
        assert_eq!(value_timestamp(&json!({"uts": "1000"})), None);
        assert_eq!(value_timestamp(&Value::Null), None);
    }

    #[test]
    fn test_truthy() {
        assert!(value_truthy(&json!("true")));
        assert!(value_truthy(&json!("TRUE")));
        assert!(value_truthy(&json!("1")));
        assert!(value_truthy(&json!(true)));
        assert!(value_truthy(&json!(1)));
        assert!(!value_truthy(&json!("false")));
        assert!(!value_truthy(&json!("")));
        assert!(!value_truthy(&json!(false)));
        assert!(!value_truthy(&json!(0)));
        assert!(!value_truthy(&Value::Null));
    }
}
