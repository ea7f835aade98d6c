use serde::{Deserialize, Deserializer};

/// Row ids arrive either as integers (serial keys) or strings (uuid keys).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Deserialize a required id column into a `String`
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Deserialize a nullable foreign key into `Option<String>`
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}

/// Treat an explicit `null` column like a missing one
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// URL slug: lowercase ascii alphanumerics separated by single dashes.
///
/// Non-ascii letters (e.g. Arabic product names) are kept as-is so the slug
/// still identifies the product.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        staff_id: Option<String>,
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let row: Row = serde_json::from_str(r#"{"id": 42, "staff_id": "abc"}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.staff_id.as_deref(), Some("abc"));

        let row: Row = serde_json::from_str(r#"{"id": "f00", "staff_id": null}"#).unwrap();
        assert_eq!(row.id, "f00");
        assert!(row.staff_id.is_none());

        let row: Row = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert!(row.staff_id.is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hair Care"), "hair-care");
        assert_eq!(slugify("  Matte  Pomade (100ml) "), "matte-pomade-100ml");
        assert_eq!(slugify("--"), "");
        assert_eq!(slugify("Beard & Shave"), "beard-shave");
    }
}
