use alloc::string::String;
use alloc::vec::Vec;

use vc_reflect::Reflect;
use vc_reflect::info::Typed;
use vc_utils::collections::OrderedMap;

use crate::Result;
use crate::config::Config;
use crate::format::json::{self, JsonReader};

/// A JSON object read one level deep.
///
/// Members are kept as raw JSON fragments in document order and only
/// parsed when asked for, so large payloads can be inspected cheaply.
///
/// ```
/// use vc_serial::JsonObject;
///
/// let obj = JsonObject::parse(r#"{"name":"a \"b\"","child":{"id":1},"items":[{"x":1},{"x":2}]}"#).unwrap();
/// assert_eq!(obj.get("name").as_deref(), Some("a \"b\""));
/// assert_eq!(obj.raw("child"), Some(r#"{"id":1}"#));
/// assert_eq!(obj.object("child").unwrap().unwrap().get("id").as_deref(), Some("1"));
/// assert_eq!(obj.array_objects("items").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    members: OrderedMap<String, String>,
}

impl JsonObject {
    /// Scans the members of a JSON object.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = JsonReader::new(text);
        let mut members = OrderedMap::new();
        reader.expect(b'{')?;
        if !reader.eat(b'}') {
            loop {
                reader.skip_whitespace();
                let key = reader.read_string()?;
                reader.expect(b':')?;
                let raw = reader.skip_value()?;
                members.insert(key, raw.into());
                if reader.eat(b',') {
                    continue;
                }
                reader.expect(b'}')?;
                break;
            }
        }
        reader.expect_end()?;
        Ok(Self { members })
    }

    /// The member as text: strings are unescaped, other values are returned
    /// as written. Missing members and `null` are `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.raw(key).and_then(|raw| json::fragment_text(raw).ok().flatten())
    }

    /// The member's raw JSON fragment.
    #[inline]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.members.get(key).map(String::as_str)
    }

    /// Parses the member as a nested object.
    pub fn object(&self, key: &str) -> Result<Option<JsonObject>> {
        match self.raw(key) {
            None | Some("null") => Ok(None),
            Some(raw) => Self::parse(raw).map(Some),
        }
    }

    /// Parses the member as an array of objects; a missing member is empty.
    pub fn array_objects(&self, key: &str) -> Result<Vec<JsonObject>> {
        let Some(raw) = self.raw(key).filter(|raw| *raw != "null") else {
            return Ok(Vec::new());
        };
        let mut reader = JsonReader::new(raw);
        let mut items = Vec::new();
        reader.expect(b'[')?;
        if reader.eat(b']') {
            return Ok(items);
        }
        loop {
            let fragment = reader.skip_value()?;
            items.push(Self::parse(fragment)?);
            if reader.eat(b',') {
                continue;
            }
            reader.expect(b']')?;
            return Ok(items);
        }
    }

    /// Deserializes the member into `T` with the current config.
    pub fn get_as<T: Typed + Reflect>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };
        let value = json::parse(raw)?;
        crate::de::from_value_as::<T>(&value, &Config::current()).map(Some)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Members as `(key, raw fragment)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::JsonObject;
    use crate::config::tests::lock_global;

    #[test]
    fn keeps_document_order_and_raw_text() {
        let obj = JsonObject::parse(r#" { "b" : 2.50 , "a" : "A" , "n" : null , "t" : true } "#).unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["b", "a", "n", "t"]);
        assert_eq!(obj.raw("b"), Some("2.50"));
        assert_eq!(obj.get("a").as_deref(), Some("A"));
        assert_eq!(obj.get("n"), None);
        assert_eq!(obj.get("t").as_deref(), Some("true"));
        assert!(obj.object("n").unwrap().is_none());
    }

    #[test]
    fn typed_members() {
        let _guard = lock_global();
        let obj = JsonObject::parse(r#"{"ids":[1,2,3],"missing":null}"#).unwrap();
        assert_eq!(obj.get_as::<Vec<i32>>("ids").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(obj.get_as::<Option<i32>>("missing").unwrap(), Some(None));
        assert_eq!(obj.get_as::<i32>("absent").unwrap(), None);
        assert!(obj.get_as::<i32>("ids").is_err());
    }

    #[test]
    fn rejects_non_objects() {
        assert!(JsonObject::parse("[1]").is_err());
        assert!(JsonObject::parse(r#"{"a":1"#).is_err());
        assert!(JsonObject::parse(r#"{"a":[1}"#).is_err());
    }
}
