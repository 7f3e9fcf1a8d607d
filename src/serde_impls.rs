//! Optional `serde` support: a table is a sequence of `(Option<K>, V)` pairs.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt::{self, Formatter};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::{HashTable, Key};

// Tables serialize as a sequence of `(Option<K>, V)` pairs so the null key
// survives formats whose map keys must be strings.
impl<K, V, S> Serialize for HashTable<K, V, S>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (key, value) in self.iter() {
            seq.serialize_element(&(key.value(), value))?;
        }
        seq.end()
    }
}

struct TableVisitor<K, V, S> {
    _marker: PhantomData<HashTable<K, V, S>>,
}

impl<'de, K, V, S> Deserialize<'de> for HashTable<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: Default + BuildHasher,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(TableVisitor {
            _marker: PhantomData,
        })
    }
}

impl<'de, K, V, S> Visitor<'de> for TableVisitor<K, V, S>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    S: Default + BuildHasher,
{
    type Value = HashTable<K, V, S>;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of (key, value) pairs")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut table = HashTable::with_hasher(S::default());
        while let Some((key, value)) = access.next_element::<(Option<K>, V)>()? {
            table.put(Key::from_option(key), value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use crate::{HashTable, Key};

    #[test]
    fn round_trip_keeps_null_key() {
        let mut t: HashTable<String, u32> = HashTable::new();
        t.put("one".to_string(), 1);
        t.put(Key::Null, 0);
        for i in 2..20 {
            t.put(format!("n{i}"), i);
        }

        let json = serde_json::to_string(&t).unwrap();
        let back: HashTable<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), t.len());
        assert_eq!(back.get_null(), Some(&0));
        for (k, v) in t.iter() {
            assert_eq!(back.lookup(k.as_ref()), Some(v));
        }
    }

    #[test]
    fn later_pairs_overwrite() {
        let back: HashTable<String, u32> =
            serde_json::from_str(r#"[["a",1],[null,2],["a",3]]"#).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get("a"), Some(&3));
        assert_eq!(back.get_null(), Some(&2));
    }
}
