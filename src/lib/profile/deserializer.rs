// SPDX-License-Identifier: Apache-2.0

use std::marker::PhantomData;

use serde::{
    Deserializer, de,
    de::{SeqAccess, Visitor},
};

const EXPECTING_SCALAR: &str = "string, number or boolean";

struct ScalarVisitor(PhantomData<fn() -> Option<String>>);

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Option<String>;

    fn expecting(
        &self,
        formatter: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        formatter.write_str(EXPECTING_SCALAR)
    }

    fn visit_str<E>(self, value: &str) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(Some(if value { "yes" } else { "no" }.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_unit<E>(self) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Option<String>, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor(PhantomData))
    }
}

/// Profile values are typed loosely: `24`, `"24"`, `true` and `"yes"` are
/// all accepted and stored as string, validation happens when building the
/// connection so that a bad value becomes an issue instead of an error.
pub(crate) fn option_scalar<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor(PhantomData))
}

/// List of scalars, a single white space separated string is also
/// accepted.
pub(crate) fn scalar_list<'de, D>(
    deserializer: D,
) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ListVisitor(PhantomData<fn() -> Vec<String>>);

    impl<'de> Visitor<'de> for ListVisitor {
        type Value = Vec<String>;

        fn expecting(
            &self,
            formatter: &mut std::fmt::Formatter,
        ) -> std::fmt::Result {
            formatter.write_str("list or white space separated string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(value.split_whitespace().map(|s| s.to_string()).collect())
        }

        fn visit_unit<E>(self) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<String>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut ret = Vec::new();
            while let Some(item) = seq.next_element::<serde_json::Value>()? {
                match item {
                    serde_json::Value::String(s) => ret.push(s),
                    serde_json::Value::Number(n) => ret.push(n.to_string()),
                    serde_json::Value::Null => (),
                    v => {
                        return Err(de::Error::custom(format!(
                            "Expecting {EXPECTING_SCALAR} in list, got {v}"
                        )));
                    }
                }
            }
            Ok(ret)
        }
    }

    deserializer.deserialize_any(ListVisitor(PhantomData))
}
