//! Attribute reflection over `Serialize`
//!
//! Walks a source's serialized shape without building the whole JSON value.
//! Only the requested field is converted with `serde_json::to_value`; every
//! other field is skipped unserialized, so a sibling that cannot become JSON
//! never hides the ones that can.

use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
use serde_json::{Map, Value};

use crate::error::LookupError;

/// Value of the attribute `name`, `None` if the source has no such attribute
pub(crate) fn attribute<S>(source: &S, name: &str) -> Result<Option<Value>, LookupError>
where
    S: Serialize + ?Sized,
{
    match source.serialize(Want::Field(name))? {
        Reflected::Field(value) => Ok(value),
        Reflected::Names(_) => Ok(None),
        Reflected::NotAnObject(found) => Err(LookupError::NotAnObject { found }),
    }
}

/// Every attribute name, in serialization order
pub(crate) fn attribute_names<S>(source: &S) -> Result<Vec<String>, LookupError>
where
    S: Serialize + ?Sized,
{
    match source.serialize(Want::Names)? {
        Reflected::Names(names) => Ok(names),
        Reflected::Field(_) => Ok(Vec::new()),
        Reflected::NotAnObject(found) => Err(LookupError::NotAnObject { found }),
    }
}

#[derive(Clone, Copy)]
enum Want<'n> {
    Field(&'n str),
    Names,
}

enum Reflected {
    Field(Option<Value>),
    Names(Vec<String>),
    NotAnObject(&'static str),
}

impl Want<'_> {
    fn nothing(self) -> Reflected {
        match self {
            Want::Field(_) => Reflected::Field(None),
            Want::Names => Reflected::Names(Vec::new()),
        }
    }
}

/// Serializing into a `Want` reflects on the value instead of encoding it
impl<'n> Serializer for Want<'n> {
    type Ok = Reflected;
    type Error = serde_json::Error;

    type SerializeSeq = NonObject;
    type SerializeTuple = NonObject;
    type SerializeTupleStruct = NonObject;
    type SerializeTupleVariant = Variant<'n>;
    type SerializeMap = Fields<'n>;
    type SerializeStruct = Fields<'n>;
    type SerializeStructVariant = Variant<'n>;

    fn serialize_bool(self, _: bool) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a boolean"))
    }

    fn serialize_i8(self, _: i8) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_i16(self, _: i16) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_i32(self, _: i32) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_i64(self, _: i64) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_i128(self, _: i128) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_u8(self, _: u8) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_u16(self, _: u16) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_u32(self, _: u32) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_u64(self, _: u64) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_u128(self, _: u128) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_f32(self, _: f32) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_f64(self, _: f64) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a number"))
    }

    fn serialize_char(self, _: char) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a string"))
    }

    fn serialize_str(self, _: &str) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a string"))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("an array"))
    }

    fn serialize_none(self) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("null"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Reflected, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("null"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("null"))
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("a string"))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Reflected, Self::Error> {
        value.serialize(self)
    }

    /// Externally tagged: `{"Variant": value}`
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Reflected, Self::Error> {
        Ok(match self {
            Want::Field(name) if name == variant => {
                Reflected::Field(Some(serde_json::to_value(value)?))
            }
            Want::Field(_) => Reflected::Field(None),
            Want::Names => Reflected::Names(vec![variant.to_string()]),
        })
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<NonObject, Self::Error> {
        Ok(NonObject)
    }

    fn serialize_tuple(self, _: usize) -> Result<NonObject, Self::Error> {
        Ok(NonObject)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<NonObject, Self::Error> {
        Ok(NonObject)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Variant<'n>, Self::Error> {
        Ok(Variant::new(self, variant))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Fields<'n>, Self::Error> {
        Ok(Fields::new(self))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Fields<'n>, Self::Error> {
        Ok(Fields::new(self))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Variant<'n>, Self::Error> {
        Ok(Variant::new(self, variant))
    }
}

// ─────────────────────────────────────────────────────────────
// Compound collectors
// ─────────────────────────────────────────────────────────────

/// Sequences have no attributes; elements are never serialized
struct NonObject;

impl SerializeSeq for NonObject {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("an array"))
    }
}

impl SerializeTuple for NonObject {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("an array"))
    }
}

impl SerializeTupleStruct for NonObject {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end(self) -> Result<Reflected, Self::Error> {
        Ok(Reflected::NotAnObject("an array"))
    }
}

/// Struct fields or map entries; only the wanted value is serialized
struct Fields<'n> {
    want: Want<'n>,
    key: Option<String>,
    found: Option<Value>,
    names: Vec<String>,
}

impl<'n> Fields<'n> {
    fn new(want: Want<'n>) -> Self {
        Self {
            want,
            key: None,
            found: None,
            names: Vec::new(),
        }
    }

    fn field<T>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error>
    where
        T: ?Sized + Serialize,
    {
        match self.want {
            Want::Field(name) if name == key => self.found = Some(serde_json::to_value(value)?),
            Want::Field(_) => {}
            Want::Names => self.names.push(key.to_string()),
        }
        Ok(())
    }

    fn finish(self) -> Reflected {
        match self.want {
            Want::Field(_) => Reflected::Field(self.found),
            Want::Names => Reflected::Names(self.names),
        }
    }
}

/// Map keys become attribute names the way `serde_json` turns them into
/// object keys: strings as-is, numbers and booleans stringified
fn map_key<K: ?Sized + Serialize>(key: &K) -> Result<String, serde_json::Error> {
    match serde_json::to_value(key)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ser::Error::custom("key must be a string")),
    }
}

impl SerializeMap for Fields<'_> {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.key = Some(map_key(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let Some(key) = self.key.take() else {
            return Err(ser::Error::custom("value without key"));
        };
        self.field(&key, value)
    }

    fn end(self) -> Result<Reflected, Self::Error> {
        Ok(self.finish())
    }
}

impl SerializeStruct for Fields<'_> {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.field(key, value)
    }

    fn end(self) -> Result<Reflected, Self::Error> {
        Ok(self.finish())
    }
}

/// Externally tagged tuple or struct variant: a single attribute named
/// after the variant, holding the body
struct Variant<'n> {
    want: Want<'n>,
    variant: &'static str,
    elements: Vec<Value>,
    fields: Map<String, Value>,
}

impl<'n> Variant<'n> {
    fn new(want: Want<'n>, variant: &'static str) -> Self {
        Self {
            want,
            variant,
            elements: Vec::new(),
            fields: Map::new(),
        }
    }

    fn captures(&self) -> bool {
        matches!(self.want, Want::Field(name) if name == self.variant)
    }

    fn finish(self, body: Value) -> Reflected {
        match self.want {
            Want::Field(name) if name == self.variant => Reflected::Field(Some(body)),
            Want::Names => Reflected::Names(vec![self.variant.to_string()]),
            want => want.nothing(),
        }
    }
}

impl SerializeTupleVariant for Variant<'_> {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        if self.captures() {
            self.elements.push(serde_json::to_value(value)?);
        }
        Ok(())
    }

    fn end(mut self) -> Result<Reflected, Self::Error> {
        let body = Value::Array(std::mem::take(&mut self.elements));
        Ok(self.finish(body))
    }
}

impl SerializeStructVariant for Variant<'_> {
    type Ok = Reflected;
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        if self.captures() {
            self.fields
                .insert(key.to_string(), serde_json::to_value(value)?);
        }
        Ok(())
    }

    fn end(mut self) -> Result<Reflected, Self::Error> {
        let body = Value::Object(std::mem::take(&mut self.fields));
        Ok(self.finish(body))
    }
}
