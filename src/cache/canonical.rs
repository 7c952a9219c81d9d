//! Canonical byte encoding for cache keys
//!
//! A tagged, self-delimiting encoding driven by serde. Two keys that are
//! structurally equal produce the same bytes:
//!
//! - every integer width encodes as the same tagged `i128`
//! - `None`, `Some(x)` and `()` keep distinct tags
//! - map entries (and struct fields) are sorted by their encoded bytes,
//!   so `HashMap` keys hash independently of iteration order
//! - map keys may be any serializable value
//!
//! Sequences keep their order. A `HashSet` serializes as a sequence, so
//! set-shaped keys must be collected into a `BTreeSet` first.

use serde::ser::{self, Serialize};
use std::fmt::Display;
use thiserror::Error;

const END: u8 = 0x00;
const BOOL: u8 = 0x01;
const INT: u8 = 0x02;
const BIG_UINT: u8 = 0x03;
const FLOAT: u8 = 0x04;
const CHAR: u8 = 0x05;
const STR: u8 = 0x06;
const BYTES: u8 = 0x07;
const NONE: u8 = 0x08;
const SOME: u8 = 0x09;
const UNIT: u8 = 0x0A;
const VARIANT: u8 = 0x0B;
const SEQ: u8 = 0x0C;
const MAP: u8 = 0x0D;

/// Raised only when a key's `Serialize` impl reports an error itself
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EncodeError(String);

impl ser::Error for EncodeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Encode `value` canonically
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::default();
    value.serialize(&mut encoder)?;
    Ok(encoder.out)
}

#[derive(Default)]
struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    fn tag(&mut self, tag: u8) {
        self.out.push(tag);
    }

    fn int(&mut self, v: i128) {
        self.tag(INT);
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn len_prefixed(&mut self, bytes: &[u8]) {
        self.out
            .extend_from_slice(&(bytes.len() as u64).to_le_bytes());
        self.out.extend_from_slice(bytes);
    }

    fn variant(&mut self, name: &str) {
        self.tag(VARIANT);
        self.len_prefixed(name.as_bytes());
    }
}

type Done = Result<(), EncodeError>;

impl<'a> ser::Serializer for &'a mut Encoder {
    type Ok = ();
    type Error = EncodeError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = MapEncoder<'a>;
    type SerializeStruct = MapEncoder<'a>;
    type SerializeStructVariant = MapEncoder<'a>;

    fn serialize_bool(self, v: bool) -> Done {
        self.tag(BOOL);
        self.out.push(u8::from(v));
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_i16(self, v: i16) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_i32(self, v: i32) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_i64(self, v: i64) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_i128(self, v: i128) -> Done {
        self.int(v);
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_u16(self, v: u16) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_u32(self, v: u32) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_u64(self, v: u64) -> Done {
        self.int(v.into());
        Ok(())
    }

    fn serialize_u128(self, v: u128) -> Done {
        match i128::try_from(v) {
            Ok(v) => self.int(v),
            Err(_) => {
                self.tag(BIG_UINT);
                self.out.extend_from_slice(&v.to_le_bytes());
            }
        }
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Done {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Done {
        self.tag(FLOAT);
        self.out.extend_from_slice(&v.to_bits().to_le_bytes());
        Ok(())
    }

    fn serialize_char(self, v: char) -> Done {
        self.tag(CHAR);
        self.out.extend_from_slice(&u32::from(v).to_le_bytes());
        Ok(())
    }

    fn serialize_str(self, v: &str) -> Done {
        self.tag(STR);
        self.len_prefixed(v.as_bytes());
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Done {
        self.tag(BYTES);
        self.len_prefixed(v);
        Ok(())
    }

    fn serialize_none(self) -> Done {
        self.tag(NONE);
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Done {
        self.tag(SOME);
        value.serialize(self)
    }

    fn serialize_unit(self) -> Done {
        self.tag(UNIT);
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Done {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Done {
        self.variant(variant);
        self.serialize_unit()
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Done {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Done {
        self.variant(variant);
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, EncodeError> {
        self.tag(SEQ);
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, EncodeError> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self, EncodeError> {
        self.serialize_seq(None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self, EncodeError> {
        self.variant(variant);
        self.serialize_seq(None)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapEncoder<'a>, EncodeError> {
        Ok(MapEncoder::new(self))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<MapEncoder<'a>, EncodeError> {
        Ok(MapEncoder::new(self))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapEncoder<'a>, EncodeError> {
        self.variant(variant);
        Ok(MapEncoder::new(self))
    }
}

impl ser::SerializeSeq for &mut Encoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Done {
        value.serialize(&mut **self)
    }

    fn end(self) -> Done {
        self.tag(END);
        Ok(())
    }
}

impl ser::SerializeTuple for &mut Encoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Done {
        value.serialize(&mut **self)
    }

    fn end(self) -> Done {
        self.tag(END);
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut Encoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Done {
        value.serialize(&mut **self)
    }

    fn end(self) -> Done {
        self.tag(END);
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut Encoder {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Done {
        value.serialize(&mut **self)
    }

    fn end(self) -> Done {
        self.tag(END);
        Ok(())
    }
}

/// Buffers each entry so they can be written in sorted order
struct MapEncoder<'a> {
    parent: &'a mut Encoder,
    entries: Vec<Vec<u8>>,
    pending_key: Option<Vec<u8>>,
}

impl<'a> MapEncoder<'a> {
    fn new(parent: &'a mut Encoder) -> Self {
        Self {
            parent,
            entries: Vec::new(),
            pending_key: None,
        }
    }

    fn push<K, V>(&mut self, key: &K, value: &V) -> Done
    where
        K: ?Sized + Serialize,
        V: ?Sized + Serialize,
    {
        let mut entry = encode(key)?;
        entry.extend(encode(value)?);
        self.entries.push(entry);
        Ok(())
    }

    fn finish(mut self) -> Done {
        // Keys are self-delimiting, so sorting whole entries orders by key first
        self.entries.sort_unstable();
        self.parent.tag(MAP);
        for entry in &self.entries {
            self.parent.out.extend_from_slice(entry);
        }
        self.parent.tag(END);
        Ok(())
    }
}

impl ser::SerializeMap for MapEncoder<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Done {
        self.pending_key = Some(encode(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Done {
        let mut entry = self
            .pending_key
            .take()
            .ok_or_else(|| EncodeError("map value serialized before its key".to_string()))?;
        entry.extend(encode(value)?);
        self.entries.push(entry);
        Ok(())
    }

    fn end(self) -> Done {
        self.finish()
    }
}

impl ser::SerializeStruct for MapEncoder<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Done {
        self.push(key, value)
    }

    fn end(self) -> Done {
        self.finish()
    }
}

impl ser::SerializeStructVariant for MapEncoder<'_> {
    type Ok = ();
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Done {
        self.push(key, value)
    }

    fn end(self) -> Done {
        self.finish()
    }
}
