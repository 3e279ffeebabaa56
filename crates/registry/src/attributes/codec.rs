//! Primitive wire types and slot codecs.

use crate::carrier::AttributeValue;

/// A type that can be stored directly in an attribute container.
pub trait PrimitiveType: Sized {
	/// Wire type name, matching [`AttributeValue::type_name`].
	const TYPE_NAME: &'static str;

	fn into_value(self) -> AttributeValue;

	/// Extracts `Self` from a stored value, or `None` on a type mismatch.
	fn from_value(value: &AttributeValue) -> Option<Self>;
}

macro_rules! primitive {
	($ty:ty, $variant:ident, $name:literal) => {
		impl PrimitiveType for $ty {
			const TYPE_NAME: &'static str = $name;

			fn into_value(self) -> AttributeValue {
				AttributeValue::$variant(self)
			}

			fn from_value(value: &AttributeValue) -> Option<Self> {
				match value {
					AttributeValue::$variant(v) => Some(v.clone()),
					_ => None,
				}
			}
		}
	};
}

primitive!(i8, Byte, "byte");
primitive!(i32, Int, "int");
primitive!(i64, Long, "long");
primitive!(f64, Double, "double");
primitive!(String, String, "string");
primitive!(Vec<u8>, Bytes, "bytes");

/// Conversion pair between a primitive `K` and a logical value `V`.
pub struct SlotCodec<K, V> {
	encode: fn(V) -> K,
	decode: fn(K) -> Option<V>,
}

impl<K, V> Clone for SlotCodec<K, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<K, V> Copy for SlotCodec<K, V> {}

impl<K, V> SlotCodec<K, V> {
	pub const fn new(encode: fn(V) -> K, decode: fn(K) -> Option<V>) -> Self {
		Self { encode, decode }
	}

	pub fn encode(&self, value: V) -> K {
		(self.encode)(value)
	}

	/// Decodes a stored primitive. `None` means the stored value is not a valid `V`.
	pub fn decode(&self, primitive: K) -> Option<V> {
		(self.decode)(primitive)
	}
}

fn same<T>(value: T) -> T {
	value
}

impl<K> SlotCodec<K, K> {
	/// Codec storing the value as is.
	pub const fn identity() -> Self {
		Self::new(same::<K>, Some::<K>)
	}
}

pub const BYTE: SlotCodec<i8, i8> = SlotCodec::identity();
pub const INT: SlotCodec<i32, i32> = SlotCodec::identity();
pub const LONG: SlotCodec<i64, i64> = SlotCodec::identity();
pub const DOUBLE: SlotCodec<f64, f64> = SlotCodec::identity();
pub const STRING: SlotCodec<String, String> = SlotCodec::identity();
pub const BYTES: SlotCodec<Vec<u8>, Vec<u8>> = SlotCodec::identity();

fn bool_to_byte(value: bool) -> i8 {
	i8::from(value)
}

fn byte_to_bool(byte: i8) -> Option<bool> {
	match byte {
		0 => Some(false),
		1 => Some(true),
		_ => None,
	}
}

/// `bool` stored as a `0`/`1` byte; any other byte does not decode.
pub const BOOL: SlotCodec<i8, bool> = SlotCodec::new(bool_to_byte, byte_to_bool);

// Unsigned values are stored bit for bit in the signed primitive of the same width.
fn u32_to_int(value: u32) -> i32 {
	value as i32
}

fn int_to_u32(int: i32) -> Option<u32> {
	Some(int as u32)
}

fn u64_to_long(value: u64) -> i64 {
	value as i64
}

fn long_to_u64(long: i64) -> Option<u64> {
	Some(long as u64)
}

pub const U32: SlotCodec<i32, u32> = SlotCodec::new(u32_to_int, int_to_u32);
pub const U64: SlotCodec<i64, u64> = SlotCodec::new(u64_to_long, long_to_u64);
