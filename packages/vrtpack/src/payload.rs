//! Contains the payload-format descriptor that configures every conversion, and
//! the VRT-float codec used by the non-IEEE floating-point data item formats.

use std::fmt::{Display, Formatter};

use strum_macros::FromRepr;
use thiserror::Error;

pub(crate) mod vrt_float;

#[cfg(test)]
mod test;

/// Represents a VRT data item format, identified on the wire by the five-bit
/// format code of the payload-format word. Bit 4 of the code distinguishes the
/// unsigned variants from the signed ones, and for the VRT float formats the
/// low bits of the code carry the exponent width.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, FromRepr)]
#[repr(u8)]
pub enum DataItemFormat {
	/// Signed fixed-point integer, two's complement.
	SignedFixedPoint = 0b00000,
	/// Signed VRT float with a 1-bit exponent.
	SignedVrtFloat1 = 0b00001,
	/// Signed VRT float with a 2-bit exponent.
	SignedVrtFloat2 = 0b00010,
	/// Signed VRT float with a 3-bit exponent.
	SignedVrtFloat3 = 0b00011,
	/// Signed VRT float with a 4-bit exponent.
	SignedVrtFloat4 = 0b00100,
	/// Signed VRT float with a 5-bit exponent.
	SignedVrtFloat5 = 0b00101,
	/// Signed VRT float with a 6-bit exponent.
	SignedVrtFloat6 = 0b00110,
	/// IEEE 754 single-precision float.
	Float32 = 0b01110,
	/// IEEE 754 double-precision float.
	Double64 = 0b01111,
	/// Unsigned fixed-point integer, zero-extended.
	UnsignedFixedPoint = 0b10000,
	/// Unsigned VRT float with a 1-bit exponent.
	UnsignedVrtFloat1 = 0b10001,
	/// Unsigned VRT float with a 2-bit exponent.
	UnsignedVrtFloat2 = 0b10010,
	/// Unsigned VRT float with a 3-bit exponent.
	UnsignedVrtFloat3 = 0b10011,
	/// Unsigned VRT float with a 4-bit exponent.
	UnsignedVrtFloat4 = 0b10100,
	/// Unsigned VRT float with a 5-bit exponent.
	UnsignedVrtFloat5 = 0b10101,
	/// Unsigned VRT float with a 6-bit exponent.
	UnsignedVrtFloat6 = 0b10110
}

impl DataItemFormat {
	/// Returns whether data items in this format carry a sign: two's complement
	/// for the fixed-point formats, a sign-magnitude sign bit for the VRT float
	/// formats, and implicitly true for the IEEE formats.
	#[must_use]
	pub const fn is_signed(self) -> bool {
		self as u8 & 0b10000 == 0
	}

	/// Returns whether this is one of the two fixed-point integer formats.
	#[must_use]
	pub const fn is_fixed_point(self) -> bool {
		matches!(self, Self::SignedFixedPoint | Self::UnsignedFixedPoint)
	}

	/// Returns the exponent width in bits of this format if it is a VRT float
	/// format, and `None` otherwise.
	#[must_use]
	pub const fn vrt_exponent_size(self) -> Option<u32> {
		let exponent_size = (self as u8 & 0b00111) as u32;
		if matches!(exponent_size, 1..=6) && !matches!(self, Self::Float32 | Self::Double64) {
			Some(exponent_size)
		} else {
			None
		}
	}
}

impl Display for DataItemFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(exponent_size) = self.vrt_exponent_size() {
			return write!(
				f,
				"{} VRT float, {exponent_size}-bit exponent",
				if self.is_signed() { "signed" } else { "unsigned" }
			);
		}

		f.write_str(match self {
			Self::SignedFixedPoint => "signed fixed point",
			Self::UnsignedFixedPoint => "unsigned fixed point",
			Self::Float32 => "IEEE single-precision float",
			Self::Double64 => "IEEE double-precision float",
			_ => unreachable!()
		})
	}
}

/// The error returned when a five-bit code names no known [`DataItemFormat`]:
/// the code is either reserved by the standard or out of range.
#[derive(Debug)]
#[repr(transparent)]
pub struct TryDataItemFormatFromInt(u8);

impl TryDataItemFormatFromInt {
	/// Returns the integer whose conversion failed.
	pub const fn integer(&self) -> u8 {
		self.0
	}
}

impl Display for TryDataItemFormatFromInt {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "unknown data item format code {}", self.0)
	}
}

impl std::error::Error for TryDataItemFormatFromInt {}

impl TryFrom<u8> for DataItemFormat {
	type Error = TryDataItemFormatFromInt;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		Self::from_repr(code).ok_or(TryDataItemFormatFromInt(code))
	}
}

/// An error that identifies the first constraint a [`PayloadFormat`] violates.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Error)]
pub enum PayloadFormatError {
	/// The item packing field size is not in the `[1, 64]` range.
	#[error("item packing field size {field_size} is outside [1, 64]")]
	FieldSizeOutOfRange {
		/// The offending field size.
		field_size: u32
	},
	/// The data item size is zero or exceeds the item packing field size.
	#[error("data item size {data_size} is outside [1, {field_size}]")]
	DataSizeOutOfRange {
		/// The offending data item size.
		data_size: u32,
		/// The item packing field size bounding it.
		field_size: u32
	},
	/// The event and channel tags do not fit in the bits the data item
	/// leaves free within the field.
	#[error(
		"event and channel tags take {} bits but the field only has {available_size} free",
		event_tag_size.saturating_add(*channel_tag_size)
	)]
	TagsExceedField {
		/// The event tag size of the rejected descriptor.
		event_tag_size: u32,
		/// The channel tag size of the rejected descriptor.
		channel_tag_size: u32,
		/// The bits left free by the data item, `fSize - dSize`.
		available_size: u32
	},
	/// The double format is only defined for a 64-bit data item filling a
	/// 64-bit field.
	#[error("the double format requires a 64-bit field and data item, got {field_size} and {data_size}")]
	DoubleLayout {
		/// The field size of the rejected descriptor.
		field_size: u32,
		/// The data size of the rejected descriptor.
		data_size: u32
	},
	/// The single-precision float format is only defined for a 32-bit data
	/// item.
	#[error("the single float format requires a 32-bit data item, got {data_size}")]
	FloatLayout {
		/// The data size of the rejected descriptor.
		data_size: u32
	},
	/// A VRT float's sign bit, exponent and at least one mantissa bit do not
	/// fit in the data item.
	#[error("a {format} needs at least {required_size} data bits, got {data_size}")]
	VrtFloatTooNarrow {
		/// The VRT float format of the rejected descriptor.
		format: DataItemFormat,
		/// The minimum data item size the format admits.
		required_size: u32,
		/// The data size of the rejected descriptor.
		data_size: u32
	}
}

/// Describes how the data items of a signal-data payload are packed: the data
/// item format, the sub-field layout within each item packing field, and the
/// alignment mode. A descriptor is a plain by-value configuration record that
/// callers hand to every conversion; the codec validates it on entry and never
/// retains it.
///
/// The item packing field is laid out most significant bits first as
/// `Data | Unused | EventTag | ChannelTag`, and processing-efficient payloads
/// additionally pad each field up to a 32 or 64-bit word boundary.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub struct PayloadFormat {
	/// The data item format.
	pub format: DataItemFormat,
	/// The item packing field size in bits: data item, unused bits and tags.
	pub field_size: u32,
	/// The data item size in bits.
	pub data_size: u32,
	/// The event tag size in bits, zero when the payload carries no event tags.
	pub event_tag_size: u32,
	/// The channel tag size in bits, zero when the payload carries no channel
	/// tags.
	pub channel_tag_size: u32,
	/// `true` packs processing-efficiently, never splitting an item across a
	/// 32 or 64-bit word boundary; `false` packs link-efficiently, laying
	/// items back to back with no per-item padding.
	pub processing_efficient: bool
}

impl PayloadFormat {
	/// Creates a link-efficient descriptor with the given format and sizes and
	/// no tags. The tag sizes and the alignment mode are public fields that can
	/// be adjusted afterwards.
	#[must_use]
	pub const fn new(format: DataItemFormat, field_size: u32, data_size: u32) -> Self {
		Self {
			format,
			field_size,
			data_size,
			event_tag_size: 0,
			channel_tag_size: 0,
			processing_efficient: false
		}
	}

	/// Returns whether data items are sign-extended (`true`) or zero-extended
	/// (`false`) when unpacked. Derived from the format code.
	#[must_use]
	pub const fn sign(&self) -> bool {
		self.format.is_signed()
	}

	/// Returns the number of unused bits inside each item packing field:
	/// `fSize - dSize - eSize - cSize`. Unused bits are written as zero and
	/// ignored on read. Only meaningful for descriptors that pass
	/// [`validate`](Self::validate).
	#[must_use]
	pub const fn unused_size(&self) -> u32 {
		self.field_size - self.data_size - self.event_tag_size - self.channel_tag_size
	}

	/// Checks every descriptor invariant, returning the first violated
	/// constraint, if any.
	pub fn validate(&self) -> Result<(), PayloadFormatError> {
		let Self {
			format,
			field_size,
			data_size,
			event_tag_size,
			channel_tag_size,
			..
		} = *self;

		if !(1..=64).contains(&field_size) {
			return Err(PayloadFormatError::FieldSizeOutOfRange { field_size });
		}

		if !(1..=field_size).contains(&data_size) {
			return Err(PayloadFormatError::DataSizeOutOfRange {
				data_size,
				field_size
			});
		}

		let available_size = field_size - data_size;
		if event_tag_size.saturating_add(channel_tag_size) > available_size {
			return Err(PayloadFormatError::TagsExceedField {
				event_tag_size,
				channel_tag_size,
				available_size
			});
		}

		match format {
			DataItemFormat::Double64 if field_size != 64 || data_size != 64 => {
				Err(PayloadFormatError::DoubleLayout {
					field_size,
					data_size
				})
			}
			DataItemFormat::Float32 if data_size != 32 => {
				Err(PayloadFormatError::FloatLayout { data_size })
			}
			_ => match format.vrt_exponent_size() {
				// The sign bit, the exponent and at least one mantissa bit
				Some(exponent_size)
					if data_size < exponent_size + format.is_signed() as u32 + 1 =>
				{
					Err(PayloadFormatError::VrtFloatTooNarrow {
						format,
						required_size: exponent_size + format.is_signed() as u32 + 1,
						data_size
					})
				}
				_ => Ok(())
			}
		}
	}
}
