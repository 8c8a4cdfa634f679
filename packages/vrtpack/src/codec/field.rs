//! Per-item conversion between host elements and packed data item bit
//! patterns, shared by every packing strategy.

use vrt_bitpack::{ones_mask64, sign_extend64};

use super::element::Element;
use crate::payload::{DataItemFormat, PayloadFormat, vrt_float};

/// The interpretation of the data item bits, with the format enumeration
/// collapsed to what the conversion loops dispatch on.
#[derive(Debug, Clone, Copy)]
enum ItemKind {
	FixedPoint,
	Float32,
	Double64,
	VrtFloat { exponent_size: u32 }
}

/// Converts single data items between their host representation and their
/// packed `dSize`-bit pattern, right-justified in an unsigned 64-bit word.
#[derive(Debug, Clone, Copy)]
pub(super) struct ItemCodec {
	kind: ItemKind,
	sign: bool,
	data_size: u32
}

impl ItemCodec {
	pub(super) fn new(payload_format: &PayloadFormat) -> Self {
		let kind = match payload_format.format {
			DataItemFormat::Float32 => ItemKind::Float32,
			DataItemFormat::Double64 => ItemKind::Double64,
			format => match format.vrt_exponent_size() {
				Some(exponent_size) => ItemKind::VrtFloat { exponent_size },
				None => ItemKind::FixedPoint
			}
		};

		Self {
			kind,
			sign: payload_format.sign(),
			data_size: payload_format.data_size
		}
	}

	/// Decodes a right-justified `dSize`-bit data item pattern into a host
	/// element. Signed fixed-point items are sign-extended with an arithmetic
	/// shift, unsigned ones zero-extended with a mask; the float formats go
	/// through their bit representation.
	#[inline]
	pub(super) fn decode<T: Element>(&self, data: u64) -> T {
		match self.kind {
			ItemKind::FixedPoint if self.sign => T::from_i64(sign_extend64(data, self.data_size)),
			ItemKind::FixedPoint => T::from_u64(data & ones_mask64(self.data_size)),
			ItemKind::Float32 => T::from_f32(f32::from_bits(data as u32)),
			ItemKind::Double64 => T::from_f64(f64::from_bits(data)),
			ItemKind::VrtFloat { exponent_size } => T::from_f64(vrt_float::from_vrt(
				self.sign,
				exponent_size,
				self.data_size,
				data
			))
		}
	}

	/// Encodes a host element into its right-justified `dSize`-bit data item
	/// pattern. Fixed-point elements narrow by two's complement truncation.
	#[inline]
	pub(super) fn encode<T: Element>(&self, value: T) -> u64 {
		match self.kind {
			ItemKind::FixedPoint if self.sign => value.to_i64() as u64 & ones_mask64(self.data_size),
			ItemKind::FixedPoint => value.to_u64() & ones_mask64(self.data_size),
			ItemKind::Float32 => u64::from(value.to_f32().to_bits()),
			ItemKind::Double64 => value.to_f64().to_bits(),
			ItemKind::VrtFloat { exponent_size } => {
				vrt_float::to_vrt(self.sign, exponent_size, self.data_size, value.to_f64())
			}
		}
	}

	/// Decodes the data item held in the most significant bits of a
	/// `window_size`-bit window.
	#[inline]
	pub(super) fn decode_field<T: Element>(&self, window: u64, window_size: u32) -> T {
		self.decode(window >> (window_size - self.data_size))
	}

	/// Encodes a host element into the most significant bits of a
	/// `window_size`-bit window, with every other bit zero.
	#[inline]
	pub(super) fn encode_field<T: Element>(&self, value: T, window_size: u32) -> u64 {
		self.encode(value) << (window_size - self.data_size)
	}
}

/// The sub-field sizes of an item packing field, as the tag-aware strategies
/// need them. The field is laid out most significant bits first as
/// `Data | Unused | EventTag | ChannelTag`, with any padding up to the
/// containing word below the channel tag.
#[derive(Debug, Clone, Copy)]
pub(super) struct FieldLayout {
	pub(super) field_size: u32,
	pub(super) event_tag_size: u32,
	pub(super) channel_tag_size: u32
}
