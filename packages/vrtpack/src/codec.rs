//! Contains the conversion entry points between packed payload buffers and
//! host sample arrays, and the dispatcher that selects a packing strategy
//! for each call.
//!
//! Every conversion validates its payload-format descriptor, normalizes the
//! optional tag arrays, bounds-checks the byte span it is about to touch and
//! then runs exactly one strategy over the samples:
//!
//! - the [fast paths](fast) when the payload carries no tags and the field is
//!   one of the common widths;
//! - the [word-aligned paths](word) when each tagged item fills exactly one
//!   32 or 64-bit word;
//! - the [general bit-stream paths](stream) for everything else.
//!
//! The strategies are jointly exhaustive, so every valid descriptor is
//! convertible; the choice only affects how fast the conversion runs, never
//! its result.

use log::trace;
use thiserror::Error;

use crate::payload::{DataItemFormat, PayloadFormat, PayloadFormatError};
use field::{FieldLayout, ItemCodec};

pub use element::Element;

mod element;
mod fast;
mod field;
mod stream;
mod word;


/// An error that may happen when packing or unpacking a payload.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Error)]
pub enum CodecError {
	/// The payload-format descriptor violates one of its invariants.
	#[error("invalid payload format: {0}")]
	InvalidPayloadFormat(#[from] PayloadFormatError),
	/// A sub-byte fast path was invoked with a sample count that is not a
	/// multiple of its packing group size: 8 samples per byte for bits, 2 per
	/// byte for nibbles and 2 per three bytes for 12-bit items.
	#[error(
		"sample count {length} is not the multiple of {required_multiple} the {field_size}-bit packing requires"
	)]
	LengthAlignment {
		/// The field size of the sub-byte path that was selected.
		field_size: u32,
		/// The group size the sample count must be a multiple of.
		required_multiple: usize,
		/// The offending sample count.
		length: usize
	},
	/// The byte span the conversion would touch runs past the end of the
	/// buffer.
	#[error("payload needs {needed} bytes past the offset but only {available} are available")]
	BufferUnderflow {
		/// The bytes the conversion would touch, starting at the byte offset.
		needed: usize,
		/// The bytes the buffer holds past the byte offset.
		available: usize
	}
}

/// The packing strategy a conversion call is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
	/// One field of 8, 16, 24, 32 or 64 bits per sample, byte-aligned, no tags.
	FastBytes,
	/// Eight single-bit samples per byte.
	FastBit,
	/// Two nibble samples per byte.
	FastNibble,
	/// Two 12-bit samples per three bytes.
	FastInt12,
	/// One tagged item per 32 or 64-bit word.
	Word { word_bits: u32 },
	/// A bit cursor through 32 or 64-bit containers.
	Stream { word_bits: u32 }
}

/// A resolved conversion: the chosen strategy, the effective field size after
/// any processing-efficient promotion, and the byte span the strategy will
/// touch.
struct Plan {
	strategy: Strategy,
	field_size: u32,
	span: usize
}

/// Chooses the packing strategy for a validated descriptor, a sample count
/// and the presence of tag arrays, mirroring the promotion rules of the
/// payload layout: processing-efficient fields of 17 to 32 bits align to
/// 32-bit words, fields of 33 to 64 bits to 64-bit words, and an untagged
/// processing-efficient item is promoted to fill its whole word.
fn plan(
	payload_format: &PayloadFormat,
	length: usize,
	no_tags: bool
) -> Result<Plan, CodecError> {
	let mut field_size = payload_format.field_size;
	let x_size = if payload_format.processing_efficient {
		match field_size {
			17..=32 => 32,
			33..=64 => 64,
			_ => field_size
		}
	} else {
		field_size
	};
	if payload_format.processing_efficient && no_tags {
		field_size = x_size;
	}

	let strategy = if payload_format.format.is_fixed_point() {
		if no_tags && matches!(field_size, 8 | 16 | 24 | 32 | 64) {
			Strategy::FastBytes
		} else if no_tags
			&& field_size == payload_format.data_size
			&& matches!(field_size, 1 | 4 | 12)
		{
			let required_multiple = if field_size == 1 { 8 } else { 2 };
			if length % required_multiple != 0 {
				return Err(CodecError::LengthAlignment {
					field_size,
					required_multiple,
					length
				});
			}

			match field_size {
				1 => Strategy::FastBit,
				4 => Strategy::FastNibble,
				_ => Strategy::FastInt12
			}
		} else if matches!(x_size, 32 | 64) {
			Strategy::Word { word_bits: x_size }
		} else {
			Strategy::Stream {
				word_bits: if field_size <= 32 { 32 } else { 64 }
			}
		}
	} else {
		match payload_format.format {
			DataItemFormat::Double64 => Strategy::FastBytes,
			DataItemFormat::Float32 if field_size == payload_format.data_size => {
				Strategy::FastBytes
			}
			DataItemFormat::Float32 if x_size == 64 => Strategy::Word { word_bits: 64 },
			DataItemFormat::Float32 => Strategy::Stream { word_bits: 64 },
			// The VRT float formats
			_ if matches!(x_size, 32 | 64) => Strategy::Word { word_bits: x_size },
			_ => Strategy::Stream {
				word_bits: if field_size <= 32 { 32 } else { 64 }
			}
		}
	};

	let span = match strategy {
		Strategy::FastBytes => length * (field_size / 8) as usize,
		Strategy::FastBit => length / 8,
		Strategy::FastNibble => length / 2,
		Strategy::FastInt12 => {
			length / 2 * if payload_format.processing_efficient { 4 } else { 3 }
		}
		Strategy::Word { word_bits } => length * (word_bits / 8) as usize,
		Strategy::Stream { word_bits } => {
			if payload_format.processing_efficient {
				let fields_per_word = (word_bits / field_size) as usize;
				length.div_ceil(fields_per_word) * (word_bits / 8) as usize
			} else {
				(length * field_size as usize).div_ceil(8)
			}
		}
	};

	Ok(Plan {
		strategy,
		field_size,
		span
	})
}

/// Unpacks `values.len()` samples from the big-endian payload in `buf`,
/// starting at `byte_offset`, into host elements of type `T`.
///
/// When the descriptor defines channel or event tags, each item's tags are
/// extracted into `channel_tags` and `event_tags`; passing `None` skips the
/// extraction, and arrays given for a tag whose size is zero are ignored.
/// Data items narrower than `T` are sign- or zero-extended according to the
/// format, and wider ones are truncated.
///
/// # Errors
///
/// Fails without touching any array if the descriptor is invalid, if the
/// payload span runs past the end of `buf`, or if a sub-byte fast path is
/// given a sample count that is not a multiple of its packing group.
///
/// # Panics
///
/// Panics if a tag array that participates in the conversion is shorter than
/// `values`.
pub fn unpack_as<T: Element>(
	payload_format: &PayloadFormat,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T],
	channel_tags: Option<&mut [i32]>,
	event_tags: Option<&mut [i32]>
) -> Result<(), CodecError> {
	payload_format.validate()?;

	let channel_tags = channel_tags.filter(|_| payload_format.channel_tag_size > 0);
	let event_tags = event_tags.filter(|_| payload_format.event_tag_size > 0);
	let no_tags = (channel_tags.is_none() && event_tags.is_none())
		|| payload_format.field_size == payload_format.data_size;

	let plan = plan(payload_format, values.len(), no_tags)?;
	let available = buf.len().saturating_sub(byte_offset);
	if plan.span > available {
		return Err(CodecError::BufferUnderflow {
			needed: plan.span,
			available
		});
	}

	if values.is_empty() {
		return Ok(());
	}

	trace!(
		"Unpacking {} samples of {} via {:?}",
		values.len(),
		payload_format.format,
		plan.strategy
	);

	let item = ItemCodec::new(payload_format);
	let layout = FieldLayout {
		field_size: plan.field_size,
		event_tag_size: payload_format.event_tag_size,
		channel_tag_size: payload_format.channel_tag_size
	};

	match plan.strategy {
		Strategy::FastBytes => fast::unpack_bytes(&item, buf, byte_offset, values, plan.field_size),
		Strategy::FastBit => fast::unpack_bit(&item, buf, byte_offset, values),
		Strategy::FastNibble => fast::unpack_nibble(&item, buf, byte_offset, values),
		Strategy::FastInt12 => fast::unpack_int12(
			&item,
			buf,
			byte_offset,
			values,
			payload_format.processing_efficient
		),
		Strategy::Word { word_bits } => word::unpack_words(
			&item,
			&layout,
			word_bits,
			buf,
			byte_offset,
			values,
			channel_tags,
			event_tags
		),
		Strategy::Stream { word_bits } => stream::unpack_stream(
			&item,
			&layout,
			word_bits,
			payload_format.processing_efficient,
			buf,
			byte_offset,
			values,
			channel_tags,
			event_tags
		)
	}

	Ok(())
}

/// Packs the samples in `values` as big-endian payload data into `buf`,
/// starting at `byte_offset`.
///
/// When the descriptor defines channel or event tags, each item's tags are
/// taken from `channel_tags` and `event_tags`, masked to their sub-field
/// width; passing `None` packs zero tags, and arrays given for a tag whose
/// size is zero are ignored. Every payload bit in the span that is neither
/// data nor tag is written as zero.
///
/// # Errors
///
/// Fails without touching the buffer if the descriptor is invalid, if the
/// payload span runs past the end of `buf`, or if a sub-byte fast path is
/// given a sample count that is not a multiple of its packing group.
///
/// # Panics
///
/// Panics if a tag array that participates in the conversion is shorter than
/// `values`.
pub fn pack_as<T: Element>(
	payload_format: &PayloadFormat,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T],
	channel_tags: Option<&[i32]>,
	event_tags: Option<&[i32]>
) -> Result<(), CodecError> {
	payload_format.validate()?;

	let channel_tags = channel_tags.filter(|_| payload_format.channel_tag_size > 0);
	let event_tags = event_tags.filter(|_| payload_format.event_tag_size > 0);
	let no_tags = (channel_tags.is_none() && event_tags.is_none())
		|| payload_format.field_size == payload_format.data_size;

	let plan = plan(payload_format, values.len(), no_tags)?;
	let available = buf.len().saturating_sub(byte_offset);
	if plan.span > available {
		return Err(CodecError::BufferUnderflow {
			needed: plan.span,
			available
		});
	}

	if values.is_empty() {
		return Ok(());
	}

	trace!(
		"Packing {} samples of {} via {:?}",
		values.len(),
		payload_format.format,
		plan.strategy
	);

	let item = ItemCodec::new(payload_format);
	let layout = FieldLayout {
		field_size: plan.field_size,
		event_tag_size: payload_format.event_tag_size,
		channel_tag_size: payload_format.channel_tag_size
	};

	match plan.strategy {
		Strategy::FastBytes => fast::pack_bytes(&item, buf, byte_offset, values, plan.field_size),
		Strategy::FastBit => fast::pack_bit(buf, byte_offset, values),
		Strategy::FastNibble => fast::pack_nibble(&item, buf, byte_offset, values),
		Strategy::FastInt12 => fast::pack_int12(
			&item,
			buf,
			byte_offset,
			values,
			payload_format.processing_efficient
		),
		Strategy::Word { word_bits } => word::pack_words(
			&item,
			&layout,
			word_bits,
			buf,
			byte_offset,
			values,
			channel_tags,
			event_tags
		),
		Strategy::Stream { word_bits } => {
			// The bit-stream writer only touches the windows it packs, so
			// clear the whole span first: container remainders skipped in
			// processing-efficient payloads and the trailing bits of the
			// last byte must read back as zero
			buf[byte_offset..byte_offset + plan.span].fill(0);
			stream::pack_stream(
				&item,
				&layout,
				word_bits,
				payload_format.processing_efficient,
				buf,
				byte_offset,
				values,
				channel_tags,
				event_tags
			);
		}
	}

	Ok(())
}

/// Emits the per-element-type entry point pair for one host element type, as
/// a thin wrapper over the generic conversion functions.
macro_rules! typed_entry_points {
	($($unpack_name:ident, $pack_name:ident => $element:ty);+ $(;)?) => {
		$(
		#[doc = concat!(
			"Unpacks payload samples into `", stringify!($element), "` elements. ",
			"See [`unpack_as`] for the conversion contract."
		)]
		pub fn $unpack_name(
			payload_format: &PayloadFormat,
			buf: &[u8],
			byte_offset: usize,
			values: &mut [$element],
			channel_tags: Option<&mut [i32]>,
			event_tags: Option<&mut [i32]>
		) -> Result<(), CodecError> {
			unpack_as::<$element>(payload_format, buf, byte_offset, values, channel_tags, event_tags)
		}

		#[doc = concat!(
			"Packs `", stringify!($element), "` samples as payload data. ",
			"See [`pack_as`] for the conversion contract."
		)]
		pub fn $pack_name(
			payload_format: &PayloadFormat,
			buf: &mut [u8],
			byte_offset: usize,
			values: &[$element],
			channel_tags: Option<&[i32]>,
			event_tags: Option<&[i32]>
		) -> Result<(), CodecError> {
			pack_as::<$element>(payload_format, buf, byte_offset, values, channel_tags, event_tags)
		}
		)+
	}
}

typed_entry_points! {
	unpack_as_f64, pack_as_f64 => f64;
	unpack_as_f32, pack_as_f32 => f32;
	unpack_as_i64, pack_as_i64 => i64;
	unpack_as_i32, pack_as_i32 => i32;
	unpack_as_i16, pack_as_i16 => i16;
	unpack_as_i8, pack_as_i8 => i8;
}
