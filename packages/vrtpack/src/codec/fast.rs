//! Fast conversion paths for untagged payloads whose item packing field is
//! one of the common widths.
//!
//! The whole-byte paths stride the buffer one field at a time with fixed-width
//! big-endian word accesses. The sub-byte paths convert in groups: eight
//! samples per byte for single bits, two per byte for nibbles, and two per
//! three bytes for 12-bit items, which is why the dispatcher requires sample
//! counts to be multiples of those group sizes.

use vrt_bitpack::{
	pack_u8, pack_u16, pack_u24, pack_u32, pack_u64, unpack_u8, unpack_u16, unpack_u24, unpack_u32,
	unpack_u64
};

use super::element::Element;
use super::field::ItemCodec;

/// Unpacks samples whose field is 8, 16, 24, 32 or 64 bits wide and starts at
/// a byte boundary. The data item occupies the most significant `dSize` bits
/// of each field; any trailing unused bits are discarded by the extraction.
pub(super) fn unpack_bytes<T: Element>(
	item: &ItemCodec,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T],
	field_size: u32
) {
	let read_word: fn(&[u8], usize) -> u64 = match field_size {
		8 => |buf, offset| u64::from(unpack_u8(buf, offset)),
		16 => |buf, offset| u64::from(unpack_u16(buf, offset)),
		24 => |buf, offset| u64::from(unpack_u24(buf, offset)),
		32 => |buf, offset| u64::from(unpack_u32(buf, offset)),
		_ => unpack_u64
	};

	let delta = (field_size / 8) as usize;
	let mut offset = byte_offset;
	for value in values {
		*value = item.decode_field(read_word(buf, offset), field_size);
		offset += delta;
	}
}

/// Packs samples into 8, 16, 24, 32 or 64-bit fields starting at a byte
/// boundary, with any unused bits below the data item written as zero.
pub(super) fn pack_bytes<T: Element>(
	item: &ItemCodec,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T],
	field_size: u32
) {
	let write_word: fn(&mut [u8], usize, u64) = match field_size {
		8 => |buf, offset, word| pack_u8(buf, offset, word as u8),
		16 => |buf, offset, word| pack_u16(buf, offset, word as u16),
		24 => |buf, offset, word| pack_u24(buf, offset, word as u32),
		32 => |buf, offset, word| pack_u32(buf, offset, word as u32),
		_ => pack_u64
	};

	let delta = (field_size / 8) as usize;
	let mut offset = byte_offset;
	for value in values {
		write_word(buf, offset, item.encode_field(*value, field_size));
		offset += delta;
	}
}

/// Unpacks bit-packed samples, eight per source byte, most significant bit
/// first. Signed formats read each bit as 0 or -1, unsigned ones as 0 or 1.
pub(super) fn unpack_bit<T: Element>(
	item: &ItemCodec,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T]
) {
	for (byte_index, samples) in values.chunks_exact_mut(8).enumerate() {
		let byte = buf[byte_offset + byte_index];
		for (bit, value) in samples.iter_mut().enumerate() {
			*value = item.decode(u64::from(byte >> (7 - bit) & 1));
		}
	}
}

/// Packs bit samples, eight per destination byte, most significant bit first.
/// Any non-zero sample packs as 1, so the signed and unsigned variants of
/// this path are identical.
pub(super) fn pack_bit<T: Element>(buf: &mut [u8], byte_offset: usize, values: &[T]) {
	for (byte_index, samples) in values.chunks_exact(8).enumerate() {
		let mut byte = 0u8;
		for value in samples {
			byte = byte << 1 | (value.to_i64() != 0) as u8;
		}
		buf[byte_offset + byte_index] = byte;
	}
}

/// Unpacks nibble samples, two per source byte, high nibble first.
pub(super) fn unpack_nibble<T: Element>(
	item: &ItemCodec,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T]
) {
	for (byte_index, pair) in values.chunks_exact_mut(2).enumerate() {
		let byte = buf[byte_offset + byte_index];
		pair[0] = item.decode(u64::from(byte >> 4));
		pair[1] = item.decode(u64::from(byte & 0xF));
	}
}

/// Packs nibble samples, two per destination byte, high nibble first.
pub(super) fn pack_nibble<T: Element>(
	item: &ItemCodec,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T]
) {
	for (byte_index, pair) in values.chunks_exact(2).enumerate() {
		buf[byte_offset + byte_index] = (item.encode(pair[0]) << 4 | item.encode(pair[1])) as u8;
	}
}

/// Unpacks 12-bit samples, two per three source bytes. In processing-efficient
/// payloads each pair is followed by a pad byte that completes a 32-bit word.
pub(super) fn unpack_int12<T: Element>(
	item: &ItemCodec,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T],
	processing_efficient: bool
) {
	let delta = if processing_efficient { 4 } else { 3 };
	let mut offset = byte_offset;
	for pair in values.chunks_exact_mut(2) {
		let first = u32::from(buf[offset]);
		let second = u32::from(buf[offset + 1]);
		let third = u32::from(buf[offset + 2]);
		pair[0] = item.decode(u64::from(first << 4 | second >> 4));
		pair[1] = item.decode(u64::from((second & 0xF) << 8 | third));
		offset += delta;
	}
}

/// Packs 12-bit samples, two per three destination bytes. In
/// processing-efficient payloads a zero pad byte follows each pair.
pub(super) fn pack_int12<T: Element>(
	item: &ItemCodec,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T],
	processing_efficient: bool
) {
	let delta = if processing_efficient { 4 } else { 3 };
	let mut offset = byte_offset;
	for pair in values.chunks_exact(2) {
		let first = item.encode(pair[0]) as u32;
		let second = item.encode(pair[1]) as u32;
		buf[offset] = (first >> 4) as u8;
		buf[offset + 1] = ((first & 0xF) << 4 | second >> 8) as u8;
		buf[offset + 2] = second as u8;
		if processing_efficient {
			buf[offset + 3] = 0;
		}
		offset += delta;
	}
}
