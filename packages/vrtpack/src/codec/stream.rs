//! General conversion paths for items of any width, carrying a bit cursor
//! through 32 or 64-bit containers.
//!
//! Link-efficient payloads lay fields back to back, so a field may straddle a
//! container boundary. Processing-efficient payloads never split a field:
//! when the current container cannot hold another whole field the cursor
//! skips ahead to the next boundary. Skipped bits are ignored on unpack; on
//! pack the dispatcher zeroes the whole span before these loops run, so
//! skipped and trailing bits always read back as zero.
//!
//! Containers are counted from the starting byte offset, which keeps the
//! cursor aligned to container boundaries regardless of where the payload
//! sits in the buffer.

use vrt_bitpack::{ones_mask64, pack_bits32, pack_bits64, unpack_bits32, unpack_bits64};

use super::element::Element;
use super::field::{FieldLayout, ItemCodec};

/// Unpacks one `fSize`-bit field per sample from a bit stream, extracting
/// channel and event tags into their arrays when those are present.
pub(super) fn unpack_stream<T: Element>(
	item: &ItemCodec,
	layout: &FieldLayout,
	word_bits: u32,
	processing_efficient: bool,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T],
	mut channel_tags: Option<&mut [i32]>,
	mut event_tags: Option<&mut [i32]>
) {
	let read_window: fn(&[u8], usize, u32) -> u64 = if word_bits == 32 {
		|buf, bit_offset, width| u64::from(unpack_bits32(buf, bit_offset, width))
	} else {
		unpack_bits64
	};

	let field_size = layout.field_size;
	let start = byte_offset * 8;
	let mut bit_pos = start;
	for (index, value) in values.iter_mut().enumerate() {
		bit_pos = next_field_position(bit_pos, start, field_size, word_bits, processing_efficient);
		let window = read_window(buf, bit_pos, field_size);
		*value = item.decode_field(window, field_size);
		if let Some(channel_tags) = channel_tags.as_deref_mut() {
			channel_tags[index] = (window & ones_mask64(layout.channel_tag_size)) as i32;
		}
		if let Some(event_tags) = event_tags.as_deref_mut() {
			event_tags[index] = (window >> layout.channel_tag_size
				& ones_mask64(layout.event_tag_size)) as i32;
		}
		bit_pos += field_size as usize;
	}
}

/// Packs one `fSize`-bit field per sample into a bit stream, inserting channel
/// and event tags from their arrays when those are present. Tag values are
/// masked to their sub-field width so they can never spill into neighbouring
/// bits.
pub(super) fn pack_stream<T: Element>(
	item: &ItemCodec,
	layout: &FieldLayout,
	word_bits: u32,
	processing_efficient: bool,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T],
	channel_tags: Option<&[i32]>,
	event_tags: Option<&[i32]>
) {
	let write_window: fn(&mut [u8], usize, u32, u64) = if word_bits == 32 {
		|buf, bit_offset, width, window| pack_bits32(buf, bit_offset, width, window as u32)
	} else {
		pack_bits64
	};

	let field_size = layout.field_size;
	let start = byte_offset * 8;
	let mut bit_pos = start;
	for (index, value) in values.iter().enumerate() {
		bit_pos = next_field_position(bit_pos, start, field_size, word_bits, processing_efficient);
		let mut window = item.encode_field(*value, field_size);
		if let Some(channel_tags) = channel_tags {
			window |= channel_tags[index] as u64 & ones_mask64(layout.channel_tag_size);
		}
		if let Some(event_tags) = event_tags {
			window |= (event_tags[index] as u64 & ones_mask64(layout.event_tag_size))
				<< layout.channel_tag_size;
		}
		write_window(buf, bit_pos, field_size, window);
		bit_pos += field_size as usize;
	}
}

/// Advances the cursor to the next container boundary when a
/// processing-efficient payload's current container cannot hold another whole
/// field.
fn next_field_position(
	bit_pos: usize,
	start: usize,
	field_size: u32,
	word_bits: u32,
	processing_efficient: bool
) -> usize {
	if !processing_efficient {
		return bit_pos;
	}

	let free_bits = word_bits - ((bit_pos - start) % word_bits as usize) as u32;
	if free_bits < field_size {
		bit_pos + free_bits as usize
	} else {
		bit_pos
	}
}
