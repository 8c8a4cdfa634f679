//! Conversion paths for tagged items that fit exactly in one 32 or 64-bit
//! word.
//!
//! Each word holds, most significant bits first, the data item, the unused
//! bits, the event tag, the channel tag and finally the pad bits that fill
//! the word up to its boundary. Extraction shifts each sub-field down from
//! its position; composition builds the whole word in a register so unused
//! and pad bits are always written as zero.

use vrt_bitpack::{ones_mask64, pack_u32, pack_u64, unpack_u32, unpack_u64};

use super::element::Element;
use super::field::{FieldLayout, ItemCodec};

/// Unpacks one sample per `word_bits`-wide word, extracting channel and event
/// tags into their arrays when those are present.
pub(super) fn unpack_words<T: Element>(
	item: &ItemCodec,
	layout: &FieldLayout,
	word_bits: u32,
	buf: &[u8],
	byte_offset: usize,
	values: &mut [T],
	mut channel_tags: Option<&mut [i32]>,
	mut event_tags: Option<&mut [i32]>
) {
	let read_word: fn(&[u8], usize) -> u64 = if word_bits == 32 {
		|buf, offset| u64::from(unpack_u32(buf, offset))
	} else {
		unpack_u64
	};

	let delta = (word_bits / 8) as usize;
	let pad_size = word_bits - layout.field_size;
	let mut offset = byte_offset;
	for (index, value) in values.iter_mut().enumerate() {
		let word = read_word(buf, offset);
		*value = item.decode_field(word, word_bits);
		if let Some(channel_tags) = channel_tags.as_deref_mut() {
			channel_tags[index] =
				(word >> pad_size & ones_mask64(layout.channel_tag_size)) as i32;
		}
		if let Some(event_tags) = event_tags.as_deref_mut() {
			event_tags[index] = (word >> (pad_size + layout.channel_tag_size)
				& ones_mask64(layout.event_tag_size)) as i32;
		}
		offset += delta;
	}
}

/// Packs one sample per `word_bits`-wide word, inserting channel and event
/// tags from their arrays when those are present. Tag values are masked to
/// their sub-field width so they can never spill into neighbouring bits.
pub(super) fn pack_words<T: Element>(
	item: &ItemCodec,
	layout: &FieldLayout,
	word_bits: u32,
	buf: &mut [u8],
	byte_offset: usize,
	values: &[T],
	channel_tags: Option<&[i32]>,
	event_tags: Option<&[i32]>
) {
	let write_word: fn(&mut [u8], usize, u64) = if word_bits == 32 {
		|buf, offset, word| pack_u32(buf, offset, word as u32)
	} else {
		pack_u64
	};

	let delta = (word_bits / 8) as usize;
	let pad_size = word_bits - layout.field_size;
	let mut offset = byte_offset;
	for (index, value) in values.iter().enumerate() {
		let mut word = item.encode_field(*value, word_bits);
		if let Some(channel_tags) = channel_tags {
			word |= (channel_tags[index] as u64 & ones_mask64(layout.channel_tag_size))
				<< pad_size;
		}
		if let Some(event_tags) = event_tags {
			word |= (event_tags[index] as u64 & ones_mask64(layout.event_tag_size))
				<< (pad_size + layout.channel_tag_size);
		}
		write_word(buf, offset, word);
		offset += delta;
	}
}
