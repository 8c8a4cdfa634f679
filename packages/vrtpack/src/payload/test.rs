#![allow(clippy::unusual_byte_groupings)]

use super::vrt_float::{from_vrt, to_vrt};
use super::*;

/// A signed VRT float with a 3-bit exponent in a 16-bit data item has a
/// 12-bit mantissa and an exponent bias of 3. These pairs were computed by
/// hand from the layout: sign bit, then exponent, then mantissa, with the
/// implicit leading one present whenever the exponent is non-zero.
const SIGNED_EXP3_D16_PAIRS: &[(u64, f64)] = &[
	(0b0_000_000000000000, 0.0),
	// Smallest normal value, 2^(1 - bias)
	(0b0_001_000000000000, 0.25),
	(0b0_011_000000000000, 1.0),
	(0b1_011_100000000000, -1.5),
	// Denormal: no implicit leading one, exponent reads as one
	(0b0_000_100000000000, 0.125),
	(0b0_000_000000000001, 0.00006103515625),
	// The all-ones exponent is an ordinary finite value, not an infinity
	(0b0_111_111111111111, 8191.0 / 256.0),
	(0b1_111_111111111111, -8191.0 / 256.0)
];

#[test]
fn vrt_float_known_pairs_unpack() {
	for (bits, value) in SIGNED_EXP3_D16_PAIRS.iter().copied() {
		assert_eq!(from_vrt(true, 3, 16, bits), value, "bits {bits:#018b}");
	}
}

#[test]
fn vrt_float_known_pairs_pack() {
	for (bits, value) in SIGNED_EXP3_D16_PAIRS.iter().copied() {
		// Zero packs canonically, so the negative zero pattern is skipped
		assert_eq!(to_vrt(true, 3, 16, value), bits, "value {value}");
	}
}

#[test]
fn vrt_float_round_trips_every_pattern_of_a_narrow_format() {
	// An unsigned 2-bit exponent format in an 8-bit item has 256 bit
	// patterns, all of them distinct finite values; every one must survive
	// a round trip
	for bits in 0..=0xFFu64 {
		let value = from_vrt(false, 2, 8, bits);
		assert_eq!(to_vrt(false, 2, 8, value), bits, "bits {bits:#010b}");
	}
}

#[test]
fn vrt_float_signed_round_trips_with_sign_magnitude() {
	for bits in 1..=0x7Fu64 {
		// Skip negative zero: it packs back to canonical zero
		let negative_bits = bits | 0x80;
		let value = from_vrt(true, 2, 8, negative_bits);
		assert!(value < 0.0);
		assert_eq!(to_vrt(true, 2, 8, value), negative_bits);
	}
}

#[test]
fn vrt_float_pack_rounds_to_nearest_even() {
	// 1.0 + 2^-13 falls exactly between the 12-bit mantissa values for 1.0
	// and the next representable number; ties go to the even mantissa
	assert_eq!(to_vrt(true, 3, 16, 1.0 + 2f64.powi(-13)), to_vrt(true, 3, 16, 1.0));
	// 1.0 + 3 * 2^-13 ties towards the even mantissa above it
	assert_eq!(
		to_vrt(true, 3, 16, 1.0 + 3.0 * 2f64.powi(-13)),
		to_vrt(true, 3, 16, 1.0 + 2f64.powi(-11))
	);
	// Rounding a mantissa of all ones carries into the next exponent
	assert_eq!(
		to_vrt(true, 3, 16, 2.0 - 2f64.powi(-14)),
		to_vrt(true, 3, 16, 2.0)
	);
}

#[test]
fn vrt_float_pack_saturates_out_of_range_values() {
	let max_pattern = 0b0_111_111111111111;
	assert_eq!(to_vrt(true, 3, 16, 1e30), max_pattern);
	// A rounding carry past the topmost exponent saturates too
	assert_eq!(to_vrt(true, 3, 16, 8191.75 / 256.0), max_pattern);
	assert_eq!(to_vrt(true, 3, 16, f64::INFINITY), max_pattern);
	assert_eq!(to_vrt(true, 3, 16, f64::NEG_INFINITY), max_pattern | 0x8000);

	// Values below the denormal range underflow to zero
	assert_eq!(to_vrt(true, 3, 16, 2f64.powi(-40)), 0);
	assert_eq!(to_vrt(true, 3, 16, f64::MIN_POSITIVE), 0);
}

#[test]
fn vrt_float_pack_handles_the_unrepresentable() {
	assert_eq!(to_vrt(true, 3, 16, f64::NAN), 0);
	// Unsigned formats clamp negative values to zero
	assert_eq!(to_vrt(false, 4, 8, -1.0), 0);
	assert_eq!(to_vrt(false, 4, 8, -0.0), 0);
}

#[test]
fn data_item_format_codes_follow_the_wire_enumeration() {
	assert_eq!(DataItemFormat::SignedFixedPoint as u8, 0b00000);
	assert_eq!(DataItemFormat::SignedVrtFloat6 as u8, 0b00110);
	assert_eq!(DataItemFormat::Float32 as u8, 0b01110);
	assert_eq!(DataItemFormat::Double64 as u8, 0b01111);
	assert_eq!(DataItemFormat::UnsignedFixedPoint as u8, 0b10000);
	assert_eq!(DataItemFormat::UnsignedVrtFloat1 as u8, 0b10001);

	assert_eq!(
		DataItemFormat::try_from(0b00011).unwrap(),
		DataItemFormat::SignedVrtFloat3
	);
	// Reserved codes are rejected
	assert_eq!(DataItemFormat::try_from(0b00111).unwrap_err().integer(), 0b00111);
	assert_eq!(DataItemFormat::try_from(0b11111).unwrap_err().integer(), 0b11111);
}

#[test]
fn data_item_format_signedness_and_exponents_derive_from_the_code() {
	assert!(DataItemFormat::SignedFixedPoint.is_signed());
	assert!(DataItemFormat::Double64.is_signed());
	assert!(!DataItemFormat::UnsignedFixedPoint.is_signed());
	assert!(!DataItemFormat::UnsignedVrtFloat6.is_signed());

	assert_eq!(DataItemFormat::SignedFixedPoint.vrt_exponent_size(), None);
	assert_eq!(DataItemFormat::Float32.vrt_exponent_size(), None);
	assert_eq!(DataItemFormat::Double64.vrt_exponent_size(), None);
	assert_eq!(DataItemFormat::SignedVrtFloat1.vrt_exponent_size(), Some(1));
	assert_eq!(DataItemFormat::UnsignedVrtFloat5.vrt_exponent_size(), Some(5));
}

#[test]
fn valid_descriptors_validate() {
	let mut payload_format = PayloadFormat::new(DataItemFormat::SignedFixedPoint, 16, 12);
	payload_format.channel_tag_size = 4;
	assert_eq!(payload_format.validate(), Ok(()));
	assert_eq!(payload_format.unused_size(), 0);

	let payload_format = PayloadFormat::new(DataItemFormat::Double64, 64, 64);
	assert_eq!(payload_format.validate(), Ok(()));

	// A single float in a 48-bit field rides a 64-bit word with tags and pad
	let mut payload_format = PayloadFormat::new(DataItemFormat::Float32, 48, 32);
	payload_format.channel_tag_size = 16;
	payload_format.processing_efficient = true;
	assert_eq!(payload_format.validate(), Ok(()));

	let payload_format = PayloadFormat::new(DataItemFormat::UnsignedVrtFloat6, 7, 7);
	assert_eq!(payload_format.validate(), Ok(()));
}

#[test]
fn the_validator_reports_the_first_failed_constraint() {
	assert_eq!(
		PayloadFormat::new(DataItemFormat::SignedFixedPoint, 65, 8).validate(),
		Err(PayloadFormatError::FieldSizeOutOfRange { field_size: 65 })
	);
	assert_eq!(
		PayloadFormat::new(DataItemFormat::SignedFixedPoint, 0, 8).validate(),
		Err(PayloadFormatError::FieldSizeOutOfRange { field_size: 0 })
	);

	assert_eq!(
		PayloadFormat::new(DataItemFormat::SignedFixedPoint, 16, 17).validate(),
		Err(PayloadFormatError::DataSizeOutOfRange {
			data_size: 17,
			field_size: 16
		})
	);
	assert_eq!(
		PayloadFormat::new(DataItemFormat::SignedFixedPoint, 16, 0).validate(),
		Err(PayloadFormatError::DataSizeOutOfRange {
			data_size: 0,
			field_size: 16
		})
	);

	let mut payload_format = PayloadFormat::new(DataItemFormat::SignedFixedPoint, 16, 12);
	payload_format.event_tag_size = 3;
	payload_format.channel_tag_size = 2;
	assert_eq!(
		payload_format.validate(),
		Err(PayloadFormatError::TagsExceedField {
			event_tag_size: 3,
			channel_tag_size: 2,
			available_size: 4
		})
	);

	assert_eq!(
		PayloadFormat::new(DataItemFormat::Double64, 64, 32).validate(),
		Err(PayloadFormatError::DoubleLayout {
			field_size: 64,
			data_size: 32
		})
	);
	assert_eq!(
		PayloadFormat::new(DataItemFormat::Double64, 32, 32).validate(),
		Err(PayloadFormatError::DoubleLayout {
			field_size: 32,
			data_size: 32
		})
	);

	assert_eq!(
		PayloadFormat::new(DataItemFormat::Float32, 64, 16).validate(),
		Err(PayloadFormatError::FloatLayout { data_size: 16 })
	);

	// A signed 6-bit exponent float needs sign + exponent + one mantissa bit
	assert_eq!(
		PayloadFormat::new(DataItemFormat::SignedVrtFloat6, 16, 7).validate(),
		Err(PayloadFormatError::VrtFloatTooNarrow {
			format: DataItemFormat::SignedVrtFloat6,
			required_size: 8,
			data_size: 7
		})
	);
	assert_eq!(
		PayloadFormat::new(DataItemFormat::UnsignedVrtFloat6, 16, 7).validate(),
		Ok(())
	);
}
