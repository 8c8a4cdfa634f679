//! VrtPack is a Rust library for bit-exact packing and unpacking of VITA-49
//! (VRT) signal-data payloads: it converts between a contiguous big-endian
//! byte buffer holding one payload and parallel arrays of numeric samples,
//! with optional per-sample channel and event tag arrays.
//!
//! The conversion is configured entirely by a [`PayloadFormat`] descriptor,
//! which states the data item format (two's complement or unsigned
//! fixed-point, IEEE 754 single or double-precision, or one of the VRT
//! variable-width float formats), the item packing field layout (data item,
//! unused bits, event tag, channel tag) and the alignment mode
//! (processing-efficient, padding every item up to a 32 or 64-bit word
//! boundary, or link-efficient, packing items back to back). Field and data
//! item sizes from 1 through 64 bits are supported, including fields that
//! straddle word boundaries mid-stream.
//!
//! Conversions are pure, synchronous, allocation-free single passes over the
//! sample arrays: the library borrows every buffer only for the duration of
//! one call and keeps no state between calls, so disjoint conversions may run
//! concurrently without coordination. Packing always writes every payload bit
//! in its span that is neither data nor tag as zero, and unpacking ignores
//! those bits, which is what makes pack/unpack round trips bit-exact.
//!
//! The conversion entry points live in the [`codec`] module: a generic
//! [`unpack_as`]/[`pack_as`] pair over the six supported host element types
//! (`f64`, `f32`, `i64`, `i32`, `i16` and `i8`), plus per-type wrappers such
//! as [`unpack_as_i16`] for contexts where turbofish generics are awkward.
//!
//! The payload byte and bit primitives the codec is built on are provided by
//! the companion [`vrt_bitpack`] crate, which can be used on its own when
//! only big-endian word or bit-window access is needed.
//!
//! # Scope
//!
//! This library deals with payload contents only. The enclosing packet
//! machinery of a VRT stream (headers, trailers, stream identifiers, class
//! identifiers, timestamps) and any transport concerns are out of its scope,
//! as is parsing the packed payload-format word of the enclosing framing:
//! the codec accepts an already-parsed [`PayloadFormat`] record.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://crates.io/crates/log) crate for logging
//! diagnostic messages, such as the packing strategy selected for a
//! conversion, to any interested consumers. Executables can customize the
//! verbosity of this logging, and even compile it out, [as explained in the
//! `log` crate documentation](https://docs.rs/log/0.4.16/log).
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), vrtpack::CodecError> {
//! use vrtpack::{DataItemFormat, PayloadFormat, pack_as_i16, unpack_as_i16};
//!
//! // 16-bit fields holding a 12-bit two's complement data item and a
//! // 4-bit channel tag, packed back to back
//! let payload_format = PayloadFormat {
//! 	channel_tag_size: 4,
//! 	..PayloadFormat::new(DataItemFormat::SignedFixedPoint, 16, 12)
//! };
//!
//! let mut payload = [0u8; 4];
//! pack_as_i16(&payload_format, &mut payload, 0, &[-3, 1000], Some(&[0x5, 0x9]), None)?;
//! assert_eq!(payload, [0xFF, 0xD5, 0x3E, 0x89]);
//!
//! let mut samples = [0i16; 2];
//! let mut channels = [0i32; 2];
//! unpack_as_i16(&payload_format, &payload, 0, &mut samples, Some(&mut channels), None)?;
//! assert_eq!(samples, [-3, 1000]);
//! assert_eq!(channels, [0x5, 0x9]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![forbid(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]
#![deny(non_ascii_idents)]
#![deny(clippy::print_stdout)]
#![deny(clippy::unimplemented)]
#![warn(explicit_outlives_requirements)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_qualifications)]
#![warn(variant_size_differences)]
#![warn(clippy::empty_enum)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::float_cmp_const)]
#![warn(clippy::invalid_upcast_comparisons)]
#![warn(clippy::multiple_inherent_impl)]
#![warn(clippy::use_self)]
#![warn(clippy::used_underscore_binding)]

#[doc(inline)]
pub use codec::{
	CodecError, Element, pack_as, pack_as_f32, pack_as_f64, pack_as_i8, pack_as_i16, pack_as_i32,
	pack_as_i64, unpack_as, unpack_as_f32, unpack_as_f64, unpack_as_i8, unpack_as_i16,
	unpack_as_i32, unpack_as_i64
};
#[doc(inline)]
pub use payload::{DataItemFormat, PayloadFormat, PayloadFormatError, TryDataItemFormatFromInt};

pub mod codec;
pub mod payload;
