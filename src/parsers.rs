pub mod gocover;

use winnow::{ascii::dec_uint, PResult, Parser};

/// Parses an unsigned decimal integer that fits in a `u32`.
pub fn parse_u32(buf: &mut &str) -> PResult<u32> {
    dec_uint.parse_next(buf)
}

/// Parses an unsigned decimal integer that fits in a `u64`.
pub fn parse_u64(buf: &mut &str) -> PResult<u64> {
    dec_uint.parse_next(buf)
}
