//! Encoding of intermediate keys and values.
//!
//! Keys are user ids written as 8 big-endian bytes with the sign bit
//! flipped, so byte order matches numeric order. Values start with a tag
//! byte: a rating is followed by its raw `f32`, user information by JSON.
//! Any other tag fails to decode instead of being silently misread.

use crate::rating::{RatingRecord, UserInfo};
use anyhow::{bail, Context, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

const SIGN_BIT: u64 = 1 << 63;

const TAG_USER_INFO: u8 = b'U';
const TAG_RATING: u8 = b'R';

pub fn encode_key(id: i64) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u64(id as u64 ^ SIGN_BIT);
    buf.freeze()
}

pub fn decode_key(mut key: Bytes) -> Result<i64> {
    if key.len() != 8 {
        bail!("Expected an 8 byte key, got {} bytes", key.len());
    }
    Ok((key.get_u64() ^ SIGN_BIT) as i64)
}

pub fn encode_record(record: &RatingRecord) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    match record {
        RatingRecord::UserInfo(user) => {
            buf.put_u8(TAG_USER_INFO);
            buf.put_slice(&serde_json::to_vec(user)?);
        }
        RatingRecord::Rating(rating) => {
            buf.put_u8(TAG_RATING);
            buf.put_f32(*rating);
        }
    }
    Ok(buf.freeze())
}

fn decode_tagged(mut value: &[u8]) -> Result<RatingRecord> {
    if !value.has_remaining() {
        bail!("empty value");
    }
    match value.get_u8() {
        TAG_USER_INFO => Ok(RatingRecord::UserInfo(serde_json::from_slice::<UserInfo>(value)?)),
        TAG_RATING if value.len() == 4 => Ok(RatingRecord::Rating(value.get_f32())),
        TAG_RATING => bail!("expected 4 rating bytes, got {}", value.len()),
        tag => bail!("unknown tag {:#04x}", tag),
    }
}

pub fn decode_record(value: &[u8]) -> Result<RatingRecord> {
    decode_tagged(value).with_context(|| {
        format!(
            "Malformed rating record: {}",
            String::from_utf8_lossy(value).escape_debug()
        )
    })
}
