//! Fixed-width byte packing of scalars and tuples.
//!
//! Integers pack big-endian, reals pack their IEEE-754 bit patterns in
//! little-endian byte order. The asymmetry is part of the storage contract
//! and is pinned by round-trip tests; rows written by [`pack_tuple`] must
//! read back with [`unpack_tuple`] bit-for-bit.
//!
//! Characters pack as their low byte. Strings occupy exactly
//! [`STRING_WIDTH`] bytes, NUL-padded; unpacking reads up to the first NUL,
//! so embedded NUL bytes do not survive a round trip.
//!
//! [`pack_tuple`]: fn.pack_tuple.html
//! [`unpack_tuple`]: fn.unpack_tuple.html
//! [`STRING_WIDTH`]: ../constant.STRING_WIDTH.html

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{
    schema::{Domain, Schema, Tuple, Value, STRING_WIDTH},
    Error, Result,
};

/// Appends the packed form of a single value to `buf`.
pub fn pack_value(value: &Value, buf: &mut Vec<u8>) {
    match *value {
        Value::I8(v) => buf.push(v as u8),
        Value::I16(v) => {
            let mut bytes = [0; 2];
            BigEndian::write_i16(&mut bytes, v);
            buf.extend_from_slice(&bytes);
        }
        Value::I32(v) => {
            let mut bytes = [0; 4];
            BigEndian::write_i32(&mut bytes, v);
            buf.extend_from_slice(&bytes);
        }
        Value::I64(v) => {
            let mut bytes = [0; 8];
            BigEndian::write_i64(&mut bytes, v);
            buf.extend_from_slice(&bytes);
        }
        Value::F32(v) => {
            let mut bytes = [0; 4];
            LittleEndian::write_f32(&mut bytes, v);
            buf.extend_from_slice(&bytes);
        }
        Value::F64(v) => {
            let mut bytes = [0; 8];
            LittleEndian::write_f64(&mut bytes, v);
            buf.extend_from_slice(&bytes);
        }
        Value::Char(c) => buf.push(c as u8),
        Value::Str(ref s) => {
            let bytes = s.as_bytes();
            let len = bytes.len().min(STRING_WIDTH);
            buf.extend_from_slice(&bytes[..len]);
            buf.resize(buf.len() + STRING_WIDTH - len, 0);
        }
    }
}

/// Unpacks a single value of `domain` from exactly `domain.width()` bytes.
pub fn unpack_value(domain: Domain, bytes: &[u8]) -> Result<Value> {
    if bytes.len() != domain.width() {
        return Err(Error::DomainMismatch(format!(
            "{:?} expects {} bytes, got {}",
            domain,
            domain.width(),
            bytes.len()
        )));
    }
    let value = match domain {
        Domain::I8 => Value::I8(bytes[0] as i8),
        Domain::I16 => Value::I16(BigEndian::read_i16(bytes)),
        Domain::I32 => Value::I32(BigEndian::read_i32(bytes)),
        Domain::I64 => Value::I64(BigEndian::read_i64(bytes)),
        Domain::F32 => Value::F32(LittleEndian::read_f32(bytes)),
        Domain::F64 => Value::F64(LittleEndian::read_f64(bytes)),
        Domain::Char => Value::Char(bytes[0] as char),
        Domain::Str => {
            let len = bytes.iter().position(|&b| b == 0).unwrap_or(STRING_WIDTH);
            let s = std::str::from_utf8(&bytes[..len]).map_err(|_| {
                Error::DomainMismatch("string bytes are not valid UTF-8".to_owned())
            })?;
            Value::Str(s.to_owned())
        }
    };
    Ok(value)
}

/// Packs a whole tuple into one fixed-width row.
///
/// The tuple is assumed to match the schema (see [`Schema::check`]); the
/// resulting row is always [`Schema::row_width`] bytes long.
///
/// [`Schema::check`]: ../struct.Schema.html#method.check
/// [`Schema::row_width`]: ../struct.Schema.html#method.row_width
pub fn pack_tuple(schema: &Schema, tuple: &[Value]) -> Vec<u8> {
    let mut row = Vec::with_capacity(schema.row_width());
    for value in tuple {
        pack_value(value, &mut row);
    }
    row
}

/// Unpacks one fixed-width row back into a tuple of `schema`.
pub fn unpack_tuple(schema: &Schema, row: &[u8]) -> Result<Tuple> {
    if row.len() != schema.row_width() {
        return Err(Error::DomainMismatch(format!(
            "row of {} bytes does not match schema width {}",
            row.len(),
            schema.row_width()
        )));
    }
    let mut tuple = Vec::with_capacity(schema.len());
    let mut offset = 0;
    for attribute in schema.attributes() {
        let width = attribute.domain.width();
        tuple.push(unpack_value(attribute.domain, &row[offset..offset + width])?);
        offset += width;
    }
    Ok(tuple)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) {
        let mut buf = Vec::new();
        pack_value(&value, &mut buf);
        assert_eq!(buf.len(), value.domain().width());
        assert_eq!(unpack_value(value.domain(), &buf).unwrap(), value);
    }

    #[test]
    fn scalar_roundtrips() {
        roundtrip(Value::I8(-5));
        roundtrip(Value::I16(-30_000));
        roundtrip(Value::I32(1 << 30));
        roundtrip(Value::I64(i64::MIN));
        roundtrip(Value::F32(3.25));
        roundtrip(Value::F64(-2.5e300));
        roundtrip(Value::Char('x'));
        roundtrip(Value::Str("Star_Wars".to_owned()));
        roundtrip(Value::Str(String::new()));
    }

    #[test]
    fn integers_pack_big_endian() {
        let mut buf = Vec::new();
        pack_value(&Value::I32(0x0102_0304), &mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);

        buf.clear();
        pack_value(&Value::I16(-2), &mut buf);
        assert_eq!(buf, [0xFF, 0xFE]);
    }

    #[test]
    fn floats_pack_bits_little_endian() {
        // 1.0f32 == 0x3F80_0000; byte 0 carries the low 8 bits.
        let mut buf = Vec::new();
        pack_value(&Value::F32(1.0), &mut buf);
        assert_eq!(buf, [0x00, 0x00, 0x80, 0x3F]);

        buf.clear();
        pack_value(&Value::F64(1.0), &mut buf);
        assert_eq!(buf, [0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
    }

    #[test]
    fn strings_are_nul_padded() {
        let mut buf = Vec::new();
        pack_value(&Value::Str("abc".to_owned()), &mut buf);
        assert_eq!(buf.len(), STRING_WIDTH);
        assert_eq!(&buf[..3], b"abc");
        assert!(buf[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn tuple_roundtrip() {
        let schema = Schema::new(
            &[
                ("title", Domain::Str),
                ("year", Domain::I16),
                ("rating", Domain::F64),
            ],
            &["title"],
        )
        .unwrap();
        let tuple = vec![
            Value::Str("Rogue_One".to_owned()),
            Value::I16(2016),
            Value::F64(7.8),
        ];
        let row = pack_tuple(&schema, &tuple);
        assert_eq!(row.len(), schema.row_width());
        assert_eq!(unpack_tuple(&schema, &row).unwrap(), tuple);
    }

    #[test]
    fn truncated_rows_are_rejected() {
        let schema = Schema::new(&[("id", Domain::I32)], &["id"]).unwrap();
        assert!(unpack_tuple(&schema, &[0, 1]).is_err());
    }
}
