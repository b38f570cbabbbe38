use crate::*;
use pretty_hex::PrettyHex;

fn le(data: &[u8]) -> BufferReader<'_> {
    BufferReader::new(data, Endian::Little)
}

fn be(data: &[u8]) -> BufferReader<'_> {
    BufferReader::new(data, Endian::Big)
}

#[test]
fn basic_u8() {
    let mut r = le(&[42, 43, 44]);
    assert_eq!(r.read_u8().unwrap(), 42);
    assert_eq!(r.tell().unwrap(), 1);
    assert_eq!(r.read(None).unwrap(), &[43, 44]);
}

#[test]
fn u32_default_follows_reader() {
    let bytes = [0x01, 0x02, 0x03, 0x04];
    assert_eq!(le(&bytes).read_u32().unwrap(), 0x04030201);
    assert_eq!(le(&bytes).read_u32().unwrap(), 67305985);
    assert_eq!(be(&bytes).read_u32().unwrap(), 0x01020304);
}

#[test]
fn u32_explicit_ignores_reader() {
    let bytes = [0x01, 0x02, 0x03, 0x04];
    assert_eq!(le(&bytes).read_u32_be().unwrap(), 16909060);
    assert_eq!(be(&bytes).read_u32_be().unwrap(), 16909060);
    assert_eq!(le(&bytes).read_u32_le().unwrap(), 0x04030201);
    assert_eq!(be(&bytes).read_u32_le().unwrap(), 0x04030201);
}

#[test]
fn single_byte_never_swaps() {
    for endian in [Endian::Little, Endian::Big] {
        let data = [0xff];
        assert_eq!(BufferReader::new(&data, endian).read_i8().unwrap(), -1);
        assert_eq!(BufferReader::new(&data, endian).read_i8_le().unwrap(), -1);
        assert_eq!(BufferReader::new(&data, endian).read_i8_be().unwrap(), -1);
        assert_eq!(BufferReader::new(&data, endian).read_u8_be().unwrap(), 0xff);
    }
}

#[test]
fn signed_and_wide() {
    let mut r = be(&[0xff, 0xfe, 0x80, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(r.read_i16().unwrap(), -2);
    assert_eq!(r.read_u64().unwrap(), 0x8000_0000_0000_0001);

    let bytes = (-33i32).to_le_bytes();
    assert_eq!(le(&bytes).read_i32().unwrap(), -33);

    let bytes = i64::MIN.to_be_bytes();
    assert_eq!(le(&bytes).read_i64_be().unwrap(), i64::MIN);
}

#[test]
fn floats() {
    let mut data = Vec::new();
    data.extend_from_slice(&1.5f32.to_le_bytes());
    data.extend_from_slice(&(-2.25f64).to_be_bytes());
    let mut r = le(&data);
    assert_eq!(r.read_f32().unwrap(), 1.5);
    assert_eq!(r.read_f64_be().unwrap(), -2.25);
}

#[test]
fn half_one() {
    assert_eq!(le(&[0x00, 0x3c]).read_f16().unwrap(), 1.0);
    assert_eq!(be(&[0x3c, 0x00]).read_f16().unwrap(), 1.0);
    assert_eq!(be(&[0x00, 0x3c]).read_f16_le().unwrap(), 1.0);
    assert_eq!(le(&[0xc0, 0x00]).read_f16_be().unwrap(), -2.0);
    assert_eq!(
        le(&[0x00, 0x3c]).read_scalar::<half::f16>(EndianMode::Default).unwrap(),
        half::f16::ONE
    );
}

#[test]
fn scalar_underflow_keeps_position() {
    let mut r = le(&[1, 2, 3]);
    r.seek(SeekFrom::Start(1)).unwrap();
    let err = r.read_u32().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert!(matches!(
        err,
        ReaderError::BufferUnderflow {
            needed: 4,
            available: 2
        }
    ));
    assert_eq!(r.tell().unwrap(), 1);
    assert_eq!(r.read_u16().unwrap(), 0x0302);
}

#[test]
fn scalar_past_end() {
    let mut r = le(&[1, 2]);
    r.seek(SeekFrom::Start(10)).unwrap();
    assert_eq!(r.read_u8().unwrap_err().kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 10);
}

#[test]
fn read_clamps() {
    let data = [1, 2, 3, 4, 5];
    let mut r = le(&data);
    assert_eq!(r.read(Some(2)).unwrap(), &[1, 2]);
    assert_eq!(r.read(Some(10)).unwrap(), &[3, 4, 5]);
    assert_eq!(r.tell().unwrap(), 5);
    assert_eq!(r.read(Some(1)).unwrap(), &[] as &[u8]);
    assert_eq!(r.read(None).unwrap(), &[] as &[u8]);
    assert_eq!(r.tell().unwrap(), 5);

    r.seek(SeekFrom::Start(100)).unwrap();
    assert_eq!(r.read(Some(4)).unwrap(), &[] as &[u8]);
    assert_eq!(r.tell().unwrap(), 100);
}

#[test]
fn read_zero() {
    let mut r = le(&[1, 2]);
    assert_eq!(r.read(Some(0)).unwrap(), &[] as &[u8]);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn read_into_short_copy() {
    let mut r = le(&[9, 8, 7]);
    let mut dest = [0u8; 2];
    assert_eq!(r.read_into(&mut dest).unwrap(), 2);
    assert_eq!(dest, [9, 8]);
    let mut dest = [0u8; 4];
    assert_eq!(r.read_into(&mut dest).unwrap(), 1);
    assert_eq!(dest, [7, 0, 0, 0]);
    assert_eq!(r.read_into(&mut dest).unwrap(), 0);
}

#[test]
fn read_exact_and_cbytes() {
    let mut r = le(&[0x33, 0x44, 0x55]);
    assert_eq!(r.read_cbytes::<2>().unwrap(), [0x33, 0x44]);
    assert_eq!(
        r.read_cbytes::<5>().unwrap_err().kind(),
        ErrorKind::BufferUnderflow
    );
    assert_eq!(r.read_exact(2).unwrap_err().kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.read_exact(1).unwrap(), &[0x55]);
    let _empty: [u8; 0] = r.read_cbytes().unwrap();
}

#[test]
fn seek_whence() {
    let data = [0u8; 10];
    let mut r = le(&data);
    assert_eq!(r.seek(SeekFrom::Start(3)).unwrap(), 3);
    assert_eq!(r.seek(SeekFrom::Current(2)).unwrap(), 5);
    assert_eq!(r.seek(SeekFrom::Current(-5)).unwrap(), 0);
    assert_eq!(r.seek(SeekFrom::End(-1)).unwrap(), 9);
    assert_eq!(r.seek(SeekFrom::End(5)).unwrap(), 15);
}

#[test]
fn seek_negative_rejected() {
    let mut r = le(&[0u8; 4]);
    r.seek(SeekFrom::Start(2)).unwrap();
    assert_eq!(
        r.seek(SeekFrom::Current(-3)).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        r.seek(SeekFrom::End(-5)).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(r.tell().unwrap(), 2);
}

#[test]
fn seek_back_rereads() {
    let data = b"hello, world";
    let mut r = le(data);
    r.seek(SeekFrom::Start(3)).unwrap();
    let first = r.read(Some(5)).unwrap();
    r.seek(SeekFrom::Current(-5)).unwrap();
    let second = r.read(Some(5)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, b"lo, w");
}

#[test]
fn array_le() {
    let mut r = be(&[0x01, 0x00, 0x02, 0x00]);
    assert_eq!(r.read_u16_array_le(Some(2)).unwrap(), [1, 2]);
    assert_eq!(r.tell().unwrap(), 4);
}

#[test]
fn array_underflow_keeps_position() {
    let mut r = le(&[0x01, 0x00, 0x02, 0x00]);
    let err = r.read_array::<u16>(Some(3), EndianMode::Little).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_empty() {
    let mut r = le(&[]);
    assert!(r.read_u64_array(Some(0)).unwrap().is_empty());
}

#[test]
fn array_count_overflow() {
    let mut r = le(&[0u8; 8]);
    let err = r.read_u64_array(Some(usize::MAX)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_f16() {
    let mut r = le(&[0x00, 0x3c, 0x00, 0xc0]);
    assert_eq!(r.read_f16_array(Some(2)).unwrap(), [1.0, -2.0]);
}

#[test]
fn array_uncounted_without_prefix() {
    let mut r = le(&[2, 0, 0, 0, 1, 2]);
    let err = r.read_u8_array(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_uncounted_scalar_prefix() {
    let data = [2, 0, 0, 0, 0x01, 0x00, 0x02, 0x00, 0xff];
    let config = ReaderConfig::new(Endian::Little)
        .with_count_prefix(CountPrefix::scalar(ScalarKind::U32));
    let mut r = BufferReader::with_config(&data, config);
    assert_eq!(r.read_u16_array(None).unwrap(), [1, 2]);
    assert_eq!(r.tell().unwrap(), 8);
}

#[test]
fn array_uncounted_prefix_underflow_restores() {
    let data = [3, 0, 1, 0, 2, 0];
    let config = ReaderConfig::default().with_count_prefix(CountPrefix::scalar(ScalarKind::U16));
    let mut r = BufferReader::with_config(&data, config);
    let err = r.read_u16_array(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_uncounted_float_prefix() {
    let data = [0x00, 0x3c, 0xaa];
    let mut r = le(&data);
    r.set_count_prefix(CountPrefix::scalar(ScalarKind::F16));
    let err = r.read_u8_array(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_uncounted_negative_prefix() {
    let data = [0xff, 0xaa];
    let mut r = le(&data);
    r.set_count_prefix(CountPrefix::scalar(ScalarKind::I8));
    assert_eq!(
        r.read_u8_array(None).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn array_uncounted_7bit_prefix() {
    let mut data = vec![0x82, 0x01];
    data.extend(0..130u8);
    let config = ReaderConfig::new(Endian::Big).with_count_prefix(CountPrefix::SevenBitEncoded);
    let mut r = BufferReader::with_config(&data, config);
    let bytes = r.read_u8_array(None).unwrap();
    assert_eq!(bytes.len(), 130);
    assert_eq!(bytes[129], 129);
}

#[test]
fn array_with_closure() {
    let data = [0, 2, 0x12, 0x34, 0x56, 0x78];
    let mut r = le(&data);
    let values = r
        .read_array_with::<u16, _>(|r| Ok(Value::U16(r.read_u16_be()?)), EndianMode::Big)
        .unwrap();
    assert_eq!(values, [0x1234, 0x5678]);

    let mut r = le(&data);
    let err = r
        .read_array_with::<u16, _>(|_| Ok(Value::F32(2.0)), EndianMode::Big)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn read_until_leaves_delimiter() {
    let data = [0x61, 0x62, 0x0a, 0x63, 0x64];
    let mut r = le(&data);
    assert_eq!(r.read_until(b'\n', None).unwrap(), b"ab");
    assert_eq!(r.tell().unwrap(), 2);
    assert_eq!(r.read_u8().unwrap(), b'\n');
    assert_eq!(r.read_until(b'\n', None).unwrap(), b"cd");
    assert_eq!(r.tell().unwrap(), 5);
}

#[test]
fn read_until_max_len() {
    let mut r = le(b"abcdef\n");
    assert_eq!(r.read_line(Some(3)).unwrap(), b"abc");
    assert_eq!(r.read_line(Some(100)).unwrap(), b"def");
    assert_eq!(r.read_line(Some(100)).unwrap(), b"");
    assert_eq!(r.tell().unwrap(), 6);
}

#[test]
fn read_cstring() {
    let mut r = le(b"name\0rest");
    assert_eq!(r.read_cstring(None).unwrap(), b"name");
    r.seek(SeekFrom::Current(1)).unwrap();
    assert_eq!(r.read_cstring(None).unwrap(), b"rest");
}

#[cfg(feature = "bstr")]
#[test]
fn read_cstring_bstr() {
    let mut r = le(b"name\0");
    assert_eq!(r.read_cstring_bstr(None).unwrap(), "name");
}

#[test]
fn read_lines_stops_at_empty_line() {
    let mut r = le(b"ab\ncd\n");
    let lines = r.read_lines(None).unwrap();
    assert_eq!(lines, [b"ab".as_slice()]);
    assert_eq!(r.tell().unwrap(), 2);

    let mut r = le(b"\nab");
    assert!(r.read_lines(None).unwrap().is_empty());
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn read_lines_window() {
    let mut r = le(b"abcdef");
    assert_eq!(r.read_lines(Some(4)).unwrap(), [b"abcd".as_slice()]);
    assert_eq!(r.tell().unwrap(), 4);
}

#[test]
fn align() {
    let data = [0u8; 8];
    let mut r = le(&data);
    assert_eq!(r.align(4).unwrap(), 0);
    r.seek(SeekFrom::Start(1)).unwrap();
    assert_eq!(r.align(4).unwrap(), 4);
    assert_eq!(r.align(4).unwrap(), 4);
    r.seek(SeekFrom::Start(5)).unwrap();
    assert_eq!(r.align_default().unwrap(), 8);
}

#[test]
fn align_errors() {
    let data = [0u8; 6];
    let mut r = le(&data);
    r.seek(SeekFrom::Start(5)).unwrap();
    assert_eq!(r.align(0).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(r.align(-4).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(r.align(4).unwrap_err().kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 5);
}

#[test]
fn value_and_buffer_ignore_position() {
    let data = [1, 2, 3];
    let mut r = le(&data);
    r.read_u8().unwrap();
    assert_eq!(r.get_value().unwrap(), vec![1, 2, 3]);
    assert!(core::ptr::eq(r.get_buffer().unwrap(), &data[..]));
    assert_eq!(r.len().unwrap(), 3);
    assert_eq!(r.remaining().unwrap(), 2);
}

#[test]
fn close_is_final() {
    let mut r = le(&[1, 2, 3, 4]);
    r.close();
    assert!(r.is_closed());
    r.close();
    assert_eq!(r.read(None).unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.read_u8().unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.read_u16_array(Some(1)).unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.tell().unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.seek(SeekFrom::Start(0)).unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.align(4).unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.get_value().unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.readable().unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(r.read_line(None).unwrap_err().kind(), ErrorKind::Closed);
    assert_eq!(format!("{r:?}"), "BufferReader [closed]");
}

#[test]
fn capability_flags() {
    let data = [0u8; 2];
    let r = le(&data);
    assert!(r.readable().unwrap());
    assert!(r.seekable().unwrap());
    assert!(!r.writable().unwrap());
    assert!(!r.isatty().unwrap());
    assert_eq!(r.fileno().unwrap_err().kind(), ErrorKind::Unsupported);

    let mut data = [0u8; 2];
    let mut r = BufferReader::new_mut(&mut data, Endian::Little);
    assert!(r.writable().unwrap());
    assert_eq!(r.detach().unwrap_err().kind(), ErrorKind::Unsupported);
}

#[test]
fn endian_selector() {
    assert_eq!(Endian::from_char('<').unwrap(), Endian::Little);
    assert_eq!(Endian::from_char('>').unwrap(), Endian::Big);
    for c in ['|', '=', '!', 'l'] {
        assert_eq!(Endian::from_char(c).unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
    assert_eq!(
        BufferReader::from_selector(&[], '@').unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    let mut r = BufferReader::from_selector(&[0, 1], '>').unwrap();
    assert_eq!(r.read_u16().unwrap(), 1);
}

#[test]
fn set_endian_applies_to_later_reads() {
    let data = [0, 1, 0, 1];
    let mut r = le(&data);
    assert_eq!(r.read_u16().unwrap(), 0x0100);
    r.set_endian(Endian::Big);
    assert_eq!(r.read_u16().unwrap(), 0x0001);
}

#[test]
fn needs_swap() {
    let native = Endian::native();
    let foreign = match native {
        Endian::Little => Endian::Big,
        Endian::Big => Endian::Little,
    };
    assert!(!EndianMode::Default.needs_swap(native, 4));
    assert!(EndianMode::Default.needs_swap(foreign, 4));
    assert!(!EndianMode::from(native).needs_swap(foreign, 8));
    assert!(EndianMode::from(foreign).needs_swap(native, 2));
    assert!(!EndianMode::from(foreign).needs_swap(native, 1));
}

#[test]
fn decode_scalar_pure() {
    let v: u32 = decode_scalar::<u32>([1, 2, 3, 4], EndianMode::Big, Endian::Little);
    assert_eq!(v, 0x01020304);
    let v: u32 = decode_scalar::<u32>([1, 2, 3, 4], EndianMode::Default, Endian::Little);
    assert_eq!(v, 0x04030201);
}

#[test]
fn accessor_table() {
    assert_eq!(ACCESSORS.len(), 33);
    assert_eq!(ARRAY_ACCESSORS.len(), 33);
    let a = lookup("read_u32_be").unwrap();
    assert_eq!(a.kind, ScalarKind::U32);
    assert_eq!(a.mode, EndianMode::Big);
    let a = lookup_array("read_f16_array_le").unwrap();
    assert_eq!(a.kind, ScalarKind::F16);
    assert_eq!(a.mode, EndianMode::Little);
    assert!(lookup("read_u24").is_none());
    for a in ACCESSORS {
        let expected = ["read_", a.kind.name(), a.mode.suffix()].concat();
        assert_eq!(a.name, expected);
    }
}

#[test]
fn read_named() {
    let data = [1, 2, 3, 4, 0x01, 0x00, 0x02, 0x00];
    let mut r = le(&data);
    assert_eq!(r.read_named("read_u32_be").unwrap(), Value::U32(0x01020304));
    assert_eq!(
        r.read_named_array("read_u16_array", Some(2)).unwrap(),
        [Value::U16(1), Value::U16(2)]
    );
    assert_eq!(r.read_named("read_u128").unwrap_err().kind(), ErrorKind::Unsupported);
}

#[test]
fn read_values_underflow_restores() {
    let mut r = le(&[1, 2, 3]);
    let err = r.read_values(ScalarKind::U16, Some(2), EndianMode::Default).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert_eq!(r.tell().unwrap(), 0);
}

#[test]
fn value_conversions() {
    assert_eq!(Value::U64(u64::MAX).as_integer(), Some(u64::MAX as i128));
    assert_eq!(Value::I8(-1).as_count().unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(Value::F64(1.0).as_count().unwrap_err().kind(), ErrorKind::TypeMismatch);
    assert_eq!(Value::U32(7).as_count().unwrap(), 7);
    assert_eq!(Value::F16(half::f16::ONE).to_f64(), 1.0);
    assert_eq!(Value::I16(-3).kind(), ScalarKind::I16);
}

#[test]
fn int7_i32() {
    let cases: &[(i32, &[u8])] = &[
        (0 /* 0x00000000 */, &[0x00]),
        (1 /* 0x00000001 */, &[0x01]),
        (-1 /* 0xffffffff */, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
        (127 /* 0x0000007f */, &[0x7f]),
        (128 /* 0x00000080 */, &[0x80, 0x01]),
        (255 /* 0x000000ff */, &[0xff, 0x01]),
        (256 /* 0x00000100 */, &[0x80, 0x02]),
        (
            -12345, /* 0xffffcfc7 */
            &[0xc7, 0x9f, 0xff, 0xff, 0x0f],
        ),
        (12345 /* 0x00003039 */, &[0xb9, 0x60]),
        (
            2147483647, /* 0x7fffffff */
            &[0xff, 0xff, 0xff, 0xff, 0x07],
        ),
        (
            -2147483648, /* 0x80000000 */
            &[0x80, 0x80, 0x80, 0x80, 0x08],
        ),
    ];

    for &(expected_x, bytes) in cases.iter() {
        let mut r = le(bytes);
        let decoded_x = r.read_7bit_encoded_i32().unwrap();
        assert_eq!(decoded_x, expected_x, "x = {expected_x} (0x{expected_x:x})");
        assert_eq!(r.remaining().unwrap(), 0);
    }
}

#[test]
fn int7_i64() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (
            -1, /* 0xffffffffffffffff */
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
        ),
        (12345 /* 0x00003039 */, &[0xb9, 0x60]),
        (
            9223372036854775807, /* 0x7fffffffffffffff */
            &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f],
        ),
    ];

    for &(expected_x, bytes) in cases.iter() {
        let mut r = le(bytes);
        let decoded_x = r.read_7bit_encoded_i64().unwrap();
        assert_eq!(decoded_x, expected_x, "x = {expected_x} (0x{expected_x:x})");
    }
}

#[test]
fn int7_too_long() {
    let mut r = le(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
    assert_eq!(
        r.read_7bit_encoded_i32().unwrap_err().kind(),
        ErrorKind::InvalidData
    );
}

#[test]
fn mixed() {
    let data = hex::decode("2a020100000003003c0d48656c6c6f2c20776f726c642100dfffffff").unwrap();
    println!("{}", data.hex_dump());

    let mut r = be(&data);
    assert_eq!(r.read_u8().unwrap(), 42);
    assert_eq!(r.read_u16_le().unwrap(), 0x0102);
    assert_eq!(r.read_u32().unwrap(), 3);
    assert_eq!(r.read_f16_le().unwrap(), 1.0);
    let len = r.read_u8().unwrap() as usize;
    assert_eq!(r.read_exact(len).unwrap(), b"Hello, world!");
    assert_eq!(r.read_cstring(None).unwrap(), b"");
    r.seek(SeekFrom::Current(1)).unwrap();
    assert_eq!(r.read_i32_le().unwrap(), -33);
    assert_eq!(r.remaining().unwrap(), 0);
}

#[test]
fn debug_open() {
    let data = [0u8; 3];
    let mut r = be(&data);
    r.read_u8().unwrap();
    let s = format!("{r:?}");
    assert!(s.contains("pos: 1"), "{s}");
    assert!(s.contains("len: 3"), "{s}");
    assert!(s.contains("'>'"), "{s}");
}
