//! Restricted printf-style formatting into a fixed-capacity line buffer.
//!
//! Only two substitutions exist: `%d` (signed decimal) and `%x`/`%X`
//! (fixed-width hexadecimal). `\n` is expanded to `\n\r` for terminals that
//! expect a carriage return. Overlong output is truncated, never rejected.

/// Maximum characters one integer substitution can produce.
///
/// The worst case is `-2147483648` at 11 characters; hexadecimal is always
/// exactly 8. Both fit with room to spare, so the scratch stage needs no
/// bound checks.
pub(crate) const MAX_INT_CHARS: usize = 16;

/// Capacity of the line buffer, and the hard cap on one message.
pub(crate) const LINE_CAPACITY: usize = 256;

/// Converts `value` to ASCII according to `kind`, returning the character count.
///
/// - `b'd'`: signed decimal, `-` first for negative values.
/// - `b'x'` / `b'X'`: all eight nibbles of the 32-bit pattern, uppercase.
///   The requested case is not honored; both identifiers produce `A`-`F`.
/// - Anything else writes nothing and returns 0.
pub(crate) fn format_int(kind: u8, value: i32, out: &mut [u8; MAX_INT_CHARS]) -> usize {
    let mut scratch = [0u8; MAX_INT_CHARS];
    let mut count = 0;

    match kind {
        b'd' => {
            // `unsigned_abs` keeps `i32::MIN` in range.
            let mut magnitude = value.unsigned_abs();
            // A divide-until-zero loop emits no digits for zero, so zero is
            // written out explicitly.
            if magnitude == 0 {
                scratch[count] = b'0';
                count += 1;
            }
            while magnitude != 0 {
                scratch[count] = (magnitude % 10) as u8 + b'0';
                magnitude /= 10;
                count += 1;
            }
            if value < 0 {
                // Appended after the digits; the reversal below puts it first.
                scratch[count] = b'-';
                count += 1;
            }
        }
        b'x' | b'X' => {
            let mut bits = value as u32;
            for _ in 0..2 * size_of::<u32>() {
                let nibble = (bits & 0xf) as u8;
                scratch[count] = if nibble > 9 {
                    nibble - 10 + b'A'
                } else {
                    nibble + b'0'
                };
                bits >>= 4;
                count += 1;
            }
        }
        // Unrecognized identifiers substitute nothing.
        _ => {}
    }

    // Digits were generated least-significant-first; copy out in display order.
    for (dst, src) in out.iter_mut().zip(scratch[..count].iter().rev()) {
        *dst = *src;
    }
    count
}

/// Per-render outcome flags. Neither condition is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RenderInfo {
    /// The expansion did not fit and was cut short.
    pub truncated: bool,
    /// An escape used an identifier other than `d`, `x` or `X`.
    pub unsupported_format: bool,
}

/// Fixed-capacity staging buffer for one rendered message.
///
/// Owned by the driver instance and overwritten on every render; the write
/// index never exceeds [`LINE_CAPACITY`].
pub(crate) struct LineBuffer {
    bytes: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    pub(crate) const fn new() -> Self {
        LineBuffer {
            bytes: [0; LINE_CAPACITY],
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Expands `template` into the buffer, substituting `arg` at each escape.
    ///
    /// Every `%` introduces an escape and consumes the byte after it, but
    /// there is only the one argument, so templates should use at most one
    /// escape. A lone `%` at the end of the template substitutes nothing.
    /// On overflow the rest of the template is discarded and whatever fits
    /// is kept (truncation, not an error).
    pub(crate) fn render(&mut self, template: &str, arg: i32) -> RenderInfo {
        self.len = 0;
        let mut info = RenderInfo {
            truncated: false,
            unsupported_format: false,
        };

        let mut bytes = template.bytes();
        while let Some(byte) = bytes.next() {
            match byte {
                b'%' => {
                    let Some(kind) = bytes.next() else {
                        break;
                    };
                    let mut substituted = [0u8; MAX_INT_CHARS];
                    let count = format_int(kind, arg, &mut substituted);
                    if count == 0 {
                        info.unsupported_format = true;
                    }
                    for &ch in &substituted[..count] {
                        if self.len >= LINE_CAPACITY {
                            info.truncated = true;
                            return info;
                        }
                        self.bytes[self.len] = ch;
                        self.len += 1;
                    }
                }
                b'\n' => {
                    // Two bytes go out together; the check refuses when
                    // fewer than three remain, one byte tighter than
                    // strictly needed.
                    if self.len >= LINE_CAPACITY - 2 {
                        info.truncated = true;
                        return info;
                    }
                    self.bytes[self.len] = b'\n';
                    self.bytes[self.len + 1] = b'\r';
                    self.len += 2;
                }
                other => {
                    if self.len >= LINE_CAPACITY {
                        info.truncated = true;
                        return info;
                    }
                    self.bytes[self.len] = other;
                    self.len += 1;
                }
            }
        }
        info
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decimal(value: i32) -> std::string::String {
        let mut out = [0u8; MAX_INT_CHARS];
        let count = format_int(b'd', value, &mut out);
        core::str::from_utf8(&out[..count]).unwrap().into()
    }

    fn hex(value: i32) -> std::string::String {
        let mut out = [0u8; MAX_INT_CHARS];
        let count = format_int(b'x', value, &mut out);
        core::str::from_utf8(&out[..count]).unwrap().into()
    }

    #[test]
    fn decimal_zero_is_a_single_digit() {
        assert_eq!(decimal(0), "0");
    }

    #[test]
    fn decimal_round_trips() {
        for value in [1, -1, 42, -42, 1_000_000, i32::MAX, i32::MIN] {
            assert_eq!(decimal(value).parse::<i32>().unwrap(), value);
        }
    }

    #[test]
    fn decimal_min_does_not_overflow() {
        assert_eq!(decimal(i32::MIN), "-2147483648");
    }

    #[test]
    fn hex_is_fixed_width_uppercase() {
        assert_eq!(hex(0), "00000000");
        assert_eq!(hex(255), "000000FF");
        assert_eq!(hex(-1), "FFFFFFFF");
        assert_eq!(hex(0x1234_ABCD_u32 as i32), "1234ABCD");
    }

    #[test]
    fn hex_round_trips_bit_patterns() {
        for value in [0, 1, -1, 0x7FFF_FFFF, i32::MIN, 0x0BAD_F00D] {
            let s = hex(value);
            assert_eq!(s.len(), 8);
            assert!(s.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
            assert_eq!(u32::from_str_radix(&s, 16).unwrap(), value as u32);
        }
    }

    #[test]
    fn uppercase_identifier_matches_lowercase() {
        let mut lower = [0u8; MAX_INT_CHARS];
        let mut upper = [0u8; MAX_INT_CHARS];
        let n = format_int(b'x', 0xABC, &mut lower);
        let m = format_int(b'X', 0xABC, &mut upper);
        assert_eq!(lower[..n], upper[..m]);
    }

    #[test]
    fn unsupported_identifier_writes_nothing() {
        let mut out = [0u8; MAX_INT_CHARS];
        assert_eq!(format_int(b's', 7, &mut out), 0);
        assert_eq!(format_int(b'%', 7, &mut out), 0);
    }

    #[test]
    fn plain_template_is_verbatim() {
        let mut line = LineBuffer::new();
        let info = line.render("hello world", 0);
        assert_eq!(line.as_bytes(), b"hello world");
        assert!(!info.truncated);
        assert!(!info.unsupported_format);
    }

    #[test]
    fn newline_expands_to_crlf() {
        let mut line = LineBuffer::new();
        line.render("line1\nline2", 0);
        assert_eq!(line.as_bytes(), b"line1\n\rline2");
    }

    #[test]
    fn decimal_substitution() {
        let mut line = LineBuffer::new();
        line.render("value=%d", -42);
        assert_eq!(line.as_bytes(), b"value=-42");
    }

    #[test]
    fn hex_substitution() {
        let mut line = LineBuffer::new();
        line.render("code=%x", 255);
        assert_eq!(line.as_bytes(), b"code=000000FF");
    }

    #[test]
    fn every_escape_substitutes_the_single_argument() {
        // Single-argument API: callers should use one escape, but extra
        // escapes are still interpreted against the same argument.
        let mut line = LineBuffer::new();
        line.render("a=%d b=%d", 5);
        assert_eq!(line.as_bytes(), b"a=5 b=5");
    }

    #[test]
    fn trailing_escape_is_dropped() {
        let mut line = LineBuffer::new();
        let info = line.render("oops %", 9);
        assert_eq!(line.as_bytes(), b"oops ");
        assert!(!info.truncated);
    }

    #[test]
    fn unsupported_escape_is_flagged_and_skipped() {
        let mut line = LineBuffer::new();
        let info = line.render("a%sb", 9);
        assert_eq!(line.as_bytes(), b"ab");
        assert!(info.unsupported_format);
    }

    #[test]
    fn overlong_template_is_clamped_to_a_prefix() {
        let long = "a".repeat(LINE_CAPACITY + 50);
        let mut line = LineBuffer::new();
        let info = line.render(&long, 0);
        assert!(info.truncated);
        assert_eq!(line.len(), LINE_CAPACITY);
        assert_eq!(line.as_bytes(), &long.as_bytes()[..LINE_CAPACITY]);
    }

    #[test]
    fn newline_needs_the_reserve_margin() {
        // 254 bytes used: the margin check refuses the newline even though
        // two bytes technically remain.
        let template = std::format!("{}\nx", "a".repeat(LINE_CAPACITY - 2));
        let mut line = LineBuffer::new();
        let info = line.render(&template, 0);
        assert!(info.truncated);
        assert_eq!(line.len(), LINE_CAPACITY - 2);
        assert!(!line.as_bytes().contains(&b'\n'));
    }

    #[test]
    fn newline_fits_just_under_the_margin() {
        let template = std::format!("{}\n", "a".repeat(LINE_CAPACITY - 3));
        let mut line = LineBuffer::new();
        let info = line.render(&template, 0);
        assert!(!info.truncated);
        assert_eq!(line.len(), LINE_CAPACITY - 1);
        assert!(line.as_bytes().ends_with(b"\n\r"));
    }

    #[test]
    fn newline_margin_boundary_sweep() {
        // The newline is refused once 254 bytes are used, accepted below.
        for used in 252..=255 {
            let template = std::format!("{}\n", "a".repeat(used));
            let mut line = LineBuffer::new();
            let info = line.render(&template, 0);
            if used >= LINE_CAPACITY - 2 {
                assert!(info.truncated, "used={used}");
                assert_eq!(line.len(), used.min(LINE_CAPACITY));
            } else {
                assert!(!info.truncated, "used={used}");
                assert_eq!(line.len(), used + 2);
                assert!(line.as_bytes().ends_with(b"\n\r"));
            }
        }
    }

    #[test]
    fn substitution_exactly_fills_the_buffer() {
        let template = std::format!("{}%d", "a".repeat(LINE_CAPACITY - 5));
        let mut line = LineBuffer::new();
        let info = line.render(&template, 12345);
        assert!(!info.truncated);
        assert_eq!(line.len(), LINE_CAPACITY);
        assert!(line.as_bytes().ends_with(b"12345"));
    }

    #[test]
    fn decimal_round_trip_sweep() {
        for value in (i32::MIN..=i32::MAX).step_by(100_000_007) {
            assert_eq!(decimal(value).parse::<i32>().unwrap(), value);
        }
    }

    #[test]
    fn substitution_truncates_mid_copy() {
        // The copy out of the formatter checks capacity per byte, so a
        // substitution can be cut in half.
        let template = std::format!("{}%d", "a".repeat(LINE_CAPACITY - 3));
        let mut line = LineBuffer::new();
        let info = line.render(&template, 12345);
        assert!(info.truncated);
        assert_eq!(line.len(), LINE_CAPACITY);
        assert!(line.as_bytes().ends_with(b"123"));
    }

    #[test]
    fn buffer_is_overwritten_per_render() {
        let mut line = LineBuffer::new();
        line.render("a long first message", 0);
        line.render("short", 0);
        assert_eq!(line.as_bytes(), b"short");
    }
}
