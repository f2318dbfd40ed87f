//! Recursive-descent decoder for PHP's serialize format.
//!
//! The decoder makes a single pass over the input with a monotonically
//! advancing cursor and no backtracking. Numeric and length fields are
//! scanned `strtol`-style: digits are consumed up to the first non-matching
//! byte, then the expected delimiter is asserted at that exact position.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for detailed decoding instrumentation:
//!
//! ```toml
//! php-unserialize-core = { version = "0.1", features = ["tracing"] }
//! ```

use bstr::BString;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::error::{ErrorKind, Result, UnserializeError};
use crate::types::{ArrayValue, Value};

/// Maximum nesting depth to prevent stack overflow.
const MAX_DEPTH: usize = 512;

/// Decoder configuration options.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum nesting depth for arrays and objects.
    pub max_depth: usize,
    /// Whether a mismatch between the declared element count of an array or
    /// object and the number of pairs actually parsed is an error.
    ///
    /// The wire format closes every array body with `}`, so the decoder
    /// reads until the closing brace and treats the declared count as a
    /// capacity hint. When `strict` is `false` (the default) a disagreement
    /// is logged and ignored; when `true` it fails the decode.
    pub strict: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            strict: false,
        }
    }
}

/// A single-pass decoder over one serialized buffer.
///
/// The cursor is mutable shared state, so a `Decoder` must not be shared
/// between callers; construct one per input buffer.
pub struct Decoder<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Decoder configuration.
    config: DecoderConfig,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecoderConfig::default())
    }

    /// Create a new decoder with custom configuration.
    pub fn with_config(data: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
        }
    }

    /// Current cursor offset into the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Decode exactly one value starting at the cursor.
    ///
    /// Returns `Ok(None)` when the cursor is at or past the end of input,
    /// distinguishing graceful end-of-stream from malformed data.
    #[cfg_attr(feature = "tracing", instrument(skip(self), level = "trace", fields(pos = self.pos)))]
    pub fn decode_next(&mut self) -> Result<Option<Value>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        self.decode_value().map(Some)
    }

    /// Decode a single value at the current position.
    ///
    /// This is the core dispatch function that routes to per-production
    /// decoders based on the marker byte.
    fn decode_value(&mut self) -> Result<Value> {
        if self.depth > self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, max_depth = self.config.max_depth, "Max depth exceeded");
            return Err(UnserializeError::new(
                ErrorKind::MaxDepthExceeded(self.config.max_depth),
                self.pos,
            ));
        }

        let marker = self.peek_byte()?;

        #[cfg(feature = "tracing")]
        trace!(marker = %char::from(marker), pos = self.pos, "Decoding value");

        match marker {
            b'N' => self.decode_null(),
            b'b' => self.decode_bool(),
            b'i' => self.decode_int(),
            b'd' => self.decode_float(),
            b's' => self.decode_string(),
            b'a' => self.decode_array(),
            b'O' => self.decode_object(),
            _ => {
                #[cfg(feature = "tracing")]
                warn!(marker = %char::from(marker), pos = self.pos, "Unknown type marker");
                Err(UnserializeError::new(
                    ErrorKind::UnknownType(marker as char),
                    self.pos,
                )
                .with_input_preview(self.data, self.pos))
            }
        }
    }

    /// Decode a null value: `N;`
    ///
    /// Digits between the marker and the terminator are skipped; only the
    /// `;` is checked. The canonical literal is plain `N;`.
    fn decode_null(&mut self) -> Result<Value> {
        self.expect_byte(b'N')?;
        self.scan_integer();
        self.expect_byte(b';')?;
        Ok(Value::Null)
    }

    /// Decode a boolean value: `b:0;` or `b:1;`
    ///
    /// The payload is scanned as an integer; any nonzero value reads as
    /// true.
    fn decode_bool(&mut self) -> Result<Value> {
        self.expect_byte(b'b')?;
        self.expect_byte(b':')?;
        let number = self.scan_integer();
        self.expect_byte(b';')?;
        Ok(Value::Bool(number != 0))
    }

    /// Decode an integer value: `i:<digits>;`
    fn decode_int(&mut self) -> Result<Value> {
        self.expect_byte(b'i')?;
        self.expect_byte(b':')?;
        let number = self.scan_integer();
        self.expect_byte(b';')?;
        // Out-of-range literals truncate to the host int width.
        Ok(Value::Int(number as i32))
    }

    /// Decode a float value: `d:<decimal>;`
    fn decode_float(&mut self) -> Result<Value> {
        self.expect_byte(b'd')?;
        self.expect_byte(b':')?;

        // Special literals PHP emits for non-finite doubles.
        for (literal, value) in [
            (&b"INF"[..], f64::INFINITY),
            (&b"-INF"[..], f64::NEG_INFINITY),
            (&b"NAN"[..], f64::NAN),
        ] {
            if self.data[self.pos..].starts_with(literal) {
                self.pos += literal.len();
                self.expect_byte(b';')?;
                return Ok(Value::Float(value));
            }
        }

        let start = self.pos;
        while matches!(self.data.get(self.pos), Some(b'.' | b'-' | b'+' | b'e' | b'E' | b'0'..=b'9')) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.data[start..self.pos]);

        let number: f64 = text
            .parse()
            .map_err(|_| UnserializeError::new(ErrorKind::InvalidFloat(text.into_owned()), start))?;

        self.expect_byte(b';')?;
        Ok(Value::Float(number))
    }

    /// Decode a string value: `s:<len>:"<len raw bytes>";`
    fn decode_string(&mut self) -> Result<Value> {
        self.expect_byte(b's')?;
        let bytes = self.decode_string_field()?;
        self.expect_byte(b';')?;
        Ok(Value::String(BString::from(bytes)))
    }

    /// Decode the shared `:<len>:"<bytes>"` tail of string-carrying
    /// productions, returning the raw payload.
    ///
    /// The length counts raw bytes, not characters, and the payload is
    /// never rescanned for escapes.
    fn decode_string_field(&mut self) -> Result<&'a [u8]> {
        self.expect_byte(b':')?;
        let len_start = self.pos;
        let len = self.scan_length();
        self.expect_byte(b':')?;
        self.expect_byte(b'"')?;

        let available = self.data.len() - self.pos;
        // Need the payload plus its closing quote.
        if available <= len {
            return Err(UnserializeError::new(
                ErrorKind::InvalidStringLength {
                    declared: len,
                    available,
                },
                len_start,
            )
            .with_input_preview(self.data, len_start));
        }

        let content = &self.data[self.pos..self.pos + len];
        self.pos += len;

        if self.read_byte()? != b'"' {
            return Err(UnserializeError::new(
                ErrorKind::InvalidStringLength {
                    declared: len,
                    available,
                },
                len_start,
            )
            .with_context("no closing quote after declared length")
            .with_input_preview(self.data, self.pos - 1));
        }

        Ok(content)
    }

    /// Decode an array value: `a:<count>:{<key><value>...}`
    fn decode_array(&mut self) -> Result<Value> {
        self.expect_byte(b'a')?;
        self.expect_byte(b':')?;
        let count_pos = self.pos;
        let declared = self.scan_length();
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        let items = self.decode_items(declared, count_pos)?;
        Ok(Value::Array(items))
    }

    /// Decode an object value: `O:<namelen>:"<class>":<count>:{...}`
    ///
    /// The class name is validated with the string field rules to keep the
    /// cursor positioned, then discarded; the property list is decoded
    /// exactly like an array body.
    fn decode_object(&mut self) -> Result<Value> {
        self.expect_byte(b'O')?;
        let _class_name = self.decode_string_field()?;
        self.expect_byte(b':')?;
        let count_pos = self.pos;
        let declared = self.scan_length();
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        let items = self.decode_items(declared, count_pos)?;
        Ok(Value::Array(items))
    }

    /// Decode `{key value ... }` pairs shared by arrays and objects, then
    /// pick the final representation.
    ///
    /// The loop runs until the closing brace; `declared` is a capacity hint
    /// checked against the parsed pair count afterwards. The sequence vs
    /// mapping decision can only be made once the whole construct is
    /// parsed, since key consecutiveness is confirmed at the end.
    fn decode_items(&mut self, declared: usize, header_pos: usize) -> Result<ArrayValue> {
        self.depth += 1;
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(declared.min(1024));

        let mut all_keys_int = true;
        let mut keys_consecutive = true;
        let mut previous_key: i64 = -1;

        loop {
            if self.peek_byte()? == b'}' {
                self.pos += 1;
                break;
            }

            let key = self.decode_value()?;
            match &key {
                Value::Int(k) => {
                    if i64::from(*k) == previous_key + 1 {
                        previous_key += 1;
                    } else {
                        keys_consecutive = false;
                    }
                }
                _ => all_keys_int = false,
            }

            let value = self.decode_value()?;
            pairs.push((key, value));
        }
        self.depth -= 1;

        if pairs.len() != declared {
            if self.config.strict {
                return Err(UnserializeError::new(
                    ErrorKind::CountMismatch {
                        declared,
                        actual: pairs.len(),
                    },
                    header_pos,
                ));
            }
            #[cfg(feature = "tracing")]
            warn!(
                declared = declared,
                actual = pairs.len(),
                pos = header_pos,
                "Element count disagrees with parsed pairs"
            );
        }

        if all_keys_int && keys_consecutive {
            let values = pairs.into_iter().map(|(_, v)| v).collect();
            Ok(ArrayValue::Sequence(values))
        } else {
            let mut entries: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                // Associative-replace: a duplicate key overwrites the
                // earlier entry in place.
                if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                    entry.1 = value;
                } else {
                    entries.push((key, value));
                }
            }
            Ok(ArrayValue::Mapping(entries))
        }
    }

    // Helper methods - marked #[inline] for performance on hot paths

    /// Peek at the current byte without consuming it.
    #[inline(always)]
    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| UnserializeError::new(ErrorKind::UnexpectedEof, self.pos))
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Expect a specific delimiter byte, returning an error if it doesn't
    /// match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let byte = self.read_byte()?;
        if byte != expected {
            return Err(self.make_delimiter_error(expected, byte));
        }
        Ok(())
    }

    /// Create a missing-delimiter error with input context.
    #[cold]
    #[inline(never)]
    fn make_delimiter_error(&self, expected: u8, found: u8) -> UnserializeError {
        UnserializeError::new(
            ErrorKind::ExpectedDelimiter {
                expected: expected as char,
                found: found as char,
            },
            self.pos - 1,
        )
        .with_input_preview(self.data, self.pos.saturating_sub(1))
    }

    /// Scan an optionally signed run of digits, stopping at the first
    /// non-matching byte.
    ///
    /// Zero digits parse as zero with nothing consumed, so the delimiter
    /// check that follows reports the malformation. Accumulation wraps on
    /// overflow.
    fn scan_integer(&mut self) -> i64 {
        let start = self.pos;
        let negative = match self.data.get(self.pos) {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let digits_start = self.pos;
        let mut number: i64 = 0;
        while let Some(byte @ b'0'..=b'9') = self.data.get(self.pos) {
            number = number.wrapping_mul(10).wrapping_add(i64::from(byte - b'0'));
            self.pos += 1;
        }

        if self.pos == digits_start {
            // Sign without digits consumes nothing.
            self.pos = start;
            return 0;
        }

        if negative {
            number.wrapping_neg()
        } else {
            number
        }
    }

    /// Scan a length or count field. Negative values clamp to zero; the
    /// bounds checks downstream do the real validation.
    #[inline]
    fn scan_length(&mut self) -> usize {
        usize::try_from(self.scan_integer()).unwrap_or(0)
    }
}

/// Decode one serialized value from a buffer.
///
/// Returns `Ok(None)` for an empty buffer. Fails with
/// [`ErrorKind::TrailingData`] if the buffer holds more than one top-level
/// value.
///
/// # Example
///
/// ```rust
/// use php_unserialize_core::decode;
///
/// let value = decode(b"i:42;").unwrap().unwrap();
/// assert_eq!(value.as_int().unwrap(), 42);
/// ```
#[inline]
pub fn decode(data: &[u8]) -> Result<Option<Value>> {
    decode_with_config(data, DecoderConfig::default())
}

/// Decode one serialized value from a buffer with custom configuration.
///
/// # Example
///
/// ```rust
/// use php_unserialize_core::{decode_with_config, DecoderConfig};
///
/// let config = DecoderConfig {
///     max_depth: 64,
///     strict: true, // declared counts must match parsed pairs
/// };
/// let value = decode_with_config(b"i:42;", config).unwrap();
/// ```
#[cfg_attr(feature = "tracing", instrument(skip(data, config), fields(data_len = data.len())))]
pub fn decode_with_config(data: &[u8], config: DecoderConfig) -> Result<Option<Value>> {
    #[cfg(feature = "tracing")]
    debug!(data_len = data.len(), "Starting PHP unserialize");

    let mut decoder = Decoder::with_config(data, config);
    let value = match decoder.decode_next()? {
        Some(value) => value,
        None => return Ok(None),
    };

    // Exactly one top-level value per buffer.
    let rest_pos = decoder.position();
    if decoder.decode_next()?.is_some() {
        return Err(UnserializeError::new(ErrorKind::TrailingData, rest_pos)
            .with_input_preview(data, rest_pos));
    }

    #[cfg(feature = "tracing")]
    debug!(value_type = value.type_name(), "Decode completed successfully");

    Ok(Some(value))
}
