//! Offline encoder for the packed name resource.
//!
//! Produces exactly the layout [`crate::NameTable::from_raw`] decodes:
//! a run of consecutive code points is written as bare length bytes, and
//! every gap restarts with an explicit `0, len, cp[3]` record.

use crate::error::NameTableError;
use crate::table::MAX_CODE_POINT;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

/// Encode ascending `(code_point, name)` pairs into the inflated layout.
///
/// # Errors
/// Rejects out-of-order or out-of-range code points, empty names, names
/// longer than 255 bytes, and non-ASCII names.
pub fn encode_raw<'a, I>(entries: I) -> Result<Vec<u8>, NameTableError>
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut records: Vec<u8> = Vec::new();
    let mut pool: Vec<u8> = Vec::new();
    let mut names: usize = 0;
    let mut blocks: usize = 0;
    let mut previous: Option<u32> = None;

    for (code_point, name) in entries {
        let invalid = |reason: &str| NameTableError::InvalidEntry {
            code_point,
            reason: reason.to_string(),
        };

        if code_point > MAX_CODE_POINT {
            return Err(invalid("outside the Unicode code space"));
        }
        if previous.is_some_and(|p| code_point <= p) {
            return Err(invalid("code points must be strictly ascending"));
        }
        if !name.is_ascii() {
            return Err(invalid("names must be ASCII"));
        }
        let len = u8::try_from(name.len())
            .map_err(|_| invalid("names must be at most 255 bytes"))?;
        if len == 0 {
            return Err(invalid("names must not be empty"));
        }

        if previous.is_some_and(|p| p + 1 == code_point) {
            records.push(len);
        } else {
            records.extend_from_slice(&[
                0,
                len,
                (code_point >> 16) as u8,
                (code_point >> 8) as u8,
                code_point as u8,
            ]);
        }
        if previous.is_none_or(|p| p >> 8 != code_point >> 8) {
            blocks += 1;
        }

        pool.extend_from_slice(name.as_bytes());
        names += 1;
        previous = Some(code_point);
    }

    let field = |value: usize, what: &str| {
        i32::try_from(value).map_err(|_| NameTableError::InvalidEntry {
            code_point: previous.unwrap_or(0),
            reason: format!("{what} {value} does not fit the header"),
        })
    };
    let total = field(records.len() + pool.len(), "total size")?;
    let block_count = field(blocks, "block count")?;
    let name_count = field(names, "name count")?;
    let records_end = field(records.len(), "code point section end")?;

    let mut raw = Vec::with_capacity(16 + records.len() + pool.len());
    for value in [total, block_count, name_count, records_end] {
        raw.extend_from_slice(&value.to_be_bytes());
    }
    raw.extend_from_slice(&records);
    raw.extend_from_slice(&pool);

    log::debug!(
        "Encoded {} names in {} blocks ({} record bytes, {} pool bytes)",
        names,
        blocks,
        records.len(),
        pool.len()
    );
    Ok(raw)
}

/// zlib-compress an inflated layout.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>, NameTableError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw).map_err(NameTableError::Encode)?;
    encoder.finish().map_err(NameTableError::Encode)
}

/// Encode and compress in one step.
pub fn encode<'a, I>(entries: I) -> Result<Vec<u8>, NameTableError>
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    compress(&encode_raw(entries)?)
}

/// Extract `(code_point, name)` pairs from `UnicodeData.txt`.
///
/// `<control>` entries take their Unicode 1.0 name (field 10) when it is
/// present. Other angle-bracketed names (range markers such as
/// `<CJK Ideograph, First>`) are skipped; those code points have derived
/// names instead.
pub fn parse_unicode_data(text: &str) -> Result<Vec<(u32, String)>, NameTableError> {
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 2 {
            return Err(NameTableError::Malformed(format!(
                "UnicodeData line {}: expected ';'-separated fields",
                line_no + 1
            )));
        }
        let code_point = u32::from_str_radix(fields[0], 16).map_err(|e| {
            NameTableError::Malformed(format!(
                "UnicodeData line {}: bad code point '{}': {e}",
                line_no + 1,
                fields[0]
            ))
        })?;

        let name = fields[1];
        let name = if name == "<control>" {
            match fields.get(10) {
                Some(old_name) if !old_name.is_empty() => *old_name,
                _ => continue,
            }
        } else if name.starts_with('<') {
            continue;
        } else {
            name
        };

        entries.push((code_point, name.to_string()));
    }

    Ok(entries)
}
