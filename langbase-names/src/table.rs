//! Decoded code point <-> name tables.
//!
//! A [`NameTable`] is built once from the packed resource layout and is
//! immutable afterwards, so it can be shared freely behind an `Arc`.
//!
//! Forward lookups go through a two-level index: the block id
//! (`code_point >> 8`) selects a dense 256-entry sub-table, and the low byte
//! selects the packed `(pool_offset << 8) | name_length` entry inside it.
//! Reverse lookups hash the queried name and walk an arena-backed chain of
//! `(hash, next, code_point)` entries, confirming every candidate with an
//! exact byte comparison against the pool.

use crate::error::NameTableError;
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Largest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Number of 256-code-point blocks in the Unicode code space.
const BLOCK_SLOTS: usize = ((MAX_CODE_POINT + 1) >> 8) as usize;

/// Block index sentinel for blocks with no named code points.
const NO_BLOCK: u16 = u16::MAX;

/// Chain terminator.
const NO_ENTRY: u32 = u32::MAX;

/// Four big-endian `i32` header fields.
const HEADER_LEN: usize = 16;

/// Pool offsets are packed above an 8-bit length.
const MAX_POOL_OFFSET: usize = 1 << 24;

/// One link of a reverse-index hash chain.
#[derive(Debug, Clone, Copy)]
struct ChainEntry {
    hash: i32,
    next: u32,
    code_point: u32,
}

/// Immutable bidirectional code point <-> name table.
pub struct NameTable {
    /// Concatenated ASCII names.
    pool: Box<str>,
    /// Block id -> sub-table index, or `NO_BLOCK`.
    block_index: Box<[u16]>,
    /// `sub_table * 256 + low_byte` -> packed `(offset << 8) | len`, 0 = no name.
    lookup: Box<[u32]>,
    /// Bucket -> index of the chain head in `chain`, or `NO_ENTRY`.
    buckets: Box<[u32]>,
    /// Reverse-index entries in code point order.
    chain: Box<[ChainEntry]>,
}

impl std::fmt::Debug for NameTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameTable")
            .field("names", &self.chain.len())
            .field("blocks", &(self.lookup.len() >> 8))
            .field("pool_bytes", &self.pool.len())
            .finish_non_exhaustive()
    }
}

/// Decoded header of the packed layout.
#[derive(Debug, Clone, Copy)]
struct Header {
    /// Bytes following the header (records + pool).
    total: usize,
    blocks: usize,
    names: usize,
    /// Length of the record section.
    records_end: usize,
}

impl Header {
    fn parse(bytes: &[u8]) -> Result<Self, NameTableError> {
        if bytes.len() < HEADER_LEN {
            return Err(NameTableError::Truncated(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let header = Header {
            total: header_field(bytes, 0, "total size")?,
            blocks: header_field(bytes, 4, "block count")?,
            names: header_field(bytes, 8, "code point count")?,
            records_end: header_field(bytes, 12, "code point section end")?,
        };

        if header.records_end > header.total {
            return Err(NameTableError::Malformed(format!(
                "code point section end {} exceeds total size {}",
                header.records_end, header.total
            )));
        }
        if header.blocks > BLOCK_SLOTS {
            return Err(NameTableError::Malformed(format!(
                "block count {} exceeds the {BLOCK_SLOTS} blocks of the code space",
                header.blocks
            )));
        }
        if header.names > (MAX_CODE_POINT as usize) + 1 {
            return Err(NameTableError::Malformed(format!(
                "code point count {} exceeds the code space",
                header.names
            )));
        }
        if bytes.len() - HEADER_LEN < header.total {
            return Err(NameTableError::Truncated(format!(
                "header declares {} bytes of data, {} present",
                header.total,
                bytes.len() - HEADER_LEN
            )));
        }

        Ok(header)
    }
}

fn header_field(bytes: &[u8], at: usize, what: &str) -> Result<usize, NameTableError> {
    let raw = i32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    usize::try_from(raw).map_err(|_| NameTableError::Malformed(format!("negative {what}: {raw}")))
}

/// Cursor over the delta-encoded record section.
struct RecordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl RecordReader<'_> {
    fn has_more(&self) -> bool {
        self.pos < self.bytes.len()
    }

    fn byte(&mut self) -> Result<u8, NameTableError> {
        let b = *self.bytes.get(self.pos).ok_or_else(|| {
            NameTableError::Truncated(format!(
                "record section ends inside a record at {}",
                self.pos
            ))
        })?;
        self.pos += 1;
        Ok(b)
    }

    /// Explicit 3-byte big-endian code point.
    fn code_point(&mut self) -> Result<u32, NameTableError> {
        let hi = u32::from(self.byte()?);
        let mid = u32::from(self.byte()?);
        let lo = u32::from(self.byte()?);
        Ok((hi << 16) | (mid << 8) | lo)
    }
}

/// Name hash: `h = 1; h = 31 * h + byte` over signed bytes, wrapping.
pub(crate) fn hash_name(bytes: &[u8]) -> i32 {
    bytes.iter().fold(1i32, |h, &b| {
        h.wrapping_mul(31).wrapping_add(i32::from(b as i8))
    })
}

fn bucket_of(hash: i32, buckets: usize) -> usize {
    ((hash & 0x7fff_ffff) as usize) % buckets
}

/// Narrow a query to single bytes; chars above U+00FF become `?`.
fn latin1_bytes(name: &str) -> Vec<u8> {
    name.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

impl NameTable {
    /// Build a table from the zlib-compressed resource.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self, NameTableError> {
        let mut raw = Vec::with_capacity(bytes.len() * 4);
        ZlibDecoder::new(bytes)
            .read_to_end(&mut raw)
            .map_err(NameTableError::Inflate)?;
        Self::from_raw(&raw)
    }

    /// Build a table from the inflated resource layout.
    ///
    /// The layout is a 16-byte big-endian header (total size, block count,
    /// code point count, code point section end), the delta-encoded code
    /// point records, then the ASCII name pool.
    ///
    /// # Errors
    /// Returns [`NameTableError::Truncated`] when a declared section is
    /// missing bytes and [`NameTableError::Malformed`] when the records
    /// contradict the header or each other. No partial table is ever
    /// produced.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, NameTableError> {
        let header = Header::parse(bytes)?;
        let data = &bytes[HEADER_LEN..HEADER_LEN + header.total];
        let (records, pool_bytes) = data.split_at(header.records_end);

        if !pool_bytes.is_ascii() {
            return Err(NameTableError::Malformed(
                "name pool contains non-ASCII bytes".to_string(),
            ));
        }
        let pool = String::from_utf8(pool_bytes.to_vec())
            .map_err(|e| NameTableError::Malformed(format!("name pool: {e}")))?;

        let mut block_index = vec![NO_BLOCK; BLOCK_SLOTS];
        let mut lookup = vec![0u32; header.blocks << 8];
        let mut buckets = vec![NO_ENTRY; (header.names / 2) | 1];
        let mut chain: Vec<ChainEntry> = Vec::with_capacity(header.names);

        let mut reader = RecordReader {
            bytes: records,
            pos: 0,
        };
        let mut code_point: u32 = 0;
        let mut previous: Option<u32> = None;
        let mut current_block: Option<(u32, usize)> = None;
        let mut blocks_opened: usize = 0;
        let mut name_offset: usize = 0;

        while reader.has_more() {
            let mut len = reader.byte()?;
            if len == 0 {
                len = reader.byte()?;
                code_point = reader.code_point()?;
            } else {
                code_point += 1;
            }

            if len == 0 {
                return Err(NameTableError::Malformed(format!(
                    "empty name for U+{code_point:04X}"
                )));
            }
            if code_point > MAX_CODE_POINT {
                return Err(NameTableError::Malformed(format!(
                    "code point {code_point:#X} out of range"
                )));
            }
            if previous.is_some_and(|p| code_point <= p) {
                return Err(NameTableError::Malformed(format!(
                    "code point U+{code_point:04X} is not in ascending order"
                )));
            }

            let block_id = code_point >> 8;
            let sub_table = match current_block {
                Some((id, sub_table)) if id == block_id => sub_table,
                _ => {
                    if blocks_opened == header.blocks {
                        return Err(NameTableError::Malformed(format!(
                            "more than the declared {} blocks",
                            header.blocks
                        )));
                    }
                    let sub_table = blocks_opened;
                    // BLOCK_SLOTS < u16::MAX, so the index always fits.
                    block_index[block_id as usize] = sub_table as u16;
                    blocks_opened += 1;
                    current_block = Some((block_id, sub_table));
                    sub_table
                }
            };

            let len = usize::from(len);
            let name_end = name_offset + len;
            if name_end > pool.len() {
                return Err(NameTableError::Truncated(format!(
                    "name for U+{code_point:04X} runs past the {}-byte pool",
                    pool.len()
                )));
            }
            if name_offset >= MAX_POOL_OFFSET {
                return Err(NameTableError::Malformed(format!(
                    "pool offset {name_offset} does not fit the packed entry"
                )));
            }
            lookup[(sub_table << 8) | (code_point & 0xff) as usize] =
                ((name_offset << 8) | len) as u32;

            if chain.len() == header.names {
                return Err(NameTableError::Malformed(format!(
                    "more than the declared {} names",
                    header.names
                )));
            }
            let hash = hash_name(&pool.as_bytes()[name_offset..name_end]);
            let bucket = bucket_of(hash, buckets.len());
            chain.push(ChainEntry {
                hash,
                next: buckets[bucket],
                code_point,
            });
            buckets[bucket] = (chain.len() - 1) as u32;

            name_offset = name_end;
            previous = Some(code_point);
        }

        if chain.len() != header.names {
            return Err(NameTableError::Malformed(format!(
                "header declares {} names, records hold {}",
                header.names,
                chain.len()
            )));
        }
        if name_offset != pool.len() {
            log::debug!(
                "Name pool has {} trailing bytes not referenced by any record",
                pool.len() - name_offset
            );
        }

        Ok(Self {
            pool: pool.into_boxed_str(),
            block_index: block_index.into_boxed_slice(),
            lookup: lookup.into_boxed_slice(),
            buckets: buckets.into_boxed_slice(),
            chain: chain.into_boxed_slice(),
        })
    }

    /// Packed `(offset, len)` for a code point, if it has a name.
    fn entry(&self, code_point: u32) -> Option<(usize, usize)> {
        let block = *self.block_index.get((code_point >> 8) as usize)?;
        if block == NO_BLOCK {
            return None;
        }
        let packed = *self
            .lookup
            .get((usize::from(block) << 8) | (code_point & 0xff) as usize)?;
        if packed == 0 {
            return None;
        }
        Some(((packed >> 8) as usize, (packed & 0xff) as usize))
    }

    /// The canonical name of `code_point`, if the table has one.
    pub fn name_of(&self, code_point: u32) -> Option<&str> {
        let (offset, len) = self.entry(code_point)?;
        self.pool.get(offset..offset + len)
    }

    /// The code point whose name is exactly `name`.
    ///
    /// Matching is byte-for-byte and case-sensitive. Normalisation of user
    /// input (trimming, upper-casing) belongs to [`crate::CharacterNames`].
    pub fn code_point_of(&self, name: &str) -> Option<u32> {
        let query = latin1_bytes(name);
        let hash = hash_name(&query);
        let mut idx = self.buckets[bucket_of(hash, self.buckets.len())];

        while idx != NO_ENTRY {
            let entry = self.chain[idx as usize];
            if entry.hash == hash {
                let matches = self.entry(entry.code_point).is_some_and(|(offset, len)| {
                    len == query.len() && self.pool.as_bytes()[offset..offset + len] == query[..]
                });
                if matches {
                    return Some(entry.code_point);
                }
            }
            idx = entry.next;
        }
        None
    }

    /// Number of named code points.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// All `(code_point, name)` pairs in ascending code point order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.chain
            .iter()
            .filter_map(|e| self.name_of(e.code_point).map(|name| (e.code_point, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{compress, encode_raw};

    fn table(entries: &[(u32, &str)]) -> NameTable {
        let raw = encode_raw(entries.iter().copied()).expect("encode");
        NameTable::from_raw(&raw).expect("decode")
    }

    fn raw_with_header(total: i32, blocks: i32, names: i32, end: i32, body: &[u8]) -> Vec<u8> {
        let mut raw = Vec::new();
        for field in [total, blocks, names, end] {
            raw.extend_from_slice(&field.to_be_bytes());
        }
        raw.extend_from_slice(body);
        raw
    }

    #[test]
    fn test_forward_and_reverse_lookup() {
        let t = table(&[
            (0x41, "LATIN CAPITAL LETTER A"),
            (0x42, "LATIN CAPITAL LETTER B"),
            (0x3A3, "GREEK CAPITAL LETTER SIGMA"),
            (0x1F600, "GRINNING FACE"),
        ]);

        assert_eq!(t.len(), 4);
        assert_eq!(t.name_of(0x41), Some("LATIN CAPITAL LETTER A"));
        assert_eq!(t.name_of(0x42), Some("LATIN CAPITAL LETTER B"));
        assert_eq!(t.name_of(0x3A3), Some("GREEK CAPITAL LETTER SIGMA"));
        assert_eq!(t.name_of(0x1F600), Some("GRINNING FACE"));
        assert_eq!(t.code_point_of("GRINNING FACE"), Some(0x1F600));
        assert_eq!(t.code_point_of("LATIN CAPITAL LETTER B"), Some(0x42));
    }

    #[test]
    fn test_misses_are_none() {
        let t = table(&[(0x41, "LATIN CAPITAL LETTER A")]);

        // Same block, empty slot.
        assert_eq!(t.name_of(0x43), None);
        // Block without a sub-table.
        assert_eq!(t.name_of(0x3A3), None);
        // Outside the code space.
        assert_eq!(t.name_of(0x110000), None);
        assert_eq!(t.name_of(u32::MAX), None);

        assert_eq!(t.code_point_of("LATIN CAPITAL LETTER B"), None);
        assert_eq!(t.code_point_of("latin capital letter a"), None);
        assert_eq!(t.code_point_of("LATIN CAPITAL LETTER A "), None);
        assert_eq!(t.code_point_of(""), None);
    }

    #[test]
    fn test_colliding_hashes_resolve_by_bytes() {
        assert_eq!(hash_name(b"Aa"), hash_name(b"BB"));

        let only_aa = table(&[(0x100, "Aa")]);
        assert_eq!(only_aa.code_point_of("Aa"), Some(0x100));
        assert_eq!(only_aa.code_point_of("BB"), None);

        let both = table(&[(0x100, "Aa"), (0x101, "BB"), (0x102, "AaAa"), (0x103, "BBBB")]);
        assert_eq!(hash_name(b"AaAa"), hash_name(b"BBBB"));
        assert_eq!(both.code_point_of("Aa"), Some(0x100));
        assert_eq!(both.code_point_of("BB"), Some(0x101));
        assert_eq!(both.code_point_of("AaAa"), Some(0x102));
        assert_eq!(both.code_point_of("BBBB"), Some(0x103));
        assert_eq!(both.code_point_of("AaBB"), None);
    }

    #[test]
    fn test_non_latin1_query_cannot_match_ascii_name() {
        let t = table(&[(0x3F, "?")]);
        // Queries are narrowed to ISO-8859-1 first, so 'Σ' is compared as '?'.
        assert_eq!(t.code_point_of("\u{3A3}"), Some(0x3F));
        assert_eq!(t.code_point_of("\u{E9}"), None);
    }

    #[test]
    fn test_from_compressed() {
        let raw = encode_raw([(0x61, "LATIN SMALL LETTER A")]).expect("encode");
        let packed = compress(&raw).expect("compress");
        let t = NameTable::from_compressed(&packed).expect("decode");
        assert_eq!(t.name_of(0x61), Some("LATIN SMALL LETTER A"));
    }

    #[test]
    fn test_garbage_is_inflate_error() {
        let err = NameTable::from_compressed(b"definitely not zlib").unwrap_err();
        assert!(matches!(err, NameTableError::Inflate(_)), "got {err:?}");
    }

    #[test]
    fn test_iter_in_code_point_order() {
        let t = table(&[(0x20, "SPACE"), (0x21, "EXCLAMATION MARK"), (0x2603, "SNOWMAN")]);
        let all: Vec<(u32, &str)> = t.iter().collect();
        assert_eq!(
            all,
            vec![(0x20, "SPACE"), (0x21, "EXCLAMATION MARK"), (0x2603, "SNOWMAN")]
        );
    }

    #[test]
    fn test_delta_record_starts_from_zero() {
        // Nonzero first length byte: code point is 0 + 1.
        let raw = raw_with_header(2, 1, 1, 1, &[1, b'X']);
        let t = NameTable::from_raw(&raw).expect("decode");
        assert_eq!(t.name_of(1), Some("X"));
        assert_eq!(t.code_point_of("X"), Some(1));
    }

    #[test]
    fn test_truncated_header() {
        let err = NameTable::from_raw(&[0, 0, 0]).unwrap_err();
        assert!(matches!(err, NameTableError::Truncated(_)), "got {err:?}");
    }

    #[test]
    fn test_truncated_body() {
        let raw = raw_with_header(100, 1, 1, 5, &[0, 1, 0, 0, 0x41]);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Truncated(_)), "got {err:?}");
    }

    #[test]
    fn test_truncated_record() {
        // Explicit record missing its last code point byte.
        let raw = raw_with_header(5, 1, 1, 4, &[0, 1, 0, 0, b'A']);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Truncated(_)), "got {err:?}");
    }

    #[test]
    fn test_name_past_pool() {
        let raw = raw_with_header(6, 1, 1, 5, &[0, 4, 0, 0, 0x41, b'A']);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Truncated(_)), "got {err:?}");
    }

    #[test]
    fn test_negative_header_field() {
        let raw = raw_with_header(-1, 1, 1, 0, &[]);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_too_many_blocks() {
        // Two code points in different blocks, header declares one block.
        let body = [0, 1, 0, 0, 0x41, 0, 1, 0, 0x01, 0x41, b'A', b'B'];
        let raw = raw_with_header(12, 1, 2, 10, &body);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_descending_code_points() {
        let body = [0, 1, 0, 0, 0x42, 0, 1, 0, 0, 0x41, b'A', b'B'];
        let raw = raw_with_header(12, 1, 2, 10, &body);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_name_count_mismatch() {
        let raw = raw_with_header(6, 1, 2, 5, &[0, 1, 0, 0, 0x41, b'A']);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_non_ascii_pool() {
        let raw = raw_with_header(6, 1, 1, 5, &[0, 1, 0, 0, 0x41, 0xC9]);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }

    #[test]
    fn test_code_point_out_of_range() {
        let raw = raw_with_header(6, 1, 1, 5, &[0, 1, 0x11, 0, 0, b'A']);
        let err = NameTable::from_raw(&raw).unwrap_err();
        assert!(matches!(err, NameTableError::Malformed(_)), "got {err:?}");
    }
}
