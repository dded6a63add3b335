//! Deterministic binary snapshot format for catalogs.
//!
//! All integers are little-endian. Layout:
//!
//! ```text
//!   i16  catalog id
//!   u32  catalog name length, then UTF-8 bytes
//!   i16  next user id
//!   i16  next schema id
//!   i16  next table id
//!   i16  next index id
//!   for kind in [user, schema, table, index]:
//!       u32  entry count
//!       count x { i16 id, u32 name length, UTF-8 bytes }   (ascending id)
//! ```
//!
//! Object references are not part of the format. Entries are sorted by id
//! before writing so logically equal catalogs always encode to identical bytes.
//!
//! [`encoded_len`] predicts the exact output size without encoding, so callers
//! can size a buffer once.

use mdcat_result::{Error, Result};
use mdcat_types::{CatalogId, ObjectId, ObjectKind};

use crate::registry::Registry;
use crate::state::{CatalogState, KindState};

const ID_LEN: usize = size_of::<i16>();
const LEN_PREFIX: usize = size_of::<u32>();
/// Smallest possible entry: id plus an empty name.
const MIN_ENTRY_LEN: usize = ID_LEN + LEN_PREFIX;

/// Catalog fields the codec reads, independent of reference and engine types.
pub(crate) struct EncodeView<'a, R> {
    pub catalog_id: CatalogId,
    pub name: &'a str,
    pub counters: [ObjectId; ObjectKind::COUNT],
    pub registries: &'a [Registry<R>; ObjectKind::COUNT],
}

/// Exact number of bytes [`encode_into`] appends.
pub(crate) fn encoded_len<R>(view: &EncodeView<'_, R>) -> usize {
    let header = ID_LEN + LEN_PREFIX + view.name.len() + ObjectKind::COUNT * ID_LEN;
    let body: usize = view
        .registries
        .iter()
        .map(|reg| LEN_PREFIX + reg.len() * MIN_ENTRY_LEN + reg.name_bytes())
        .sum();
    header + body
}

pub(crate) fn encode_into<R>(view: &EncodeView<'_, R>, out: &mut Vec<u8>) -> Result<()> {
    write_i16(out, view.catalog_id);
    write_str(out, view.name)?;
    for counter in view.counters {
        write_i16(out, counter);
    }
    for reg in view.registries {
        let entries = reg.entries();
        write_len(out, entries.len())?;
        for (id, name) in entries {
            write_i16(out, id);
            write_str(out, name)?;
        }
    }
    Ok(())
}

/// Parse bytes into a [`CatalogState`] without structural validation.
///
/// Every read is bounds-checked; trailing bytes are rejected.
pub(crate) fn parse_state(bytes: &[u8]) -> Result<CatalogState> {
    let mut r = Reader::new(bytes);

    let catalog_id = r.read_i16("catalog id")?;
    let name = r.read_str("catalog name")?.to_string();
    let mut counters = [0; ObjectKind::COUNT];
    for (slot, kind) in counters.iter_mut().zip(ObjectKind::ALL) {
        *slot = r.read_i16(kind.as_str())?;
    }

    let mut kinds: [KindState; ObjectKind::COUNT] = Default::default();
    for kind in ObjectKind::ALL {
        let count = r.read_u32("entry count")? as usize;
        let needed = count.saturating_mul(MIN_ENTRY_LEN);
        if needed > r.remaining() {
            return Err(Error::malformed(format!(
                "{kind} entry count {count} needs at least {needed} bytes, {} remain",
                r.remaining()
            )));
        }
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = r.read_i16("entry id")?;
            let name = r.read_str("entry name")?.to_string();
            entries.push((id, name));
        }
        kinds[kind.index()] = KindState {
            next_id: counters[kind.index()],
            entries,
        };
    }
    r.finish()?;

    Ok(CatalogState {
        catalog_id,
        name,
        kinds,
    })
}

/// Parse and validate a snapshot.
pub fn decode_state(bytes: &[u8]) -> Result<CatalogState> {
    let state = parse_state(bytes)?;
    state.validate()?;
    Ok(state)
}

#[inline]
fn write_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn write_len(out: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| Error::Internal(format!("length {len} does not fit a u32 prefix")))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

#[inline]
fn write_str(out: &mut Vec<u8>, s: &str) -> Result<()> {
    write_len(out, s.len())?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Bounds-checked cursor over a snapshot buffer.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::malformed(format!(
                "{what}: need {n} bytes at offset {}, {} remain",
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_i16(&mut self, what: &str) -> Result<i16> {
        let b = self.take(ID_LEN, what)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let b = self.take(LEN_PREFIX, what)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_str(&mut self, what: &str) -> Result<&'a str> {
        let len = self.read_u32(what)? as usize;
        let bytes = self.take(len, what)?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::malformed(format!("{what} is not valid UTF-8: {e}")))
    }

    fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Error::malformed(format!("{n} trailing bytes after snapshot"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdcat_types::ObjectHandle;

    fn registries() -> [Registry<ObjectHandle>; ObjectKind::COUNT] {
        ObjectKind::ALL.map(Registry::new)
    }

    #[test]
    fn empty_catalog_layout() {
        let regs = registries();
        let view = EncodeView {
            catalog_id: 0x0102,
            name: "ab",
            counters: [1, 1, 1, 1],
            registries: &regs,
        };
        let mut out = Vec::new();
        encode_into(&view, &mut out).unwrap();

        // id, name, four counters, then four empty entry counts.
        let mut expected: Vec<u8> = vec![0x02, 0x01, 2, 0, 0, 0, b'a', b'b'];
        expected.extend_from_slice(&[1, 0, 1, 0, 1, 0, 1, 0]);
        expected.extend_from_slice(&[0; 16]);
        assert_eq!(out, expected);
        assert_eq!(encoded_len(&view), out.len());
    }

    #[test]
    fn entries_written_in_id_order() {
        let mut regs = registries();
        let users = &mut regs[ObjectKind::User.index()];
        users.register("zed", 9, ObjectHandle::new(0)).unwrap();
        users.register("amy", 2, ObjectHandle::new(1)).unwrap();

        let view = EncodeView {
            catalog_id: 1,
            name: "",
            counters: [10, 1, 1, 1],
            registries: &regs,
        };
        let mut out = Vec::new();
        encode_into(&view, &mut out).unwrap();
        assert_eq!(encoded_len(&view), out.len());

        let state = decode_state(&out).unwrap();
        let users = &state.kind(ObjectKind::User).entries;
        assert_eq!(users, &vec![(2, "amy".to_string()), (9, "zed".to_string())]);
    }

    #[test]
    fn oversized_count_is_rejected_before_allocating() {
        let mut bytes = Vec::new();
        write_i16(&mut bytes, 1);
        write_str(&mut bytes, "x").unwrap();
        for _ in 0..ObjectKind::COUNT {
            write_i16(&mut bytes, 1);
        }
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(parse_state(&bytes), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn name_length_past_end_is_rejected() {
        let mut bytes = Vec::new();
        write_i16(&mut bytes, 1);
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(b"short");
        let err = parse_state(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(msg) if msg.contains("catalog name")));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = Vec::new();
        write_i16(&mut bytes, 1);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&[0xC3, 0x28]);
        assert!(matches!(parse_state(&bytes), Err(Error::MalformedInput(_))));
    }
}
