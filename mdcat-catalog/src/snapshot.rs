//! Owned, validated catalog snapshot.
//!
//! A [`CatalogSnapshot`] is the message a catalog travels in between execution
//! contexts and the unit it is persisted as. Its bytes are deterministic, so
//! equal catalogs produce equal snapshots and a content hash over
//! [`CatalogSnapshot::as_bytes`] is stable.

use std::io::{Read, Write};

use mdcat_result::Result;
use mdcat_storage::StorageEngine;

use crate::catalog::Catalog;
use crate::codec;
use crate::state::CatalogState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogSnapshot {
    bytes: Vec<u8>,
}

impl CatalogSnapshot {
    /// Wrap bytes the codec just produced.
    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Accept bytes from elsewhere, validating them with a full decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        codec::decode_state(&bytes)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the snapshot bytes to `writer`. The format is self-delimiting
    /// only up to the end of the stream, so one snapshot per stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a whole stream and validate it as a snapshot.
    pub fn read_from<Rd: Read>(reader: &mut Rd) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes)
    }

    pub fn state(&self) -> Result<CatalogState> {
        codec::decode_state(&self.bytes)
    }

    /// Rebuild a catalog in the current context. References start unbound.
    pub fn restore<R, E: StorageEngine + Default>(&self) -> Result<Catalog<R, E>> {
        Catalog::decode(&self.bytes)
    }
}

impl AsRef<[u8]> for CatalogSnapshot {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
