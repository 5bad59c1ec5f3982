//! Field-mapping tables: translating between long (UUID) and short (`u16`) field-type codes.
//!
//! This is an external concern from the wire format's point of view — the core treats short
//! codes as opaque `u16`s everywhere else in the crate (`field`, `builder`, `parser`, `attest`)
//! — but higher layers commonly need to go from a stable UUID identifying a field's meaning to
//! the short code actually used on the wire, so it is carried here for completeness.

use alloc::vec::Vec;
use uuid::Uuid;

/// The wire type of a mapped field's value, for higher layers that want to decode/encode
/// generically from a mapping table rather than hand-writing `add_*`/`find_short` call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValueType {
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Arbitrary-precision number, carried as a buffer field.
    Apn,
    Uuid,
    /// A date, carried as an `Int64` Unix timestamp on the wire.
    Date,
    Bool,
}

/// One entry translating a long (UUID) field code to the short code used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// The stable, long-form identifier for this field's meaning.
    pub long_code: Uuid,
    /// The short code actually written to/read from the wire.
    pub short_code: u16,
    /// The value type the field is expected to hold.
    pub value_type: FieldValueType,
}

impl FieldMapping {
    /// Creates a new mapping entry.
    pub const fn new(long_code: Uuid, short_code: u16, value_type: FieldValueType) -> Self {
        FieldMapping {
            long_code,
            short_code,
            value_type,
        }
    }
}

/// An immutable table of [`FieldMapping`] entries supporting lookup by either code.
#[derive(Debug, Clone, Default)]
pub struct FieldMappingTable {
    entries: Vec<FieldMapping>,
}

impl FieldMappingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        FieldMappingTable {
            entries: Vec::new(),
        }
    }

    /// Creates a table from a fixed set of entries.
    pub fn from_entries(entries: Vec<FieldMapping>) -> Self {
        FieldMappingTable { entries }
    }

    /// Registers a new mapping entry.
    pub fn insert(&mut self, mapping: FieldMapping) {
        self.entries.push(mapping);
    }

    /// Looks up a mapping by its long (UUID) code.
    pub fn by_long_code(&self, long_code: Uuid) -> Option<&FieldMapping> {
        self.entries.iter().find(|m| m.long_code == long_code)
    }

    /// Looks up a mapping by its short (`u16`) code.
    pub fn by_short_code(&self, short_code: u16) -> Option<&FieldMapping> {
        self.entries.iter().find(|m| m.short_code == short_code)
    }
}
