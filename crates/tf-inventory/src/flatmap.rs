//! decoding of terraform's flattened attribute encoding
//!
//! Terraform (state format v3) stores every resource attribute as a flat table of strings.
//! Nested values are spread over several keys:
//!
//! | **key**        | **value** | **meaning**                      |
//! |----------------|-----------|----------------------------------|
//! | `vars.%`       | `2`       | `vars` is a map with 2 entries   |
//! | `vars.user`    | `admin`   | entry `user` of map `vars`       |
//! | `vars.port`    | `22`      | entry `port` of map `vars`       |
//! | `groups.#`     | `2`       | `groups` is a list of length 2   |
//! | `groups.0`     | `web`     | first element of list `groups`   |
//! | `groups.1`     | `db`      | second element of list `groups`  |
//!
//! Only one level of nesting is decoded. A key is split into `<prefix>.<subkey>` and the subkey is
//! interpreted according to the requested shape ([decode_mapping] or [decode_sequence]).
use crate::value::{Mapping, Value};

/// Flat attribute table of a single resource
pub type FlatAttributes = indexmap::IndexMap<String, String>;

/// Subkey holding the length of a flattened list
pub const SEQUENCE_COUNT: &str = "#";

/// Subkey holding the number of entries of a flattened map
pub const MAPPING_COUNT: &str = "%";

/// Longest flattened list that gets decoded, larger count markers are rejected
pub const MAX_SEQUENCE_LEN: usize = 1 << 20;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("list `{prefix}` has no count marker `{prefix}.#`")]
    MissingCountMarker { prefix: String },
    #[error("count marker `{prefix}.#` is not a valid length: {value:?}")]
    InvalidCountMarker { prefix: String, value: String },
    #[error("key `{prefix}.{subkey}` is not a valid list index")]
    MalformedIndex { prefix: String, subkey: String },
    #[error("index {index} of list `{prefix}` is out of range (length {len})")]
    OutOfRangeIndex {
        prefix: String,
        index: usize,
        len: usize,
    },
}

/// All `(subkey, value)` pairs whose key is `<prefix>.<subkey>`
fn subkeys<'a>(
    prefix: &'a str,
    attributes: &'a FlatAttributes,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    attributes.iter().filter_map(move |(key, value)| {
        let subkey = key.strip_prefix(prefix)?.strip_prefix('.')?;
        Some((subkey, value.as_str()))
    })
}

/// Strict non-negative integer in canonical form
///
/// Digits only (no sign, no whitespace) and no leading zeros, so `0` and `00` can not
/// address the same slot.
fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if s.len() > 1 && s.starts_with('0') {
        return None;
    }

    s.parse().ok()
}

/// Decode the flattened map stored under `prefix`
///
/// The entry count marker (`<prefix>.%`) is not data and gets dropped.
/// Returns an empty mapping when no key matches.
pub fn decode_mapping(prefix: &str, attributes: &FlatAttributes) -> Mapping {
    subkeys(prefix, attributes)
        .filter(|(subkey, _)| *subkey != MAPPING_COUNT)
        .map(|(subkey, value)| (subkey.to_string(), Value::from(value)))
        .collect()
}

/// Decode the flattened list stored under `prefix`
///
/// The length is taken from the count marker `<prefix>.#` and never changes afterwards.
/// Every other key below `prefix` must be an index within that length. Slots without a key
/// stay `None`.
pub fn decode_sequence(
    prefix: &str,
    attributes: &FlatAttributes,
) -> Result<Vec<Option<Value>>, DecodeError> {
    let Some(count) = attributes.get(&format!("{prefix}.{SEQUENCE_COUNT}")) else {
        return Err(DecodeError::MissingCountMarker {
            prefix: prefix.to_string(),
        });
    };

    let invalid_count = || DecodeError::InvalidCountMarker {
        prefix: prefix.to_string(),
        value: count.clone(),
    };

    let len = parse_index(count)
        .filter(|len| *len <= MAX_SEQUENCE_LEN)
        .ok_or_else(invalid_count)?;

    let mut sequence: Vec<Option<Value>> = Vec::new();
    sequence
        .try_reserve_exact(len)
        .map_err(|_| invalid_count())?;
    sequence.resize(len, None);

    for (subkey, value) in subkeys(prefix, attributes) {
        if subkey == SEQUENCE_COUNT {
            continue;
        }

        let Some(index) = parse_index(subkey) else {
            return Err(DecodeError::MalformedIndex {
                prefix: prefix.to_string(),
                subkey: subkey.to_string(),
            });
        };

        let Some(slot) = sequence.get_mut(index) else {
            return Err(DecodeError::OutOfRangeIndex {
                prefix: prefix.to_string(),
                index,
                len,
            });
        };

        tracing::trace!(prefix, index, value, "list element");
        *slot = Some(value.into());
    }

    Ok(sequence)
}
