//! Persisted intermediate representation
//!
//!     A node array is stored as a JSON list with one `[value, tag]` record per line:
//!
//!         [
//!         [[1, 2],"title"],
//!         ["Hello",""],
//!         ...
//!         ]
//!
//!     The value is either a string or a list of child indices. Writing and reading back
//!     must be lossless, including escaped line breaks, backslashes and quotes, since the
//!     parse cache relies on it.
//!
//!     An empty child list is written as `[]`. Older files wrote `""` instead; those still
//!     load, as an empty text value.

use crate::tt::ast::NodeArray;

/// Serialize a node array to the persisted file layout.
pub fn to_persisted_string(array: &NodeArray) -> Result<String, serde_json::Error> {
    let records = array
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[\n{}\n]", records.join(",\n")))
}

/// Read a node array back from its persisted form.
pub fn from_persisted_str(source: &str) -> Result<NodeArray, serde_json::Error> {
    serde_json::from_str(source)
}
