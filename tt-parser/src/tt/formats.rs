//! Output formats for node arrays
//!
//!     json      the persisted intermediate representation used by the parse cache
//!     treeviz   one line per node tree view for humans

pub mod json;
pub mod treeviz;

pub use json::{from_persisted_str, to_persisted_string};
pub use treeviz::to_treeviz_str;
