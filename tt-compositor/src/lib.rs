//! Template rule composition for tagged text
//!
//!     This crate turns parsed content files into publication text. Templates are tagged text
//!     files too: their top level nodes are rules (`tag`, `tag-list`, `file-opening`, ...) and
//!     the children of a rule are the sub pieces that say what to emit.
//!
//!     The spine file ties everything together: it names the folders, the variables, and the
//!     publication units, each one an output file plus the content and template files used to
//!     produce it.
//!
//! Architecture
//!
//!     - Registry: parsed templates with their trigger maps, and parsed content files
//!     - ContentPiece: one content node bound to the rules found for its tag
//!     - Compositor: walks a content array and applies rules into an OutputTree
//!     - Spine: interprets the spine file into folders, variables and publication units
//!     - render: the whole pipeline, parse (or reuse the cache) then compose then write
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── registry.rs          # templates, triggers and rule lookup
//!     ├── rules.rs             # rule and sub piece vocabulary, compiled tag-list rules
//!     ├── content_piece.rs
//!     ├── compositor.rs        # rule application
//!     ├── output.rs            # the developing output tree
//!     ├── counters.rs
//!     ├── variables.rs
//!     ├── spine.rs
//!     ├── paths.rs
//!     ├── cache.rs             # persisted node arrays reused across runs
//!     ├── publish.rs
//!     └── render.rs
//!
//!     Nothing here prints. Progress is reported through the `log` facade and the
//!     [RenderReport](render::RenderReport) returned by [render](render::render).

pub mod cache;
pub mod compositor;
pub mod content_piece;
pub mod counters;
pub mod error;
pub mod output;
pub mod paths;
pub mod publish;
pub mod registry;
pub mod render;
pub mod rules;
pub mod spine;
pub mod variables;

pub use compositor::Compositor;
pub use error::{CompositorError, RenderError, SpineError};
pub use output::OutputTree;
pub use registry::{Registry, RuleRef, Template};
pub use render::{render, RenderReport};
pub use spine::{PublicationUnit, Spine};
