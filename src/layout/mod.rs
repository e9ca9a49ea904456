pub mod decompose;
pub mod fix_root;
pub mod materialize;
pub mod path;

pub use decompose::{decompose, is_root, Decomposition, RootMatch, WithSubcommand};
pub use fix_root::{fix_root, CountMismatch, FixOutcome, RootEntries};
pub use materialize::{create_dir_tolerant, Materializer, NavMarker, PlacedDocument};
pub use path::{CommandPath, Document};
