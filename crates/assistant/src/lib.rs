//! Design assistant core: turns free-text commands into corrections and
//! applies them to a design's per-color cluster allocation.

pub mod applicator;
pub mod color_match;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod projection;
pub mod session;
pub mod validate;

pub use applicator::{apply_correction, AppliedCorrection};
pub use color_match::{default_synonyms, ColorMatcher, MatchStage, SynonymTable};
pub use error::AssistantError;
pub use interpreter::{CommandInterpreter, LocalInterpreter};
pub use parser::{parse_command, CommandParser, CommandPattern};
pub use projection::{distribute_clusters, project, snapshot_of};
pub use session::{DesignSession, DesignStore, HistoryEntry, HistoryOutcome};
pub use validate::validate_remote_reply;
