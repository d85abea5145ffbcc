pub mod colors;
pub mod document;
pub mod format;
pub mod lines;
mod notepad;
pub mod settings;
pub mod storage;

pub use colors::{Color, ColorMapping, VariableColorAssigner};
pub use document::{Text, TextData, TextId};
pub use format::{format_value, FormattedValue};
pub use lines::{Evaluator, Line, LineEvaluator, Segment};
pub use notepad::{Notepad, NotepadError};
pub use settings::{Settings, SETTINGS_WIDTH_MAX, SETTINGS_WIDTH_MIN};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
