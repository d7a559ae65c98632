pub mod source;
pub mod storage;
pub mod types;

pub use source::{CompetitionSource, FileSource, InMemorySource};
pub use storage::{get_data_path, load_competition, save_competition};
pub use types::CompetitionData;
