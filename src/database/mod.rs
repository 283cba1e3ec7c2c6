pub mod directory;
pub mod options;
