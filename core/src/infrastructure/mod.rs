// Infrastructure layer - reference implementations of the application ports

pub mod memory;

pub use memory::{MemoryAssignmentRepository, MemoryFolderGrantRepository, MemoryProfileRepository};
