pub mod fixtures;

pub use fixtures::{Workspace, workspace};
