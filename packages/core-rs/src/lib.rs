pub mod ai;
pub mod config;
pub mod error;
pub mod history;
pub mod scanner;
pub mod summary;
pub mod types;

pub use ai::*;
pub use config::*;
pub use error::*;
pub use history::*;
pub use scanner::*;
pub use summary::*;
pub use types::*;
