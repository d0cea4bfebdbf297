pub mod catalog;
pub mod console;
pub mod library;
pub mod membership;
pub mod session;

pub use crate::domain::model::{Book, BookId, Member, MemberId, Snapshot, SortKey};
pub use crate::domain::ports::{ConfigProvider, Repository};
pub use crate::utils::error::Result;
