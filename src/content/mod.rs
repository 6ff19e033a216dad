pub mod archive_meta;
pub mod resolver;
pub mod viewer;

pub use archive_meta::{ArchiveItemMeta, ArchiveMetaClient};
pub use resolver::resolve;
pub use viewer::{buy_course_route, select, ViewTicket};
