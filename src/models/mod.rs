mod link;

pub use link::{CreateLinkRequest, LinkRecord, LinkRow};
