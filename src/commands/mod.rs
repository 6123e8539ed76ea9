pub mod build;
pub mod fetch;
pub mod hierarchy;
pub mod site;

pub use build::build_command;
pub use fetch::fetch_command;
pub use hierarchy::hierarchy_command;
pub use site::site_command;
