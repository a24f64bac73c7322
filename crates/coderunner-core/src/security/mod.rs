//! Security validation modules.

pub mod path;
pub mod permissions;

pub use path::clean_relative_dir;
pub use path::validate_root_name;
pub use permissions::apply_mode;
pub use permissions::effective_mode;
