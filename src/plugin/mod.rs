pub mod builtin;
pub mod path;
pub mod registry;
