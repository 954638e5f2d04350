pub mod check_write;
pub mod hash;
pub mod human_bytes;
pub mod shell;
pub mod translate;
pub mod url;
pub mod version;
