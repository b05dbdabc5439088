//! Language file input: the `.lang` line format and directory discovery.
pub mod discovery;
pub mod lang;

pub use discovery::{
    find_lang_files,
    read_directory,
};
pub use lang::{
    LangError,
    read_file,
    read_str,
};
