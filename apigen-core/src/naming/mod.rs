//! Class and folder naming.
//!
//! Names are assigned in two passes. The first pass derives a candidate per
//! endpoint from its URL, its title, or a fixed default. The second pass
//! groups identical candidates and disambiguates each group with deeper URL
//! segments, falling back to a numeric position.

mod resolver;
mod sanitize;
mod translate;

pub use resolver::{NameAssignment, NameCandidate, NameResolver, MAX_URL_DEPTH};
pub use sanitize::{
    category_folder, pascal, path_params, sanitize_class_name, url_class_name, url_method_name,
    url_path, with_suffix, without_suffix, DEFAULT_CATEGORY_FOLDER, FALLBACK_CLASS_NAME,
};
pub use translate::{contains_cjk, Glossary, NameCache, Translator, DEFAULT_CACHE_CAPACITY};
