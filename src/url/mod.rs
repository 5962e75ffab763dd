//! URL handling: host extraction and same-domain link sanitization

mod domain;
mod links;

pub use domain::extract_domain;
pub use links::same_domain_link;
