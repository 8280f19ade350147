//! Field-level normalizers: manuscript identifiers, author lists and dates.

pub mod authors;
pub mod dates;
pub mod identifier;

pub use authors::AuthorNameParser;
pub use identifier::IdentifierNormalizer;
