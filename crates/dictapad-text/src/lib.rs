//! Dictapad Text crate - Normalization of dictated fragments and the host document model.
//!
//! [`normalize`] is a pure function: it takes a new fragment, the text it
//! will follow and the dictation language, and returns the cleaned fragment.
//! [`Document`] applies keyboard commands and normalized dictation at a cursor.

pub mod document;
pub mod normalize;
pub mod rules;

pub use document::Document;
pub use normalize::normalize;
