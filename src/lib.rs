//! Retrieval-augmented chat over local documents.
//!
//! Documents (text files, PDFs, web pages) are loaded, split into overlapping
//! chunks, embedded, and held in a similarity-searchable index; questions are
//! answered by streaming a model completion grounded in the retrieved chunks.

pub mod application;
pub mod domain;
pub mod infrastructure;
