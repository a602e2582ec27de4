//! Document store and similarity retrieval for lexgate.
//!
//! Documents are loaded once at startup, each gets a vector from a
//! [`VectorSource`], and queries return the top-K documents by inner
//! product. Only the vector source is swappable; the ranking contract
//! (descending score, ties in load order, bounded excerpts) is fixed.

pub mod retriever;
pub mod source;
pub mod store;
pub mod vector;

pub use retriever::{Retriever, index};
pub use source::{ModelVectorSource, RandomVectorSource, VectorSource, build_vector_source};
pub use store::{DocumentStore, fallback_documents};
pub use vector::{VectorIndex, excerpt, inner_product};
