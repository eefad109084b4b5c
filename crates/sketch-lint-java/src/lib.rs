//! # sketch-lint-java
//!
//! Tree-sitter based Java frontend for sketch-lint.
//!
//! [`JavaSourceParser`] turns `.java` files into the language-neutral syntax
//! model of `sketch-lint-core`. The [`library`] module lists the types of the
//! library namespace for wildcard imports.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod java;
mod kind;
pub mod library;

pub use java::JavaSourceParser;
pub use library::{lister_from_config, ArchiveLister, ChainLister, ClassDirLister, SourceDirLister};
