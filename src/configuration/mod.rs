//! This module contains all configuration-relevant code, including
//! the full configuration structure as well as methods needed to load
//! and validate it.
//!
//! Your starting point should probably be [`Configuration::load_from_default_path`].
//!
//! # Internals
//! The entire configuration structure is based on the concept of
//! unvalidated ("unresolved") and validated ("resolved") configuration
//! structures.
//!
//! For example, even though we're interacting with [`Configuration`],
//! it internally attempts to load the configuration file and deserialize it
//! into the [`UnresolvedConfiguration`] structure.
//! It will then call its `resolve`
//! method, which merges the built-in defaults over unset fields
//! (including the platform-resolved default backend id and the
//! built-in backend table) and validates the rest, e.g. raising an
//! error if the selected backend id has no entry in the backend table.
//!
//! The output will then be the [`Configuration`], which is resolved
//! once at startup and read-only for the remainder of the process
//! lifetime.

#![allow(rustdoc::private_intra_doc_links)]

mod defaults;
mod error;
mod structure;
mod traits;
mod utilities;

pub use defaults::{
    backend_family, process_environment, resolve_default_backend_id, BACKEND_FAMILIES,
    BACKEND_SCRIPT_SUFFIXES, DEFAULT_BACKEND_FAMILY,
};
pub use error::ConfigurationError;
pub use structure::*;
pub use utilities::{get_default_configuration_file_path, get_server_script_path};
