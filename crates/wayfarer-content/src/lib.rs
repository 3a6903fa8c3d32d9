//! Wayfarer — content loading.
//!
//! Responsible for parsing tour descriptions, checking their integrity,
//! resolving asset references and producing the immutable tour model.

pub mod application;
pub mod domain;
