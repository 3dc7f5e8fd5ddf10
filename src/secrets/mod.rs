//! # Secret Resolution
//!
//! Masked-value detection and decryption for provisioning configuration.
//!
//! Values shaped `ENC(<ciphertext>)` or `ENC(<ciphertext>,<alias>)` are
//! decrypted through backends held in a [`KeyRing`]; everything else passes
//! through untouched. See [`Decryptor`] for the resolution rules.

pub mod decryptor;
pub mod keyring;

pub use decryptor::Decryptor;
pub use keyring::{KeyRing, SecretDecryptor};
