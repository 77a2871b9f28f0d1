//! A minimal interactive shell over an in-memory directory tree that is
//! persisted between sessions.
//!
//! [`session::Session`] is the entry point: it feeds each input line through
//! [`commands::dispatch`], applies the requested transitions and saves the
//! result through a [`session::SessionStore`].

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod filesystem;
pub mod session;
