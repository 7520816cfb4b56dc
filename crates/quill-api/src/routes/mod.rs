//! # API Route Modules
//!
//! - [`health`] and [`login`] are public.
//! - [`comments`] sits behind the bearer-token gate.

pub mod comments;
pub mod health;
pub mod login;
