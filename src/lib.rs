//! Share-card generation: a fixed 800x1000 canvas composed from a
//! background template, auto-fitted quote text, a QR code for the
//! source link and optional captions, exposed over a small HTTP API.

pub mod api;
pub mod card;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod layout;
pub mod openapi;
pub mod qr;
pub mod resources;
pub mod text;
pub mod util;

pub use card::CardRequest;
pub use config::CardConfig;
pub use error::CardError;
