// Notion comment bot - server core
//
// Receives Notion page webhooks, asks Gemini for a short reaction comment on
// the page and posts it back as a Notion comment. A flag-gated debug log is
// kept in the same property store that holds the credentials.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
