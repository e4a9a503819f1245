//! Helper functions shared by the generator, the server and templates

mod date;
mod html;
mod toc;
mod url;

pub use date::*;
pub use html::*;
pub use toc::*;
pub use url::*;
