pub use api::*;
pub use extensions::*;
pub use types::*;

mod api;
mod extensions;
mod types;
