#[path = "wrap_cdcl.rs"]
pub mod cdcl;
