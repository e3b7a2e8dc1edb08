pub use sat_forge_cdcl as cdcl;
pub use sat_forge_core as core;
pub use sat_forge_wrappers as wrappers;
