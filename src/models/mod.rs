pub mod commit;
pub mod layout;

pub use commit::*;
pub use layout::*;
