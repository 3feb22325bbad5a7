pub mod encoding;
pub mod errors;
pub mod meta;
pub mod stage;

pub use encoding::*;
pub use errors::*;
pub use meta::*;
pub use stage::*;
