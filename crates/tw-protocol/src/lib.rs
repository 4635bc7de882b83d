pub mod chat;
pub mod optimizer;
pub mod warnings;
pub mod weights;

pub use chat::*;
pub use optimizer::*;
pub use warnings::*;
pub use weights::*;
