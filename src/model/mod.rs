pub mod connection;
pub mod conversion;
pub mod layout;
pub mod node;

pub use connection::*;
pub use conversion::*;
pub use layout::*;
pub use node::*;
