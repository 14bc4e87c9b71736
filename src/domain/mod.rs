pub mod archive;
pub mod event;
pub mod family;
pub mod homepage;
pub mod localized;
pub mod message;
pub mod news;
pub mod staff;

pub use archive::*;
pub use event::*;
pub use family::*;
pub use homepage::*;
pub use localized::*;
pub use message::*;
pub use news::*;
pub use staff::*;
