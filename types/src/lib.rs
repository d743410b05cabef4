pub mod audio;
pub mod events;
pub mod session;

pub use events::{ClientEvent, ServerEvent};
pub use session::{Session, SessionConfigurator};
