pub mod game;
pub mod live_stream;

pub use game::Game;
pub use live_stream::{LiveStream, PreviewSize};
