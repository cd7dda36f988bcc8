// Per-match broadcast channels for live scoreboards.
pub use bus::EventBus;
pub use events::MatchEvent;

mod bus;
mod events;
