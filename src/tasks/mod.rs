//! Background timer tasks
//!
//! Each timed process of a session runs as its own tokio task and is owned
//! through a [`TimerHandle`] kept by the component it drives. Tasks only hold
//! weak references to that component and re-check its epoch under the lock
//! before every mutation.

pub mod breath_cycler;
pub mod countdown_ticker;
pub mod handle;
pub mod presence_drift;

// Re-export main functions
pub use breath_cycler::spawn_breath_cycler;
pub use countdown_ticker::spawn_countdown_ticker;
pub use handle::TimerHandle;
pub use presence_drift::spawn_presence_drift;
