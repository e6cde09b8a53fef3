pub mod dispatch;
pub mod pause;
pub mod push;

pub use dispatch::*;
pub use pause::*;
pub use push::*;

use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(20);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);
pub const DEFAULT_COOLDOWN_POLL: Duration = Duration::from_secs(1);
