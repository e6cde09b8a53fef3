pub mod bark_notifier;
pub mod console_notifier;
pub mod multi_notifier;
