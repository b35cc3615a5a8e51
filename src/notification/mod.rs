//! Alert and report delivery.

mod notifier;
mod telegram;

pub use notifier::*;
pub use telegram::{TelegramConfig, TelegramNotifier};
