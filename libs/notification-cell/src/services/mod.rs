pub mod notifier;
pub mod mail_relay;
pub mod dispatcher;

pub use notifier::Notifier;
pub use mail_relay::MailRelayNotifier;
pub use dispatcher::NotificationDispatcher;
