pub mod providers;

pub use providers::{
    MockPushProvider, ProviderError, ProviderResponse, PushNotification, PushProvider,
    PushoverProvider, NOTIFICATION_TITLE, PHONE_PLACEHOLDER,
};
