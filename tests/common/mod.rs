pub mod tracing {
    use std::sync::Once;
    use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

    static INIT: Once = Once::new();

    pub fn init_subscriber() {
        INIT.call_once(|| {
            let log_filter = tracing_subscriber::filter::Targets::new()
                .with_default(::tracing::Level::INFO)
                .with_target("leptos_set_password", ::tracing::Level::TRACE)
                .with_target("hyper", ::tracing::Level::WARN);

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(false)
                .with_thread_ids(false);

            tracing_subscriber::Registry::default()
                .with(fmt_layer.with_filter(log_filter))
                .init();
        });
    }
}

pub mod tokens {
    use serde_json::json;
    use time::OffsetDateTime;

    pub fn access_token_valid_for(seconds: i64) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &json!({
                "sub": super::USER_ID,
                "aud": "authenticated",
                "role": "authenticated",
                "email": super::USER_EMAIL,
                "exp": OffsetDateTime::now_utc().unix_timestamp() + seconds,
            }),
            &jsonwebtoken::EncodingKey::from_secret(b"mock-service-secret"),
        )
        .expect("encodable token")
    }
}

pub const USER_ID: &str = "a7060488-c80b-40c5-83e2-d7000bf9738e";
pub const USER_EMAIL: &str = "bob@foo.bar";
pub const PUBLIC_API_KEY: &str = "public-anon-key";
pub const VALID_REFRESH_TOKEN: &str = "v4lid-r3fresh";
