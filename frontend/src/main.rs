#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    use axum::Router;
    use frontend::app::*;
    use frontend::environment::ENVIRONMENT;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use std::process::ExitCode;
    use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let log_filter = tracing_subscriber::filter::Targets::new()
        .with_default(tracing::Level::INFO)
        .with_target("leptos_set_password", tracing::Level::DEBUG)
        .with_target("tokio", tracing::Level::WARN)
        .with_target("runtime", tracing::Level::WARN);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_thread_names(false)
        .with_thread_ids(false);

    tracing_subscriber::Registry::default()
        .with(fmt_layer.with_filter(log_filter))
        .init();

    // Without the auth service settings the page cannot do anything useful.
    if let Err(err) = ENVIRONMENT.as_ref() {
        tracing::error!(%err, "Refusing to start with an incomplete environment.");
        return ExitCode::FAILURE;
    }

    let conf = match get_configuration(None) {
        Ok(conf) => conf,
        Err(err) => {
            tracing::error!(%err, "Could not read leptos configuration.");
            return ExitCode::FAILURE;
        }
    };
    let addr = conf.leptos_options.site_addr;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    tracing::info!("listening on http://{addr}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, %addr, "Could not bind.");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!(%err, "Server stopped unexpectedly.");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
