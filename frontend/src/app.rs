use leptos::prelude::*;
use leptos_meta::{Meta, MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::*;
use leptos_routes::routes;
use leptos_set_password::{HostedAuthClient, components::SetPasswordForm};

use crate::environment::{APP_NAME, Environment};

#[routes]
pub mod routes {
    #[route("/set-password")]
    pub mod set_password {}
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Meta name="charset" content="UTF-8"/>
        <Meta name="description" content="Set your Alera password"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1.0"/>
        <Meta name="theme-color" content="#060606"/>

        <Stylesheet id="leptos" href="/pkg/frontend.css"/>

        <Title text="Set your Alera password"/>

        <main class="page">
            <Router>
                <Routes fallback=|| view! { "Page not found." }>
                    <Route path=routes::SetPassword.path() view=SetPasswordPage/>
                </Routes>
            </Router>
        </main>
    }
}

#[server]
async fn get_environment() -> Result<Environment, ServerFnError> {
    crate::environment::ENVIRONMENT
        .as_ref()
        .cloned()
        .map_err(|err| {
            tracing::error!(?err, "Environment is not configured.");
            ServerFnError::ServerError(err.to_string())
        })
}

#[component]
pub fn SetPasswordPage() -> impl IntoView {
    let environment = LocalResource::new(|| async move { get_environment().await });

    view! {
        <Suspense fallback=|| view! { <p class="page__loading">"Loading..."</p> }>
            {Suspend::new(async move {
                match environment.await {
                    Ok(env) => set_password_form(env).into_any(),
                    Err(err) => {
                        tracing::error!(?err, "Could not load page configuration.");
                        view! { <ConfigurationError/> }.into_any()
                    }
                }
            })}
        </Suspense>
    }
}

fn set_password_form(env: Environment) -> impl IntoView {
    // The one client instance for this page. Everything below gets it injected.
    let client = HostedAuthClient::new(env.auth);
    view! {
        <SetPasswordForm
            client=client
            app_name=APP_NAME
            app_store_url=env.app_store_url
            play_store_url=env.play_store_url
        />
    }
}

#[component]
fn ConfigurationError() -> impl IntoView {
    view! {
        <div id="configuration-error" class="page__fatal" role="alert">
            "This page is not configured correctly. Please try again later."
        </div>
    }
}
