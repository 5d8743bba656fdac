use leptos::prelude::*;

use crate::bootstrap::{MountGuard, bootstrap_session};
use crate::client::AuthClient;
use crate::flow::{FormState, PasswordFlow, SubmissionStatus, submit_password};

/// Text shown once the password was saved.
pub fn success_message(app_name: &str) -> String {
    format!(
        "Password saved! Download the {app_name} app from the App Store or Google Play and sign in with your new password."
    )
}

/// Label of the submit button. Only a pending submission changes it.
pub fn submit_label(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Loading => "Saving…",
        SubmissionStatus::Idle | SubmissionStatus::Success | SubmissionStatus::Error => {
            "Save password"
        }
    }
}

/// The set-password form a user lands on when following an invite link.
///
/// On mount (client side only), the invite credentials are read from the URL fragment and used
/// to establish a session with `client`. Submitting the form then sets the new password for that
/// session.
///
/// # Example
/// ```no_run
/// use leptos::prelude::*;
/// use leptos_set_password::{components::SetPasswordForm, AuthClientOptions, HostedAuthClient};
///
/// # #[component]
/// # fn Example(options: AuthClientOptions) -> impl IntoView {
/// view! {
///     <SetPasswordForm
///         client=HostedAuthClient::new(options)
///         app_name="Alera"
///         app_store_url=Some("https://apps.apple.com/app/id000000000".to_owned())
///     />
/// }
/// # }
/// ```
#[component]
pub fn SetPasswordForm<C>(
    /// Client used to establish the session and update the password.
    client: C,

    /// Name of the app the user should download after setting their password.
    #[prop(into)]
    app_name: String,

    /// Link to the app's App Store listing.
    #[prop(optional_no_strip)]
    app_store_url: Option<String>,

    /// Link to the app's Google Play listing.
    #[prop(optional_no_strip)]
    play_store_url: Option<String>,
) -> impl IntoView
where
    C: AuthClient,
{
    let client = StoredValue::new_local(client);
    let flow = RwSignal::new(PasswordFlow::default());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    // Effects never run on the server, which never sees the fragment anyway.
    // Nothing is tracked here, so this runs exactly once per mount.
    let guard = MountGuard::for_current_owner();
    Effect::new(move |_| {
        let fragment = match window().location().hash() {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!(?err, "Could not read URL fragment.");
                String::new()
            }
        };
        let client = client.get_value();
        let guard = guard.clone();
        leptos::task::spawn_local(async move {
            bootstrap_session(&client, &fragment, &guard, flow).await;
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = FormState::new(password.get_untracked(), confirm_password.get_untracked());
        let client = client.get_value();
        leptos::task::spawn_local(async move {
            if let Err(err) = submit_password(&client, flow, &form).await {
                tracing::debug!(?err, "Submission rejected.");
            }
        });
    };

    let locked = Signal::derive(move || flow.with(PasswordFlow::is_locked));
    let status = Signal::derive(move || flow.with(PasswordFlow::status));
    let error = Signal::derive(move || flow.with(|flow| flow.error().map(str::to_owned)));

    let title = format!("Set your {app_name} password");
    let intro = format!(
        "Create a secure password to access the {app_name} app. Once saved, download the app and sign in."
    );
    let success = success_message(&app_name);

    view! {
        <form class="set-password" on:submit=on_submit>
            <h1 class="set-password__title">{title}</h1>
            <p class="set-password__intro">{intro}</p>

            <label class="set-password__label" for="new-password">"New password"</label>
            <input
                id="new-password"
                class="set-password__input"
                type="password"
                autocomplete="new-password"
                placeholder="********"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
                disabled=move || locked.get()
            />

            <label class="set-password__label" for="confirm-password">"Confirm new password"</label>
            <input
                id="confirm-password"
                class="set-password__input"
                type="password"
                autocomplete="new-password"
                placeholder="********"
                prop:value=move || confirm_password.get()
                on:input=move |ev| confirm_password.set(event_target_value(&ev))
                disabled=move || locked.get()
            />

            <button
                id="save-password"
                class="set-password__submit"
                type="submit"
                disabled=move || locked.get()
            >
                {move || submit_label(status.get())}
            </button>

            <Show when=move || status.get() == SubmissionStatus::Success>
                <div id="password-saved" class="set-password__success">
                    {success.clone()}
                    <StoreLinks
                        app_store_url=app_store_url.clone()
                        play_store_url=play_store_url.clone()
                    />
                </div>
            </Show>

            {move || {
                error
                    .get()
                    .map(|error| {
                        view! {
                            <div id="password-error" class="set-password__error" role="alert">
                                {error}
                            </div>
                        }
                    })
            }}
        </form>
    }
}

#[component]
fn StoreLinks(app_store_url: Option<String>, play_store_url: Option<String>) -> impl IntoView {
    view! {
        <div class="set-password__stores">
            {app_store_url
                .map(|href| {
                    view! {
                        <a class="set-password__store" href=href target="_blank" rel="noopener">
                            "App Store"
                        </a>
                    }
                })}
            {play_store_url
                .map(|href| {
                    view! {
                        <a class="set-password__store" href=href target="_blank" rel="noopener">
                            "Google Play"
                        </a>
                    }
                })}
        </div>
    }
}
