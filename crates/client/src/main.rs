//! Green World Client - command line entry point
//!
//! Signs in with `GREENWORLD_EMAIL` / `GREENWORLD_PASSWORD`, prints the
//! waste history and inbox, optionally classifies the image at
//! `GREENWORLD_IMAGE`, then follows live updates until Ctrl-C.

use std::path::PathBuf;

use anyhow::{bail, Context};
use greenworld_client::image::FileImagePicker;
use greenworld_client::views::{
    HomeView, IdentifyView, LoginView, NotificationsView, WasteHistoryView,
};
use greenworld_client::{ApiClient, ClassifierClient, ClientConfig, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greenworld_client=debug,greenworld=debug")),
        )
        .init();

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let api = ApiClient::from_config(&config)?;
    let classifier = ClassifierClient::from_config(&config);
    let session = Session::new();

    let mut login = LoginView::new();
    login.set_email(std::env::var("GREENWORLD_EMAIL").unwrap_or_default());
    login.set_password(std::env::var("GREENWORLD_PASSWORD").unwrap_or_default());

    if !login.submit(&api, &session).await {
        for (field, message) in login.form.errors().iter() {
            tracing::error!(%field, %message, "sign in rejected");
        }
        bail!("could not sign in");
    }

    if let HomeView::Member { name, points } = HomeView::for_session(&session) {
        tracing::info!(%name, points, "welcome");
    }

    let mut history = WasteHistoryView::new();
    history.load(&api).await;
    for waste in history.wastes() {
        tracing::info!(
            id = waste.id,
            waste_type = waste.type_label(),
            status = waste.status.label(),
            "waste"
        );
    }

    let mut inbox = NotificationsView::new();
    inbox.load(&api, &session).await;
    tracing::info!(unread = inbox.unread_count(), "notifications loaded");

    if let Ok(path) = std::env::var("GREENWORLD_IMAGE") {
        let mut identify = IdentifyView::new();
        let picker = FileImagePicker::new(Some(PathBuf::from(path)));
        identify.pick_and_identify(&picker, &classifier).await;
        match (&identify.result, &identify.error) {
            (Some(label), _) => tracing::info!(%label, "identified"),
            (None, Some(error)) => tracing::error!(%error, "identification failed"),
            (None, None) => tracing::info!("no image selected"),
        }
    }

    history.subscribe(&config, &session);
    inbox.subscribe(&config, &session);

    tokio::signal::ctrl_c().await?;

    history.unsubscribe();
    inbox.unsubscribe();
    if let Err(e) = api.sign_out().await {
        tracing::warn!(error = %e, "server sign out failed");
    }
    session.clear();

    Ok(())
}
