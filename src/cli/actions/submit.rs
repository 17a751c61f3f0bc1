use crate::{
    auth::{AuthDispatcher, FileSessionStore, HttpIdentityService, LogNavigator, Navigator},
    config::AppConfig,
    form::{
        view::field_label, FormController, FormFields, FormMode, FormState, FormView,
        MessageKind, SubmitEvent,
    },
};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub mode: FormMode,
    pub fields: FormFields,
}

/// Prints the destination instead of opening it.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn go_to(&self, path: &str) {
        LogNavigator.go_to(path);
        println!("-> {path}");
    }
}

/// Submit one form and render every state change until the attempt settles.
///
/// # Errors
/// Returns an error if the client cannot be built or the attempt ends in an error.
pub async fn handle(args: Args) -> Result<()> {
    let service =
        HttpIdentityService::new(&args.config).context("failed to build identity client")?;
    let sessions = Arc::new(FileSessionStore::new(&args.config.session_file));
    let dispatcher =
        AuthDispatcher::new(service, sessions).with_landing_path(&args.config.landing_path);
    let controller = FormController::new(args.mode, dispatcher, Arc::new(TerminalNavigator));

    let mut switched = controller.subscribe();
    let renderer = tokio::spawn(render(controller.subscribe()));

    for key in controller.view().fields {
        controller.set_field(*key, args.fields.get(*key));
    }

    debug!(mode = %args.mode, "submitting");
    let mut event = SubmitEvent::new();
    controller.submit(&mut event).await;

    let state = controller.snapshot();
    if state.mode == FormMode::Signup && state.message.kind == MessageKind::Success {
        switched
            .wait_for(|state| state.mode == FormMode::Login)
            .await
            .context("form closed before switching to login")?;
    }

    controller.dispose();
    renderer.await.context("renderer stopped unexpectedly")?;

    match state.message.kind {
        MessageKind::Error => Err(anyhow!(state.message.text)),
        MessageKind::None | MessageKind::Success => Ok(()),
    }
}

/// Redraws on every notification; ends once the controller is gone.
async fn render(mut rx: watch::Receiver<FormState>) {
    let mut last = None;
    loop {
        let view = FormView::from_state(&rx.borrow_and_update());
        if last.as_ref() != Some(&view) {
            println!("{}", frame(&view));
            last = Some(view);
        }

        if rx.changed().await.is_err() {
            break;
        }
    }
}

fn frame(view: &FormView) -> String {
    let labels: Vec<&str> = view.fields.iter().map(|key| field_label(*key)).collect();
    let mut out = format!("[{}] {} | {}", view.mode, labels.join(" "), view.submit_label);
    if !view.submit_enabled {
        out.push_str(" (disabled)");
    }

    if let Some(banner) = &view.banner {
        let prefix = match banner.kind {
            MessageKind::Error => "error",
            MessageKind::Success | MessageKind::None => "ok",
        };
        out = format!("{out}\n  {prefix}: {}", banner.text);
    }

    out
}
