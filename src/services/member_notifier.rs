use color_eyre::eyre::Result;
use reqwest::{Client, Url};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::{
    app_state::MemberNotifierType,
    domain::{MemberName, MemberNotifier},
};

pub const GREET_PATH: &str = "/greet";

pub struct HttpMemberNotifier {
    http_client: Client,
    base_url: String,
}

impl HttpMemberNotifier {
    pub fn new(base_url: String, http_client: Client) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl MemberNotifier for HttpMemberNotifier {
    #[tracing::instrument(name = "Sending member notification", skip_all)]
    async fn notify_member_created(&self, name: &MemberName) -> Result<()> {
        let base = Url::parse(&self.base_url)?;
        let url = base.join(GREET_PATH)?;

        let request_body = GreetRequest {
            name: name.as_ref(),
        };

        self.http_client
            .post(url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct GreetRequest<'a> {
    name: &'a str,
}

/// Sends the creation notice on its own task. The outcome is only ever
/// logged, never returned.
pub fn dispatch_member_created(
    notifier: MemberNotifierType,
    name: MemberName,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            if let Err(e) = notifier.notify_member_created(&name).await {
                tracing::warn!(
                    member = %name.as_ref(),
                    error = ?e,
                    "Member notification failed"
                );
            }
        }
        .in_current_span(),
    )
}
