use super::MemberName;
use color_eyre::eyre::Result;

/// Outbound announcement sent after a member has been created.
#[async_trait::async_trait]
pub trait MemberNotifier {
    async fn notify_member_created(&self, name: &MemberName) -> Result<()>;
}
