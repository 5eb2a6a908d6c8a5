//! `diploma notifications`: messages the node has sent to a recipient.

use serde::Deserialize;

use diploma_core::Notification;

use super::client::NodeClient;

#[derive(Deserialize)]
struct NotificationsResponse {
    notifications: Vec<Notification>,
}

pub async fn run(client: &NodeClient, recipient_id: &str) -> anyhow::Result<()> {
    let resp: NotificationsResponse = client
        .get(&format!("/notifications/{}", recipient_id))
        .await?;

    if resp.notifications.is_empty() {
        println!("No notifications for {}", recipient_id);
        return Ok(());
    }

    println!("Notifications for {}:", recipient_id);
    for n in &resp.notifications {
        println!("  [{}] {}", n.sent_at.format("%Y-%m-%d %H:%M:%S"), n.message);
    }
    Ok(())
}
