//! Fire-and-forget email notifications.

pub mod email;

pub use email::{EmailConfig, EmailNotifier};

use khelo_core::types::DbId;
use khelo_db::repositories::UserRepo;

use crate::state::AppState;

/// Notify the project's stakeholders (creator plus Managers/Admins) about
/// an action on a project.
///
/// Spawned onto the runtime so delivery never blocks or fails the
/// triggering request. The actor is excluded from the recipient list.
pub fn notify_project_event(
    state: &AppState,
    project_id: DbId,
    actor_id: DbId,
    project_name: String,
    action: &'static str,
) {
    let Some(mailer) = state.mailer.clone() else {
        return;
    };
    let pool = state.pool.clone();

    tokio::spawn(async move {
        let actor = match UserRepo::find_by_id(&pool, actor_id).await {
            Ok(Some(user)) => user,
            _ => return,
        };

        let recipients = match UserRepo::notification_recipients(&pool, project_id).await {
            Ok(recipients) => recipients,
            Err(e) => {
                tracing::warn!(error = %e, project_id, "Failed to load notification recipients");
                return;
            }
        };

        for (name, email) in recipients {
            if email == actor.email {
                continue;
            }
            if let Err(e) = mailer
                .send_project_notification(&email, &name, &actor.name, &project_name, action)
                .await
            {
                tracing::warn!(error = %e, to = %email, "Failed to send notification email");
            }
        }
    });
}
