use shared::{
    domain::{SignupOutcome, UnregisterOutcome},
    error::{ApiError, ErrorCode},
    protocol::{ActivityListing, ActivitySummary, MessageResponse},
};
use storage::{ActivitySnapshot, RosterError, RosterStore};
use tracing::warn;

#[derive(Clone)]
pub struct ApiContext {
    pub roster: RosterStore,
}

pub async fn list_activities(ctx: &ApiContext) -> ActivityListing {
    ctx.roster
        .list_activities()
        .await
        .into_iter()
        .map(|activity| (activity.name.clone(), summarize(activity)))
        .collect()
}

pub async fn get_activity(
    ctx: &ApiContext,
    activity_name: &str,
) -> Result<ActivitySummary, ApiError> {
    let activity = ctx
        .roster
        .activity(activity_name)
        .await
        .map_err(roster_error)?;
    Ok(summarize(activity))
}

pub async fn signup(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
    name: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    let name = name.map(str::trim).filter(|name| !name.is_empty());
    let outcome = ctx
        .roster
        .signup(activity_name, email, name)
        .await
        .map_err(roster_error)?;

    Ok(MessageResponse::new(match outcome {
        SignupOutcome::Registered => format!("Signed up {email} for {activity_name}"),
        SignupOutcome::AlreadyRegistered => {
            format!("{email} is already signed up for {activity_name}")
        }
    }))
}

pub async fn unregister(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
) -> Result<MessageResponse, ApiError> {
    let outcome = ctx
        .roster
        .unregister(activity_name, email)
        .await
        .map_err(roster_error)?;

    Ok(MessageResponse::new(match outcome {
        UnregisterOutcome::Removed => format!("Unregistered {email} from {activity_name}"),
        UnregisterOutcome::NotRegistered => {
            format!("{email} was not signed up for {activity_name}")
        }
    }))
}

fn summarize(activity: ActivitySnapshot) -> ActivitySummary {
    let participants = activity.participant_emails();
    ActivitySummary::new(activity.details, participants)
}

fn roster_error(err: RosterError) -> ApiError {
    match err {
        RosterError::NotFound(name) => {
            warn!(activity = %name, "activity not found");
            ApiError::activity_not_found()
        }
        // Only `RosterStore::from_seed` raises this, at startup; no request
        // path reaches it. Mapped for exhaustiveness.
        RosterError::DuplicateActivity(name) => ApiError::new(
            ErrorCode::Validation,
            format!("activity '{name}' is defined more than once"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::ActivitySeed;

    fn setup() -> ApiContext {
        ApiContext {
            roster: RosterStore::from_seed(ActivitySeed::defaults()).expect("seed"),
        }
    }

    #[tokio::test]
    async fn listing_reports_live_participant_counts() {
        let ctx = setup();
        let listing = list_activities(&ctx).await;
        let kayaking = listing.get("Kayaking Trip").expect("kayaking");
        assert_eq!(kayaking.participants_count, kayaking.participants.len());
        assert!(listing.contains_key("Trail Run"));
    }

    #[tokio::test]
    async fn signup_message_confirms_signup() {
        let ctx = setup();
        let response = signup(&ctx, "Trail Run", "jdoe@example.com", Some("John Doe"))
            .await
            .expect("signup");
        assert!(response.message.contains("Signed up"));

        let again = signup(&ctx, "Trail Run", "jdoe@example.com", None)
            .await
            .expect("repeat signup");
        assert!(again.message.contains("already signed up"));

        let activity = get_activity(&ctx, "Trail Run").await.expect("activity");
        assert_eq!(activity.participants, vec!["jdoe@example.com".to_string()]);
        assert_eq!(activity.participants_count, 1);
    }

    #[tokio::test]
    async fn blank_display_name_is_dropped() {
        let ctx = setup();
        signup(&ctx, "Trail Run", "blank@example.com", Some("   "))
            .await
            .expect("signup");
        let activity = ctx.roster.activity("Trail Run").await.expect("activity");
        assert_eq!(activity.participants[0].name, None);
    }

    #[tokio::test]
    async fn unregister_messages_distinguish_outcomes() {
        let ctx = setup();
        let removed = unregister(&ctx, "Chess Club", "michael@mergington.edu")
            .await
            .expect("unregister");
        assert!(removed.message.starts_with("Unregistered"));

        let absent = unregister(&ctx, "Chess Club", "michael@mergington.edu")
            .await
            .expect("unregister");
        assert!(absent.message.contains("was not signed up"));
    }

    #[test]
    fn startup_only_duplicate_error_maps_to_validation() {
        let err = roster_error(RosterError::DuplicateActivity("Trail Run".into()));
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(err.message.contains("Trail Run"));

        let err = roster_error(RosterError::NotFound("Trail Run".into()));
        assert!(err.is_not_found());
        assert_eq!(err.message, "Activity not found");
    }

    #[tokio::test]
    async fn unknown_activity_maps_to_not_found() {
        let ctx = setup();
        let err = signup(&ctx, "This Doesnt Exist", "a@b.com", None)
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::NotFound));

        let err = unregister(&ctx, "This Doesnt Exist", "a@b.com")
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::NotFound));

        let err = get_activity(&ctx, "This Doesnt Exist")
            .await
            .expect_err("should fail");
        assert!(matches!(err.code, ErrorCode::NotFound));
    }
}
