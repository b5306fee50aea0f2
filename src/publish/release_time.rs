/// Release timestamp resolution for new and edited claims
use super::form::{PublishFormState, ReplaySource, Visibility};
use super::tags::ContentTag;
use crate::claims::Claim;
use crate::error::ResolveError;

/// Far-future release time that hides private and unlisted content
pub const YEAR_2038_TS: i64 = 2_147_483_647;

/// What the claim being edited looked like before this publish
struct PastClaim {
    was_hidden: bool,
    was_scheduled: bool,
    timestamp: Option<i64>,
    release_time: Option<i64>,
    creation_timestamp: Option<i64>,
}

impl PastClaim {
    fn from_claim(claim: &Claim) -> Self {
        let tags: Vec<ContentTag> = claim.tags().iter().map(|t| ContentTag::parse(t)).collect();
        Self {
            was_hidden: tags.iter().any(ContentTag::is_hidden),
            was_scheduled: tags.iter().any(ContentTag::is_scheduled),
            timestamp: claim.timestamp,
            release_time: claim.value.release_time,
            creation_timestamp: claim.meta.creation_timestamp,
        }
    }

    /// Previous release time, or the claim timestamp when it had none
    fn previous_release(&self) -> Option<i64> {
        self.release_time
            .filter(|t| *t != 0)
            .or(self.timestamp)
    }
}

/// Resolve the release time for a publish.
///
/// `None` means no past timestamp was available; the payload builder falls
/// back to `now` in that case.
pub fn resolve_release_time(
    now: i64,
    user_entered: Option<i64>,
    claim_to_edit: Option<&Claim>,
    form: &PublishFormState,
) -> Result<Option<i64>, ResolveError> {
    let past = claim_to_edit.map(PastClaim::from_claim);

    match form.visibility {
        Visibility::Public => match past {
            Some(past) => {
                if form.is_livestream_publish && form.replay_source != ReplaySource::Keep {
                    return Ok(past.previous_release());
                }

                match user_entered {
                    Some(ts) => Ok(Some(ts)),
                    None if past.was_hidden || past.was_scheduled => Ok(past.creation_timestamp),
                    None => Ok(past.previous_release()),
                }
            }
            None => Ok(Some(user_entered.unwrap_or(now))),
        },
        Visibility::Private | Visibility::Unlisted => Ok(Some(YEAR_2038_TS)),
        Visibility::Scheduled => match past {
            Some(past) => match user_entered {
                Some(ts) => Ok(Some(ts)),
                None if past.was_hidden => Ok(past.creation_timestamp),
                None => Ok(past.previous_release()),
            },
            None => user_entered
                .filter(|ts| *ts != 0)
                .map(Some)
                .ok_or(ResolveError::MissingScheduledReleaseTime),
        },
    }
}
