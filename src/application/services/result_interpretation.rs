//! Result interpretation - Map a finished case to the host action it triggers

use tracing::debug;

use crate::application::dto::{ActionMap, AppAction, ResultData, ResultPayload, ResultType, GAME_TYPE};

/// Failure to turn a result into a host-deliverable payload
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResultDispatchError {
    #[error("Action key \"{0}\" not found in the host action map")]
    MissingAction(AppAction),
}

/// Pick the host action for a result. Results from other game types fall back
/// to the base `done` action.
pub fn classify_outcome(data: &ResultData) -> AppAction {
    if data.game_type != GAME_TYPE {
        return AppAction::Done;
    }

    let details = &data.details_for_parent;
    if details.investigation_complete {
        AppAction::CaseSolvedPerfect
    } else if data.completed && details.suspect_identified {
        AppAction::CaseSolved
    } else if data.completed {
        AppAction::CasePartiallyResolved
    } else if details.time_expired {
        AppAction::TimeExpired
    } else {
        AppAction::CaseIncomplete
    }
}

/// Build the payload for the host, resolving the classified action to its id
pub fn interpret_result(
    result_type: &ResultType,
    data: ResultData,
    actions: &ActionMap,
) -> Result<ResultPayload, ResultDispatchError> {
    let action = classify_outcome(&data);
    let uid = actions
        .resolve(action)
        .ok_or(ResultDispatchError::MissingAction(action))?;

    debug!(%action, uid, "Resolved result action");

    Ok(ResultPayload {
        result_type: result_type.clone(),
        data,
        actions: vec![uid.to_string()],
    })
}
