use cspm_client::ClientError;
use cspm_db::DatabaseError;
use thiserror::Error;

/// Errors that abort a collection run.
///
/// A failed resource listing for a single control is not among them during a
/// full run: it is logged and counted in
/// [`CollectSummary::controls_failed`](crate::CollectSummary::controls_failed).
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to get compliance requirements: {0}")]
    Requirements(#[source] ClientError),

    #[error("failed to get resources for control {control_id}: {source}")]
    ControlResources {
        control_id: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to get inventory: {0}")]
    Inventory(#[source] ClientError),

    #[error("failed to get risk acceptances: {0}")]
    RiskAcceptances(#[source] ClientError),

    #[error("failed to save {what}: {source}")]
    Persist {
        what: String,
        #[source]
        source: DatabaseError,
    },
}

impl CollectError {
    pub(crate) fn persist(what: impl Into<String>) -> impl FnOnce(DatabaseError) -> Self {
        let what = what.into();
        move |source| Self::Persist { what, source }
    }
}
