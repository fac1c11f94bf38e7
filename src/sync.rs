//! Typed reconciliation between local models and the REST API.
//!
//! Every managed entity kind implements [`SyncedEntity`], describing how to
//! build request bodies from the local model, how to merge responses back
//! into it and which routes to use. [`Reconciler`] drives the lifecycle:
//!
//! ```text
//! Planned --create--> Synced --update--> Synced --delete--> Deleted
//!                       |
//!                       +--read (404)--> dropped
//! ```
//!
//! Each step is a single request (plus an optional version probe before
//! create and an optional follow-up update after it). Failures are returned
//! to the caller unchanged and no partial state is produced.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{ApiClient, Route};
use crate::error::{ProviderError, Result};

/// How an entity is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStrategy {
    /// `DELETE` on the entity route.
    HardDeleteById,
    /// Send an "empty" request carrying the last observed version.
    UpdateToEmptyWithVersion,
}

/// A local model that is kept in sync with one remote entity.
pub trait SyncedEntity: Sized + Send + Sync {
    /// Body sent on create and update.
    type Request: Serialize + Send + Sync;
    /// Body returned by create, read and update.
    type Response: DeserializeOwned + Send;

    /// Entity kind, used in logs.
    const KIND: &'static str;
    /// How the entity is removed.
    const DELETE_STRATEGY: DeleteStrategy;
    /// Whether create first probes the read route and reuses an existing version.
    ///
    /// Needed for sub-resources that always exist remotely once their parent
    /// does, such as dataset tags.
    const ADOPTS_EXISTING_VERSION: bool = false;

    /// Build the update body from this model.
    ///
    /// `Unset` and `Null` fields are omitted.
    fn to_wire(&self) -> Result<Self::Request>;

    /// Build the create body. Defaults to [`SyncedEntity::to_wire`].
    fn create_request(&self) -> Result<Self::Request> {
        self.to_wire()
    }

    /// Merge a response into a new model, using `self` as the previous model.
    ///
    /// Identity and version are always overwritten; optional blocks the user
    /// never configured stay unset.
    fn from_wire(&self, response: Self::Response) -> Self;

    /// Copy identity and the observed version token into a request.
    fn stamp(request: &mut Self::Request, observed: &Self);

    /// Copy the version of an existing remote entity into a create body.
    fn adopt(request: &mut Self::Request, existing: &Self::Response) {
        let _ = (request, existing);
    }

    /// Body used by [`DeleteStrategy::UpdateToEmptyWithVersion`].
    fn empty_request(&self) -> Result<Self::Request> {
        Err(ProviderError::Unimplemented(format!(
            "{} has no empty request",
            Self::KIND
        )))
    }

    /// Whether the create API ignores fields that need a follow-up update.
    fn needs_update_after_create(&self) -> bool {
        false
    }

    /// Route used to create the entity.
    fn create_route(&self) -> Route;
    /// Route used to read the entity.
    fn read_route(&self) -> Route;
    /// Route used to update the entity.
    fn update_route(&self) -> Route;
    /// Route used to delete the entity.
    fn delete_route(&self) -> Route;
}

/// Drives [`SyncedEntity`] lifecycles against one client.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    client: &'a ApiClient,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler borrowing a client.
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create the entity described by `plan`.
    pub async fn create<E: SyncedEntity>(&self, plan: &E) -> Result<E> {
        let mut request = plan.create_request()?;

        if E::ADOPTS_EXISTING_VERSION {
            match self
                .client
                .send_json::<(), E::Response>(&plan.read_route(), None)
                .await
            {
                Ok(existing) => E::adopt(&mut request, &existing),
                Err(err) => debug!(kind = E::KIND, error = %err, "No existing version to adopt"),
            }
        }

        let response: E::Response = self
            .client
            .send_json(&plan.create_route(), Some(&request))
            .await?;
        let created = plan.from_wire(response);
        info!(kind = E::KIND, "Created");

        if plan.needs_update_after_create() {
            debug!(kind = E::KIND, "Applying fields ignored by create");
            return self.update(&created, plan).await;
        }
        Ok(created)
    }

    /// Refresh `state` from the server.
    ///
    /// Returns `Ok(None)` when the entity no longer exists, so the caller
    /// can drop it.
    pub async fn read<E: SyncedEntity>(&self, state: &E) -> Result<Option<E>> {
        match self
            .client
            .send_json::<(), E::Response>(&state.read_route(), None)
            .await
        {
            Ok(response) => Ok(Some(state.from_wire(response))),
            Err(err) if err.is_not_found() => {
                warn!(kind = E::KIND, "Entity not found, removing from state");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply `plan` on top of the entity last observed as `state`.
    pub async fn update<E: SyncedEntity>(&self, state: &E, plan: &E) -> Result<E> {
        let mut request = plan.to_wire()?;
        E::stamp(&mut request, state);
        let response: E::Response = self
            .client
            .send_json(&state.update_route(), Some(&request))
            .await?;
        info!(kind = E::KIND, "Updated");
        Ok(plan.from_wire(response))
    }

    /// Remove the entity last observed as `state`.
    pub async fn delete<E: SyncedEntity>(&self, state: &E) -> Result<()> {
        match E::DELETE_STRATEGY {
            DeleteStrategy::HardDeleteById => {
                self.client.send(&state.delete_route(), None::<&()>).await?;
            }
            DeleteStrategy::UpdateToEmptyWithVersion => {
                let mut request = state.empty_request()?;
                E::stamp(&mut request, state);
                self.client
                    .send(&state.delete_route(), Some(&request))
                    .await?;
            }
        }
        info!(kind = E::KIND, "Deleted");
        Ok(())
    }
}
