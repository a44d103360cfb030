//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API for interacting with a `ResourceActor<T>`.
/// It forwards requests over a Tokio mpsc channel and returns results via oneshot channels.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Typed errors** – every method resolves to `Result<…, T::Error>`; channel failures and
///   timeouts arrive as `FrameworkError` converted into the entity's error.
/// * **Bounded waits** – with [`with_timeout`](Self::with_timeout) a request that gets no reply
///   in time fails with `FrameworkError::Timeout`.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    timeout: Option<Duration>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self {
            sender,
            timeout: None,
        }
    }

    /// Bounds every request made through this client (and its clones) by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn create(&self, params: T::Create) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Every entity matching `filter`, ordered by id.
    pub async fn list<F>(&self, filter: F) -> Result<Vec<T>, T::Error>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let filter = Box::new(filter);
        self.call(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.call(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    pub async fn batch(&self, batch: T::Batch) -> Result<T::BatchResult, T::Error> {
        self.call(|respond_to| ResourceRequest::Batch { batch, respond_to })
            .await
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, T::Error>>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)
        };
        match bounded(self.timeout, exchange).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => Err(e.into()),
            Err(limit) => Err(FrameworkError::Timeout(limit).into()),
        }
    }
}

async fn bounded<F: Future>(limit: Option<Duration>, fut: F) -> Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}
