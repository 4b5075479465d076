//! Live change stream (server-sent events).
//!
//! One comment goes out immediately on open to confirm liveness, then
//! one `questions_updated` message per coalesced change, plus periodic
//! keep-alive comments so intermediaries don't reap idle connections.
//! A reconnecting client passes its last-seen stamp as `?since=`; when
//! the set moved on in the meantime it gets a catch-up event right away
//! instead of waiting for the next replace. Dropping the connection
//! drops the listener, which unregisters the subscription.

use crate::dto::ChangeMessage;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use quizcast_domain::VersionStamp;
use serde::Deserialize;
use std::convert::Infallible;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Last version stamp the client saw before reconnecting.
    pub since: Option<u64>,
}

/// `GET /api/questions/stream`
pub async fn question_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let listener = state.notifier.subscribe();
    let current = state.store.current_version().await?;
    debug!(subscribers = state.notifier.receiver_count(), "change stream opened");

    let catch_up = params
        .since
        .map(VersionStamp::from_millis)
        .filter(|seen| current > *seen)
        .map(|_| change_event(current));

    let opening = stream::iter(
        std::iter::once(Ok(Event::default().comment("connected")))
            .chain(catch_up.into_iter().map(Ok)),
    );

    let changes = stream::unfold(listener, |mut listener| async move {
        let event = listener.next_change().await?;
        Some((Ok(change_event(event.version)), listener))
    });

    Ok(Sse::new(opening.chain(changes)).keep_alive(
        KeepAlive::new()
            .interval(state.heartbeat)
            .text("keep-alive"),
    ))
}

fn change_event(version: VersionStamp) -> Event {
    match Event::default().json_data(ChangeMessage::questions_updated(version)) {
        Ok(event) => event,
        // Serialization of a two-field struct cannot realistically fail;
        // degrade to a comment rather than tearing the stream down.
        Err(_) => Event::default().comment("event encoding failed"),
    }
}
