//! Walk simulation
//!
//! Replays a [`WalkFixture`] through [`TourApi`]: the guide authors and publishes
//! the tour, the tourist buys it, starts walking, reports every position and
//! checks it for nearby key points, then finishes. Each response is appended to
//! the transcript as JSON.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{
    api::{
        Response, TourApi,
        requests::{
            AddKeyPointRequest, CartItemRequest, CheckProximityRequest, CreateTourRequest,
            ExecutionRequest, PublishTourRequest, StartExecutionRequest, TourRequest,
            TouristRequest, UpdatePositionRequest,
        },
    },
    fixtures::{Finish, WalkFixture},
};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("step {step} failed: {message}")]
    StepFailed { step: &'static str, message: String },

    #[error("failed to encode response")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Step<'a, T> {
    step: &'static str,
    response: &'a Response<T>,
}

fn record<T: Serialize>(
    transcript: &mut Vec<Value>,
    step: &'static str,
    response: &Response<T>,
) -> Result<(), SimulationError> {
    transcript.push(serde_json::to_value(Step { step, response })?);

    Ok(())
}

/// Record `response` and return its data, or fail the walk if the step failed.
fn required<T: Serialize>(
    transcript: &mut Vec<Value>,
    step: &'static str,
    response: Response<T>,
) -> Result<T, SimulationError> {
    record(transcript, step, &response)?;

    match response.data {
        Some(data) if response.success => Ok(data),
        _ => Err(SimulationError::StepFailed {
            step,
            message: response.message,
        }),
    }
}

/// Replay `fixture`, appending every response to `transcript`.
///
/// Position reports and the optional finishing step are recorded whatever
/// their outcome; the setup steps before them must succeed.
///
/// # Errors
///
/// Returns an error if a setup step fails or a response cannot be encoded.
pub async fn run_walk(
    api: &TourApi,
    fixture: WalkFixture,
    transcript: &mut Vec<Value>,
) -> Result<(), SimulationError> {
    let WalkFixture {
        guide,
        tourist,
        tour,
        start,
        positions,
        finish,
    } = fixture;

    let created = api
        .create_tour(CreateTourRequest {
            guide_id: guide.clone(),
            name: tour.name,
            description: tour.description,
            difficulty: tour.difficulty,
            tags: tour.tags,
        })
        .await;
    let tour_id = required(transcript, "create_tour", created)?.id;

    for key_point in tour.key_points {
        let added = api
            .add_key_point(AddKeyPointRequest {
                guide_id: guide.clone(),
                tour_id: tour_id.clone(),
                latitude: key_point.latitude,
                longitude: key_point.longitude,
                name: key_point.name,
                description: key_point.description,
                image: key_point.image,
                order: key_point.order,
            })
            .await;

        required(transcript, "add_key_point", added)?;
    }

    let published = api
        .publish_tour(PublishTourRequest {
            guide_id: guide,
            tour_id: tour_id.clone(),
            price: tour.price,
        })
        .await;
    required(transcript, "publish_tour", published)?;

    let preview = api
        .list_key_points(TourRequest {
            viewer_id: Some(tourist.clone()),
            tour_id: tour_id.clone(),
        })
        .await;
    record(transcript, "preview_key_points", &preview)?;

    let added = api
        .add_to_cart(CartItemRequest {
            tourist_id: tourist.clone(),
            tour_id: tour_id.clone(),
        })
        .await;
    required(transcript, "add_to_cart", added)?;

    let checkout = api
        .checkout(TouristRequest {
            tourist_id: tourist.clone(),
        })
        .await;
    required(transcript, "checkout", checkout)?;

    let started = api
        .start_execution(StartExecutionRequest {
            tourist_id: tourist.clone(),
            tour_id,
            start_latitude: start.latitude,
            start_longitude: start.longitude,
        })
        .await;
    let execution_id = required(transcript, "start_execution", started)?.execution.id;

    for position in positions {
        let reported = api
            .update_position(UpdatePositionRequest {
                tourist_id: tourist.clone(),
                latitude: position.latitude,
                longitude: position.longitude,
            })
            .await;

        record(transcript, "update_position", &reported)?;

        let check = api
            .check_proximity(CheckProximityRequest {
                tourist_id: tourist.clone(),
                execution_id: execution_id.clone(),
                current_latitude: position.latitude,
                current_longitude: position.longitude,
            })
            .await;

        record(transcript, "check_proximity", &check)?;
    }

    let request = ExecutionRequest {
        tourist_id: tourist,
        execution_id,
    };

    match finish {
        Finish::Complete => {
            let completed = api.complete_tour(request.clone()).await;
            record(transcript, "complete_tour", &completed)?;
        }
        Finish::Abandon => {
            let abandoned = api.abandon_tour(request.clone()).await;
            record(transcript, "abandon_tour", &abandoned)?;
        }
        Finish::None => {}
    }

    let execution = api.get_execution(request).await;
    record(transcript, "get_execution", &execution)?;

    Ok(())
}
