use crate::{
    configuration::RunConfig,
    data::{Body, InteractionData, InteractionLog},
};
use serde_json::{Map, Value};
use tracing::debug;

/// Produces the comparable form of `log`. The input is left untouched.
///
/// Stages run in a fixed order, each only when configured: dropping
/// responses, JSON canonicalization, abstractions, GET response masking.
pub fn transform(log: &InteractionLog, config: &RunConfig) -> InteractionLog {
    debug!(
        only_requests = config.only_requests(),
        json_body = config.json_body(),
        abstractions = config.abstraction_options().name(),
        ignore_get_responses = config.ignore_get_responses(),
        interactions = log.interaction_count(),
        "transforming log"
    );

    let mut transformed = log.clone();

    for interaction in transformed
        .groups
        .iter_mut()
        .flat_map(|group| group.interactions.iter_mut())
    {
        transform_interaction(interaction, config);
    }

    transformed
}

fn transform_interaction(interaction: &mut InteractionData, config: &RunConfig) {
    if config.only_requests() {
        interaction.response_data = None;
    }

    if config.json_body() {
        canonicalize_json(&mut interaction.request_data.body);
        if let Some(response_data) = interaction.response_data.as_mut() {
            canonicalize_json(&mut response_data.body);
        }
    }

    let abstractions = config.abstraction_options();
    for abstraction in abstractions.request_abstractions() {
        abstraction.apply(&mut interaction.request_data);
    }
    if let Some(response_data) = interaction.response_data.as_mut() {
        for abstraction in abstractions.response_abstractions() {
            abstraction.apply(response_data);
        }
    }

    if config.ignore_get_responses() && interaction.request_data.method == "GET" {
        if let Some(response_data) = interaction.response_data.as_mut() {
            response_data.body = Body::Masked;
        }
    }
}

/// Bodies that aren't valid JSON stay as they are.
fn canonicalize_json(body: &mut Body) {
    if let Body::Text(text) = body {
        if text.trim().is_empty() {
            return;
        }

        if let Ok(value) = serde_json::from_str::<Value>(text) {
            *body = Body::Json(sort_keys(value));
        }
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut fields: Vec<_> = fields.into_iter().collect();
            fields.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

            Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, sort_keys(field)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
