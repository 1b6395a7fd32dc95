use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;

use crate::core::{shared_preferences, MatchResult};
use crate::error::ApiError;
use crate::models::{Envelope, HealthResponse, MatchPayload, PairView, Participant, Role, User, UserSummary};
use crate::routes::AppState;
use crate::services::AuthUser;

/// Configure health and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::get().to(match_users));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Pair every mentor with a mentee
///
/// GET /api/v1/match
///
/// Loads all mentors and mentees (oldest accounts first, which is the
/// priority order the matcher honors) and runs one greedy pairing pass.
/// Nothing is persisted.
async fn match_users(
    state: web::Data<AppState>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let mentors = state.postgres.list_users_by_role(Role::Mentor).await?;
    let mentees = state.postgres.list_users_by_role(Role::Mentee).await?;

    tracing::info!(
        "Matching {} mentors with {} mentees for {}",
        mentors.len(),
        mentees.len(),
        auth.username
    );

    let mentor_input: Vec<Participant> = mentors.iter().map(User::participant).collect();
    let mentee_input: Vec<Participant> = mentees.iter().map(User::participant).collect();

    let summaries: HashMap<String, UserSummary> = mentors
        .iter()
        .chain(mentees.iter())
        .map(|u| (u.id.to_string(), u.summary()))
        .collect();

    let result = state.matcher.match_pairs(mentor_input, mentee_input);
    let payload = build_payload(result, &summaries);

    tracing::info!(
        "Matched {} pairs ({} mentors and {} mentees left over)",
        payload.matched_pairs.len(),
        payload.unmatched_mentors.len(),
        payload.unmatched_mentees.len()
    );

    Ok(HttpResponse::Ok().json(Envelope::ok(payload)))
}

/// Turn matcher output back into user summaries
fn build_payload(result: MatchResult, summaries: &HashMap<String, UserSummary>) -> MatchPayload {
    let lookup = |p: &Participant| summaries.get(&p.id).cloned();

    MatchPayload {
        matched_pairs: result
            .pairs
            .iter()
            .filter_map(|pair| {
                Some(PairView {
                    mentor: lookup(&pair.mentor)?,
                    mentee: lookup(&pair.mentee)?,
                    shared_preferences: shared_preferences(
                        &pair.mentor.preferences,
                        &pair.mentee.preferences,
                    ),
                })
            })
            .collect(),
        unmatched_mentors: result.unmatched_mentors.iter().filter_map(lookup).collect(),
        unmatched_mentees: result.unmatched_mentees.iter().filter_map(lookup).collect(),
    }
}
