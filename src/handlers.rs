use crate::errors::AppError;
use crate::models::{Day, MaxForm, ReorderForm, StepForm, TrackerAction, TrackerSnapshot};
use crate::state::AppState;
use crate::ui::{render_index, render_rows, render_skeleton};
use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    Json,
};
use chrono::{Datelike, Local};
use serde_json::{json, Value};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.snapshot().await;
    if !snapshot.ready {
        return Html(render_skeleton());
    }
    Html(render_index(&snapshot, today()))
}

pub async fn table(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.snapshot().await;
    if !snapshot.ready {
        return Err(AppError::not_ready());
    }
    Ok(Html(render_rows(&snapshot)))
}

pub async fn get_tracker(State(state): State<AppState>) -> Json<TrackerSnapshot> {
    Json(state.snapshot().await)
}

pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<TrackerAction>,
) -> Result<Json<TrackerSnapshot>, AppError> {
    let snapshot = state.dispatch(action).await?;
    Ok(Json(snapshot))
}

pub async fn step_portions(
    State(state): State<AppState>,
    Form(form): Form<StepForm>,
) -> Result<Redirect, AppError> {
    state
        .dispatch(TrackerAction::StepPortions {
            category: form.category,
            day: form.day,
            delta: form.delta,
        })
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn set_max(
    State(state): State<AppState>,
    Form(form): Form<MaxForm>,
) -> Result<Redirect, AppError> {
    // Non-numeric input is dropped like any other invalid maximum.
    if let Some(value) = parse_int_prefix(&form.value) {
        state
            .dispatch(TrackerAction::SetMaxPortions {
                category: form.category,
                value,
            })
            .await?;
    }
    Ok(Redirect::to("/"))
}

pub async fn reset(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.dispatch(TrackerAction::Reset).await?;
    Ok(Redirect::to("/"))
}

pub async fn reorder(
    State(state): State<AppState>,
    Form(form): Form<ReorderForm>,
) -> Result<Redirect, AppError> {
    state
        .dispatch(TrackerAction::Reorder {
            from: form.from_index(),
            to: form.to_index(),
        })
        .await?;
    Ok(Redirect::to("/"))
}

pub async fn manifest() -> Json<Value> {
    Json(json!({
        "name": "Nutrient Tracker",
        "short_name": "NutriTrack",
        "description": "Track your weekly nutrient intake.",
        "start_url": "/",
        "display": "standalone",
        "background_color": "#ffffff",
        "theme_color": "#ffffff",
    }))
}

fn today() -> Day {
    Day::from_weekday(Local::now().weekday())
}

/// Reads a number the way an integer input does: leading whitespace and
/// sign, then as many digits as there are. `"6abc"` and `"3.7"` read as 6
/// and 3; no leading digits reads as nothing.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn index_shows_placeholder_until_hydrated() {
        let state = AppState::new(Arc::new(MemoryStore::new()));

        let Html(page) = index(State(state.clone())).await;
        assert!(page.contains("aria-busy=\"true\""));
        assert!(!page.contains("data-category="));
        assert!(table(State(state.clone())).await.is_err());

        state.hydrate().await;

        let Html(page) = index(State(state.clone())).await;
        assert!(!page.contains("aria-busy"));
        assert!(page.contains("data-category=\"Agua\""));
        assert!(table(State(state)).await.is_ok());
    }

    #[tokio::test]
    async fn max_form_reads_leading_integer() {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        state.hydrate().await;

        for (raw, expected) in [("6abc", 6), ("3.7", 3), ("abc", 3), ("-2", 3), (" 12 ", 12)] {
            let form = MaxForm {
                category: crate::models::NutrientCategory::Fruta,
                value: raw.to_string(),
            };
            set_max(State(state.clone()), Form(form)).await.unwrap();
            let snapshot = state.snapshot().await;
            assert_eq!(
                snapshot
                    .data
                    .get(crate::models::NutrientCategory::Fruta)
                    .max_portions,
                expected,
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn int_prefix_matches_integer_input() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7 portions"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+5"), Some(5));
        assert_eq!(parse_int_prefix("4e2"), Some(4));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(".5"), None);
    }
}
