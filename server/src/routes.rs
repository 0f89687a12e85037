use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use sukuranburu_core::Board;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub fn router(board: Arc<Board>) -> Router {
    Router::new()
        .route("/look/:player", get(look))
        .route("/flip/:player/:location", get(flip))
        .route("/watch/:player", get(watch))
        .route("/replace/:player/:from/:to", get(replace))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(board)
}

async fn look(State(board): State<Arc<Board>>, Path(player): Path<String>) -> String {
    board.look(&player).await
}

async fn flip(
    State(board): State<Arc<Board>>,
    Path((player, location)): Path<(String, String)>,
) -> Response {
    let Some((row, col)) = parse_location(&location) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("invalid location: {location}"),
        )
            .into_response();
    };
    debug!(%player, row, col, "flip");
    match board.flip(&player, row, col).await {
        Ok(view) => view.into_response(),
        Err(err) => (
            StatusCode::CONFLICT,
            format!("cannot flip this card: {err}"),
        )
            .into_response(),
    }
}

async fn watch(State(board): State<Arc<Board>>, Path(player): Path<String>) -> String {
    board.watch(&player).await
}

async fn replace(
    State(board): State<Arc<Board>>,
    Path((player, from, to)): Path<(String, String, String)>,
) -> String {
    debug!(%player, %from, %to, "replace");
    board
        .map_cards(&player, move |label| {
            let from = from.clone();
            let to = to.clone();
            async move {
                if label == from {
                    to
                } else {
                    label
                }
            }
        })
        .await
}

fn parse_location(raw: &str) -> Option<(usize, usize)> {
    let (row, col) = raw.split_once(',')?;
    Some((row.trim().parse().ok()?, col.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::parse_location;

    #[test]
    fn parses_row_and_column() {
        assert_eq!(parse_location("1,2"), Some((1, 2)));
        assert_eq!(parse_location(" 0 , 0 "), Some((0, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_location("1"), None);
        assert_eq!(parse_location("1,b"), None);
        assert_eq!(parse_location("-1,2"), None);
        assert_eq!(parse_location("1,2,3"), None);
    }
}
