use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, Reply, WithStatus};

use crate::session::GameSession;
use crate::submission::SubmissionClient;
use hues_core::{
    SelectionFilter, export_csv, parse_coordinate, rounds_missing_word, selection_history,
};
use hues_types::{
    AddPlayerRequest, ErrorResponse, GameError, GameStatusResponse, GuessRequest, PlayerId,
    Position, SelectionsResponse, SetMaxRoundsRequest, SetWordRequest, SetWordsRequest,
    SubmissionRequest, TransitionResponse,
};

pub mod config;
pub mod session;
pub mod submission;
pub mod words;

#[derive(Deserialize)]
struct SelectionQuery {
    filter: Option<String>,
}

pub fn create_routes(
    session: Arc<GameSession>,
    submissions: Option<SubmissionClient>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let session_filter = warp::any().map({
        let session = session.clone();
        move || session.clone()
    });

    let submission_filter = warp::any().map(move || submissions.clone());

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let game_state = warp::path!("game")
        .and(warp::get())
        .and(session_filter.clone())
        .and_then(handle_game_state_request);

    let game_status = warp::path!("game" / "status")
        .and(warp::get())
        .and(session_filter.clone())
        .and_then(handle_game_status_request);

    let standings = warp::path!("game" / "standings")
        .and(warp::get())
        .and(session_filter.clone())
        .and_then(handle_standings_request);

    // start, results, advance, finalize, reset
    let transition = warp::path!("game" / String)
        .and(warp::post())
        .and(session_filter.clone())
        .and_then(handle_transition_request);

    let add_player = warp::path!("players")
        .and(warp::post())
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_add_player_request);

    let remove_player = warp::path!("players" / PlayerId)
        .and(warp::delete())
        .and(session_filter.clone())
        .and_then(handle_remove_player_request);

    let guess = warp::path!("guesses")
        .and(warp::post())
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_guess_request);

    let set_words = warp::path!("game" / "words")
        .and(warp::put())
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_set_words_request);

    let set_word = warp::path!("game" / "word")
        .and(warp::put())
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_set_word_request);

    let set_max_rounds = warp::path!("game" / "max-rounds")
        .and(warp::put())
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_set_max_rounds_request);

    let export = warp::path!("export.csv")
        .and(warp::get())
        .and(warp::query::<SelectionQuery>())
        .and(session_filter.clone())
        .and_then(handle_export_request);

    let selections = warp::path!("selections")
        .and(warp::get())
        .and(warp::query::<SelectionQuery>())
        .and(session_filter.clone())
        .and_then(handle_selections_request);

    let submit = warp::path!("submissions")
        .and(warp::post())
        .and(warp::body::json())
        .and(submission_filter)
        .and_then(handle_submission_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(game_state)
        .or(game_status)
        .or(standings)
        .or(set_words)
        .or(set_word)
        .or(set_max_rounds)
        .or(transition)
        .or(add_player)
        .or(remove_player)
        .or(guess)
        .or(export)
        .or(selections)
        .or(submit)
        .with(cors)
        .with(warp::log("hues_and_cues"))
}

fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(message: impl Into<String>, status: StatusCode) -> WithStatus<Json> {
    json_reply(
        &ErrorResponse {
            error: message.into(),
        },
        status,
    )
}

fn game_error_reply(err: &GameError) -> WithStatus<Json> {
    let status = match err {
        GameError::PlayerNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    error_reply(err.to_string(), status)
}

async fn handle_game_state_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(&session.snapshot().await, StatusCode::OK))
}

async fn handle_game_status_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let status = session
        .read(|game| {
            let state = game.state();
            GameStatusResponse {
                phase: state.game_phase,
                round: state.current_round,
                max_rounds: state.max_rounds,
                current_word: state.current_word.clone(),
                all_players_guessed: game.all_players_guessed(),
                result_quorum_met: game.result_quorum_met(),
                average_position: state.average_position,
            }
        })
        .await;

    Ok(json_reply(&status, StatusCode::OK))
}

async fn handle_standings_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let standings = session.read(|game| game.standings()).await;
    Ok(json_reply(&standings, StatusCode::OK))
}

async fn handle_transition_request(
    action: String,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (applied, state) = match action.as_str() {
        "start" => session.update(|game| game.start()).await,
        "results" => session.update(|game| game.compute_results().is_some()).await,
        "advance" => session.update(|game| game.advance_round()).await,
        "finalize" => session.update(|game| game.finalize()).await,
        "reset" => {
            session
                .update(|game| {
                    game.reset();
                    true
                })
                .await
        }
        _ => return Err(warp::reject::not_found()),
    };

    if !applied {
        tracing::info!("'{}' declined in {:?} phase", action, state.game_phase);
    }
    Ok(json_reply(
        &TransitionResponse { applied, state },
        StatusCode::OK,
    ))
}

async fn handle_add_player_request(
    request: AddPlayerRequest,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (result, state) = session.update(|game| game.add_player(&request.name)).await;

    match result.map(|id| state.player(id).cloned()) {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::CREATED)),
        Ok(None) => Ok(error_reply(
            "Player vanished after joining",
            StatusCode::INTERNAL_SERVER_ERROR,
        )),
        Err(err) => Ok(game_error_reply(&err)),
    }
}

async fn handle_remove_player_request(
    player_id: PlayerId,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (removed, state) = session.update(|game| game.remove_player(player_id)).await;

    if removed {
        Ok(json_reply(&state, StatusCode::OK))
    } else {
        Ok(game_error_reply(&GameError::PlayerNotFound { player_id }))
    }
}

fn guess_position(request: &GuessRequest) -> Result<Position, String> {
    match (request.x, request.y, &request.coordinate) {
        (Some(x), Some(y), _) => Ok(Position::new(x, y)),
        (_, _, Some(coordinate)) => parse_coordinate(coordinate).map_err(|e| e.to_string()),
        _ => Err("A guess needs either x and y or a coordinate".to_string()),
    }
}

async fn handle_guess_request(
    request: GuessRequest,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let position = match guess_position(&request) {
        Ok(position) => position,
        Err(message) => return Ok(error_reply(message, StatusCode::BAD_REQUEST)),
    };

    let (result, state) = session
        .update(|game| game.submit_guess(request.player_id, position))
        .await;

    match result {
        Ok(()) => Ok(json_reply(&state, StatusCode::OK)),
        Err(err) => Ok(game_error_reply(&err)),
    }
}

async fn handle_set_words_request(
    request: SetWordsRequest,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let words: Vec<String> = request
        .words
        .into_iter()
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .collect();

    let (_, state) = session.update(|game| game.set_words(words)).await;
    Ok(json_reply(&state, StatusCode::OK))
}

async fn handle_set_word_request(
    request: SetWordRequest,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let word = request.word.trim();
    if word.is_empty() {
        return Ok(error_reply("Word must not be empty", StatusCode::BAD_REQUEST));
    }

    let (_, state) = session.update(|game| game.set_current_word(word)).await;
    Ok(json_reply(&state, StatusCode::OK))
}

async fn handle_set_max_rounds_request(
    request: SetMaxRoundsRequest,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (result, state) = session
        .update(|game| game.set_max_rounds(request.max_rounds))
        .await;

    match result {
        Ok(()) => Ok(json_reply(&state, StatusCode::OK)),
        Err(err) => Ok(game_error_reply(&err)),
    }
}

fn parse_filter(query: &SelectionQuery) -> Result<SelectionFilter, String> {
    query.filter.as_deref().unwrap_or("all").parse()
}

async fn handle_selections_request(
    query: SelectionQuery,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(message) => return Ok(error_reply(message, StatusCode::BAD_REQUEST)),
    };

    let response = session
        .read(|game| SelectionsResponse {
            rows: selection_history(game.state(), filter),
            missing_words: rounds_missing_word(game.state()),
        })
        .await;

    if response.missing_words > 0 {
        tracing::warn!(
            "{} round(s) with guesses have no word recorded",
            response.missing_words
        );
    }
    Ok(json_reply(&response, StatusCode::OK))
}

async fn handle_export_request(
    query: SelectionQuery,
    session: Arc<GameSession>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let filter = match parse_filter(&query) {
        Ok(filter) => filter,
        Err(message) => return Ok(error_reply(message, StatusCode::BAD_REQUEST).into_response()),
    };

    let (csv, missing_words) = session
        .read(|game| (export_csv(game.state(), filter), rounds_missing_word(game.state())))
        .await;

    let reply = warp::reply::with_header(csv, "content-type", "text/csv; charset=utf-8");
    let reply = warp::reply::with_header(
        reply,
        "content-disposition",
        "attachment; filename=\"hues-and-cues-selecciones.csv\"",
    );
    let reply = warp::reply::with_header(reply, "x-missing-words", missing_words.to_string());
    Ok(reply.into_response())
}

async fn handle_submission_request(
    request: SubmissionRequest,
    submissions: Option<SubmissionClient>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let Some(client) = submissions else {
        return Ok(error_reply(
            "Submissions are not enabled on this server",
            StatusCode::NOT_FOUND,
        ));
    };

    let submission = match SubmissionClient::prepare(request) {
        Ok(submission) => submission,
        Err(err) => return Ok(game_error_reply(&err)),
    };

    match client.submit(&submission).await {
        Ok(()) => Ok(json_reply(&submission, StatusCode::CREATED)),
        Err(err) => {
            tracing::error!("Failed to submit clue to {}: {}", client.endpoint(), err);
            Ok(error_reply(
                format!("Could not submit your answer, please try again: {}", err),
                StatusCode::BAD_GATEWAY,
            ))
        }
    }
}
