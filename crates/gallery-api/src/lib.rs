pub mod account;
pub mod artist;
pub mod artwork;
pub mod error;
pub mod review;
pub mod session;
pub mod user;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Router, middleware};

use gallery_db::Database;
use session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
}

/// Build the full application router. Register/login/logout manage the
/// session themselves and stay public; everything else sits behind
/// [`session::require_session`].
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(home))
        .route("/account/create", axum::routing::post(account::register))
        .route("/account/login", axum::routing::post(account::login))
        .route("/account/logout", get(account::logout))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/account/", get(account::profile))
        .route("/artwork/list", get(artwork::search_page))
        .route("/artwork/list/results", get(artwork::search))
        .route(
            "/artwork/new",
            get(artwork::new_artwork_page).post(artwork::create),
        )
        .route("/artwork/likes/", get(artwork::liked))
        .route("/artwork/{artwork_id}", get(artwork::detail))
        .route("/artwork/{artwork_id}/likes", put(artwork::update_likes))
        .route(
            "/artist/workshop/new",
            get(artist::new_workshop_page).post(artist::create_workshop),
        )
        .route(
            "/artist/workshop",
            axum::routing::post(artist::enroll).delete(artist::unenroll),
        )
        .route(
            "/artist/following",
            axum::routing::post(artist::follow).delete(artist::unfollow),
        )
        .route("/artist/{artist_id}", get(artist::profile))
        .route(
            "/review/",
            get(review::list_mine)
                .post(review::create)
                .delete(review::remove),
        )
        .route("/review/{review_id}", get(review::detail))
        .route("/user/notification", get(user::notifications))
        .route("/user/following", get(user::following))
        .route("/user/artist", put(user::set_artist))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ))
        .with_state(state);

    Router::new().merge(public).merge(protected).fallback(not_found)
}

async fn home() -> &'static str {
    "Welcome to the gallery."
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "No such route.")
}
