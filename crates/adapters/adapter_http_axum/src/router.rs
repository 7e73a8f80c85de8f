//! Axum router assembly.

use axum::Router;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use crate::inbound::put_command;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/", put(put_command))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hometick_app::executor::ActionExecutor;
    use hometick_app::inbox::{CommandInbox, channel};
    use hometick_domain::action::Action;
    use hometick_domain::error::HubError;
    use hometick_domain::topic::{TopicHandler, TopicTable};
    use tower::ServiceExt;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Action>>);

    impl ActionExecutor for Recorder {
        async fn execute(&self, action: &Action) -> Result<(), HubError> {
            self.0.lock().unwrap().push(action.clone());
            Ok(())
        }
    }

    fn app(capacity: usize) -> (Router, CommandInbox) {
        let mut topics = TopicTable::new();
        topics
            .register(
                "hue_scene",
                TopicHandler::Scene {
                    groups: vec!["Woonkamer".to_string()],
                },
            )
            .unwrap();
        let (sender, inbox) = channel(topics, capacity);
        (build(AppState::new(sender)), inbox)
    }

    fn put_body(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (app, _inbox) = app(4);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_enqueue_payload_for_poll_loop() {
        let (app, mut inbox) = app(4);

        let response = app
            .oneshot(put_body(r#"{"hue_scene": "Relax", "doorbell": "ring"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let recorder = Recorder::default();
        let report = inbox.drain(&recorder).await;
        assert_eq!(report.payloads, 1);
        assert_eq!(report.handled, 1);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![Action::Scene {
                scene: "Relax".to_string(),
                groups: vec!["Woonkamer".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn should_answer_ok_to_malformed_body() {
        let (app, mut inbox) = app(4);

        for body in ["not json", "[1, 2]", "\"Relax\""] {
            let response = app.clone().oneshot(put_body(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(inbox.drain(&Recorder::default()).await.payloads, 0);
    }

    #[tokio::test]
    async fn should_answer_ok_when_inbox_full() {
        let (app, mut inbox) = app(1);

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(put_body(r#"{"hue_scene": "Film"}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(inbox.drain(&Recorder::default()).await.payloads, 1);
    }

    #[tokio::test]
    async fn should_reject_other_methods_on_root() {
        let (app, _inbox) = app(4);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
