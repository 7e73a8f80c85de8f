//! WebSocket client for the Harmony hub.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use hometick_app::ports::RemoteHub;
use hometick_domain::activity::ActivityId;
use hometick_domain::error::{ErrorChain, HubError};
use hometick_domain::hub_config::HubConfig;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::config::HarmonyConfig;
use crate::error::HarmonyError;
use crate::protocol::{self, ButtonStatus, POWER_OFF_ACTIVITY, Reply, Request};

/// Origin the hub expects on provisioning requests.
const PROVISION_ORIGIN: &str = "http://sl.dhg.myharmony.com";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Connection {
    socket: Socket,
    remote_id: String,
}

impl Connection {
    /// Send one request and wait for its final reply.
    async fn exchange(
        &mut self,
        request: &Request<'_>,
        request_id: &str,
    ) -> Result<Value, HarmonyError> {
        let frame = request.frame(&self.remote_id, request_id);
        self.socket.send(Message::text(frame)).await?;
        if !request.expects_reply() {
            return Ok(Value::Null);
        }
        loop {
            let Some(message) = self.socket.next().await else {
                return Err(HarmonyError::Closed);
            };
            match message? {
                Message::Text(text) => {
                    match protocol::parse_reply(text.as_str(), request, request_id)? {
                        Reply::Done(data) => return Ok(data),
                        Reply::Progress => {
                            tracing::debug!(
                                request = request.name(),
                                "harmony request in progress"
                            );
                        }
                        Reply::Unrelated => {}
                    }
                }
                Message::Close(_) => return Err(HarmonyError::Closed),
                _ => {}
            }
        }
    }
}

/// A Harmony hub reached over its local WebSocket API.
pub struct HarmonyHub {
    config: HarmonyConfig,
    http: reqwest::Client,
    remote_id: OnceCell<String>,
    connection: Mutex<Option<Connection>>,
    next_request_id: AtomicU64,
}

impl HarmonyHub {
    /// Build a client for the configured hub. The connection is opened on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonyError::Provision`] if the HTTP client cannot be built.
    pub fn new(config: HarmonyConfig) -> Result<Self, HarmonyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let remote_id = OnceCell::new_with(config.remote_id.clone());
        Ok(Self {
            config,
            http,
            remote_id,
            connection: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        })
    }

    async fn remote_id(&self) -> Result<&str, HarmonyError> {
        self.remote_id
            .get_or_try_init(|| self.provision())
            .await
            .map(String::as_str)
    }

    async fn provision(&self) -> Result<String, HarmonyError> {
        tracing::info!(host = %self.config.host, "discovering harmony remote id");
        let body: Value = self
            .http
            .post(self.config.http_url())
            .header(reqwest::header::ORIGIN, PROVISION_ORIGIN)
            .json(&protocol::provision_request())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let remote_id = protocol::parse_remote_id(&body)?;
        tracing::info!(remote_id, "discovered harmony remote id");
        Ok(remote_id)
    }

    async fn connect(&self) -> Result<Connection, HarmonyError> {
        let remote_id = self.remote_id().await?.to_string();
        tracing::info!(host = %self.config.host, port = self.config.port, "connecting harmony hub");
        let (socket, _response) = timeout(
            self.config.timeout(),
            tokio_tungstenite::connect_async(self.config.ws_url(&remote_id)),
        )
        .await
        .map_err(|_| HarmonyError::Timeout)??;
        Ok(Connection { socket, remote_id })
    }

    /// Run one request on the shared connection, opening it if needed.
    ///
    /// The connection is dropped after any transport failure or timeout so
    /// the next call reconnects.
    async fn call(&self, request: Request<'_>) -> Result<Value, HarmonyError> {
        let mut slot = self.connection.lock().await;
        let mut connection = match slot.take() {
            Some(connection) => connection,
            None => self.connect().await?,
        };
        let request_id = self
            .next_request_id
            .fetch_add(1, Ordering::Relaxed)
            .to_string();
        let result = timeout(
            self.config.timeout(),
            connection.exchange(&request, &request_id),
        )
        .await
        .unwrap_or(Err(HarmonyError::Timeout));
        match result {
            Ok(data) => {
                *slot = Some(connection);
                Ok(data)
            }
            Err(err @ HarmonyError::Rejected { .. }) => {
                *slot = Some(connection);
                Err(err)
            }
            Err(err) => {
                tracing::warn!(
                    request = request.name(),
                    error = %ErrorChain(&err),
                    "resetting harmony connection"
                );
                Err(err)
            }
        }
    }

    async fn press(&self, device_id: &str, command: &str) -> Result<(), HarmonyError> {
        for status in [ButtonStatus::Press, ButtonStatus::Release] {
            self.call(Request::HoldAction {
                device_id,
                command,
                status,
            })
            .await?;
        }
        Ok(())
    }
}

impl RemoteHub for HarmonyHub {
    async fn current_activity_id(&self) -> Result<ActivityId, HubError> {
        let data = self.call(Request::CurrentActivity).await?;
        Ok(protocol::parse_current_activity(&data)?)
    }

    async fn fetch_config(&self) -> Result<HubConfig, HubError> {
        let data = self.call(Request::Config).await?;
        let config = protocol::parse_config(data)?;
        tracing::info!(
            activities = config.activities.len(),
            devices = config.devices.len(),
            "fetched harmony config"
        );
        Ok(config)
    }

    async fn start_activity(&self, id: &ActivityId) -> Result<(), HubError> {
        tracing::info!(activity_id = %id, "starting harmony activity");
        self.call(Request::StartActivity(id.as_str())).await?;
        Ok(())
    }

    async fn power_off(&self) -> Result<(), HubError> {
        tracing::info!("powering off harmony devices");
        self.call(Request::StartActivity(POWER_OFF_ACTIVITY)).await?;
        Ok(())
    }

    async fn send_command(&self, device_id: &str, command: &str) -> Result<(), HubError> {
        tracing::info!(device_id, command, "sending harmony command");
        Ok(self.press(device_id, command).await?)
    }

    async fn disconnect(&self) -> Result<(), HubError> {
        let Some(mut connection) = self.connection.lock().await.take() else {
            return Ok(());
        };
        tracing::info!(host = %self.config.host, "disconnecting harmony hub");
        connection
            .socket
            .close(None)
            .await
            .map_err(HarmonyError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex as StdMutex};

    use serde_json::json;
    use tokio::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Behaviour switches for the local fake hub.
    #[derive(Default)]
    struct FakeHubState {
        commands: StdMutex<Vec<String>>,
        connections: AtomicUsize,
        /// Close the first connection on its first request.
        drop_first_connection: bool,
        /// Never answer `config` requests.
        silent_config: bool,
    }

    impl FakeHubState {
        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    async fn fake_hub(state: FakeHubState) -> (HarmonyHub, Arc<FakeHubState>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(state);
        let server_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&server_state);
                tokio::spawn(async move { serve(stream, state).await });
            }
        });
        let hub = HarmonyHub::new(HarmonyConfig {
            host: "127.0.0.1".to_string(),
            port,
            remote_id: Some("1234".to_string()),
            timeout_secs: 1,
        })
        .unwrap();
        (hub, state)
    }

    async fn serve(stream: TcpStream, state: Arc<FakeHubState>) {
        let connection = state.connections.fetch_add(1, Ordering::SeqCst);
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            let Message::Text(text) = message else {
                continue;
            };
            let frame: Value = serde_json::from_str(text.as_str()).unwrap();
            let cmd = frame["hbus"]["cmd"].as_str().unwrap().to_string();
            let id = frame["hbus"]["id"].clone();
            let params = frame["hbus"]["params"].clone();
            state.commands.lock().unwrap().push(
                cmd.rsplit('?').next().unwrap().to_string(),
            );
            if state.drop_first_connection && connection == 0 {
                return;
            }
            let replies = if cmd.ends_with("?getCurrentActivity") {
                vec![
                    json!({"type": "connect.stateDigest?notify", "data": {"activityId": "2001"}}),
                    json!({"id": id, "code": 200, "msg": "OK", "data": {"result": "2001"}}),
                ]
            } else if cmd.ends_with("?config") {
                if state.silent_config {
                    continue;
                }
                vec![json!({"id": id, "code": 200, "msg": "OK", "data": {
                    "activity": [{"id": "-1", "label": "PowerOff"}, {"id": "2001", "label": "Film"}],
                    "device": [{"id": "42", "label": "Aten AV Switch"}]
                }})]
            } else if cmd.ends_with("?runactivity") {
                if params["activityId"] == "666" {
                    vec![json!({"id": id, "code": 400, "msg": "Bad Request"})]
                } else {
                    vec![
                        json!({"id": id, "code": 100, "msg": "Progress"}),
                        json!({"id": id, "code": 200, "msg": "OK", "data": {}}),
                    ]
                }
            } else {
                Vec::new()
            };
            for reply in replies {
                ws.send(Message::text(reply.to_string())).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn should_read_current_activity_skipping_notifications() {
        let (hub, _state) = fake_hub(FakeHubState::default()).await;
        assert_eq!(hub.current_activity_id().await.unwrap().as_str(), "2001");
    }

    #[tokio::test]
    async fn should_fetch_config_snapshot() {
        let (hub, _state) = fake_hub(FakeHubState::default()).await;
        let config = hub.fetch_config().await.unwrap();
        assert_eq!(config.activity_id("Film").unwrap().as_str(), "2001");
        assert_eq!(config.device_id("Aten AV Switch"), Some("42"));
    }

    #[tokio::test]
    async fn should_wait_past_progress_when_starting_activity() {
        let (hub, state) = fake_hub(FakeHubState::default()).await;
        hub.start_activity(&"2001".into()).await.unwrap();
        hub.power_off().await.unwrap();
        assert_eq!(state.commands(), vec!["runactivity", "runactivity"]);
    }

    #[tokio::test]
    async fn should_send_press_and_release_without_waiting_for_reply() {
        let (hub, state) = fake_hub(FakeHubState::default()).await;
        hub.send_command("42", "InputPort1").await.unwrap();
        // The following request proves both button frames were consumed.
        hub.current_activity_id().await.unwrap();
        assert_eq!(
            state.commands(),
            vec!["holdAction", "holdAction", "getCurrentActivity"]
        );
    }

    #[tokio::test]
    async fn should_reuse_connection_across_requests() {
        let (hub, state) = fake_hub(FakeHubState::default()).await;
        hub.current_activity_id().await.unwrap();
        hub.fetch_config().await.unwrap();
        assert_eq!(state.connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_keep_connection_after_rejected_request() {
        let (hub, state) = fake_hub(FakeHubState::default()).await;
        let err = hub.start_activity(&"666".into()).await.unwrap_err();
        assert!(err.is_transient());
        hub.current_activity_id().await.unwrap();
        assert_eq!(state.connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_reconnect_after_connection_drop() {
        let (hub, state) = fake_hub(FakeHubState {
            drop_first_connection: true,
            ..FakeHubState::default()
        })
        .await;

        let err = hub.current_activity_id().await.unwrap_err();
        assert!(matches!(err, HubError::Device { .. }));
        assert_eq!(hub.current_activity_id().await.unwrap().as_str(), "2001");
        assert_eq!(state.connections.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn should_time_out_unanswered_request() {
        let (hub, _state) = fake_hub(FakeHubState {
            silent_config: true,
            ..FakeHubState::default()
        })
        .await;

        let err = hub.fetch_config().await.unwrap_err();
        let HubError::Device { source, .. } = err else {
            panic!("expected a device error");
        };
        assert_eq!(source.to_string(), "Harmony hub request timed out");
    }

    #[tokio::test]
    async fn should_disconnect_open_connection() {
        let (hub, _state) = fake_hub(FakeHubState::default()).await;
        hub.disconnect().await.unwrap();
        hub.current_activity_id().await.unwrap();
        hub.disconnect().await.unwrap();
        assert!(hub.connection.lock().await.is_none());
    }

    #[tokio::test]
    async fn should_discover_remote_id_through_provisioning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("origin", PROVISION_ORIGIN))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"activeRemoteId": 987_654}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let address = server.address();
        let hub = HarmonyHub::new(HarmonyConfig {
            host: address.ip().to_string(),
            port: address.port(),
            remote_id: None,
            timeout_secs: 1,
        })
        .unwrap();

        assert_eq!(hub.remote_id().await.unwrap(), "987654");
        assert_eq!(hub.remote_id().await.unwrap(), "987654");
    }
}
