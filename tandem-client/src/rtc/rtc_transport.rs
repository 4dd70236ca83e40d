use crate::error::TransportError;
use crate::rtc::RtcLocalStream;
use crate::transport::{PeerTransport, SdpKind, SessionConfig, SessionEvents, TransportSession};
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::IceCandidate;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::track::track_remote::TrackRemote;

/// Opens one `RTCPeerConnection` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RtcPeerTransport;

pub struct RtcSession {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcSession {
    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }
}

#[async_trait(?Send)]
impl PeerTransport for RtcPeerTransport {
    type Stream = RtcLocalStream;
    type Remote = Arc<TrackRemote>;
    type Session = RtcSession;

    async fn open_session(
        &self,
        local: &RtcLocalStream,
        config: &SessionConfig,
        events: SessionEvents<Arc<TrackRemote>>,
    ) -> Result<RtcSession, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.ice_servers.iter().map(RTCIceServer::from).collect(),
            ..Default::default()
        };
        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        for track in local.tracks() {
            peer_connection.add_track(track).await?;
        }

        let session = events.session();

        let state_events = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let events = state_events.clone();
                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", session, s);
                    if matches!(
                        s,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Disconnected
                    ) {
                        events.connection_lost();
                    }
                })
            },
        ));

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => events.local_candidate(IceCandidate::from(init)),
                    Err(e) => warn!("Could not encode local candidate: {}", e),
                }
            })
        }));

        let track_events = events;
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let events = track_events.clone();
            Box::pin(async move {
                debug!("Remote {:?} track arrived on {}", track.kind(), session);
                events.remote_track(track);
            })
        }));

        Ok(RtcSession { peer_connection })
    }
}

#[async_trait(?Send)]
impl TransportSession for RtcSession {
    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    async fn set_remote_description(
        &self,
        kind: SdpKind,
        sdp: &str,
    ) -> Result<(), TransportError> {
        let desc = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp.to_string())?,
            SdpKind::Answer => RTCSessionDescription::answer(sdp.to_string())?,
        };
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit::from(candidate.clone());
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            warn!("Error closing peer connection: {}", e);
        }
    }
}
