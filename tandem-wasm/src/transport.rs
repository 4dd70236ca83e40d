use crate::media::BrowserStream;
use async_trait::async_trait;
use std::cell::RefCell;
use tandem_client::{
    PeerTransport, SdpKind, SessionConfig, SessionEvents, TransportError, TransportSession,
};
use tandem_core::{IceCandidate, IceServerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    MediaStream, RtcConfiguration, RtcIceCandidateInit, RtcIceServer, RtcPeerConnection,
    RtcPeerConnectionIceEvent, RtcPeerConnectionState, RtcSdpType, RtcSessionDescriptionInit,
    RtcTrackEvent,
};

fn js_err(err: JsValue) -> TransportError {
    TransportError::new(format!("{:?}", err))
}

fn rtc_configuration(ice_servers: &[IceServerConfig]) -> RtcConfiguration {
    let servers = js_sys::Array::new();
    for server in ice_servers {
        let urls: js_sys::Array = server.urls.iter().map(|u| JsValue::from_str(u)).collect();
        let entry = RtcIceServer::new();
        entry.set_urls(&urls);
        if let Some(username) = &server.username {
            entry.set_username(username);
        }
        if let Some(credential) = &server.credential {
            entry.set_credential(credential);
        }
        servers.push(&entry);
    }

    let config = RtcConfiguration::new();
    config.set_ice_servers(&servers);
    config
}

/// One `RTCPeerConnection` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

pub struct BrowserSession {
    pc: RtcPeerConnection,
    handlers: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

#[async_trait(?Send)]
impl PeerTransport for BrowserTransport {
    type Stream = BrowserStream;
    type Remote = MediaStream;
    type Session = BrowserSession;

    async fn open_session(
        &self,
        local: &BrowserStream,
        config: &SessionConfig,
        events: SessionEvents<MediaStream>,
    ) -> Result<BrowserSession, TransportError> {
        let pc = RtcPeerConnection::new_with_configuration(&rtc_configuration(&config.ice_servers))
            .map_err(js_err)?;

        let stream = local.media_stream();
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                pc.add_track_0(&track, stream);
            }
        }

        let mut handlers = Vec::new();

        let ice_events = events.clone();
        let onicecandidate = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |ev: JsValue| {
            let Ok(ev) = ev.dyn_into::<RtcPeerConnectionIceEvent>() else {
                return;
            };
            // `null` marks the end of gathering.
            if let Some(c) = ev.candidate() {
                ice_events.local_candidate(IceCandidate {
                    candidate: c.candidate(),
                    sdp_mid: c.sdp_mid(),
                    sdp_m_line_index: c.sdp_m_line_index(),
                    username_fragment: None,
                });
            }
        }));
        pc.set_onicecandidate(Some(onicecandidate.as_ref().unchecked_ref()));
        handlers.push(onicecandidate);

        let track_events = events.clone();
        let ontrack = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |ev: JsValue| {
            let Ok(ev) = ev.dyn_into::<RtcTrackEvent>() else {
                return;
            };
            let remote = ev
                .streams()
                .get(0)
                .dyn_into::<MediaStream>()
                .ok()
                .or_else(|| {
                    let stream = MediaStream::new().ok()?;
                    stream.add_track(&ev.track());
                    Some(stream)
                });
            if let Some(remote) = remote {
                track_events.remote_track(remote);
            }
        }));
        pc.set_ontrack(Some(ontrack.as_ref().unchecked_ref()));
        handlers.push(ontrack);

        let state_pc = pc.clone();
        let state_events = events;
        let onstatechange = Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_ev: JsValue| {
            if matches!(
                state_pc.connection_state(),
                RtcPeerConnectionState::Failed | RtcPeerConnectionState::Disconnected
            ) {
                state_events.connection_lost();
            }
        }));
        pc.set_onconnectionstatechange(Some(onstatechange.as_ref().unchecked_ref()));
        handlers.push(onstatechange);

        Ok(BrowserSession {
            pc,
            handlers: RefCell::new(handlers),
        })
    }
}

impl BrowserSession {
    async fn install_local(&self, kind: RtcSdpType, description: JsValue) -> Result<String, TransportError> {
        let sdp = js_sys::Reflect::get(&description, &"sdp".into())
            .map_err(js_err)?
            .as_string()
            .ok_or_else(|| TransportError::new("description without sdp"))?;

        let init = RtcSessionDescriptionInit::new(kind);
        init.set_sdp(&sdp);
        JsFuture::from(self.pc.set_local_description(&init))
            .await
            .map_err(js_err)?;
        Ok(sdp)
    }
}

#[async_trait(?Send)]
impl TransportSession for BrowserSession {
    async fn create_offer(&self) -> Result<String, TransportError> {
        let offer = JsFuture::from(self.pc.create_offer()).await.map_err(js_err)?;
        self.install_local(RtcSdpType::Offer, offer).await
    }

    async fn create_answer(&self) -> Result<String, TransportError> {
        let answer = JsFuture::from(self.pc.create_answer()).await.map_err(js_err)?;
        self.install_local(RtcSdpType::Answer, answer).await
    }

    async fn set_remote_description(
        &self,
        kind: SdpKind,
        sdp: &str,
    ) -> Result<(), TransportError> {
        let sdp_type = match kind {
            SdpKind::Offer => RtcSdpType::Offer,
            SdpKind::Answer => RtcSdpType::Answer,
        };
        let init = RtcSessionDescriptionInit::new(sdp_type);
        init.set_sdp(sdp);
        JsFuture::from(self.pc.set_remote_description(&init))
            .await
            .map_err(js_err)?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), TransportError> {
        let init = RtcIceCandidateInit::new(&candidate.candidate);
        init.set_sdp_mid(candidate.sdp_mid.as_deref());
        init.set_sdp_m_line_index(candidate.sdp_m_line_index);

        let promise = self
            .pc
            .add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init));
        JsFuture::from(promise).await.map_err(js_err)?;
        Ok(())
    }

    async fn close(&self) {
        self.pc.set_onicecandidate(None);
        self.pc.set_ontrack(None);
        self.pc.set_onconnectionstatechange(None);
        self.pc.close();
        self.handlers.borrow_mut().clear();
    }
}
