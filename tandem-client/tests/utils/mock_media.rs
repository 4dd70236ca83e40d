use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tandem_client::{MediaAccessError, MediaDevice, MediaStreamHandle};
use tandem_core::{MediaConstraints, TrackKind};

#[derive(Debug, Default)]
struct StreamState {
    audio: Option<bool>,
    video: Option<bool>,
    stopped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockStream {
    state: Rc<RefCell<StreamState>>,
}

impl MockStream {
    pub fn is_stopped(&self) -> bool {
        self.state.borrow().stopped
    }
}

impl MediaStreamHandle for MockStream {
    fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> bool {
        let mut state = self.state.borrow_mut();
        let slot = match kind {
            TrackKind::Audio => &mut state.audio,
            TrackKind::Video => &mut state.video,
        };
        match slot {
            Some(current) => {
                *current = enabled;
                true
            }
            None => false,
        }
    }

    fn is_track_enabled(&self, kind: TrackKind) -> Option<bool> {
        let state = self.state.borrow();
        match kind {
            TrackKind::Audio => state.audio,
            TrackKind::Video => state.video,
        }
    }

    fn stop(&self) {
        self.state.borrow_mut().stopped = true;
    }
}

#[derive(Clone, Default)]
pub struct MockMedia {
    failure: Rc<RefCell<Option<MediaAccessError>>>,
    acquired: Rc<Cell<usize>>,
}

impl MockMedia {
    pub fn failing(error: MediaAccessError) -> Self {
        let media = Self::default();
        *media.failure.borrow_mut() = Some(error);
        media
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }
}

#[async_trait(?Send)]
impl MediaDevice for MockMedia {
    type Stream = MockStream;

    async fn acquire(&self, constraints: MediaConstraints) -> Result<MockStream, MediaAccessError> {
        if let Some(error) = self.failure.borrow().clone() {
            return Err(error);
        }
        self.acquired.set(self.acquired.get() + 1);

        let stream = MockStream::default();
        {
            let mut state = stream.state.borrow_mut();
            state.audio = constraints.audio.then_some(true);
            state.video = constraints.video.then_some(true);
        }
        Ok(stream)
    }
}
