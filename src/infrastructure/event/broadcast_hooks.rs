use crate::application::ports::hooks::{LifecycleEvent, LifecycleHooks};
use tokio::sync::broadcast;
use tracing::debug;

/// tokio broadcast チャネルでライフサイクルイベントを配信する
///
/// 送信はブロックしない。購読者がいない場合や遅れている場合は取りこぼす。
#[derive(Clone)]
pub struct BroadcastLifecycleHooks {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl BroadcastLifecycleHooks {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}

impl LifecycleHooks for BroadcastLifecycleHooks {
    fn fire(&self, event: LifecycleEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => debug!(hook = name, receivers, "lifecycle hook fired"),
            Err(_) => debug!(hook = name, "lifecycle hook fired without subscribers"),
        }
    }
}
