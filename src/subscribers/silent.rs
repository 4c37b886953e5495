use async_trait::async_trait;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Sink that drops every event. Default for [`GroupConfig`](crate::GroupConfig).
#[derive(Default, Debug, Clone, Copy)]
pub struct Silent;

#[async_trait]
impl Subscribe for Silent {
    async fn on_event(&self, _event: &Event) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}
