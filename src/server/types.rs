use crate::signal::SignalingProxy;

#[derive(Clone)]
pub struct AppState {
    pub proxy: SignalingProxy,
}
