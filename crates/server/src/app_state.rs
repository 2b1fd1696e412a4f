use server_api::ErgastContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) ergast: ErgastContext,
}
